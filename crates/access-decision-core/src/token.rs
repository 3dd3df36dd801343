// crates/access-decision-core/src/token.rs
// ============================================================================
// Module: Tokens
// Description: Principal representations consulted by voters.
// Purpose: Expose role identifiers without coupling to authentication.
// Dependencies: none
// ============================================================================

//! ## Overview
//! A token is produced by whatever authentication layer the host uses. The
//! decision engine only needs the role identifiers it carries; roles are
//! matched case-sensitively with no hierarchy expansion.

// ============================================================================
// SECTION: Token Trait
// ============================================================================

/// Authenticated (or anonymous) principal consulted during voting.
pub trait Token: Send + Sync {
    /// Role identifiers granted to the principal.
    fn role_names(&self) -> &[String];

    /// Identifier of the principal, `None` for anonymous tokens.
    fn user_identifier(&self) -> Option<&str> {
        None
    }
}

// ============================================================================
// SECTION: Concrete Tokens
// ============================================================================

/// Token for an authenticated user with a fixed role set.
///
/// # Invariants
/// - Roles are kept in the order supplied; duplicates are harmless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedToken {
    /// User identifier.
    user: String,
    /// Role identifiers.
    roles: Vec<String>,
}

impl AuthenticatedToken {
    /// Creates a token for `user` holding `roles`.
    pub fn new<I, S>(user: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            user: user.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }
}

impl Token for AuthenticatedToken {
    fn role_names(&self) -> &[String] {
        &self.roles
    }

    fn user_identifier(&self) -> Option<&str> {
        Some(&self.user)
    }
}

/// Anonymous token with no roles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullToken;

impl Token for NullToken {
    fn role_names(&self) -> &[String] {
        &[]
    }
}
