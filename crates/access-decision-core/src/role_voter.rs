// crates/access-decision-core/src/role_voter.rs
// ============================================================================
// Module: Role Voter
// Description: Grants attributes that name a role held by the token.
// Purpose: Provide the standard prefix-scoped role check.
// Dependencies: crate::{error, token, vote, voter}
// ============================================================================

//! ## Overview
//! [`RoleVoter`] only looks at attributes that start with its prefix
//! (`ROLE_` by default) and compares them against the token's roles with an
//! exact, case-sensitive match. Role extraction goes through [`RoleSource`]
//! so hosts can supply roles from somewhere other than the token itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;

use crate::error::VoterError;
use crate::token::Token;
use crate::vote::Vote;
use crate::voter::Subject;
use crate::voter::Voter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix used when none is configured.
pub const DEFAULT_ROLE_PREFIX: &str = "ROLE_";

// ============================================================================
// SECTION: Role Extraction
// ============================================================================

/// Source of role identifiers for a token
pub trait RoleSource: Send + Sync {
    /// Returns the role identifiers associated with `token`
    fn extract_roles<'t>(&self, token: &'t dyn Token) -> Cow<'t, [String]>;
}

/// Reads roles straight from [`Token::role_names`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenRoles;

impl RoleSource for TokenRoles {
    fn extract_roles<'t>(&self, token: &'t dyn Token) -> Cow<'t, [String]> {
        Cow::Borrowed(token.role_names())
    }
}

// ============================================================================
// SECTION: Role Voter
// ============================================================================

/// Votes on prefixed attributes by matching them against token roles
///
/// # Invariants
/// - The prefix is fixed at construction.
#[derive(Debug, Clone)]
pub struct RoleVoter<R = TokenRoles> {
    /// Attribute prefix that marks a role check.
    prefix: String,
    /// Role extraction step.
    roles: R,
}

impl RoleVoter<TokenRoles> {
    /// Creates a role voter for attributes starting with `prefix`
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::with_role_source(prefix, TokenRoles)
    }
}

impl Default for RoleVoter<TokenRoles> {
    fn default() -> Self {
        Self::new(DEFAULT_ROLE_PREFIX)
    }
}

impl<R: RoleSource> RoleVoter<R> {
    /// Creates a role voter that reads roles through `roles`
    pub fn with_role_source(prefix: impl Into<String>, roles: R) -> Self {
        Self {
            prefix: prefix.into(),
            roles,
        }
    }

    /// Returns the configured attribute prefix
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl<R: RoleSource> Voter for RoleVoter<R> {
    fn vote(
        &self,
        token: &dyn Token,
        _subject: Subject<'_>,
        attributes: &[&str],
    ) -> Result<Vote, VoterError> {
        let roles = self.roles.extract_roles(token);
        let mut result = Vote::Abstained;
        for attribute in attributes {
            if !attribute.starts_with(self.prefix.as_str()) {
                continue;
            }
            result = Vote::Denied;
            if roles.iter().any(|role| role.as_str() == *attribute) {
                return Ok(Vote::Granted);
            }
        }
        Ok(result)
    }
}
