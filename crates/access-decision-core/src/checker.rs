// crates/access-decision-core/src/checker.rs
// ============================================================================
// Module: Authorization Checker
// Description: Enforcement-point facade over token storage and the manager.
// Purpose: Answer "is the current principal granted X?" in one call.
// Dependencies: crate::{error, manager, storage, token, voter}
// ============================================================================

//! ## Overview
//! [`AuthorizationChecker`] reads the current token from [`TokenStorage`]
//! and asks the [`AccessDecisionManager`]. Without a stored token the check
//! runs against [`NullToken`], so voters see an anonymous principal.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::error::AccessDecisionError;
use crate::manager::AccessDecisionManager;
use crate::storage::TokenStorage;
use crate::token::NullToken;
use crate::token::Token;
use crate::voter::Subject;

// ============================================================================
// SECTION: Checker
// ============================================================================

/// Checks attributes for the token currently held in storage
#[derive(Clone)]
pub struct AuthorizationChecker {
    /// Source of the current token.
    storage: Arc<TokenStorage>,
    /// Decision manager.
    manager: Arc<AccessDecisionManager>,
}

impl AuthorizationChecker {
    /// Creates a checker over `storage` and `manager`
    #[must_use]
    pub const fn new(storage: Arc<TokenStorage>, manager: Arc<AccessDecisionManager>) -> Self {
        Self {
            storage,
            manager,
        }
    }

    /// Returns true when `attribute` is granted on `subject`
    ///
    /// # Errors
    ///
    /// Propagates [`AccessDecisionError`] from the manager.
    pub fn is_granted(
        &self,
        attribute: &str,
        subject: Subject<'_>,
    ) -> Result<bool, AccessDecisionError> {
        self.check(&[attribute], subject, false)
    }

    /// Returns true when the attribute set is granted on `subject`
    ///
    /// Multi-attribute semantics follow the manager's strategy.
    ///
    /// # Errors
    ///
    /// Propagates [`AccessDecisionError`] from the manager.
    pub fn is_granted_all(
        &self,
        attributes: &[&str],
        subject: Subject<'_>,
    ) -> Result<bool, AccessDecisionError> {
        self.check(attributes, subject, true)
    }

    /// Resolves the current token and delegates to the manager.
    fn check(
        &self,
        attributes: &[&str],
        subject: Subject<'_>,
        allow_multiple_attributes: bool,
    ) -> Result<bool, AccessDecisionError> {
        let stored = self.storage.token();
        let token: &dyn Token = match stored.as_deref() {
            Some(token) => token,
            None => &NullToken,
        };
        self.manager.decide(token, attributes, subject, allow_multiple_attributes)
    }
}
