// crates/access-decision-core/src/error.rs
// ============================================================================
// Module: Access Decision Errors
// Description: Structured failures for voters and the decision manager.
// Purpose: Keep misconfiguration and contract violations distinct from denials.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Denied and abstained votes are ordinary outcomes and never appear here.
//! The errors in this module describe a broken authorization setup: an
//! unknown strategy, a multi-attribute call without opt-in, or a voter that
//! violated its contract. Callers must surface them rather than coerce them
//! into `false`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Voter Errors
// ============================================================================

/// Contract violation raised by a voter implementation.
///
/// # Invariants
/// - Never used for unsupported attributes or subjects; those abstain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoterError {
    /// The voter produced a raw vote code outside the legal set.
    #[error("illegal vote value {0}")]
    IllegalVote(i64),
    /// The voter detected malformed internal state.
    #[error("{0}")]
    ContractViolation(String),
}

impl VoterError {
    /// Creates a contract violation with a custom message.
    pub fn contract(message: impl Into<String>) -> Self {
        Self::ContractViolation(message.into())
    }
}

// ============================================================================
// SECTION: Decision Errors
// ============================================================================

/// Errors surfaced by [`crate::AccessDecisionManager`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessDecisionError {
    /// The strategy name does not map to a known reducer.
    #[error("the strategy \"{0}\" is not supported")]
    UnsupportedStrategy(String),
    /// More than one attribute was passed without explicit opt-in.
    #[error("passing more than one security attribute ({count}) to decide() is not supported")]
    MultipleAttributes {
        /// Number of attributes supplied by the caller.
        count: usize,
    },
    /// A voter broke the vote contract.
    #[error("\"{voter}::vote()\" must return granted, denied or abstained: {reason}")]
    VoterContractViolation {
        /// Diagnostic name of the offending voter.
        voter: String,
        /// Description of the illegal value or broken invariant.
        reason: String,
    },
}

impl AccessDecisionError {
    /// Wraps a voter error with the name of the voter that raised it.
    #[must_use]
    pub fn from_voter(voter: &str, error: &VoterError) -> Self {
        Self::VoterContractViolation {
            voter: voter.to_string(),
            reason: error.to_string(),
        }
    }

    /// Stable label used in audit events.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedStrategy(_) => "unsupported_strategy",
            Self::MultipleAttributes {
                ..
            } => "multiple_attributes",
            Self::VoterContractViolation {
                ..
            } => "voter_contract_violation",
        }
    }
}
