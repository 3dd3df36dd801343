// crates/access-decision-core/src/strategy.rs
// ============================================================================
// Module: Decision Strategies
// Description: Strategy selector and tie-break options for the manager.
// Purpose: Name the four vote reducers and validate strategy names eagerly.
// Dependencies: serde, crate::error
// ============================================================================

//! ## Overview
//! [`Strategy`] is a closed enum, so the mapping from strategy to reducer is
//! checked exhaustively at compile time. Names coming from configuration or
//! other string sources are parsed with [`Strategy::from_str`], which fails
//! immediately for unknown names.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::AccessDecisionError;

// ============================================================================
// SECTION: Strategy
// ============================================================================

/// Rule used to combine voter outcomes into one decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Grant if any voter grants
    #[default]
    Affirmative,
    /// Grant if grants outnumber denies
    Consensus,
    /// Grant only if no voter denies any attribute
    Unanimous,
    /// The first voter that does not abstain decides
    Priority,
}

impl Strategy {
    /// All strategies in declaration order
    pub const ALL: [Self; 4] = [Self::Affirmative, Self::Consensus, Self::Unanimous, Self::Priority];

    /// Stable lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Affirmative => "affirmative",
            Self::Consensus => "consensus",
            Self::Unanimous => "unanimous",
            Self::Priority => "priority",
        }
    }
}

impl FromStr for Strategy {
    type Err = AccessDecisionError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == name)
            .ok_or_else(|| AccessDecisionError::UnsupportedStrategy(name.to_string()))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Options
// ============================================================================

/// Strategy plus the abstain and tie-break fallbacks
///
/// # Invariants
/// - Fixed once handed to a manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionOptions {
    /// Reducer applied to the votes.
    #[serde(default)]
    pub strategy: Strategy,
    /// Result when every voter abstains.
    #[serde(default)]
    pub allow_if_all_abstain: bool,
    /// Consensus result when grants and denies are tied.
    #[serde(default = "default_allow_if_equal")]
    pub allow_if_equal_granted_denied: bool,
}

impl DecisionOptions {
    /// Default options for `strategy`
    #[must_use]
    pub const fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            allow_if_all_abstain: false,
            allow_if_equal_granted_denied: true,
        }
    }

    /// Sets the all-abstain fallback
    #[must_use]
    pub const fn with_allow_if_all_abstain(mut self, allow: bool) -> Self {
        self.allow_if_all_abstain = allow;
        self
    }

    /// Sets the consensus tie-break
    #[must_use]
    pub const fn with_allow_if_equal_granted_denied(mut self, allow: bool) -> Self {
        self.allow_if_equal_granted_denied = allow;
        self
    }
}

impl Default for DecisionOptions {
    fn default() -> Self {
        Self::new(Strategy::default())
    }
}

/// Serde default for the tie-break flag.
const fn default_allow_if_equal() -> bool {
    true
}
