// crates/access-decision-core/src/vote.rs
// ============================================================================
// Module: Votes
// Description: The closed set of voter outcomes.
// Purpose: Represent grant, deny and abstain with stable integer codes.
// Dependencies: serde, crate::error
// ============================================================================

//! ## Overview
//! A [`Vote`] is one voter's opinion on an access check. The set is closed;
//! raw integer codes from bridged voters are validated through
//! [`Vote::from_code`], which rejects anything outside the legal set.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::error::VoterError;

// ============================================================================
// SECTION: Vote
// ============================================================================

/// Outcome of a single voter for one access check
///
/// # Invariants
/// - Exactly three variants; abstain is distinct from deny.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vote {
    /// The voter grants access
    Granted,
    /// The voter denies access
    Denied,
    /// The voter has no opinion on the request
    Abstained,
}

impl Vote {
    /// Raw code for [`Vote::Granted`]
    pub const GRANTED_CODE: i64 = 1;
    /// Raw code for [`Vote::Abstained`]
    pub const ABSTAINED_CODE: i64 = 0;
    /// Raw code for [`Vote::Denied`]
    pub const DENIED_CODE: i64 = -1;

    /// Converts a raw vote code into a vote
    ///
    /// # Errors
    ///
    /// Returns [`VoterError::IllegalVote`] when the code is not one of the
    /// three legal codes.
    pub const fn from_code(code: i64) -> Result<Self, VoterError> {
        match code {
            Self::GRANTED_CODE => Ok(Self::Granted),
            Self::ABSTAINED_CODE => Ok(Self::Abstained),
            Self::DENIED_CODE => Ok(Self::Denied),
            other => Err(VoterError::IllegalVote(other)),
        }
    }

    /// Returns the raw code for this vote
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Granted => Self::GRANTED_CODE,
            Self::Abstained => Self::ABSTAINED_CODE,
            Self::Denied => Self::DENIED_CODE,
        }
    }

    /// Returns true if the vote is `Granted`
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }

    /// Returns true if the vote is `Denied`
    #[must_use]
    pub const fn is_denied(self) -> bool {
        matches!(self, Self::Denied)
    }

    /// Returns true if the vote is `Abstained`
    #[must_use]
    pub const fn is_abstained(self) -> bool {
        matches!(self, Self::Abstained)
    }

    /// Stable lowercase label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
            Self::Abstained => "abstained",
        }
    }
}

impl From<bool> for Vote {
    fn from(value: bool) -> Self {
        if value { Self::Granted } else { Self::Denied }
    }
}

impl TryFrom<i64> for Vote {
    type Error = VoterError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
