// crates/access-decision-core/src/trace.rs
// ============================================================================
// Module: Decision Trace Hooks
// Description: Observers notified of every vote during a decision.
// Purpose: Expose per-voter outcomes without changing the decision path.
// Dependencies: serde, crate::vote
// ============================================================================

//! ## Overview
//! The manager reports each vote it consumes to a [`DecisionTrace`]. The
//! fast path uses [`NoopTrace`]; [`RecordingTrace`] keeps the ordered records
//! for audit events and debugging.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::vote::Vote;

// ============================================================================
// SECTION: Trace Hooks
// ============================================================================

/// Trace hook for vote collection
pub trait DecisionTrace {
    /// Called after a voter returned a legal vote
    fn on_vote(&mut self, voter: &str, attributes: &[&str], vote: Vote);
}

/// No-op trace hook for fast paths
///
/// # Invariants
/// - Zero-sized marker type; carries no state.
#[derive(Debug, Default)]
pub struct NoopTrace;

impl DecisionTrace for NoopTrace {
    fn on_vote(&mut self, _voter: &str, _attributes: &[&str], _vote: Vote) {}
}

// ============================================================================
// SECTION: Recording Trace
// ============================================================================

/// One vote observed during a decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoteRecord {
    /// Diagnostic name of the voter.
    pub voter: String,
    /// Attributes passed to this vote call.
    pub attributes: Vec<String>,
    /// Vote returned.
    pub vote: Vote,
}

/// Trace hook that keeps every vote in call order
#[derive(Debug, Default)]
pub struct RecordingTrace {
    /// Ordered vote records.
    records: Vec<VoteRecord>,
}

impl RecordingTrace {
    /// Creates an empty recording trace
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Recorded votes in call order
    #[must_use]
    pub fn records(&self) -> &[VoteRecord] {
        &self.records
    }

    /// Consumes the trace and returns its records
    #[must_use]
    pub fn into_records(self) -> Vec<VoteRecord> {
        self.records
    }
}

impl DecisionTrace for RecordingTrace {
    fn on_vote(&mut self, voter: &str, attributes: &[&str], vote: Vote) {
        self.records.push(VoteRecord {
            voter: voter.to_string(),
            attributes: attributes.iter().map(ToString::to_string).collect(),
            vote,
        });
    }
}
