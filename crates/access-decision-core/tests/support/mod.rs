// crates/access-decision-core/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared result helpers and fixture voters for decision tests.
// ============================================================================
//! ## Overview
//! Shared test helpers for consistent Result-based assertions plus small
//! voters with scripted behavior.

#![allow(
    dead_code,
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use access_decision_core::AuthenticatedToken;
use access_decision_core::Subject;
use access_decision_core::Token;
use access_decision_core::Vote;
use access_decision_core::Voter;
use access_decision_core::VoterError;

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across decision integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Lightweight error type for test assertions.
#[derive(Debug)]
struct TestError {
    /// Human-readable failure message.
    message: String,
}

impl TestError {
    /// Creates a new test error with the provided message.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TestError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl Error for TestError {}

/// Returns an error when a test condition fails.
///
/// # Errors
/// Returns a `TestError` when the condition is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestResult {
    if condition { Ok(()) } else { Err(Box::new(TestError::new(message))) }
}

// ========================================================================
// Tokens
// ========================================================================

/// Token holding `ROLE_ADMIN` and `ROLE_USER`.
pub fn admin_token() -> AuthenticatedToken {
    AuthenticatedToken::new("alice", ["ROLE_ADMIN", "ROLE_USER"])
}

// ========================================================================
// Fixture Voters
// ========================================================================

/// Voter that always returns the same vote.
pub struct FixedVoter {
    /// Vote returned on every call.
    vote: Vote,
    /// Number of vote calls observed.
    calls: AtomicUsize,
}

impl FixedVoter {
    /// Creates a voter returning `vote`.
    pub const fn new(vote: Vote) -> Self {
        Self {
            vote,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `vote` was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Voter for FixedVoter {
    fn name(&self) -> &str {
        match self.vote {
            Vote::Granted => "grant",
            Vote::Denied => "deny",
            Vote::Abstained => "abstain",
        }
    }

    fn vote(
        &self,
        _token: &dyn Token,
        _subject: Subject<'_>,
        _attributes: &[&str],
    ) -> Result<Vote, VoterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.vote)
    }
}

/// Voter bridging a raw vote code, as a foreign voter would.
pub struct CodeVoter {
    /// Raw code returned by the bridged voter.
    code: i64,
}

impl CodeVoter {
    /// Creates a voter returning the raw `code`.
    pub const fn new(code: i64) -> Self {
        Self {
            code,
        }
    }
}

impl Voter for CodeVoter {
    fn name(&self) -> &str {
        "CodeVoter"
    }

    fn vote(
        &self,
        _token: &dyn Token,
        _subject: Subject<'_>,
        _attributes: &[&str],
    ) -> Result<Vote, VoterError> {
        Vote::from_code(self.code)
    }
}

/// Voter that votes per attribute from a fixed table.
///
/// Multi-attribute calls grant if any attribute grants, deny if any
/// attribute denies, and abstain otherwise.
pub struct TableVoter {
    /// Vote per attribute; unknown attributes abstain.
    table: BTreeMap<String, Vote>,
}

impl TableVoter {
    /// Creates a voter from `(attribute, vote)` pairs.
    pub fn new<const N: usize>(entries: [(&str, Vote); N]) -> Self {
        Self {
            table: entries.into_iter().map(|(key, vote)| (key.to_string(), vote)).collect(),
        }
    }
}

impl Voter for TableVoter {
    fn name(&self) -> &str {
        "TableVoter"
    }

    fn vote(
        &self,
        _token: &dyn Token,
        _subject: Subject<'_>,
        attributes: &[&str],
    ) -> Result<Vote, VoterError> {
        let mut result = Vote::Abstained;
        for attribute in attributes {
            match self.table.get(*attribute).copied().unwrap_or(Vote::Abstained) {
                Vote::Granted => return Ok(Vote::Granted),
                Vote::Denied => result = Vote::Denied,
                Vote::Abstained => {}
            }
        }
        Ok(result)
    }
}

/// Builds a shared voter list from fixed votes.
pub fn fixed_voters(votes: &[Vote]) -> Vec<Arc<dyn Voter>> {
    votes.iter().map(|vote| Arc::new(FixedVoter::new(*vote)) as Arc<dyn Voter>).collect()
}
