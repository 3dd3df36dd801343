// crates/access-decision-core/src/audit.rs
// ============================================================================
// Module: Decision Audit Logging
// Description: Structured audit events for access decisions.
// Purpose: Emit JSON-line decision logs without hard dependencies.
// Dependencies: serde, serde_json, crate::{strategy, trace}
// ============================================================================

//! ## Overview
//! This module defines the audit event emitted for each decision and the
//! sinks that receive it. Sinks are deliberately small so hosts can route
//! events into their own logging pipeline. Write failures are dropped and
//! never influence a decision.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::strategy::Strategy;
use crate::trace::VoteRecord;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Final outcome recorded for a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    /// Access was granted.
    Granted,
    /// Access was denied.
    Denied,
    /// The decision failed with an error.
    Error,
}

/// Access decision audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Strategy used by the manager.
    pub strategy: Strategy,
    /// Attributes requested by the caller.
    pub attributes: Vec<String>,
    /// Whether a subject was supplied.
    pub subject_present: bool,
    /// Principal identifier when the token has one.
    pub user_identifier: Option<String>,
    /// Decision outcome.
    pub outcome: DecisionOutcome,
    /// Votes collected before the decision completed.
    pub votes: Vec<VoteRecord>,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Error message when the decision failed.
    pub error: Option<String>,
}

/// Inputs required to construct a decision audit event.
pub struct DecisionAuditEventParams {
    /// Strategy used by the manager.
    pub strategy: Strategy,
    /// Attributes requested by the caller.
    pub attributes: Vec<String>,
    /// Whether a subject was supplied.
    pub subject_present: bool,
    /// Principal identifier when the token has one.
    pub user_identifier: Option<String>,
    /// Decision outcome.
    pub outcome: DecisionOutcome,
    /// Votes collected before the decision completed.
    pub votes: Vec<VoteRecord>,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Error message when the decision failed.
    pub error: Option<String>,
}

impl DecisionAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: DecisionAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "access_decision",
            timestamp_ms,
            strategy: params.strategy,
            attributes: params.attributes,
            subject_present: params.subject_present,
            user_identifier: params.user_identifier,
            outcome: params.outcome,
            votes: params.votes,
            error_kind: params.error_kind,
            error: params.error,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for access decision events.
pub trait DecisionAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &DecisionAuditEvent);
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl DecisionAuditSink for StderrAuditSink {
    fn record(&self, event: &DecisionAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl DecisionAuditSink for FileAuditSink {
    fn record(&self, event: &DecisionAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl DecisionAuditSink for NoopAuditSink {
    fn record(&self, _event: &DecisionAuditEvent) {}
}

/// Audit sink that keeps events in memory.
#[derive(Default)]
pub struct MemoryAuditSink {
    /// Recorded events in arrival order.
    events: Mutex<Vec<DecisionAuditEvent>>,
}

impl MemoryAuditSink {
    /// Creates an empty in-memory sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<DecisionAuditEvent> {
        self.lock().clone()
    }

    /// Locks the event buffer, recovering it if a writer panicked.
    fn lock(&self) -> MutexGuard<'_, Vec<DecisionAuditEvent>> {
        match self.events.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl DecisionAuditSink for MemoryAuditSink {
    fn record(&self, event: &DecisionAuditEvent) {
        self.lock().push(event.clone());
    }
}
