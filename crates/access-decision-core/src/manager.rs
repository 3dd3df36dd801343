// crates/access-decision-core/src/manager.rs
// ============================================================================
// Module: Access Decision Manager
// Description: Combines voter outcomes into a single grant/deny decision.
// Purpose: Implement the affirmative, consensus, unanimous and priority rules.
// Dependencies: crate::{audit, error, strategy, token, trace, vote, voter}
// ============================================================================

//! ## Overview
//! The manager owns an ordered, immutable voter list and a fixed
//! [`DecisionOptions`]. Each [`AccessDecisionManager::decide`] call is
//! independent: it runs the voters, reduces their votes with the selected
//! strategy and returns `true` when access is granted.
//!
//! Voter contract violations and multi-attribute calls without opt-in are
//! returned as [`AccessDecisionError`]; they are never folded into `false`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::slice;
use std::sync::Arc;

use crate::audit::DecisionAuditEvent;
use crate::audit::DecisionAuditEventParams;
use crate::audit::DecisionAuditSink;
use crate::audit::DecisionOutcome;
use crate::error::AccessDecisionError;
use crate::strategy::DecisionOptions;
use crate::strategy::Strategy;
use crate::token::Token;
use crate::trace::DecisionTrace;
use crate::trace::NoopTrace;
use crate::trace::RecordingTrace;
use crate::vote::Vote;
use crate::voter::Subject;
use crate::voter::Voter;

// ============================================================================
// SECTION: Manager
// ============================================================================

/// Runs voters and reduces their votes with the configured strategy
///
/// # Invariants
/// - Voter order and options are fixed at construction.
/// - Holds no per-decision state; safe to share across threads.
#[derive(Clone)]
pub struct AccessDecisionManager {
    /// Ordered voter registry.
    voters: Vec<Arc<dyn Voter>>,
    /// Strategy and fallbacks.
    options: DecisionOptions,
    /// Optional audit sink receiving one event per decision.
    audit: Option<Arc<dyn DecisionAuditSink>>,
}

impl AccessDecisionManager {
    /// Creates a manager over `voters` with the given options
    pub fn new<I>(voters: I, options: DecisionOptions) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Voter>>,
    {
        Self {
            voters: voters.into_iter().collect(),
            options,
            audit: None,
        }
    }

    /// Creates a manager from a strategy name
    ///
    /// # Errors
    ///
    /// Returns [`AccessDecisionError::UnsupportedStrategy`] when `strategy`
    /// does not name a known reducer.
    pub fn with_strategy_name<I>(
        voters: I,
        strategy: &str,
        allow_if_all_abstain: bool,
        allow_if_equal_granted_denied: bool,
    ) -> Result<Self, AccessDecisionError>
    where
        I: IntoIterator<Item = Arc<dyn Voter>>,
    {
        let options = DecisionOptions::new(strategy.parse()?)
            .with_allow_if_all_abstain(allow_if_all_abstain)
            .with_allow_if_equal_granted_denied(allow_if_equal_granted_denied);
        Ok(Self::new(voters, options))
    }

    /// Attaches an audit sink
    #[must_use]
    pub fn with_audit_sink(mut self, sink: Arc<dyn DecisionAuditSink>) -> Self {
        self.audit = Some(sink);
        self
    }

    /// Registered voters in consultation order
    #[must_use]
    pub fn voters(&self) -> &[Arc<dyn Voter>] {
        &self.voters
    }

    /// Strategy and fallbacks
    #[must_use]
    pub const fn options(&self) -> DecisionOptions {
        self.options
    }

    /// Decides whether `token` may access `subject` under `attributes`
    ///
    /// # Errors
    ///
    /// Returns [`AccessDecisionError::MultipleAttributes`] when more than one
    /// attribute is passed without `allow_multiple_attributes`, and
    /// [`AccessDecisionError::VoterContractViolation`] when a voter fails.
    pub fn decide(
        &self,
        token: &dyn Token,
        attributes: &[&str],
        subject: Subject<'_>,
        allow_multiple_attributes: bool,
    ) -> Result<bool, AccessDecisionError> {
        self.decide_traced(token, attributes, subject, allow_multiple_attributes, &mut NoopTrace)
    }

    /// Same as [`Self::decide`], reporting every vote to `trace`
    ///
    /// # Errors
    ///
    /// See [`Self::decide`].
    pub fn decide_traced<T>(
        &self,
        token: &dyn Token,
        attributes: &[&str],
        subject: Subject<'_>,
        allow_multiple_attributes: bool,
        trace: &mut T,
    ) -> Result<bool, AccessDecisionError>
    where
        T: DecisionTrace + ?Sized,
    {
        let Some(sink) = &self.audit else {
            return self.run(token, attributes, subject, allow_multiple_attributes, trace);
        };

        let mut tee = TeeTrace {
            inner: trace,
            recording: RecordingTrace::new(),
        };
        let result = self.run(token, attributes, subject, allow_multiple_attributes, &mut tee);
        let (outcome, error_kind, error) = match &result {
            Ok(true) => (DecisionOutcome::Granted, None, None),
            Ok(false) => (DecisionOutcome::Denied, None, None),
            Err(err) => (DecisionOutcome::Error, Some(err.kind()), Some(err.to_string())),
        };
        sink.record(&DecisionAuditEvent::new(DecisionAuditEventParams {
            strategy: self.options.strategy,
            attributes: attributes.iter().map(ToString::to_string).collect(),
            subject_present: subject.is_some(),
            user_identifier: token.user_identifier().map(ToString::to_string),
            outcome,
            votes: tee.recording.into_records(),
            error_kind,
            error,
        }));
        result
    }

    // ========================================================================
    // SECTION: Dispatch
    // ========================================================================

    /// Validates the call shape and dispatches to the strategy reducer.
    fn run<T>(
        &self,
        token: &dyn Token,
        attributes: &[&str],
        subject: Subject<'_>,
        allow_multiple_attributes: bool,
        trace: &mut T,
    ) -> Result<bool, AccessDecisionError>
    where
        T: DecisionTrace + ?Sized,
    {
        if attributes.len() > 1 && !allow_multiple_attributes {
            return Err(AccessDecisionError::MultipleAttributes {
                count: attributes.len(),
            });
        }

        match self.options.strategy {
            Strategy::Affirmative => self.decide_affirmative(token, attributes, subject, trace),
            Strategy::Consensus => self.decide_consensus(token, attributes, subject, trace),
            Strategy::Unanimous => self.decide_unanimous(token, attributes, subject, trace),
            Strategy::Priority => self.decide_priority(token, attributes, subject, trace),
        }
    }

    // ========================================================================
    // SECTION: Reducers
    // ========================================================================

    /// Grants on the first grant; otherwise any deny denies.
    fn decide_affirmative<T>(
        &self,
        token: &dyn Token,
        attributes: &[&str],
        subject: Subject<'_>,
        trace: &mut T,
    ) -> Result<bool, AccessDecisionError>
    where
        T: DecisionTrace + ?Sized,
    {
        let mut deny = 0_usize;
        for voter in &self.voters {
            match cast_vote(&**voter, token, subject, attributes, trace)? {
                Vote::Granted => return Ok(true),
                Vote::Denied => deny += 1,
                Vote::Abstained => {}
            }
        }

        if deny > 0 {
            return Ok(false);
        }
        Ok(self.options.allow_if_all_abstain)
    }

    /// Majority of non-abstaining votes wins; ties use the tie-break flag.
    fn decide_consensus<T>(
        &self,
        token: &dyn Token,
        attributes: &[&str],
        subject: Subject<'_>,
        trace: &mut T,
    ) -> Result<bool, AccessDecisionError>
    where
        T: DecisionTrace + ?Sized,
    {
        let mut grant = 0_usize;
        let mut deny = 0_usize;
        for voter in &self.voters {
            match cast_vote(&**voter, token, subject, attributes, trace)? {
                Vote::Granted => grant += 1,
                Vote::Denied => deny += 1,
                Vote::Abstained => {}
            }
        }

        if grant > deny {
            return Ok(true);
        }
        if deny > grant {
            return Ok(false);
        }
        if grant > 0 {
            return Ok(self.options.allow_if_equal_granted_denied);
        }
        Ok(self.options.allow_if_all_abstain)
    }

    /// Votes per (voter, attribute); any deny vetoes.
    fn decide_unanimous<T>(
        &self,
        token: &dyn Token,
        attributes: &[&str],
        subject: Subject<'_>,
        trace: &mut T,
    ) -> Result<bool, AccessDecisionError>
    where
        T: DecisionTrace + ?Sized,
    {
        let mut grant = 0_usize;
        for voter in &self.voters {
            for attribute in attributes {
                let single = slice::from_ref(attribute);
                match cast_vote(&**voter, token, subject, single, trace)? {
                    Vote::Denied => return Ok(false),
                    Vote::Granted => grant += 1,
                    Vote::Abstained => {}
                }
            }
        }

        if grant > 0 {
            return Ok(true);
        }
        Ok(self.options.allow_if_all_abstain)
    }

    /// The first voter that does not abstain decides.
    fn decide_priority<T>(
        &self,
        token: &dyn Token,
        attributes: &[&str],
        subject: Subject<'_>,
        trace: &mut T,
    ) -> Result<bool, AccessDecisionError>
    where
        T: DecisionTrace + ?Sized,
    {
        for voter in &self.voters {
            match cast_vote(&**voter, token, subject, attributes, trace)? {
                Vote::Granted => return Ok(true),
                Vote::Denied => return Ok(false),
                Vote::Abstained => {}
            }
        }
        Ok(self.options.allow_if_all_abstain)
    }
}

impl fmt::Debug for AccessDecisionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.voters.iter().map(|voter| voter.name()).collect();
        f.debug_struct("AccessDecisionManager")
            .field("voters", &names)
            .field("options", &self.options)
            .field("audit", &self.audit.is_some())
            .finish()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Runs one voter, attributing any contract failure to it.
fn cast_vote<T>(
    voter: &dyn Voter,
    token: &dyn Token,
    subject: Subject<'_>,
    attributes: &[&str],
    trace: &mut T,
) -> Result<Vote, AccessDecisionError>
where
    T: DecisionTrace + ?Sized,
{
    let vote = voter
        .vote(token, subject, attributes)
        .map_err(|err| AccessDecisionError::from_voter(voter.name(), &err))?;
    trace.on_vote(voter.name(), attributes, vote);
    Ok(vote)
}

/// Forwards votes to a caller trace while recording them for audit.
struct TeeTrace<'a, T: ?Sized> {
    /// Caller-supplied trace.
    inner: &'a mut T,
    /// Audit copy of the votes.
    recording: RecordingTrace,
}

impl<T: DecisionTrace + ?Sized> DecisionTrace for TeeTrace<'_, T> {
    fn on_vote(&mut self, voter: &str, attributes: &[&str], vote: Vote) {
        self.inner.on_vote(voter, attributes, vote);
        self.recording.on_vote(voter, attributes, vote);
    }
}
