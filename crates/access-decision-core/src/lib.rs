// crates/access-decision-core/src/lib.rs
// ============================================================================
// Module: Access Decision Root
// Description: Public API surface for the voting-based authorization engine.
// Purpose: Wire together votes, voters, strategies, the manager and audit.
// Dependencies: crate::{audit, checker, error, manager, role_voter, storage, strategy, token,
//              trace, vote, voter}
// ============================================================================

//! ## Overview
//! Independent [`Voter`]s each return a [`Vote`] for an access check; the
//! [`AccessDecisionManager`] reduces those votes into one boolean decision
//! with one of four [`Strategy`] rules. Tokens, subjects and attributes are
//! opaque to the manager: only voters interpret them.

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod audit;
pub mod checker;
pub mod error;
pub mod manager;
pub mod role_voter;
pub mod storage;
pub mod strategy;
pub mod token;
pub mod trace;
pub mod vote;
pub mod voter;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::DecisionAuditEvent;
pub use audit::DecisionAuditSink;
pub use audit::DecisionOutcome;
pub use audit::FileAuditSink;
pub use audit::MemoryAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use checker::AuthorizationChecker;
pub use error::AccessDecisionError;
pub use error::VoterError;
pub use manager::AccessDecisionManager;
pub use role_voter::DEFAULT_ROLE_PREFIX;
pub use role_voter::RoleSource;
pub use role_voter::RoleVoter;
pub use role_voter::TokenRoles;
pub use storage::TokenInitializer;
pub use storage::TokenStorage;
pub use strategy::DecisionOptions;
pub use strategy::Strategy;
pub use token::AuthenticatedToken;
pub use token::NullToken;
pub use token::Token;
pub use trace::DecisionTrace;
pub use trace::NoopTrace;
pub use trace::RecordingTrace;
pub use trace::VoteRecord;
pub use vote::Vote;
pub use voter::AttributeVoter;
pub use voter::PredicateVoter;
pub use voter::Subject;
pub use voter::TemplateVoter;
pub use voter::TypedSubjectVoter;
pub use voter::Voter;
pub use voter::predicate_voter;
pub use voter::subject_as;
pub use voter::typed_subject_voter;
