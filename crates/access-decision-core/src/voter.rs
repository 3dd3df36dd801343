// crates/access-decision-core/src/voter.rs
// ============================================================================
// Module: Voters
// Description: The vote capability and the supports/decide template adapter.
// Purpose: Let authors plug independent access rules into the decision manager.
// Dependencies: crate::{error, token, vote}
// ============================================================================

//! ## Overview
//! [`Voter`] is the single capability the manager consumes. Most rules only
//! care about "does this rule apply?" and "does it pass?", so
//! [`AttributeVoter`] captures that pair and [`TemplateVoter`] turns it into a
//! full voter with the standard iteration contract:
//!
//! - abstain when no attribute is supported
//! - deny once any attribute is supported
//! - grant as soon as one supported attribute passes
//!
//! [`PredicateVoter`] and [`TypedSubjectVoter`] build attribute voters from
//! closures so callers compose rules instead of defining new types.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::marker::PhantomData;

use crate::error::VoterError;
use crate::token::Token;
use crate::vote::Vote;

// ============================================================================
// SECTION: Subject
// ============================================================================

/// Optional, untyped object an access check is performed against
pub type Subject<'a> = Option<&'a dyn Any>;

/// Downcasts a subject to a concrete type
///
/// Returns `None` when the subject is absent or of another type.
#[must_use]
pub fn subject_as<T: Any>(subject: Subject<'_>) -> Option<&T> {
    subject.and_then(|value| value.downcast_ref::<T>())
}

// ============================================================================
// SECTION: Voter Capability
// ============================================================================

/// Independent access rule consulted by the decision manager
pub trait Voter: Send + Sync {
    /// Diagnostic name used in errors, traces and audit events
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Votes on the given attributes for `token` and `subject`
    ///
    /// Unsupported attribute/subject combinations must abstain.
    ///
    /// # Errors
    ///
    /// Returns [`VoterError`] when the voter cannot honor its contract; this
    /// is never a substitute for a deny.
    fn vote(
        &self,
        token: &dyn Token,
        subject: Subject<'_>,
        attributes: &[&str],
    ) -> Result<Vote, VoterError>;
}

// ============================================================================
// SECTION: Template Voter
// ============================================================================

/// Per-attribute rule consumed by [`TemplateVoter`]
pub trait AttributeVoter: Send + Sync {
    /// Returns true when this rule applies to `attribute` and `subject`
    ///
    /// Shape or type checks on the subject belong here; a mismatch is
    /// "not supported", never an error.
    fn supports(&self, attribute: &str, subject: Subject<'_>) -> bool;

    /// Decides a single supported attribute
    ///
    /// Only called after [`AttributeVoter::supports`] returned true.
    ///
    /// # Errors
    ///
    /// Returns [`VoterError`] on a broken internal contract.
    fn vote_on_attribute(
        &self,
        attribute: &str,
        subject: Subject<'_>,
        token: &dyn Token,
    ) -> Result<bool, VoterError>;
}

/// Adapter turning an [`AttributeVoter`] into a [`Voter`]
///
/// # Invariants
/// - The name is fixed at construction.
#[derive(Debug, Clone)]
pub struct TemplateVoter<A> {
    /// Diagnostic name.
    name: String,
    /// Wrapped per-attribute rule.
    inner: A,
}

impl<A: AttributeVoter> TemplateVoter<A> {
    /// Wraps `inner` under the diagnostic `name`
    pub fn new(name: impl Into<String>, inner: A) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }

    /// Returns the wrapped rule
    #[must_use]
    pub const fn inner(&self) -> &A {
        &self.inner
    }
}

impl<A: AttributeVoter> Voter for TemplateVoter<A> {
    fn name(&self) -> &str {
        &self.name
    }

    fn vote(
        &self,
        token: &dyn Token,
        subject: Subject<'_>,
        attributes: &[&str],
    ) -> Result<Vote, VoterError> {
        let mut vote = Vote::Abstained;
        for attribute in attributes {
            if !self.inner.supports(attribute, subject) {
                continue;
            }
            vote = Vote::Denied;
            if self.inner.vote_on_attribute(attribute, subject, token)? {
                return Ok(Vote::Granted);
            }
        }
        Ok(vote)
    }
}

// ============================================================================
// SECTION: Closure-Based Rules
// ============================================================================

/// Attribute voter built from a `supports` and a `decide` closure
pub struct PredicateVoter<S, D> {
    /// Applicability predicate.
    supports: S,
    /// Decision predicate.
    decide: D,
}

impl<S, D> PredicateVoter<S, D>
where
    S: Fn(&str, Subject<'_>) -> bool + Send + Sync,
    D: Fn(&str, Subject<'_>, &dyn Token) -> bool + Send + Sync,
{
    /// Creates a rule from two predicates
    pub const fn new(supports: S, decide: D) -> Self {
        Self {
            supports,
            decide,
        }
    }
}

impl<S, D> AttributeVoter for PredicateVoter<S, D>
where
    S: Fn(&str, Subject<'_>) -> bool + Send + Sync,
    D: Fn(&str, Subject<'_>, &dyn Token) -> bool + Send + Sync,
{
    fn supports(&self, attribute: &str, subject: Subject<'_>) -> bool {
        (self.supports)(attribute, subject)
    }

    fn vote_on_attribute(
        &self,
        attribute: &str,
        subject: Subject<'_>,
        token: &dyn Token,
    ) -> Result<bool, VoterError> {
        Ok((self.decide)(attribute, subject, token))
    }
}

/// Attribute voter whose predicates receive a subject of type `T`
///
/// An absent subject or one of another type is treated as unsupported.
pub struct TypedSubjectVoter<T, S, D> {
    /// Applicability predicate over the typed subject.
    supports: S,
    /// Decision predicate over the typed subject.
    decide: D,
    /// Subject type marker.
    subject: PhantomData<fn(&T)>,
}

impl<T, S, D> TypedSubjectVoter<T, S, D>
where
    T: Any,
    S: Fn(&str, &T) -> bool + Send + Sync,
    D: Fn(&str, &T, &dyn Token) -> bool + Send + Sync,
{
    /// Creates a rule from two typed predicates
    pub const fn new(supports: S, decide: D) -> Self {
        Self {
            supports,
            decide,
            subject: PhantomData,
        }
    }
}

impl<T, S, D> AttributeVoter for TypedSubjectVoter<T, S, D>
where
    T: Any,
    S: Fn(&str, &T) -> bool + Send + Sync,
    D: Fn(&str, &T, &dyn Token) -> bool + Send + Sync,
{
    fn supports(&self, attribute: &str, subject: Subject<'_>) -> bool {
        subject_as::<T>(subject).is_some_and(|typed| (self.supports)(attribute, typed))
    }

    fn vote_on_attribute(
        &self,
        attribute: &str,
        subject: Subject<'_>,
        token: &dyn Token,
    ) -> Result<bool, VoterError> {
        subject_as::<T>(subject).map(|typed| (self.decide)(attribute, typed, token)).ok_or_else(
            || {
                VoterError::contract(format!(
                    "subject is not a {} after supports() accepted it",
                    std::any::type_name::<T>()
                ))
            },
        )
    }
}

// ============================================================================
// SECTION: Constructors
// ============================================================================

/// Builds a named voter from `supports` and `decide` closures
pub fn predicate_voter<S, D>(
    name: impl Into<String>,
    supports: S,
    decide: D,
) -> TemplateVoter<PredicateVoter<S, D>>
where
    S: Fn(&str, Subject<'_>) -> bool + Send + Sync,
    D: Fn(&str, Subject<'_>, &dyn Token) -> bool + Send + Sync,
{
    TemplateVoter::new(name, PredicateVoter::new(supports, decide))
}

/// Builds a named voter whose closures receive a subject of type `T`
pub fn typed_subject_voter<T, S, D>(
    name: impl Into<String>,
    supports: S,
    decide: D,
) -> TemplateVoter<TypedSubjectVoter<T, S, D>>
where
    T: Any,
    S: Fn(&str, &T) -> bool + Send + Sync,
    D: Fn(&str, &T, &dyn Token) -> bool + Send + Sync,
{
    TemplateVoter::new(name, TypedSubjectVoter::new(supports, decide))
}
