// crates/access-decision-core/tests/manager.rs
// ============================================================================
// Module: Decision Manager Tests
// Description: Strategy reducers, call-shape checks and voter failures.
// ============================================================================
//! ## Overview
//! Validates the four strategies, the multi-attribute guard, eager strategy
//! validation and voter contract violations.

mod support;

use std::sync::Arc;

use access_decision_core::AccessDecisionError;
use access_decision_core::AccessDecisionManager;
use access_decision_core::DecisionOptions;
use access_decision_core::RecordingTrace;
use access_decision_core::Strategy;
use access_decision_core::Vote;
use access_decision_core::Voter;
use support::CodeVoter;
use support::FixedVoter;
use support::TableVoter;
use support::TestResult;
use support::admin_token;
use support::ensure;
use support::fixed_voters;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a manager over fixed votes.
fn manager(strategy: Strategy, votes: &[Vote], options: DecisionOptions) -> AccessDecisionManager {
    AccessDecisionManager::new(fixed_voters(votes), DecisionOptions {
        strategy,
        ..options
    })
}

/// Decides a single attribute against the admin token.
fn decide_one(manager: &AccessDecisionManager) -> Result<bool, AccessDecisionError> {
    manager.decide(&admin_token(), &["EDIT"], None, false)
}

// ============================================================================
// SECTION: Empty Voter Lists
// ============================================================================

#[test]
fn empty_voter_list_follows_all_abstain_flag_for_every_strategy() -> TestResult {
    for strategy in Strategy::ALL {
        for allow in [true, false] {
            let options = DecisionOptions::new(strategy).with_allow_if_all_abstain(allow);
            let manager = AccessDecisionManager::new(Vec::new(), options);
            ensure(
                decide_one(&manager)? == allow,
                format!("{strategy} with no voters should return {allow}"),
            )?;
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Affirmative
// ============================================================================

#[test]
fn affirmative_grants_when_any_voter_grants() -> TestResult {
    let manager = manager(
        Strategy::Affirmative,
        &[Vote::Denied, Vote::Abstained, Vote::Granted],
        DecisionOptions::default(),
    );
    ensure(decide_one(&manager)?, "a later grant must win under affirmative")?;
    Ok(())
}

#[test]
fn affirmative_denies_without_grant() -> TestResult {
    let manager = manager(
        Strategy::Affirmative,
        &[Vote::Denied, Vote::Abstained],
        DecisionOptions::default().with_allow_if_all_abstain(true),
    );
    ensure(!decide_one(&manager)?, "a deny without grants must deny")?;
    Ok(())
}

#[test]
fn affirmative_all_abstain_uses_flag() -> TestResult {
    let votes = [Vote::Abstained, Vote::Abstained];
    let allow = manager(
        Strategy::Affirmative,
        &votes,
        DecisionOptions::default().with_allow_if_all_abstain(true),
    );
    let deny = manager(Strategy::Affirmative, &votes, DecisionOptions::default());
    ensure(decide_one(&allow)?, "all abstain with flag set should grant")?;
    ensure(!decide_one(&deny)?, "all abstain by default should deny")?;
    Ok(())
}

#[test]
fn affirmative_stops_at_first_grant() -> TestResult {
    let first = Arc::new(FixedVoter::new(Vote::Granted));
    let second = Arc::new(FixedVoter::new(Vote::Denied));
    let voters: Vec<Arc<dyn Voter>> = vec![first.clone(), second.clone()];
    let manager = AccessDecisionManager::new(voters, DecisionOptions::default());
    ensure(decide_one(&manager)?, "first grant should grant")?;
    ensure(first.calls() == 1, "first voter should be consulted once")?;
    ensure(second.calls() == 0, "voters after a grant should not be consulted")?;
    Ok(())
}

// ============================================================================
// SECTION: Consensus
// ============================================================================

#[test]
fn consensus_majority_grants() -> TestResult {
    let manager = manager(
        Strategy::Consensus,
        &[Vote::Granted, Vote::Granted, Vote::Denied],
        DecisionOptions::default(),
    );
    ensure(decide_one(&manager)?, "two grants against one deny should grant")?;
    Ok(())
}

#[test]
fn consensus_majority_denies() -> TestResult {
    let manager = manager(
        Strategy::Consensus,
        &[Vote::Denied, Vote::Granted, Vote::Denied, Vote::Abstained],
        DecisionOptions::default(),
    );
    ensure(!decide_one(&manager)?, "two denies against one grant should deny")?;
    Ok(())
}

#[test]
fn consensus_tie_uses_equal_flag() -> TestResult {
    let votes = [Vote::Granted, Vote::Denied];
    let allow = manager(
        Strategy::Consensus,
        &votes,
        DecisionOptions::default().with_allow_if_equal_granted_denied(true),
    );
    let deny = manager(
        Strategy::Consensus,
        &votes,
        DecisionOptions::default().with_allow_if_equal_granted_denied(false),
    );
    ensure(decide_one(&allow)?, "tie with equal flag set should grant")?;
    ensure(!decide_one(&deny)?, "tie with equal flag cleared should deny")?;
    Ok(())
}

#[test]
fn consensus_all_abstain_ignores_equal_flag() -> TestResult {
    let votes = [Vote::Abstained, Vote::Abstained];
    let options = DecisionOptions::default()
        .with_allow_if_equal_granted_denied(true)
        .with_allow_if_all_abstain(false);
    ensure(
        !decide_one(&manager(Strategy::Consensus, &votes, options))?,
        "all abstain must use the abstain flag, not the tie flag",
    )?;
    let options = options.with_allow_if_all_abstain(true);
    ensure(
        decide_one(&manager(Strategy::Consensus, &votes, options))?,
        "all abstain with abstain flag set should grant",
    )?;
    Ok(())
}

// ============================================================================
// SECTION: Unanimous
// ============================================================================

#[test]
fn unanimous_denies_when_any_attribute_is_denied() -> TestResult {
    let voter: Arc<dyn Voter> =
        Arc::new(TableVoter::new([("A", Vote::Granted), ("B", Vote::Denied)]));
    let manager =
        AccessDecisionManager::new(vec![voter], DecisionOptions::new(Strategy::Unanimous));
    ensure(
        !manager.decide(&admin_token(), &["A", "B"], None, true)?,
        "a per-attribute deny must veto the decision",
    )?;
    Ok(())
}

#[test]
fn unanimous_grants_when_every_attribute_is_granted() -> TestResult {
    let voter: Arc<dyn Voter> =
        Arc::new(TableVoter::new([("A", Vote::Granted), ("B", Vote::Granted)]));
    let manager =
        AccessDecisionManager::new(vec![voter], DecisionOptions::new(Strategy::Unanimous));
    ensure(
        manager.decide(&admin_token(), &["A", "B"], None, true)?,
        "grants on both attributes should grant",
    )?;
    Ok(())
}

#[test]
fn unanimous_votes_once_per_voter_and_attribute() -> TestResult {
    let voter: Arc<dyn Voter> =
        Arc::new(TableVoter::new([("A", Vote::Granted), ("B", Vote::Abstained)]));
    let other: Arc<dyn Voter> = Arc::new(FixedVoter::new(Vote::Abstained));
    let manager =
        AccessDecisionManager::new(vec![voter, other], DecisionOptions::new(Strategy::Unanimous));
    let mut trace = RecordingTrace::new();
    let granted =
        manager.decide_traced(&admin_token(), &["A", "B"], None, true, &mut trace)?;
    ensure(granted, "a grant with only abstains otherwise should grant")?;
    let records = trace.records();
    ensure(records.len() == 4, "expected one vote per voter and attribute")?;
    ensure(
        records.iter().all(|record| record.attributes.len() == 1),
        "each unanimous vote call carries a single attribute",
    )?;
    ensure(
        records[0].attributes == ["A"] && records[1].attributes == ["B"],
        "attributes are visited in order for each voter",
    )?;
    Ok(())
}

#[test]
fn unanimous_all_abstain_uses_flag() -> TestResult {
    let votes = [Vote::Abstained];
    let options = DecisionOptions::new(Strategy::Unanimous).with_allow_if_all_abstain(true);
    ensure(decide_one(&manager(Strategy::Unanimous, &votes, options))?, "abstain flag grants")?;
    Ok(())
}

// ============================================================================
// SECTION: Priority
// ============================================================================

#[test]
fn priority_first_non_abstain_deny_wins() -> TestResult {
    let manager = manager(
        Strategy::Priority,
        &[Vote::Abstained, Vote::Denied, Vote::Granted],
        DecisionOptions::default(),
    );
    ensure(!decide_one(&manager)?, "the first deny must win over a later grant")?;
    Ok(())
}

#[test]
fn priority_first_non_abstain_grant_wins() -> TestResult {
    let manager = manager(
        Strategy::Priority,
        &[Vote::Abstained, Vote::Abstained, Vote::Granted],
        DecisionOptions::default(),
    );
    ensure(decide_one(&manager)?, "the first grant should grant")?;
    Ok(())
}

// ============================================================================
// SECTION: Call Shape
// ============================================================================

#[test]
fn multiple_attributes_require_opt_in_for_every_strategy() -> TestResult {
    for strategy in Strategy::ALL {
        let manager = manager(strategy, &[Vote::Granted], DecisionOptions::default());
        let result = manager.decide(&admin_token(), &["A", "B"], None, false);
        ensure(
            result
                == Err(AccessDecisionError::MultipleAttributes {
                    count: 2,
                }),
            format!("{strategy} must reject two attributes without opt-in"),
        )?;
    }
    Ok(())
}

#[test]
fn multiple_attributes_with_opt_in_are_decided() -> TestResult {
    let manager = manager(Strategy::Affirmative, &[Vote::Granted], DecisionOptions::default());
    ensure(
        manager.decide(&admin_token(), &["A", "B"], None, true)?,
        "opted-in multi-attribute call should be decided",
    )?;
    Ok(())
}

// ============================================================================
// SECTION: Strategy Names
// ============================================================================

#[test]
fn unknown_strategy_name_fails_construction() -> TestResult {
    for name in ["", "majority", "Affirmative"] {
        let result = AccessDecisionManager::with_strategy_name(Vec::new(), name, false, true);
        ensure(
            matches!(result, Err(AccessDecisionError::UnsupportedStrategy(ref got)) if got == name),
            format!("strategy name '{name}' should be rejected"),
        )?;
    }
    Ok(())
}

#[test]
fn known_strategy_names_construct() -> TestResult {
    for strategy in Strategy::ALL {
        let manager =
            AccessDecisionManager::with_strategy_name(Vec::new(), strategy.as_str(), true, false)?;
        let options = manager.options();
        ensure(options.strategy == strategy, "strategy should round-trip through its name")?;
        ensure(options.allow_if_all_abstain, "abstain flag should be kept")?;
        ensure(!options.allow_if_equal_granted_denied, "tie flag should be kept")?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Voter Contract Violations
// ============================================================================

#[test]
fn illegal_vote_code_is_reported_for_every_strategy() -> TestResult {
    for strategy in Strategy::ALL {
        let voters: Vec<Arc<dyn Voter>> =
            vec![Arc::new(FixedVoter::new(Vote::Abstained)), Arc::new(CodeVoter::new(2))];
        let manager = AccessDecisionManager::new(voters, DecisionOptions::new(strategy));
        match decide_one(&manager) {
            Err(AccessDecisionError::VoterContractViolation {
                voter,
                reason,
            }) => {
                ensure(voter == "CodeVoter", "error should name the offending voter")?;
                ensure(reason.contains('2'), "error should include the illegal value")?;
            }
            _ => return Err(format!("{strategy} should surface the contract violation").into()),
        }
    }
    Ok(())
}

#[test]
fn legal_vote_codes_bridge_cleanly() -> TestResult {
    let voters: Vec<Arc<dyn Voter>> = vec![Arc::new(CodeVoter::new(Vote::GRANTED_CODE))];
    let manager = AccessDecisionManager::new(voters, DecisionOptions::default());
    ensure(decide_one(&manager)?, "code 1 should bridge to a grant")?;
    Ok(())
}

#[test]
fn contract_violation_is_not_a_denial() -> TestResult {
    let voters: Vec<Arc<dyn Voter>> =
        vec![Arc::new(CodeVoter::new(-7)), Arc::new(FixedVoter::new(Vote::Granted))];
    let manager = AccessDecisionManager::new(voters, DecisionOptions::new(Strategy::Consensus));
    ensure(decide_one(&manager).is_err(), "a broken voter must not be counted as a deny")?;
    Ok(())
}

// ============================================================================
// SECTION: Idempotence
// ============================================================================

#[test]
fn repeated_decisions_are_identical() -> TestResult {
    for strategy in Strategy::ALL {
        let manager = manager(
            strategy,
            &[Vote::Abstained, Vote::Granted, Vote::Denied],
            DecisionOptions::default(),
        );
        let first = decide_one(&manager)?;
        let second = decide_one(&manager)?;
        ensure(first == second, format!("{strategy} must be idempotent"))?;
    }
    Ok(())
}
