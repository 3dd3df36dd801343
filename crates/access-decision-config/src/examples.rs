// crates/access-decision-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and tooling.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for access decision configuration. The output is
//! deterministic and must stay loadable by [`crate::AccessDecisionConfig`].

/// Returns a canonical example `access-decision.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[decision]
strategy = "affirmative"
allow_if_all_abstain = false
allow_if_equal_granted_denied = true

[role_voter]
enabled = true
prefix = "ROLE_"

[audit]
sink = "file"
path = "access-decision-audit.log"
"#,
    )
}
