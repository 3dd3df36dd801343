// crates/access-decision-config/src/lib.rs
// ============================================================================
// Module: Access Decision Config Library
// Description: Config model, validation, and manager construction.
// Purpose: Single source of truth for access-decision.toml semantics.
// Dependencies: access-decision-core, serde, toml
// ============================================================================

//! ## Overview
//! `access-decision-config` defines the configuration model for the access
//! decision engine. It validates strictly and fails closed, then builds an
//! [`access_decision_core::AccessDecisionManager`] from the validated model.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
