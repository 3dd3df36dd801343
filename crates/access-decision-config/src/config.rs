// crates/access-decision-config/src/config.rs
// ============================================================================
// Module: Access Decision Configuration
// Description: Configuration loading and validation for the decision engine.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: access-decision-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every field is validated before a manager is built, so an unknown strategy
//! or an incomplete audit section fails at startup instead of surfacing as a
//! denial at decision time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use access_decision_core::AccessDecisionManager;
use access_decision_core::DEFAULT_ROLE_PREFIX;
use access_decision_core::DecisionAuditSink;
use access_decision_core::DecisionOptions;
use access_decision_core::FileAuditSink;
use access_decision_core::RoleVoter;
use access_decision_core::StderrAuditSink;
use access_decision_core::Strategy;
use access_decision_core::Voter;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "access-decision.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "ACCESS_DECISION_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of the role voter prefix.
pub(crate) const MAX_ROLE_PREFIX_LENGTH: usize = 64;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Access decision engine configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AccessDecisionConfig {
    /// Strategy and fallback configuration.
    #[serde(default)]
    pub decision: DecisionConfig,
    /// Built-in role voter configuration.
    #[serde(default)]
    pub role_voter: RoleVoterConfig,
    /// Audit sink configuration.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl AccessDecisionConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = config_path(path);
        check_path_limits("config path", &resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.decision.validate()?;
        self.role_voter.validate()?;
        self.audit.validate()?;
        Ok(())
    }

    /// Builds a decision manager from this configuration.
    ///
    /// The role voter (when enabled) is consulted first, followed by
    /// `extra_voters` in the order supplied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid or the audit
    /// sink cannot be opened.
    pub fn build_manager<I>(&self, extra_voters: I) -> Result<AccessDecisionManager, ConfigError>
    where
        I: IntoIterator<Item = Arc<dyn Voter>>,
    {
        self.validate()?;
        let mut voters: Vec<Arc<dyn Voter>> = Vec::new();
        if self.role_voter.enabled {
            voters.push(Arc::new(RoleVoter::new(self.role_voter.prefix.clone())));
        }
        voters.extend(extra_voters);

        let manager = AccessDecisionManager::new(voters, self.decision.options()?);
        Ok(match self.audit.open_sink()? {
            Some(sink) => manager.with_audit_sink(sink),
            None => manager,
        })
    }
}

/// Strategy and fallback configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DecisionConfig {
    /// Strategy name (`affirmative`, `consensus`, `unanimous`, `priority`).
    #[serde(default = "default_strategy")]
    pub strategy: String,
    /// Result when every voter abstains.
    #[serde(default)]
    pub allow_if_all_abstain: bool,
    /// Consensus result when grants and denies are tied.
    #[serde(default = "default_true")]
    pub allow_if_equal_granted_denied: bool,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            allow_if_all_abstain: false,
            allow_if_equal_granted_denied: true,
        }
    }
}

impl DecisionConfig {
    /// Resolves the configured decision options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the strategy name is unknown.
    pub fn options(&self) -> Result<DecisionOptions, ConfigError> {
        let strategy: Strategy = self
            .strategy
            .parse()
            .map_err(|err| ConfigError::Invalid(format!("decision.strategy: {err}")))?;
        Ok(DecisionOptions::new(strategy)
            .with_allow_if_all_abstain(self.allow_if_all_abstain)
            .with_allow_if_equal_granted_denied(self.allow_if_equal_granted_denied))
    }

    /// Validates decision configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        self.options().map(|_| ())
    }
}

/// Built-in role voter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoleVoterConfig {
    /// Whether the role voter is registered.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Attribute prefix that marks a role check.
    #[serde(default = "default_role_prefix")]
    pub prefix: String,
}

impl Default for RoleVoterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prefix: default_role_prefix(),
        }
    }
}

impl RoleVoterConfig {
    /// Validates role voter configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }
        if self.prefix.is_empty() {
            return Err(ConfigError::Invalid("role_voter.prefix must be non-empty".to_string()));
        }
        if self.prefix.len() > MAX_ROLE_PREFIX_LENGTH {
            return Err(ConfigError::Invalid("role_voter.prefix exceeds max length".to_string()));
        }
        if self.prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid(
                "role_voter.prefix must not contain whitespace".to_string(),
            ));
        }
        Ok(())
    }
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// No audit output.
    #[default]
    None,
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to a file.
    File,
}

/// Audit sink configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink receiving decision events.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file path (required for the file sink).
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required when audit.sink = file".to_string()))
            }
            (AuditSinkKind::File, Some(path)) if path.trim().is_empty() => {
                Err(ConfigError::Invalid("audit.path must be non-empty".to_string()))
            }
            (AuditSinkKind::File, Some(path)) => check_path_limits("audit.path", Path::new(path.trim())),
            (AuditSinkKind::None | AuditSinkKind::Stderr, Some(_)) => Err(ConfigError::Invalid(
                "audit.path is only valid when audit.sink = file".to_string(),
            )),
            (AuditSinkKind::None | AuditSinkKind::Stderr, None) => Ok(()),
        }
    }

    /// Opens the configured sink, `None` when auditing is disabled.
    fn open_sink(&self) -> Result<Option<Arc<dyn DecisionAuditSink>>, ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::None, _) => Ok(None),
            (AuditSinkKind::Stderr, _) => Ok(Some(Arc::new(StderrAuditSink))),
            (AuditSinkKind::File, Some(path)) => {
                let sink = FileAuditSink::new(Path::new(path.trim()))
                    .map_err(|err| ConfigError::Io(err.to_string()))?;
                Ok(Some(Arc::new(sink)))
            }
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required when audit.sink = file".to_string()))
            }
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Serde default for the strategy name.
fn default_strategy() -> String {
    Strategy::default().as_str().to_string()
}

/// Serde default for the role prefix.
fn default_role_prefix() -> String {
    DEFAULT_ROLE_PREFIX.to_string()
}

/// Serde default for flags that are on unless disabled.
const fn default_true() -> bool {
    true
}

/// Picks the config file: the explicit path, then the environment override,
/// then the default name in the working directory.
fn config_path(explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => env::var_os(CONFIG_ENV_VAR)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_NAME), PathBuf::from),
    }
}

/// Rejects paths whose total or per-component length exceeds the limits.
///
/// `label` prefixes the error message.
fn check_path_limits(label: &str, path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{label} exceeds max length")));
    }
    if path.components().any(|component| component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH) {
        return Err(ConfigError::Invalid(format!("{label} component too long")));
    }
    Ok(())
}
