//! Application settings.
//!
//! Settings are plain data with serde support so a host application can keep
//! them next to its own configuration. Every field has a default; an empty
//! document deserializes to [`AppSettings::default`].

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How bool options are parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BooleanMode {
    /// Bool options are flags: `--verbose` means true, absence means false.
    #[default]
    Implicit,
    /// Bool options take a value: `--verbose true`.
    Explicit,
}

/// Settings for injecting piped stdin into arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipedInputSettings {
    /// Read redirected stdin into the target command's list operand.
    pub enabled: bool,
    /// Allow a list option to receive piped input when given `target_indicator`.
    pub to_options: bool,
    /// The placeholder value marking an option as the pipe target.
    pub target_indicator: String,
}

impl Default for PipedInputSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            to_options: false,
            target_indicator: "%piped%".to_string(),
        }
    }
}

/// Settings controlling parsing, binding, and the runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// When true, unexpected arguments are collected into the unparsed list
    /// instead of failing the parse.
    pub ignore_unexpected_operands: bool,
    /// Treat `[name]` arguments as values rather than directives.
    pub disable_directives: bool,
    pub boolean_mode: BooleanMode,
    /// Add an inherited `-h|--help` option to the root command.
    pub help_option: bool,
    /// Print error source chains, not only the top-level message.
    pub verbose_errors: bool,
    pub piped_input: PipedInputSettings,
    /// Prompt on the console for operands that received no value.
    pub prompt_for_missing_operands: bool,
    /// Executable used by `[suggest-helper:register]`.
    pub suggest_helper: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            ignore_unexpected_operands: false,
            disable_directives: false,
            boolean_mode: BooleanMode::Implicit,
            help_option: true,
            verbose_errors: false,
            piped_input: PipedInputSettings::default(),
            prompt_for_missing_operands: false,
            suggest_helper: "suggest-helper".to_string(),
        }
    }
}

impl AppSettings {
    /// Strict mode: unexpected arguments are parse errors.
    pub fn is_strict(&self) -> bool {
        !self.ignore_unexpected_operands
    }

    pub fn directives_enabled(&self) -> bool {
        !self.disable_directives
    }

    /// Loads settings from a YAML document.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(source).map_err(|e| ConfigError::Settings(e.to_string()))
    }

    /// Loads settings from a JSON document.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(source).map_err(|e| ConfigError::Settings(e.to_string()))
    }
}
