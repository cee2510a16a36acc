//! Configuration System for fuzzy-duration
//!
//! Provides:
//! - TOML configuration files
//! - Environment variable overrides
//! - Multiple config file locations
//! - Eager validation into an [`InferenceSystem`]
//!
//! # Configuration File Locations
//!
//! Configuration files are searched in order (first found wins):
//! 1. `./fuzzy-duration.toml` - Project-local configuration
//! 2. `~/.config/fuzzy-duration/config.toml` - User configuration (XDG)
//! 3. `~/.fuzzy-duration/config.toml` - User configuration (legacy)
//! 4. `/etc/fuzzy-duration/config.toml` - System-wide configuration
//!
//! # Environment Variables
//!
//! - `FUZZY_DURATION_SAMPLES` - Aggregation sample count
//! - `FUZZY_DURATION_FALLBACK` - Output used when no rule fires
//! - `FUZZY_DURATION_LOG_LEVEL` - Logging verbosity (quiet, normal, verbose, debug)
//! - `FUZZY_DURATION_FORMAT` - Default output format (text, json)
//!
//! An override that does not parse is an error, as is any unknown key or
//! section in a config file.
//!
//! # Example Configuration
//!
//! ```toml
//! [inference]
//! samples = 240
//! fallback = 30.0
//!
//! [variables.input1]
//! name = "queue"
//! domain = [0.0, 200.0]
//!
//! [variables.input1.terms]
//! small = [-100.0, 0.0, 100.0]
//! medium = [0.0, 100.0, 200.0]
//! large = [100.0, 200.0, 300.0]
//!
//! [[rules]]
//! input1 = "small"
//! input2 = "small"
//! output = "very_short"
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::{InferenceSystem, DEFAULT_FALLBACK, DEFAULT_SAMPLES};
use crate::error::{ErrorCode, FisError, FisResult};
use crate::fuzzy::{
    reference_input, reference_output, InputTerm, LinguisticVariable, OutputTerm, Rule,
    RuleTable, Triangle,
};

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "fuzzy-duration.toml";

// ============================================================================
// Configuration Schema
// ============================================================================

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FisConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Sampling and fallback
    pub inference: InferenceConfig,
    /// Membership functions of all three variables
    pub variables: VariablesConfig,
    /// Rule table, one entry per antecedent pair
    pub rules: Vec<Rule>,
}

impl Default for FisConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            inference: InferenceConfig::default(),
            variables: VariablesConfig::default(),
            rules: RuleTable::reference().rules().to_vec(),
        }
    }
}

/// General configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralConfig {
    /// Logging level
    pub log_level: LogLevel,
    /// Default output format
    pub format: OutputFormat,
}

/// Aggregation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InferenceConfig {
    /// Output domain is sampled at `samples + 1` points
    pub samples: usize,
    /// Crisp output when the aggregated surface is all zero
    pub fallback: f64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SAMPLES,
            fallback: DEFAULT_FALLBACK,
        }
    }
}

/// The three linguistic variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VariablesConfig {
    pub input1: InputVariableConfig,
    pub input2: InputVariableConfig,
    pub output: OutputVariableConfig,
}

impl Default for VariablesConfig {
    fn default() -> Self {
        Self {
            input1: InputVariableConfig::from(&reference_input("queue")),
            input2: InputVariableConfig::from(&reference_input("arrivals")),
            output: OutputVariableConfig::from(&reference_output()),
        }
    }
}

/// An input variable: one triangle per [`InputTerm`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputVariableConfig {
    pub name: String,
    pub domain: (f64, f64),
    pub terms: InputTermsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputTermsConfig {
    pub small: Triangle,
    pub medium: Triangle,
    pub large: Triangle,
}

/// The output variable: one triangle per [`OutputTerm`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputVariableConfig {
    pub name: String,
    pub domain: (f64, f64),
    pub terms: OutputTermsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputTermsConfig {
    pub very_short: Triangle,
    pub short: Triangle,
    pub medium: Triangle,
    pub long: Triangle,
    pub very_long: Triangle,
}

impl InputVariableConfig {
    pub fn to_variable(&self) -> LinguisticVariable<InputTerm> {
        LinguisticVariable::new(self.name.clone(), self.domain)
            .with_term(InputTerm::Small, self.terms.small)
            .with_term(InputTerm::Medium, self.terms.medium)
            .with_term(InputTerm::Large, self.terms.large)
    }
}

impl From<&LinguisticVariable<InputTerm>> for InputVariableConfig {
    fn from(var: &LinguisticVariable<InputTerm>) -> Self {
        let tri = |t| var.triangle(t).copied().unwrap_or(Triangle::new(0.0, 0.0, 0.0));
        Self {
            name: var.name.clone(),
            domain: var.domain,
            terms: InputTermsConfig {
                small: tri(InputTerm::Small),
                medium: tri(InputTerm::Medium),
                large: tri(InputTerm::Large),
            },
        }
    }
}

impl OutputVariableConfig {
    pub fn to_variable(&self) -> LinguisticVariable<OutputTerm> {
        LinguisticVariable::new(self.name.clone(), self.domain)
            .with_term(OutputTerm::VeryShort, self.terms.very_short)
            .with_term(OutputTerm::Short, self.terms.short)
            .with_term(OutputTerm::Medium, self.terms.medium)
            .with_term(OutputTerm::Long, self.terms.long)
            .with_term(OutputTerm::VeryLong, self.terms.very_long)
    }
}

impl From<&LinguisticVariable<OutputTerm>> for OutputVariableConfig {
    fn from(var: &LinguisticVariable<OutputTerm>) -> Self {
        let tri = |t| var.triangle(t).copied().unwrap_or(Triangle::new(0.0, 0.0, 0.0));
        Self {
            name: var.name.clone(),
            domain: var.domain,
            terms: OutputTermsConfig {
                very_short: tri(OutputTerm::VeryShort),
                short: tri(OutputTerm::Short),
                medium: tri(OutputTerm::Medium),
                long: tri(OutputTerm::Long),
                very_long: tri(OutputTerm::VeryLong),
            },
        }
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }

}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "plain" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("unknown output format '{}'", s)),
        }
    }
}

/// Log level options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Quiet,
    #[default]
    Normal,
    Verbose,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Verbose => "verbose",
            LogLevel::Debug => "debug",
        }
    }

    /// Maximum `tracing` level emitted at this verbosity
    pub fn tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Quiet => tracing::Level::ERROR,
            LogLevel::Normal => tracing::Level::INFO,
            LogLevel::Verbose => tracing::Level::DEBUG,
            LogLevel::Debug => tracing::Level::TRACE,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quiet" | "q" | "0" => Ok(LogLevel::Quiet),
            "normal" | "n" | "1" => Ok(LogLevel::Normal),
            "verbose" | "v" | "2" => Ok(LogLevel::Verbose),
            "debug" | "d" | "3" => Ok(LogLevel::Debug),
            _ => Err(format!("unknown log level '{}'", s)),
        }
    }
}

// ============================================================================
// Configuration Loading
// ============================================================================

impl FisConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from default locations, then apply environment
    /// variable overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for path in Self::config_paths() {
            if path.exists() {
                config = Self::load_from_file(&path)?;
                break;
            }
        }

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e.to_string()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))
    }

    /// Load configuration from a TOML string
    pub fn load_from_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(PathBuf::from("<string>"), e.to_string()))
    }

    /// Get the list of config file search paths
    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("fuzzy-duration").join("config.toml"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".fuzzy-duration").join("config.toml"));
        }

        #[cfg(unix)]
        paths.push(PathBuf::from("/etc/fuzzy-duration/config.toml"));

        paths
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from any key lookup. A value that does not parse is
    /// rejected and leaves the configuration untouched.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let samples = override_value::<usize, _>(&lookup, "FUZZY_DURATION_SAMPLES")?;
        let fallback = override_value::<f64, _>(&lookup, "FUZZY_DURATION_FALLBACK")?;
        let log_level = override_value::<LogLevel, _>(&lookup, "FUZZY_DURATION_LOG_LEVEL")?;
        let format = override_value::<OutputFormat, _>(&lookup, "FUZZY_DURATION_FORMAT")?;

        if let Some(samples) = samples {
            self.inference.samples = samples;
        }
        if let Some(fallback) = fallback {
            self.inference.fallback = fallback;
        }
        if let Some(level) = log_level {
            self.general.log_level = level;
        }
        if let Some(format) = format {
            self.general.format = format;
        }
        Ok(())
    }

    /// Validate everything and assemble the inference system
    pub fn build_system(&self) -> FisResult<InferenceSystem> {
        let rules = RuleTable::new(self.rules.clone())?;
        InferenceSystem::new(
            self.variables.input1.to_variable(),
            self.variables.input2.to_variable(),
            self.variables.output.to_variable(),
            rules,
            self.inference.samples,
            self.inference.fallback,
        )
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Write configuration to a file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml()?;
        write_file(path, &content)
    }

    /// Write the commented default configuration to a file
    pub fn write_default_file(path: &Path) -> Result<(), ConfigError> {
        write_file(path, Self::default_config_content())
    }

    /// Generate a default configuration file content
    pub fn default_config_content() -> &'static str {
        r#"# fuzzy-duration configuration
# Every section is optional; omitted sections use the values below.

[general]
# Logging level: quiet, normal, verbose, debug
log_level = "normal"
# Output format: text, json
format = "text"

[inference]
# The output domain is sampled at samples + 1 points
samples = 120
# Output (seconds) when no rule fires
fallback = 30.0

# Triangles are [left foot, peak, right foot] with left <= peak <= right.
# Domains only bound sampling and plotting; fuzzification is unbounded.

[variables.input1]
name = "queue"
domain = [0.0, 200.0]

[variables.input1.terms]
small = [-100.0, 0.0, 100.0]
medium = [0.0, 100.0, 200.0]
large = [100.0, 200.0, 300.0]

[variables.input2]
name = "arrivals"
domain = [0.0, 200.0]

[variables.input2.terms]
small = [-100.0, 0.0, 100.0]
medium = [0.0, 100.0, 200.0]
large = [100.0, 200.0, 300.0]

[variables.output]
name = "duration"
domain = [0.0, 60.0]

[variables.output.terms]
very_short = [-15.0, 0.0, 15.0]
short = [0.0, 15.0, 30.0]
medium = [15.0, 30.0, 45.0]
long = [30.0, 45.0, 60.0]
very_long = [45.0, 60.0, 75.0]

# Exactly one rule per (input1, input2) pair.
[[rules]]
input1 = "small"
input2 = "small"
output = "very_short"

[[rules]]
input1 = "small"
input2 = "medium"
output = "short"

[[rules]]
input1 = "small"
input2 = "large"
output = "medium"

[[rules]]
input1 = "medium"
input2 = "small"
output = "short"

[[rules]]
input1 = "medium"
input2 = "medium"
output = "medium"

[[rules]]
input1 = "medium"
input2 = "large"
output = "long"

[[rules]]
input1 = "large"
input2 = "small"
output = "medium"

[[rules]]
input1 = "large"
input2 = "medium"
output = "long"

[[rules]]
input1 = "large"
input2 = "large"
output = "very_long"
"#
    }
}

fn override_value<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value,
            }),
        },
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), ConfigError> {
    fs::write(path, content).map_err(|e| ConfigError::WriteError(path.to_path_buf(), e.to_string()))
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error reading {}: {}", .0.display(), .1)]
    IoError(PathBuf, String),
    /// Parse error in config file
    #[error("Parse error in {}: {}", .0.display(), .1)]
    ParseError(PathBuf, String),
    /// IO error writing config file
    #[error("IO error writing {}: {}", .0.display(), .1)]
    WriteError(PathBuf, String),
    /// An override value that does not parse
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializeError(String),
}

impl From<ConfigError> for FisError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::IoError(path, cause) => {
                FisError::new(
                    ErrorCode::ConfigNotFound,
                    format!("cannot read {}", path.display()),
                )
                .with_context("path", path.display().to_string())
                .with_cause(cause)
            }
            ConfigError::ParseError(path, cause) => {
                FisError::new(
                    ErrorCode::InvalidConfigSyntax,
                    format!("cannot parse {}", path.display()),
                )
                .with_context("path", path.display().to_string())
                .with_cause(cause)
                .with_hint("run `fuzzy-duration config init` for a commented template")
            }
            ConfigError::WriteError(path, cause) => {
                FisError::new(
                    ErrorCode::ConfigWriteFailed,
                    format!("cannot write {}", path.display()),
                )
                .with_context("path", path.display().to_string())
                .with_cause(cause)
            }
            ConfigError::InvalidValue { key, value } => FisError::new(
                ErrorCode::InvalidConfigValue,
                format!("invalid value for {}: '{}'", key, value),
            )
            .with_context("key", key),
            ConfigError::SerializeError(cause) => {
                FisError::new(ErrorCode::SerializationFailed, "cannot serialize configuration")
                    .with_cause(cause)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = FisConfig::new();
        assert_eq!(config.inference.samples, 120);
        assert_eq!(config.inference.fallback, 30.0);
        assert_eq!(config.general.format, OutputFormat::Text);
        assert_eq!(config.rules.len(), 9);
    }

    #[test]
    fn test_default_builds_reference_system() {
        let system = FisConfig::new().build_system().unwrap();
        assert_eq!(system, InferenceSystem::reference());
    }

    #[test]
    fn test_default_content_matches_default() {
        let parsed = FisConfig::load_from_str(FisConfig::default_config_content()).unwrap();
        assert_eq!(parsed, FisConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [general]
            format = "json"
            log_level = "verbose"

            [inference]
            samples = 240
        "#;

        let config = FisConfig::load_from_str(toml).unwrap();
        assert_eq!(config.general.format, OutputFormat::Json);
        assert_eq!(config.general.log_level, LogLevel::Verbose);
        assert_eq!(config.inference.samples, 240);
        assert_eq!(config.inference.fallback, 30.0);
        assert_eq!(config.variables, VariablesConfig::default());
    }

    #[test]
    fn test_custom_output_variable() {
        let toml = r#"
            [variables.output]
            name = "green"
            domain = [0.0, 90.0]

            [variables.output.terms]
            very_short = [-20.0, 0.0, 20.0]
            short = [0.0, 20.0, 40.0]
            medium = [20.0, 45.0, 70.0]
            long = [50.0, 70.0, 90.0]
            very_long = [70.0, 90.0, 90.0]
        "#;

        let system = FisConfig::load_from_str(toml).unwrap().build_system().unwrap();
        assert_eq!(system.output().name, "green");
        assert_eq!(system.output().domain, (0.0, 90.0));
        assert_eq!(system.infer(200.0, 200.0).surface.len(), 121);
    }

    #[test]
    fn test_missing_term_is_parse_error() {
        let toml = r#"
            [variables.input1]
            name = "queue"
            domain = [0.0, 200.0]

            [variables.input1.terms]
            small = [-100.0, 0.0, 100.0]
            large = [100.0, 200.0, 300.0]
        "#;
        assert!(matches!(
            FisConfig::load_from_str(toml),
            Err(ConfigError::ParseError(..))
        ));
    }

    #[test]
    fn test_unknown_term_is_parse_error() {
        let toml = r#"
            [[rules]]
            input1 = "small"
            input2 = "tiny"
            output = "short"
        "#;
        assert!(FisConfig::load_from_str(toml).is_err());
    }

    #[test]
    fn test_incomplete_rules_fail_validation() {
        let toml = r#"
            [[rules]]
            input1 = "small"
            input2 = "small"
            output = "very_short"
        "#;

        let config = FisConfig::load_from_str(toml).unwrap();
        let err = config.build_system().unwrap_err();
        assert_eq!(err.code, ErrorCode::IncompleteRuleTable);
    }

    #[test]
    fn test_inverted_triangle_fails_validation() {
        let mut config = FisConfig::new();
        config.variables.input2.terms.medium = Triangle::new(200.0, 100.0, 0.0);
        let err = config.build_system().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTriangle);
        assert!(err.message.contains("arrivals.medium"));
    }

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |k: &str| map.get(k).map(|v| v.to_string())
    }

    #[test]
    fn test_overrides() {
        let vars = [
            ("FUZZY_DURATION_SAMPLES", "60"),
            ("FUZZY_DURATION_FALLBACK", "12.5"),
            ("FUZZY_DURATION_LOG_LEVEL", "debug"),
            ("FUZZY_DURATION_FORMAT", "JSON"),
        ];

        let mut config = FisConfig::new();
        config.apply_overrides(lookup(&vars)).unwrap();

        assert_eq!(config.inference.samples, 60);
        assert_eq!(config.inference.fallback, 12.5);
        assert_eq!(config.general.log_level, LogLevel::Debug);
        assert_eq!(config.general.format, OutputFormat::Json);
    }

    #[test]
    fn test_unparsable_override_is_rejected() {
        let vars = [
            ("FUZZY_DURATION_FALLBACK", "12.5"),
            ("FUZZY_DURATION_SAMPLES", "lots"),
        ];

        let mut config = FisConfig::new();
        let err = config.apply_overrides(lookup(&vars)).unwrap_err();
        match &err {
            ConfigError::InvalidValue { key, value } => {
                assert_eq!(key, "FUZZY_DURATION_SAMPLES");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(config, FisConfig::new());

        let fis: FisError = err.into();
        assert_eq!(fis.code, ErrorCode::InvalidConfigValue);
    }

    #[test]
    fn test_unknown_format_override_is_rejected() {
        let mut config = FisConfig::new();
        let result = config.apply_overrides(lookup(&[("FUZZY_DURATION_FORMAT", "nonsense")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_misspelled_section_is_parse_error() {
        let toml = r#"
            [inferenc]
            samples = 0
        "#;
        assert!(matches!(
            FisConfig::load_from_str(toml),
            Err(ConfigError::ParseError(..))
        ));
    }

    #[test]
    fn test_unknown_variable_is_parse_error() {
        let toml = r#"
            [variables.duration]
            name = "duration"
            domain = [0.0, 90.0]

            [variables.duration.terms]
            very_short = [-15.0, 0.0, 15.0]
            short = [0.0, 15.0, 30.0]
            medium = [15.0, 30.0, 45.0]
            long = [30.0, 45.0, 60.0]
            very_long = [45.0, 60.0, 75.0]
        "#;
        assert!(matches!(
            FisConfig::load_from_str(toml),
            Err(ConfigError::ParseError(..))
        ));
    }

    #[test]
    fn test_unknown_keys_are_parse_errors() {
        for toml in [
            "[general]\nlog_levle = \"debug\"\n",
            "[inference]\nsample = 60\n",
            "[[rules]]\nqueue = \"small\"\narrivals = \"small\"\nduration = \"short\"\n",
            "fallback = 10.0\n",
        ] {
            assert!(
                matches!(FisConfig::load_from_str(toml), Err(ConfigError::ParseError(..))),
                "accepted: {}",
                toml
            );
        }
    }

    #[test]
    fn test_save_and_reload() {
        let path = env::temp_dir().join(format!("fuzzy-duration-{}.toml", std::process::id()));
        let mut config = FisConfig::new();
        config.inference.samples = 48;

        config.save_to_file(&path).unwrap();
        let loaded = FisConfig::load_from_file(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_write_failure_is_write_error() {
        let path = env::temp_dir()
            .join("fuzzy-duration-missing-dir")
            .join("nested")
            .join("config.toml");
        let err = FisConfig::write_default_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::WriteError(..)));

        let fis: FisError = err.into();
        assert_eq!(fis.code, ErrorCode::ConfigWriteFailed);
        assert!(fis.context.map(|c| !c.causes.is_empty()).unwrap_or(false));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let path = env::temp_dir().join("fuzzy-duration-does-not-exist.toml");
        let err: FisError = FisConfig::load_from_file(&path).unwrap_err().into();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_serialize_round_trips_through_toml() {
        let config = FisConfig::new();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[inference]"));
        assert!(toml.contains("[[rules]]"));
        assert_eq!(FisConfig::load_from_str(&toml).unwrap(), config);
    }

    #[test]
    fn test_config_paths() {
        let paths = FisConfig::config_paths();
        assert!(!paths.is_empty());
        assert!(paths[0].ends_with(LOCAL_CONFIG_FILE));
    }

    #[test]
    fn test_log_level_mapping() {
        assert_eq!("v".parse::<LogLevel>(), Ok(LogLevel::Verbose));
        assert!("loud".parse::<LogLevel>().is_err());
        assert_eq!(LogLevel::Quiet.tracing_level(), tracing::Level::ERROR);
        assert_eq!(LogLevel::Debug.tracing_level(), tracing::Level::TRACE);
    }

    #[test]
    fn test_config_error_converts() {
        let err: FisError = ConfigError::ParseError(PathBuf::from("x.toml"), "bad".into()).into();
        assert_eq!(err.code, ErrorCode::InvalidConfigSyntax);
        let ctx = err.context.as_ref().unwrap();
        assert_eq!(ctx.fields.get("path"), Some(&"x.toml".to_string()));
        assert!(err.to_string().contains("cannot parse x.toml"));
        assert!(err.to_string().contains("Caused by:"));
        assert!(err.hint.is_some());
    }
}
