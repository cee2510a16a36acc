//! Structured Error Handling for fuzzy-duration
//!
//! Provides a unified error type with:
//! - Error codes for programmatic handling
//! - Structured, JSON-friendly error output
//! - Context preservation through error chains
//!
//! # Error Categories
//!
//! - `ValidationError` - Malformed membership functions, domains or rule tables
//! - Config errors (7xxx) - Reading, parsing, overriding and writing config
//! - Internal errors (9xxx) - Serialization
//!
//! Inference itself never fails. Every error in this module is raised while a
//! system is being assembled, before the first call to `infer`.
//!
//! # Example
//!
//! ```rust,ignore
//! use fuzzy_duration::error::{FisError, ErrorCode};
//!
//! fn check_samples(samples: usize) -> Result<(), FisError> {
//!     if samples == 0 {
//!         return Err(FisError::validation("sample count must be positive")
//!             .with_code(ErrorCode::InvalidSampleCount)
//!             .with_context("samples", samples.to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Error Codes
// ============================================================================

/// Unique error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (5xxx)
    /// Generic validation error
    ValidationError = 5000,
    /// Triangle vertices are not finite or not ordered a <= b <= c
    InvalidTriangle = 5001,
    /// Variable domain is not finite or empty
    InvalidDomain = 5002,
    /// Aggregation sample count is zero
    InvalidSampleCount = 5003,
    /// Fallback output is not finite
    InvalidFallback = 5004,
    /// A linguistic term has no membership function
    MissingTerm = 5005,
    /// An antecedent pair has no rule
    IncompleteRuleTable = 5006,
    /// An antecedent pair has more than one rule
    DuplicateRule = 5007,

    // Config errors (7xxx)
    /// Config file could not be read
    ConfigNotFound = 7001,
    /// Invalid config syntax
    InvalidConfigSyntax = 7002,
    /// Config could not be written
    ConfigWriteFailed = 7003,
    /// Invalid config value
    InvalidConfigValue = 7004,

    // Internal errors (9xxx)
    /// Serialization failed
    SerializationFailed = 9001,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a short description of the error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "Validation error",
            ErrorCode::InvalidTriangle => "Invalid triangle",
            ErrorCode::InvalidDomain => "Invalid domain",
            ErrorCode::InvalidSampleCount => "Invalid sample count",
            ErrorCode::InvalidFallback => "Invalid fallback value",
            ErrorCode::MissingTerm => "Missing linguistic term",
            ErrorCode::IncompleteRuleTable => "Incomplete rule table",
            ErrorCode::DuplicateRule => "Duplicate rule",

            ErrorCode::ConfigNotFound => "Configuration file not found",
            ErrorCode::InvalidConfigSyntax => "Invalid configuration syntax",
            ErrorCode::ConfigWriteFailed => "Configuration write failed",
            ErrorCode::InvalidConfigValue => "Invalid configuration value",

            ErrorCode::SerializationFailed => "Serialization failed",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

// ============================================================================
// Error Context
// ============================================================================

/// Additional context information for an error
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Key-value pairs of context information
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, String>,
    /// Source location (file:line)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Stack of error causes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// Main Error Type
// ============================================================================

/// The main error type for fuzzy-duration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FisError {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,
    /// Hint for resolving the error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl FisError {
    /// Create a new error with a code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            hint: None,
        }
    }

    // ========================================================================
    // Factory methods
    // ========================================================================

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// Create a malformed triangle error
    pub fn invalid_triangle(variable: &str, term: &str, a: f64, b: f64, c: f64) -> Self {
        Self::new(
            ErrorCode::InvalidTriangle,
            format!(
                "{}.{}: triangle ({}, {}, {}) must be finite with a <= b <= c",
                variable, term, a, b, c
            ),
        )
        .with_context("variable", variable)
        .with_context("term", term)
    }

    /// Create a malformed domain error
    pub fn invalid_domain(variable: &str, min: f64, max: f64) -> Self {
        Self::new(
            ErrorCode::InvalidDomain,
            format!("{}: domain [{}, {}] must be finite with min < max", variable, min, max),
        )
        .with_context("variable", variable)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Set the error code
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = code;
        self
    }

    /// Add context to the error
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::new);
        ctx.fields.insert(key.into(), value.into());
        self
    }

    /// Add a cause to the error chain
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::new);
        ctx.causes.push(cause.into());
        self
    }

    /// Add source location
    pub fn at(mut self, location: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::new);
        ctx.location = Some(location.into());
        self
    }

    /// Add a hint for resolving the error
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Convert to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":"SERIALIZATION_FAILED","message":"{}"}}"#, self.message)
        })
    }
}

impl fmt::Display for FisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)?;

        if let Some(ref ctx) = self.context {
            if let Some(ref loc) = ctx.location {
                write!(f, " at {}", loc)?;
            }
            if !ctx.causes.is_empty() {
                write!(f, "\nCaused by:")?;
                for cause in &ctx.causes {
                    write!(f, "\n  - {}", cause)?;
                }
            }
        }

        if let Some(ref hint) = self.hint {
            write!(f, "\nHint: {}", hint)?;
        }

        Ok(())
    }
}

impl std::error::Error for FisError {}

/// A Result type using FisError
pub type FisResult<T> = Result<T, FisError>;

// ============================================================================
// Macros for convenient error creation
// ============================================================================

/// Create a FisError tagged with the current source location
#[macro_export]
macro_rules! fis_error {
    ($code:expr, $msg:expr) => {
        $crate::error::FisError::new($code, $msg)
            .at(format!("{}:{}", file!(), line!()))
    };
    ($code:expr, $fmt:expr, $($arg:tt)*) => {
        $crate::error::FisError::new($code, format!($fmt, $($arg)*))
            .at(format!("{}:{}", file!(), line!()))
    };
}

/// Bail out early with an error
#[macro_export]
macro_rules! fis_bail {
    ($code:expr, $msg:expr) => {
        return Err($crate::fis_error!($code, $msg))
    };
    ($code:expr, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::fis_error!($code, $fmt, $($arg)*))
    };
}

/// Ensure a condition holds, or return an error
#[macro_export]
macro_rules! fis_ensure {
    ($cond:expr, $code:expr, $msg:expr) => {
        if !$cond {
            $crate::fis_bail!($code, $msg);
        }
    };
    ($cond:expr, $code:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            $crate::fis_bail!($code, $fmt, $($arg)*);
        }
    };
}

// ============================================================================
// Tests
// ============================================================================
