//! fuzzy-duration - a two-input Mamdani fuzzy inference advisor
//!
//! Recommends a green-signal duration from the queue length on an approach and
//! the arrival flow, using a fixed four-stage pipeline:
//!
//! 1. Fuzzification with triangular membership functions
//! 2. Rule evaluation with max-min composition
//! 3. Aggregation of the clipped output terms over a sampled domain
//! 4. Center-of-gravity defuzzification
//!
//! # Architecture
//!
//! - [`fuzzy`] - the pipeline stages as plain data and pure functions
//! - [`engine::InferenceSystem`] - validated configuration exposing `infer`
//! - [`config::FisConfig`] - TOML configuration with environment overrides
//! - [`error::FisError`] - structured errors raised while assembling a system
//!
//! # Example
//!
//! ```rust
//! use fuzzy_duration::{InferenceSystem, OutputTerm};
//!
//! let system = InferenceSystem::reference();
//! let result = system.infer(200.0, 200.0);
//!
//! assert_eq!(result.activations[&OutputTerm::VeryLong], 1.0);
//! assert!(result.output > 50.0 && result.output <= 60.0);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod fuzzy;

// Re-export the inference surface
pub use engine::{
    Inference, InferenceSystem, MembershipCurves, VariableCurves, DEFAULT_FALLBACK,
    DEFAULT_SAMPLES,
};

// Re-export pipeline types
pub use fuzzy::{
    AggregatedSurface, Activations, Degrees, InputTerm, LinguisticVariable, OutputTerm, Rule,
    RuleTable, Term, Triangle,
};

// Re-export configuration types
pub use config::{ConfigError, FisConfig, LogLevel, OutputFormat};

// Re-export error types
pub use error::{ErrorCode, ErrorContext, FisError, FisResult};
