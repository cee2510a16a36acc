//! Fuzzy inference building blocks
//!
//! The pipeline stages, leaf-first:
//! - [`membership`] - triangular membership functions and domain sampling
//! - [`variable`] - closed term sets and linguistic variables (fuzzification)
//! - [`rules`] - the rule table and max-min rule evaluation
//! - [`aggregate`] - min implication, max aggregation over the output domain
//! - [`defuzzify`] - center of gravity

pub mod aggregate;
pub mod defuzzify;
pub mod membership;
pub mod rules;
pub mod variable;

pub use aggregate::{aggregate, AggregatedSurface};
pub use defuzzify::{centroid, defuzzify};
pub use membership::{sample_curve, sample_domain, triangle_mf, Triangle};
pub use rules::{Rule, RuleTable};
pub use variable::{
    reference_input, reference_output, Activations, Degrees, InputTerm, LinguisticVariable,
    OutputTerm, Term,
};
