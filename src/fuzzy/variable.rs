//! Linguistic variables and their closed term sets
//!
//! Each variable owns one [`Triangle`] per term of a closed enumeration. The
//! two inputs share [`InputTerm`]; the output uses [`OutputTerm`]. Because the
//! term sets are enums, a variable that misses a term or a rule table that
//! misses a pair is detected by iterating `Term::ALL`, never by string lookup.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::membership::{sample_curve, triangle_mf, Triangle};
use crate::error::{ErrorCode, FisError, FisResult};

/// Membership degree per term, in declaration order
pub type Degrees<T> = IndexMap<T, f64>;

/// Strongest rule firing per output term
pub type Activations = Degrees<OutputTerm>;

/// A closed set of linguistic terms
pub trait Term: Copy + Eq + Hash + Ord + fmt::Debug + 'static {
    /// Every term, in declaration order
    const ALL: &'static [Self];

    /// Stable snake_case name, matching the configuration key
    fn name(&self) -> &'static str;
}

/// Terms shared by both input variables
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputTerm {
    Small,
    Medium,
    Large,
}

impl Term for InputTerm {
    const ALL: &'static [Self] = &[InputTerm::Small, InputTerm::Medium, InputTerm::Large];

    fn name(&self) -> &'static str {
        match self {
            InputTerm::Small => "small",
            InputTerm::Medium => "medium",
            InputTerm::Large => "large",
        }
    }
}

impl FromStr for InputTerm {
    type Err = FisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_term(s)
    }
}

/// Terms of the output (duration) variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputTerm {
    VeryShort,
    Short,
    Medium,
    Long,
    VeryLong,
}

impl Term for OutputTerm {
    const ALL: &'static [Self] = &[
        OutputTerm::VeryShort,
        OutputTerm::Short,
        OutputTerm::Medium,
        OutputTerm::Long,
        OutputTerm::VeryLong,
    ];

    fn name(&self) -> &'static str {
        match self {
            OutputTerm::VeryShort => "very_short",
            OutputTerm::Short => "short",
            OutputTerm::Medium => "medium",
            OutputTerm::Long => "long",
            OutputTerm::VeryLong => "very_long",
        }
    }
}

impl FromStr for OutputTerm {
    type Err = FisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_term(s)
    }
}

/// Case-insensitive lookup by name; `-` and spaces count as `_`
fn parse_term<T: Term>(s: &str) -> FisResult<T> {
    let key = s.trim().to_lowercase().replace(['-', ' '], "_");
    T::ALL
        .iter()
        .copied()
        .find(|t| t.name() == key)
        .ok_or_else(|| {
            let names: Vec<&str> = T::ALL.iter().map(|t| t.name()).collect();
            FisError::validation(format!("unknown term '{}'", s))
                .with_hint(format!("expected one of: {}", names.join(", ")))
        })
}

impl fmt::Display for InputTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for OutputTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A linguistic variable with associated fuzzy sets
#[derive(Debug, Clone, PartialEq)]
pub struct LinguisticVariable<T: Term> {
    /// Variable name (e.g., "queue")
    pub name: String,
    /// Declared range, used for sampling and plotting only
    pub domain: (f64, f64),
    /// Membership function per term
    pub terms: IndexMap<T, Triangle>,
}

impl<T: Term> LinguisticVariable<T> {
    pub fn new(name: impl Into<String>, domain: (f64, f64)) -> Self {
        Self {
            name: name.into(),
            domain,
            terms: IndexMap::new(),
        }
    }

    /// Add or replace a term
    pub fn with_term(mut self, term: T, tri: Triangle) -> Self {
        self.terms.insert(term, tri);
        self
    }

    pub fn triangle(&self, term: T) -> Option<&Triangle> {
        self.terms.get(&term)
    }

    /// Fuzzify a crisp value - get membership for all terms.
    ///
    /// Not bounded by `domain`: values outside every support simply map to
    /// all-zero degrees.
    pub fn fuzzify(&self, value: f64) -> Degrees<T> {
        T::ALL
            .iter()
            .map(|&term| {
                let degree = self
                    .terms
                    .get(&term)
                    .map_or(0.0, |tri| triangle_mf(value, tri));
                (term, degree)
            })
            .collect()
    }

    /// Sampled `(x, μ)` curve per term over the declared domain
    pub fn curves(&self, samples: usize) -> IndexMap<T, Vec<(f64, f64)>> {
        self.terms
            .iter()
            .map(|(&term, tri)| (term, sample_curve(tri, self.domain, samples)))
            .collect()
    }

    /// Check domain, term coverage and every triangle
    pub fn validate(&self) -> FisResult<()> {
        let (min, max) = self.domain;
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(FisError::invalid_domain(&self.name, min, max));
        }

        for term in T::ALL {
            let tri = self.terms.get(term).ok_or_else(|| {
                FisError::validation(format!(
                    "{}: no membership function for term '{}'",
                    self.name,
                    term.name()
                ))
                .with_code(ErrorCode::MissingTerm)
                .with_context("variable", self.name.as_str())
                .with_context("term", term.name())
            })?;

            if !tri.is_well_formed() {
                return Err(FisError::invalid_triangle(
                    &self.name,
                    term.name(),
                    tri.a,
                    tri.b,
                    tri.c,
                ));
            }
        }

        Ok(())
    }
}

/// Reference input variable: three overlapping terms over 0..200
pub fn reference_input(name: impl Into<String>) -> LinguisticVariable<InputTerm> {
    LinguisticVariable::new(name, (0.0, 200.0))
        .with_term(InputTerm::Small, Triangle::new(-100.0, 0.0, 100.0))
        .with_term(InputTerm::Medium, Triangle::new(0.0, 100.0, 200.0))
        .with_term(InputTerm::Large, Triangle::new(100.0, 200.0, 300.0))
}

/// Reference output variable: five durations over 0..60 seconds
pub fn reference_output() -> LinguisticVariable<OutputTerm> {
    LinguisticVariable::new("duration", (0.0, 60.0))
        .with_term(OutputTerm::VeryShort, Triangle::new(-15.0, 0.0, 15.0))
        .with_term(OutputTerm::Short, Triangle::new(0.0, 15.0, 30.0))
        .with_term(OutputTerm::Medium, Triangle::new(15.0, 30.0, 45.0))
        .with_term(OutputTerm::Long, Triangle::new(30.0, 45.0, 60.0))
        .with_term(OutputTerm::VeryLong, Triangle::new(45.0, 60.0, 75.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzzify_at_peaks() {
        let queue = reference_input("queue");

        let d = queue.fuzzify(0.0);
        assert_eq!(d[&InputTerm::Small], 1.0);
        assert_eq!(d[&InputTerm::Medium], 0.0);
        assert_eq!(d[&InputTerm::Large], 0.0);

        let d = queue.fuzzify(200.0);
        assert_eq!(d[&InputTerm::Large], 1.0);
        assert_eq!(d[&InputTerm::Small], 0.0);
    }

    #[test]
    fn test_fuzzify_halfway() {
        let d = reference_input("queue").fuzzify(50.0);
        assert_eq!(d[&InputTerm::Small], 0.5);
        assert_eq!(d[&InputTerm::Medium], 0.5);
        assert_eq!(d[&InputTerm::Large], 0.0);
    }

    #[test]
    fn test_fuzzify_outside_supports() {
        let d = reference_input("queue").fuzzify(-500.0);
        assert_eq!(d.len(), 3);
        assert!(d.values().all(|&v| v == 0.0));
    }

    #[test]
    fn test_fuzzify_order_follows_declaration() {
        let d = reference_output().fuzzify(20.0);
        let keys: Vec<OutputTerm> = d.keys().copied().collect();
        assert_eq!(keys, OutputTerm::ALL);
    }

    #[test]
    fn test_reference_variables_validate() {
        reference_input("queue").validate().unwrap();
        reference_output().validate().unwrap();
    }

    #[test]
    fn test_missing_term() {
        let var = LinguisticVariable::new("queue", (0.0, 1.0))
            .with_term(InputTerm::Small, Triangle::new(0.0, 0.0, 1.0));
        let err = var.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingTerm);
        assert!(err.message.contains("medium"));
    }

    #[test]
    fn test_inverted_triangle_rejected() {
        let var = reference_input("arrivals")
            .with_term(InputTerm::Large, Triangle::new(300.0, 200.0, 100.0));
        let err = var.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTriangle);
    }

    #[test]
    fn test_empty_domain_rejected() {
        let mut var = reference_output();
        var.domain = (60.0, 60.0);
        assert_eq!(var.validate().unwrap_err().code, ErrorCode::InvalidDomain);
    }

    #[test]
    fn test_curves_cover_every_term() {
        let curves = reference_output().curves(12);
        assert_eq!(curves.len(), 5);
        let medium = &curves[&OutputTerm::Medium];
        assert_eq!(medium.len(), 13);
        assert_eq!(medium[6], (30.0, 1.0));
    }

    #[test]
    fn test_term_names() {
        assert_eq!("Very-Short".parse::<OutputTerm>().unwrap(), OutputTerm::VeryShort);
        assert_eq!("LARGE".parse::<InputTerm>().unwrap(), InputTerm::Large);
        let err = "huge".parse::<InputTerm>().unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.hint.unwrap().contains("small, medium, large"));
        assert_eq!(OutputTerm::VeryLong.to_string(), "very_long");
    }
}
