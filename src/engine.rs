//! Validated two-input, one-output inference system
//!
//! An [`InferenceSystem`] is assembled once, validated eagerly, and is
//! read-only afterwards. [`InferenceSystem::infer`] is total: it never fails,
//! and an input outside every membership support just contributes zero.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{ErrorCode, FisResult};
use crate::fis_ensure;
use crate::fuzzy::{
    aggregate, centroid, reference_input, reference_output, Activations, AggregatedSurface,
    Degrees, InputTerm, LinguisticVariable, OutputTerm, RuleTable, Term,
};

/// Reference aggregation resolution
pub const DEFAULT_SAMPLES: usize = 120;

/// Reference output when no rule fires
pub const DEFAULT_FALLBACK: f64 = 30.0;

/// Result of one inference run, with everything a plotting caller needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inference {
    pub input1: f64,
    pub input2: f64,
    /// Crisp output (centroid, or the fallback)
    pub output: f64,
    /// True when the surface had no mass and `output` is the fallback
    pub fallback_used: bool,
    pub input1_degrees: Degrees<InputTerm>,
    pub input2_degrees: Degrees<InputTerm>,
    pub activations: Activations,
    pub surface: AggregatedSurface,
}

impl Inference {
    /// Output term with the strongest activation, ties resolved by declaration order
    pub fn dominant_term(&self) -> Option<(OutputTerm, f64)> {
        self.activations
            .iter()
            .filter(|(_, &v)| v > 0.0)
            .fold(None, |best, (&term, &v)| match best {
                Some((_, bv)) if bv >= v => best,
                _ => Some((term, v)),
            })
    }
}

/// Sampled membership curves of one variable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableCurves<T: Term + Serialize> {
    pub name: String,
    pub domain: (f64, f64),
    pub terms: IndexMap<T, Vec<(f64, f64)>>,
}

impl<T: Term + Serialize> VariableCurves<T> {
    fn of(var: &LinguisticVariable<T>, samples: usize) -> Self {
        Self {
            name: var.name.clone(),
            domain: var.domain,
            terms: var.curves(samples),
        }
    }
}

/// Static plotting data for all three variables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MembershipCurves {
    pub input1: VariableCurves<InputTerm>,
    pub input2: VariableCurves<InputTerm>,
    pub output: VariableCurves<OutputTerm>,
}

/// Fuzzy inference system: three variables, a rule table and sampling setup
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceSystem {
    input1: LinguisticVariable<InputTerm>,
    input2: LinguisticVariable<InputTerm>,
    output: LinguisticVariable<OutputTerm>,
    rules: RuleTable,
    samples: usize,
    fallback: f64,
}

impl InferenceSystem {
    /// Validate every part and assemble a system.
    ///
    /// `rules` is already complete by construction ([`RuleTable::new`]).
    pub fn new(
        input1: LinguisticVariable<InputTerm>,
        input2: LinguisticVariable<InputTerm>,
        output: LinguisticVariable<OutputTerm>,
        rules: RuleTable,
        samples: usize,
        fallback: f64,
    ) -> FisResult<Self> {
        input1.validate()?;
        input2.validate()?;
        output.validate()?;
        fis_ensure!(
            samples > 0,
            ErrorCode::InvalidSampleCount,
            "sample count must be positive, got {}",
            samples
        );
        fis_ensure!(
            fallback.is_finite(),
            ErrorCode::InvalidFallback,
            "fallback output must be finite, got {}",
            fallback
        );

        debug!(
            input1 = %input1.name,
            input2 = %input2.name,
            output = %output.name,
            rules = rules.len(),
            samples,
            fallback,
            "inference system ready"
        );

        Ok(Self {
            input1,
            input2,
            output,
            rules,
            samples,
            fallback,
        })
    }

    /// The reference queue/arrivals/duration system
    pub fn reference() -> Self {
        Self {
            input1: reference_input("queue"),
            input2: reference_input("arrivals"),
            output: reference_output(),
            rules: RuleTable::reference(),
            samples: DEFAULT_SAMPLES,
            fallback: DEFAULT_FALLBACK,
        }
    }

    /// Run the full pipeline for one pair of crisp inputs
    pub fn infer(&self, input1: f64, input2: f64) -> Inference {
        let input1_degrees = self.input1.fuzzify(input1);
        let input2_degrees = self.input2.fuzzify(input2);
        let activations = self.rules.evaluate(&input1_degrees, &input2_degrees);
        let surface = aggregate(&activations, &self.output, self.samples);

        let (output, fallback_used) = match centroid(&surface) {
            Some(value) => (value, false),
            None => {
                debug!(input1, input2, fallback = self.fallback, "no rule fired, using fallback");
                (self.fallback, true)
            }
        };

        trace!(input1, input2, output, "inferred");

        Inference {
            input1,
            input2,
            output,
            fallback_used,
            input1_degrees,
            input2_degrees,
            activations,
            surface,
        }
    }

    /// Membership curves of every variable at the aggregation resolution
    pub fn curves(&self) -> MembershipCurves {
        MembershipCurves {
            input1: VariableCurves::of(&self.input1, self.samples),
            input2: VariableCurves::of(&self.input2, self.samples),
            output: VariableCurves::of(&self.output, self.samples),
        }
    }

    /// Evaluate a `(steps + 1) x (steps + 1)` grid spanning both input
    /// domains, endpoints included. `steps` of 0 is treated as 1.
    ///
    /// Each entry is `(input1, input2, output)`, input1-major.
    pub fn sweep(&self, steps: usize) -> Vec<(f64, f64, f64)> {
        let steps = steps.max(1);
        let xs: Vec<f64> = crate::fuzzy::sample_domain(self.input1.domain, steps).collect();
        let ys: Vec<f64> = crate::fuzzy::sample_domain(self.input2.domain, steps).collect();

        xs.iter()
            .flat_map(|&x| ys.iter().map(move |&y| (x, y)))
            .map(|(x, y)| (x, y, self.infer(x, y).output))
            .collect()
    }

    pub fn input1(&self) -> &LinguisticVariable<InputTerm> {
        &self.input1
    }

    pub fn input2(&self) -> &LinguisticVariable<InputTerm> {
        &self.input2
    }

    pub fn output(&self) -> &LinguisticVariable<OutputTerm> {
        &self.output
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn fallback(&self) -> f64 {
        self.fallback
    }
}

impl Default for InferenceSystem {
    fn default() -> Self {
        Self::reference()
    }
}
