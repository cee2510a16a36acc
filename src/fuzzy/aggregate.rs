//! Mamdani implication and max aggregation over a sampled output domain

use serde::{Deserialize, Serialize};

use super::membership::{sample_domain, triangle_mf};
use super::variable::{Activations, LinguisticVariable, OutputTerm};

/// Discretized aggregated output: `(t, μ(t))` pairs in increasing `t`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregatedSurface {
    points: Vec<(f64, f64)>,
}

impl AggregatedSurface {
    /// Wrap precomputed samples; callers keep `t` strictly increasing
    pub fn from_points(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(f64, f64)> {
        self.points.iter()
    }

    /// Height of the surface
    pub fn max_degree(&self) -> f64 {
        self.points.iter().map(|&(_, m)| m).fold(0.0, f64::max)
    }

    /// True when no sample carries any membership
    pub fn is_zero(&self) -> bool {
        self.points.iter().all(|&(_, m)| m == 0.0)
    }
}

/// Clip every output term at its activation (min) and combine the clipped
/// sets pointwise (max), sampling `samples + 1` points of `output.domain`.
pub fn aggregate(
    activations: &Activations,
    output: &LinguisticVariable<OutputTerm>,
    samples: usize,
) -> AggregatedSurface {
    let points = sample_domain(output.domain, samples)
        .map(|t| {
            let degree = output
                .terms
                .iter()
                .map(|(term, tri)| {
                    let level = activations.get(term).copied().unwrap_or(0.0);
                    level.min(triangle_mf(t, tri))
                })
                .fold(0.0, f64::max);
            (t, degree)
        })
        .collect();

    AggregatedSurface { points }
}
