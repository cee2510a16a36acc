//! Center-of-gravity defuzzification

use super::aggregate::AggregatedSurface;

/// Discrete centroid `Σ t·μ(t) / Σ μ(t)`, or `None` when the surface has no mass
pub fn centroid(surface: &AggregatedSurface) -> Option<f64> {
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for &(t, m) in surface.iter() {
        numerator += t * m;
        denominator += m;
    }

    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// Centroid with a fixed fallback for an all-zero surface
pub fn defuzzify(surface: &AggregatedSurface, fallback: f64) -> f64 {
    centroid(surface).unwrap_or(fallback)
}
