//! Triangular membership functions and domain sampling.

use serde::{Deserialize, Serialize};

/// Triangular membership function: (left foot, peak, right foot)
///
/// Serialized as a plain `[a, b, c]` array so configuration files stay terse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Triangle {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Triangle {
    pub const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// Evaluate membership for a crisp value
    pub fn evaluate(&self, x: f64) -> f64 {
        triangle_mf(x, self)
    }

    /// All vertices finite and ordered `a <= b <= c`
    pub fn is_well_formed(&self) -> bool {
        self.a.is_finite()
            && self.b.is_finite()
            && self.c.is_finite()
            && self.a <= self.b
            && self.b <= self.c
    }
}

impl From<[f64; 3]> for Triangle {
    fn from([a, b, c]: [f64; 3]) -> Self {
        Self::new(a, b, c)
    }
}

impl From<Triangle> for [f64; 3] {
    fn from(t: Triangle) -> Self {
        [t.a, t.b, t.c]
    }
}

/// Membership degree of `x` in `tri`.
///
/// Zero on and outside the feet. The `a < x < c` guard also sends NaN to zero,
/// and it makes both slopes unreachable when their edge is vertical (`a == b`
/// or `b == c`), so there is never a division by zero.
pub fn triangle_mf(x: f64, tri: &Triangle) -> f64 {
    let Triangle { a, b, c } = *tri;
    if !(x > a && x < c) {
        return 0.0;
    }
    if x <= b {
        (x - a) / (b - a)
    } else {
        (c - x) / (c - b)
    }
}

/// `samples + 1` evenly spaced points over `[min, max]`.
///
/// The final point is pinned to `max` so the sequence always ends exactly on
/// the declared endpoint regardless of accumulated rounding.
pub fn sample_domain(domain: (f64, f64), samples: usize) -> impl Iterator<Item = f64> {
    let (min, max) = domain;
    let step = (max - min) / (samples as f64);
    (0..=samples).map(move |i| {
        if i == samples {
            max
        } else {
            min + (i as f64) * step
        }
    })
}

/// Sample a membership function over a domain for plotting
pub fn sample_curve(tri: &Triangle, domain: (f64, f64), samples: usize) -> Vec<(f64, f64)> {
    sample_domain(domain, samples)
        .map(|x| (x, triangle_mf(x, tri)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangular_membership() {
        let mf = Triangle::new(0.0, 5.0, 10.0);

        assert!((mf.evaluate(0.0) - 0.0).abs() < 1e-12);
        assert!((mf.evaluate(5.0) - 1.0).abs() < 1e-12);
        assert!((mf.evaluate(10.0) - 0.0).abs() < 1e-12);
        assert!((mf.evaluate(2.5) - 0.5).abs() < 1e-12);
        assert!((mf.evaluate(7.5) - 0.5).abs() < 1e-12);
        assert_eq!(mf.evaluate(-3.0), 0.0);
        assert_eq!(mf.evaluate(42.0), 0.0);
    }

    #[test]
    fn test_left_vertical_edge() {
        let mf = Triangle::new(0.0, 0.0, 10.0);
        // x <= a is always outside, even at the peak
        assert_eq!(mf.evaluate(0.0), 0.0);
        assert!((mf.evaluate(2.0) - 0.8).abs() < 1e-12);
        assert!(mf.evaluate(1e-9).is_finite());
    }

    #[test]
    fn test_right_vertical_edge() {
        let mf = Triangle::new(0.0, 10.0, 10.0);
        assert!((mf.evaluate(5.0) - 0.5).abs() < 1e-12);
        assert!((mf.evaluate(10.0 - 1e-9) - 1.0).abs() < 1e-6);
        assert_eq!(mf.evaluate(10.0), 0.0);
    }

    #[test]
    fn test_point_triangle() {
        let mf = Triangle::new(3.0, 3.0, 3.0);
        for x in [2.0, 3.0, 4.0, f64::NAN, f64::INFINITY] {
            assert_eq!(mf.evaluate(x), 0.0);
        }
    }

    #[test]
    fn test_nan_input_is_zero() {
        assert_eq!(Triangle::new(-1.0, 0.0, 1.0).evaluate(f64::NAN), 0.0);
    }

    #[test]
    fn test_well_formed() {
        assert!(Triangle::new(0.0, 0.0, 0.0).is_well_formed());
        assert!(Triangle::new(-1.0, 0.0, 1.0).is_well_formed());
        assert!(!Triangle::new(1.0, 0.0, 2.0).is_well_formed());
        assert!(!Triangle::new(0.0, 2.0, 1.0).is_well_formed());
        assert!(!Triangle::new(f64::NEG_INFINITY, 0.0, 1.0).is_well_formed());
    }

    #[test]
    fn test_sample_domain_endpoints() {
        let points: Vec<f64> = sample_domain((0.0, 60.0), 120).collect();
        assert_eq!(points.len(), 121);
        assert_eq!(points[0], 0.0);
        assert_eq!(points[120], 60.0);
        assert!((points[1] - 0.5).abs() < 1e-12);
        assert!(points.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_sample_domain_pins_awkward_max() {
        let points: Vec<f64> = sample_domain((0.1, 0.7), 7).collect();
        assert_eq!(points.len(), 8);
        assert_eq!(*points.last().unwrap(), 0.7);
        assert!(points.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_sample_curve() {
        let curve = sample_curve(&Triangle::new(0.0, 5.0, 10.0), (0.0, 10.0), 4);
        let degrees: Vec<f64> = curve.iter().map(|p| p.1).collect();
        assert_eq!(degrees, vec![0.0, 0.5, 1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_triangle_serde_as_array() {
        let tri: Triangle = serde_json::from_str("[1.0, 2.0, 3.0]").unwrap();
        assert_eq!(tri, Triangle::new(1.0, 2.0, 3.0));
        assert_eq!(serde_json::to_string(&tri).unwrap(), "[1.0,2.0,3.0]");
    }
}
