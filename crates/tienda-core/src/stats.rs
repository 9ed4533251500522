//! # Descriptive Statistics
//!
//! Closed-form statistics over `f64` series. Degenerate inputs (empty series,
//! a single point, zero variance) produce `0.0`, never NaN and never an error.
//!
//! ```text
//! mean(x)        = Σx / n
//! std_dev(x)     = sqrt(Σ(x - mean)² / n)          population, divide by N
//! pearson(x, y)  = (nΣxy − ΣxΣy)
//!                  ─────────────────────────────────
//!                  sqrt((nΣx² − (Σx)²)(nΣy² − (Σy)²))
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Arithmetic mean; `0.0` for an empty series.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by N, like SQL `STDDEV`).
///
/// `0.0` for fewer than two values.
///
/// ```rust
/// use tienda_core::stats::population_std_dev;
///
/// let sd = population_std_dev(&[100.0, 200.0, 300.0]);
/// assert!((sd - 81.6497).abs() < 1e-3);
/// ```
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Pearson product-moment correlation of two paired series.
///
/// Returns `0.0` when the series are empty, have different lengths, or
/// either one is constant. Sums are taken around the means, which is
/// algebraically the closed form above. The result is clamped to `[-1, 1]`.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.is_empty() || xs.len() != ys.len() || is_constant(xs) || is_constant(ys) {
        return 0.0;
    }

    let (mean_x, mean_y) = (mean(xs), mean(ys));
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mean_x, y - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }

    (cov / denominator).clamp(-1.0, 1.0)
}

/// Every value equal to the first. A constant series has no variance, however
/// the sums happen to round.
fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|v| *v == values[0])
}

// =============================================================================
// Correlation Strength
// =============================================================================

/// How strong a correlation coefficient is, ignoring its sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Strong,
    Moderate,
    Weak,
    Negligible,
}

/// Human-readable reading of a coefficient: strength plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CorrelationStrength {
    pub strength: Strength,
    /// `false` for r < 0.
    pub positive: bool,
}

impl CorrelationStrength {
    /// `|r| > 0.7` strong, `> 0.3` moderate, `> 0.1` weak, else negligible.
    pub fn classify(r: f64) -> Self {
        let magnitude = r.abs();
        let strength = if magnitude > 0.7 {
            Strength::Strong
        } else if magnitude > 0.3 {
            Strength::Moderate
        } else if magnitude > 0.1 {
            Strength::Weak
        } else {
            Strength::Negligible
        };
        CorrelationStrength {
            strength,
            positive: r >= 0.0,
        }
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = if self.positive { "positive" } else { "negative" };
        match self.strength {
            Strength::Strong => write!(f, "strong {direction}"),
            Strength::Moderate => write!(f, "moderate {direction}"),
            Strength::Weak => write!(f, "weak {direction}"),
            Strength::Negligible => write!(f, "negligible"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert!((mean(&[100.0, 200.0, 300.0]) - 200.0).abs() < EPS);
    }

    #[test]
    fn test_population_std_dev() {
        assert_eq!(population_std_dev(&[]), 0.0);
        assert_eq!(population_std_dev(&[42.0]), 0.0);

        let expected = (20000.0_f64 / 3.0).sqrt();
        assert!((population_std_dev(&[100.0, 200.0, 300.0]) - expected).abs() < EPS);
    }

    #[test]
    fn test_pearson_perfect() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let up = [2.0, 4.0, 6.0, 8.0];
        let down = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson(&xs, &up) - 1.0).abs() < EPS);
        assert!((pearson(&xs, &down) + 1.0).abs() < EPS);
    }

    #[test]
    fn test_pearson_symmetric() {
        let xs = [1.0, 5.0, 2.0, 8.0, 3.0];
        let ys = [3.0, 1.0, 4.0, 1.0, 5.0];
        assert!((pearson(&xs, &ys) - pearson(&ys, &xs)).abs() < EPS);
    }

    #[test]
    fn test_pearson_degenerate_inputs_are_zero() {
        assert_eq!(pearson(&[], &[]), 0.0);
        assert_eq!(pearson(&[7.0, 7.0, 7.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[4.0, 4.0, 4.0]), 0.0);
        assert_eq!(pearson(&[1.0, 2.0], &[1.0]), 0.0);
        assert_eq!(pearson(&[1.0], &[1.0]), 0.0);
    }

    #[test]
    fn test_pearson_constant_fractional_series_is_exactly_zero() {
        let ys: Vec<f64> = (1..=11).map(f64::from).collect();
        assert_eq!(pearson(&[1234.56; 11], &ys), 0.0);

        let ys: Vec<f64> = (1..=200).map(f64::from).collect();
        assert_eq!(pearson(&[1135.79; 200], &ys), 0.0);
        assert_eq!(pearson(&ys, &[0.1; 200]), 0.0);
    }

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(CorrelationStrength::classify(0.85).strength, Strength::Strong);
        assert_eq!(CorrelationStrength::classify(0.7).strength, Strength::Moderate);
        assert_eq!(CorrelationStrength::classify(-0.5).strength, Strength::Moderate);
        assert_eq!(CorrelationStrength::classify(0.2).strength, Strength::Weak);
        assert_eq!(CorrelationStrength::classify(0.1).strength, Strength::Negligible);
        assert_eq!(CorrelationStrength::classify(0.0).strength, Strength::Negligible);

        assert!(!CorrelationStrength::classify(-0.9).positive);
        assert_eq!(CorrelationStrength::classify(-0.9).to_string(), "strong negative");
        assert_eq!(CorrelationStrength::classify(0.05).to_string(), "negligible");
    }
}
