//! Aggregation functions for combining weighted inputs.
//!
//! An aggregation reduces the weighted contributions arriving at a
//! neuron to a single value before bias and activation are applied.
//! Like [`Activation`](crate::activation::Activation), the catalog is an
//! enum registry with a [`Aggregation::Custom`] escape hatch for
//! external callables.
//!
//! Callers never apply an aggregation to an empty slice: the neuron
//! substitutes `[0.0]` when no live contribution exists, so selective
//! reducers such as `Max` and `Median` always see at least one value.

use std::fmt;

/// Aggregation applied to a neuron's incoming weighted values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Aggregation {
    /// Sum of all values.
    #[default]
    Sum,
    /// Product of all values.
    Product,
    /// Arithmetic mean.
    Mean,
    /// Sum of absolute values.
    AbsSum,
    /// Product of absolute values.
    AbsProd,
    /// Mean of absolute values.
    AbsMean,
    /// Largest value.
    Max,
    /// Smallest value.
    Min,
    /// Median value (mean of the middle pair for even counts).
    Median,
    /// L1 norm (same result as `AbsSum`, kept as a named alias).
    NormL1,
    /// L2 norm.
    NormL2,
    /// Numerically stable log-sum-exp.
    LogSumExp,
    /// Externally supplied reducer.
    Custom(fn(&[f64]) -> f64),
}

impl Aggregation {
    /// The built-in catalog.
    pub const ALL: [Self; 12] = [
        Self::Sum,
        Self::Product,
        Self::Mean,
        Self::AbsSum,
        Self::AbsProd,
        Self::AbsMean,
        Self::Max,
        Self::Min,
        Self::Median,
        Self::NormL1,
        Self::NormL2,
        Self::LogSumExp,
    ];

    /// Reduce the values to a single number.
    ///
    /// `values` must be non-empty; the network guarantees this by
    /// substituting `[0.0]` for neurons with no live predecessors.
    #[must_use]
    pub fn apply(self, values: &[f64]) -> f64 {
        match self {
            Self::Sum => values.iter().sum(),
            Self::Product => values.iter().product(),
            Self::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Self::AbsSum | Self::NormL1 => values.iter().map(|v| v.abs()).sum(),
            Self::AbsProd => values.iter().map(|v| v.abs()).product(),
            Self::AbsMean => {
                values.iter().map(|v| v.abs()).sum::<f64>() / values.len() as f64
            }
            Self::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Self::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Self::Median => median(values),
            Self::NormL2 => values.iter().map(|v| v * v).sum::<f64>().sqrt(),
            Self::LogSumExp => {
                let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                max + values.iter().map(|v| (v - max).exp()).sum::<f64>().ln()
            }
            Self::Custom(f) => f(values),
        }
    }

    /// Human-readable name for diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Product => "prod",
            Self::Mean => "mean",
            Self::AbsSum => "abs_sum",
            Self::AbsProd => "abs_prod",
            Self::AbsMean => "abs_mean",
            Self::Max => "max",
            Self::Min => "min",
            Self::Median => "median",
            Self::NormL1 => "norm_l1",
            Self::NormL2 => "norm_l2",
            Self::LogSumExp => "log_sum_exp",
            Self::Custom(_) => "custom",
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALUES: [f64; 4] = [1.0, -2.0, 3.0, -4.0];

    #[test]
    fn test_additive() {
        assert!((Aggregation::Sum.apply(&VALUES) - -2.0).abs() < 1e-12);
        assert!((Aggregation::Mean.apply(&VALUES) - -0.5).abs() < 1e-12);
        assert!((Aggregation::AbsSum.apply(&VALUES) - 10.0).abs() < 1e-12);
        assert!((Aggregation::AbsMean.apply(&VALUES) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_multiplicative() {
        assert!((Aggregation::Product.apply(&VALUES) - 24.0).abs() < 1e-12);
        assert!((Aggregation::AbsProd.apply(&VALUES) - 24.0).abs() < 1e-12);
    }

    #[test]
    fn test_selective() {
        assert!((Aggregation::Max.apply(&VALUES) - 3.0).abs() < 1e-12);
        assert!((Aggregation::Min.apply(&VALUES) - -4.0).abs() < 1e-12);
        assert!((Aggregation::Median.apply(&VALUES) - -0.5).abs() < 1e-12);
        assert!((Aggregation::Median.apply(&[3.0, 1.0, 2.0]) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_norms() {
        assert!((Aggregation::NormL1.apply(&VALUES) - 10.0).abs() < 1e-12);
        assert!((Aggregation::NormL2.apply(&[3.0, 4.0]) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_log_sum_exp_is_stable() {
        // Naive exp(1000) overflows; the shifted form must not.
        let y = Aggregation::LogSumExp.apply(&[1000.0, 1000.0]);
        assert!((y - (1000.0 + 2.0f64.ln())).abs() < 1e-9);
    }

    #[test]
    fn test_singleton_zero_is_neutral_for_sum() {
        // The substitution the network performs for isolated neurons.
        assert!(Aggregation::Sum.apply(&[0.0]).abs() < 1e-12);
        assert!(Aggregation::Max.apply(&[0.0]).abs() < 1e-12);
    }

    #[test]
    fn test_custom_reducer() {
        fn first(values: &[f64]) -> f64 {
            values[0]
        }
        let aggregation = Aggregation::Custom(first);
        assert!((aggregation.apply(&VALUES) - 1.0).abs() < 1e-12);
        assert_eq!(aggregation.name(), "custom");
    }
}
