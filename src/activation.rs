//! Activation functions for network neurons.
//!
//! Functions are modeled as a small registry enum resolved at
//! configuration time; the chosen variant is stored by value inside the
//! neuron, never looked up by name during a pass. External callers may
//! plug arbitrary unary functions through [`Activation::Custom`].

use std::f64::consts::PI;
use std::fmt;

/// Activation function applied to a neuron's aggregated input.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Activation {
    /// Identity: f(x) = x
    #[default]
    Linear,
    /// Sigmoid: f(x) = 1 / (1 + e^(-x))
    Sigmoid,
    /// Hyperbolic tangent.
    Tanh,
    /// Arctangent.
    Arctan,
    /// Softsign: f(x) = x / (1 + |x|)
    Softsign,
    /// Linear approximation of the sigmoid, clipped to [0, 1].
    HardSigmoid,
    /// Gompertz curve: f(x) = e^(-e^(-x))
    Gompertz,
    /// Rectified linear unit: f(x) = max(0, x)
    Relu,
    /// Leaky ReLU with slope 0.01 on the negative side.
    LeakyRelu,
    /// Exponential linear unit with alpha 1.0.
    Elu,
    /// Swish with beta 1.0: f(x) = x * sigmoid(x)
    Swish,
    /// Gaussian error linear unit (tanh approximation).
    Gelu,
    /// Externally supplied unary function.
    Custom(fn(f64) -> f64),
}

impl Activation {
    /// The built-in catalog.
    pub const ALL: [Self; 12] = [
        Self::Linear,
        Self::Sigmoid,
        Self::Tanh,
        Self::Arctan,
        Self::Softsign,
        Self::HardSigmoid,
        Self::Gompertz,
        Self::Relu,
        Self::LeakyRelu,
        Self::Elu,
        Self::Swish,
        Self::Gelu,
    ];

    /// Apply this activation function to an input value.
    #[inline]
    #[must_use]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Linear => x,
            Self::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Self::Tanh => x.tanh(),
            Self::Arctan => x.atan(),
            Self::Softsign => x / (1.0 + x.abs()),
            Self::HardSigmoid => (0.2 * x + 0.5).clamp(0.0, 1.0),
            Self::Gompertz => (-(-x).exp()).exp(),
            Self::Relu => x.max(0.0),
            Self::LeakyRelu => {
                if x > 0.0 {
                    x
                } else {
                    0.01 * x
                }
            }
            Self::Elu => {
                if x > 0.0 {
                    x
                } else {
                    x.exp() - 1.0
                }
            }
            Self::Swish => x / (1.0 + (-x).exp()),
            Self::Gelu => {
                0.5 * x * (1.0 + ((2.0 / PI).sqrt() * (x + 0.044715 * x.powi(3))).tanh())
            }
            Self::Custom(f) => f(x),
        }
    }

    /// Human-readable name for diagnostics.
    ///
    /// Custom functions fall back to a generic name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Sigmoid => "sigmoid",
            Self::Tanh => "tanh",
            Self::Arctan => "arctan",
            Self::Softsign => "softsign",
            Self::HardSigmoid => "hard_sigmoid",
            Self::Gompertz => "gompertz",
            Self::Relu => "relu",
            Self::LeakyRelu => "leaky_relu",
            Self::Elu => "elu",
            Self::Swish => "swish",
            Self::Gelu => "gelu",
            Self::Custom(_) => "custom",
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
