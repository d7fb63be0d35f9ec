use std::{fmt, str::FromStr};

use crate::prelude::*;

/// Scalar nonlinearity applied element-wise to a layer's weighted sum.
///
/// Parsed from the names used in model files and configs: `none`, `sigmoid`,
/// `relu` and `tanh`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Identity,
    Sigmoid,
    ReLU,
    Tanh,
}

impl Activation {
    /// Returns activation function at x
    pub fn call<T: Element>(&self, x: T) -> T {
        use Activation::*;
        match self {
            Identity => x,
            Sigmoid => T::one() / (T::one() + (-x).exp()),
            ReLU => x.max(T::zero()),
            Tanh => x.tanh(),
        }
    }

    /// Returns derivative of activation function with respect to the function at x.
    /// For example, if our activation is sigmoid, then we would express the
    /// derivative as `a_x * (1-a_x)` instead of `sigmoid(a_x)(1-sigmoid(a_x))`.
    pub fn derivative<T: Element>(&self, a_x: T) -> T {
        use Activation::*;
        match self {
            Identity => T::one(),
            Sigmoid => a_x * (T::one() - a_x),
            ReLU => {
                if a_x > T::zero() {
                    T::one()
                } else {
                    T::zero()
                }
            }
            Tanh => T::one() - a_x * a_x,
        }
    }

    pub fn name(&self) -> &'static str {
        use Activation::*;
        match self {
            Identity => "none",
            Sigmoid => "sigmoid",
            ReLU => "relu",
            Tanh => "tanh",
        }
    }
}

impl FromStr for Activation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(Activation::Identity),
            "sigmoid" => Ok(Activation::Sigmoid),
            "relu" => Ok(Activation::ReLU),
            "tanh" => Ok(Activation::Tanh),
            other => Err(Error::config(format!(
                "unknown activation function `{other}`"
            ))),
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
