use std::fmt::{Debug, Display};
use std::str::FromStr;

use num_traits::Float;
use rand::distributions::uniform::SampleUniform;

/// Error type for backprop_nn
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Indicates some dimension is incorrect in a Matrix or network operation.
    #[error("dimension mismatch for {what}: got {got}, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },

    /// The network or one of its layers was described in a way that can't be built.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Model text that isn't what a saved model looks like.
    #[error("parse error at token {token}: {message}")]
    Parse { token: usize, message: String },

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn dim(what: &'static str, got: usize, expected: usize) -> Self {
        Error::DimensionMismatch {
            what,
            got,
            expected,
        }
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::InvalidConfiguration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Scalar type a network can be built over. Implemented for `f32` and `f64`.
pub trait Element:
    Float + SampleUniform + FromStr + Display + Debug + Default + 'static
{
}

impl<T> Element for T where
    T: Float + SampleUniform + FromStr + Display + Debug + Default + 'static
{
}
