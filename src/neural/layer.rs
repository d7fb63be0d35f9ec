use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    matrix::{ops::outer, Matrix2},
    prelude::*,
};

use super::activations::Activation;

/// How the activation derivative enters the weight update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateRule {
    /// `output * (1 - output)` for every layer, whatever its activation.
    /// Only correct for sigmoid layers but it's what saved models were trained with.
    #[default]
    SigmoidDelta,
    /// The derivative of the layer's own activation, taken at its output.
    ActivationDerivative,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DenseLayer<T> {
    neurons: usize,
    activation: Activation,
    weights: Matrix2<T>,
}

impl<T: Element> DenseLayer<T> {
    /// Range hidden and output weights are drawn from.
    pub fn init_range() -> RangeInclusive<T> {
        let half: T = num_traits::cast(0.5).unwrap_or_else(T::one);
        -half..=half
    }

    /// Initializes a layer with `shape = (rows, cols)` weights.
    /// Weights are uniform in [`init_range`](Self::init_range) when `random_init`
    /// is set, otherwise the unit matrix (used for the input layer).
    pub fn new(
        neurons: usize,
        activation: &str,
        shape: (usize, usize),
        random_init: bool,
    ) -> Result<Self> {
        Self::new_with_rng(
            neurons,
            activation,
            shape,
            random_init,
            &mut rand::thread_rng(),
        )
    }

    pub fn new_with_rng<R: Rng + ?Sized>(
        neurons: usize,
        activation: &str,
        shape: (usize, usize),
        random_init: bool,
        rng: &mut R,
    ) -> Result<Self> {
        let activation = activation.parse()?;
        if shape.0.checked_mul(shape.1).is_none() {
            return Err(Error::config(format!(
                "a {}x{} weight matrix is too large",
                shape.0, shape.1
            )));
        }
        let weights = if random_init {
            Matrix2::random(shape.0, shape.1, Self::init_range(), rng)
        } else {
            Matrix2::identity(shape.0, shape.1)
        };
        Self::from_weights(neurons, activation, weights)
    }

    /// Builds a layer around existing weights, e.g. ones read back from a model file.
    pub fn from_weights(
        neurons: usize,
        activation: Activation,
        weights: Matrix2<T>,
    ) -> Result<Self> {
        if neurons == 0 {
            return Err(Error::config("a layer needs at least one neuron"));
        }
        if weights.rows() != neurons {
            return Err(Error::dim("weight rows", weights.rows(), neurons));
        }
        if weights.cols() == 0 {
            return Err(Error::config("a layer needs at least one input"));
        }
        Ok(Self {
            neurons,
            activation,
            weights,
        })
    }

    /// Applies the delta rule
    /// `w[k][j] += rate * error[k] * f'(output[k]) * prev_output[j]`
    /// where `f'` is picked by `rule`.
    pub fn update_weights(
        &mut self,
        error: &[T],
        output: &[T],
        prev_output: &[T],
        rate: T,
        rule: UpdateRule,
    ) -> Result<()> {
        if error.len() != self.neurons {
            return Err(Error::dim("error length", error.len(), self.neurons));
        }
        if output.len() != self.neurons {
            return Err(Error::dim("output length", output.len(), self.neurons));
        }
        if prev_output.len() != self.input_amount() {
            return Err(Error::dim(
                "previous output length",
                prev_output.len(),
                self.input_amount(),
            ));
        }

        let gradient: Vec<T> = error
            .iter()
            .zip(output)
            .map(|(&e, &o)| e * self.slope(o, rule))
            .collect();

        let delta = &outer(&gradient, prev_output) * rate;
        self.weights = (&self.weights + &delta)?;
        Ok(())
    }

    fn slope(&self, output: T, rule: UpdateRule) -> T {
        match rule {
            UpdateRule::SigmoidDelta => output * (T::one() - output),
            UpdateRule::ActivationDerivative => self.activation.derivative(output),
        }
    }

    pub fn neurons(&self) -> usize {
        self.neurons
    }

    /// Returns the amount of inputs this layer accepts
    pub fn input_amount(&self) -> usize {
        self.weights.cols()
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn weights(&self) -> &Matrix2<T> {
        &self.weights
    }
}
