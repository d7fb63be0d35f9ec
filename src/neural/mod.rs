pub mod activations;
pub mod layer;
pub mod trainer;

use log::{debug, trace};
use rand::Rng;

use crate::{
    config::NetworkConfig,
    matrix::ops::{apply, sub_vec, Dot, Transpose},
    prelude::*,
};

use self::{
    activations::Activation,
    layer::{DenseLayer, UpdateRule},
};

/// A linear stack of dense layers trained one example at a time.
///
/// `layers[0]` is the input layer: identity activation over a unit matrix, so it only
/// pins the input width. It is never trained.
#[derive(Debug, Clone, PartialEq)]
pub struct NeuralNet<T> {
    layers: Vec<DenseLayer<T>>,
    learning_rate: T,
    update_rule: UpdateRule,
}

impl<T: Element> NeuralNet<T> {
    /// Creates a network from `(neurons, activation)` pairs. The first pair is the input
    /// layer and must use `"none"`; every other layer gets random weights.
    pub fn new<S: AsRef<str>>(shape: &[(usize, S)], learning_rate: T) -> Result<Self> {
        Self::new_with_rng(shape, learning_rate, &mut rand::thread_rng())
    }

    pub fn new_with_rng<S: AsRef<str>, R: Rng + ?Sized>(
        shape: &[(usize, S)],
        learning_rate: T,
        rng: &mut R,
    ) -> Result<Self> {
        let (input_neurons, input_activation) = shape
            .first()
            .ok_or_else(|| Error::config("a network needs at least two layers"))?;

        if input_activation.as_ref() != Activation::Identity.name() {
            return Err(Error::config(format!(
                "input layer must have activation `none`, got `{}`",
                input_activation.as_ref()
            )));
        }
        if shape.len() < 2 {
            return Err(Error::config("a network needs at least two layers"));
        }

        let mut layers = Vec::with_capacity(shape.len());
        layers.push(DenseLayer::new_with_rng(
            *input_neurons,
            input_activation.as_ref(),
            (*input_neurons, *input_neurons),
            false,
            rng,
        )?);
        for pair in shape.windows(2) {
            let ((prev_neurons, _), (neurons, activation)) = (&pair[0], &pair[1]);
            layers.push(DenseLayer::new_with_rng(
                *neurons,
                activation.as_ref(),
                (*neurons, *prev_neurons),
                true,
                rng,
            )?);
        }

        let net = Self::from_layers(layers, learning_rate)?;
        debug!("created network {:?} with learning rate {learning_rate}", net.shape());
        Ok(net)
    }

    /// Builds a randomly initialized network from a deserialized config.
    pub fn from_config(config: &NetworkConfig) -> Result<Self> {
        let shape: Vec<(usize, &str)> = config
            .layers
            .iter()
            .map(|l| (l.neurons, l.activation.as_str()))
            .collect();
        let rate = num_traits::cast(config.learning_rate).ok_or_else(|| {
            Error::config(format!(
                "learning rate {} doesn't fit the element type",
                config.learning_rate
            ))
        })?;
        Ok(Self::new(&shape, rate)?.with_update_rule(config.update_rule))
    }

    /// Assembles a network from prebuilt layers, checking that they chain.
    pub fn from_layers(layers: Vec<DenseLayer<T>>, learning_rate: T) -> Result<Self> {
        if !(learning_rate.is_finite() && learning_rate > T::zero()) {
            return Err(Error::config(format!(
                "learning rate must be positive, got {learning_rate}"
            )));
        }
        if layers.len() < 2 {
            return Err(Error::config("a network needs at least two layers"));
        }
        if layers[0].activation() != Activation::Identity {
            return Err(Error::config(format!(
                "input layer must have activation `none`, got `{}`",
                layers[0].activation()
            )));
        }
        for pair in layers.windows(2) {
            if pair[1].input_amount() != pair[0].neurons() {
                return Err(Error::dim(
                    "layer input width",
                    pair[1].input_amount(),
                    pair[0].neurons(),
                ));
            }
        }

        Ok(Self {
            layers,
            learning_rate,
            update_rule: UpdateRule::default(),
        })
    }

    pub fn with_update_rule(mut self, update_rule: UpdateRule) -> Self {
        self.update_rule = update_rule;
        self
    }

    /// Runs `input` through every layer, the input layer included.
    pub fn query(&self, input: &[T]) -> Result<Vec<T>> {
        self.check_input(input)?;

        let mut output = input.to_vec();
        for layer in &self.layers {
            output = layer.weights().dot(&output[..])?;
            apply(&mut output, |x| layer.activation().call(x));
        }
        Ok(output)
    }

    /// Outputs of every trainable layer for one input, in layer order.
    fn forward(&self, input: &[T]) -> Result<Vec<Vec<T>>> {
        let mut outputs: Vec<Vec<T>> = Vec::with_capacity(self.layers.len() - 1);
        for layer in self.layers.iter().skip(1) {
            let prev = outputs.last().map(Vec::as_slice).unwrap_or(input);
            let mut output = layer.weights().dot(prev)?;
            apply(&mut output, |x| layer.activation().call(x));
            outputs.push(output);
        }
        Ok(outputs)
    }

    /// One online gradient step on a single `(input, target)` example.
    pub fn train(&mut self, input: &[T], target: &[T]) -> Result<()> {
        self.check_input(input)?;
        if target.len() != self.output_amount() {
            return Err(Error::dim("target length", target.len(), self.output_amount()));
        }

        let outputs = self.forward(input)?;
        let final_output = outputs
            .last()
            .ok_or_else(|| Error::dim("forward outputs", 0, 1))?;

        // Output error, then blame pushed back through the transposed weights.
        // No derivative here, it only enters in update_weights.
        let mut error = sub_vec(target, final_output)?;
        let mut errors = vec![error.clone()];
        for next in self.layers[2..].iter().rev() {
            error = next.weights().transpose().dot(&error[..])?;
            errors.push(error.clone());
        }
        errors.reverse();

        if outputs.len() != errors.len() {
            return Err(Error::dim("backward errors", errors.len(), outputs.len()));
        }

        let (rate, rule) = (self.learning_rate, self.update_rule);
        for (i, layer) in self.layers.iter_mut().enumerate().skip(1) {
            let prev = if i == 1 { input } else { &outputs[i - 2][..] };
            layer.update_weights(&errors[i - 1], &outputs[i - 1], prev, rate, rule)?;
        }

        trace!(
            "trained on example, output error {:?}",
            errors.last().map(|e| e.iter().fold(T::zero(), |s, &x| s + x * x))
        );
        Ok(())
    }

    /// Sum of squared differences between `target` and the network's output.
    pub fn squared_error(&self, input: &[T], target: &[T]) -> Result<T> {
        let output = self.query(input)?;
        if target.len() != output.len() {
            return Err(Error::dim("target length", target.len(), output.len()));
        }
        Ok(sub_vec(target, &output)?
            .into_iter()
            .fold(T::zero(), |sum, d| sum + d * d))
    }

    /// Squared error averaged over every output of every example.
    pub fn mean_squared_error(&self, inputs: &[Vec<T>], targets: &[Vec<T>]) -> Result<T> {
        if inputs.len() != targets.len() {
            return Err(Error::dim("target count", targets.len(), inputs.len()));
        }
        if inputs.is_empty() {
            return Ok(T::zero());
        }

        let mut sum = T::zero();
        for (input, target) in inputs.iter().zip(targets) {
            sum = sum + self.squared_error(input, target)?;
        }
        let count = inputs.len() * self.output_amount();
        Ok(sum / num_traits::cast(count).unwrap_or_else(T::one))
    }

    fn check_input(&self, input: &[T]) -> Result<()> {
        if input.len() != self.input_amount() {
            return Err(Error::dim("input length", input.len(), self.input_amount()));
        }
        Ok(())
    }

    pub fn layers(&self) -> &[DenseLayer<T>] {
        &self.layers
    }

    pub fn learning_rate(&self) -> T {
        self.learning_rate
    }

    pub fn update_rule(&self) -> UpdateRule {
        self.update_rule
    }

    /// Width of the input layer
    pub fn input_amount(&self) -> usize {
        self.layers[0].neurons()
    }

    /// Width of the output layer
    pub fn output_amount(&self) -> usize {
        self.layers[self.layers.len() - 1].neurons()
    }

    /// `(neurons, activation)` of every layer, input layer first.
    pub fn shape(&self) -> Vec<(usize, Activation)> {
        self.layers
            .iter()
            .map(|l| (l.neurons(), l.activation()))
            .collect()
    }
}
