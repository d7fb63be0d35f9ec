use log::info;

use crate::{data::argmax, neural::NeuralNet, prelude::*};

/// Drives [`NeuralNet::train`] over a data set, one example at a time, in order.
pub struct Trainer {
    epochs: usize,
    examples_per_log: Option<usize>,
}

impl Trainer {
    pub fn new(epochs: usize) -> Self {
        Self {
            epochs,
            examples_per_log: None,
        }
    }

    /// Log the mean squared error over the whole set every `examples_per_log` examples.
    pub fn with_log(mut self, examples_per_log: Option<usize>) -> Self {
        self.examples_per_log = examples_per_log;
        self
    }

    pub fn train<T: Element>(
        &self,
        net: &mut NeuralNet<T>,
        inputs: &[Vec<T>],
        targets: &[Vec<T>],
    ) -> Result<()> {
        if inputs.len() != targets.len() {
            return Err(Error::dim("target count", targets.len(), inputs.len()));
        }

        let mut seen = 0usize;
        for epoch in 0..self.epochs {
            for (input, target) in inputs.iter().zip(targets) {
                net.train(input, target)?;
                seen += 1;

                if self.examples_per_log.is_some_and(|epl| epl > 0 && seen % epl == 0) {
                    let mse = net.mean_squared_error(inputs, targets)?;
                    info!("Epoch {epoch} example {seen} error: {mse}");
                }
            }
        }
        Ok(())
    }

    /// Fraction of `inputs` whose strongest output is the matching entry of `labels`.
    pub fn accuracy<T: Element>(
        net: &NeuralNet<T>,
        inputs: &[Vec<T>],
        labels: &[usize],
    ) -> Result<f64> {
        if inputs.len() != labels.len() {
            return Err(Error::dim("label count", labels.len(), inputs.len()));
        }
        if inputs.is_empty() {
            return Ok(0.0);
        }

        let mut correct = 0usize;
        for (input, &label) in inputs.iter().zip(labels) {
            if argmax(&net.query(input)?) == Some(label) {
                correct += 1;
            }
        }
        Ok(correct as f64 / inputs.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::one_hot;
    use rand::{rngs::StdRng, SeedableRng};

    fn init_log() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn patterns() -> (Vec<Vec<f64>>, Vec<usize>) {
        let inputs = vec![
            vec![0.99, 0.01, 0.01, 0.01],
            vec![0.01, 0.99, 0.01, 0.01],
            vec![0.01, 0.01, 0.99, 0.01],
            vec![0.01, 0.01, 0.01, 0.99],
        ];
        (inputs, vec![0, 1, 2, 0])
    }

    #[test]
    fn train_patterns() {
        init_log();
        let mut rng = StdRng::seed_from_u64(99);
        let mut net =
            NeuralNet::new_with_rng(&[(4, "none"), (8, "sigmoid"), (3, "sigmoid")], 0.3, &mut rng)
                .unwrap();

        let (inputs, labels) = patterns();
        let targets: Vec<Vec<f64>> = labels.iter().map(|&l| one_hot(l, 3).unwrap()).collect();

        let before = net.mean_squared_error(&inputs, &targets).unwrap();
        Trainer::new(2_000)
            .with_log(Some(2_000))
            .train(&mut net, &inputs, &targets)
            .unwrap();
        let after = net.mean_squared_error(&inputs, &targets).unwrap();

        log::info!("Final cost: {after}");

        assert!(after < before);
        assert!(after < 0.05);
        assert_eq!(Trainer::accuracy(&net, &inputs, &labels).unwrap(), 1.0);
    }

    #[test]
    fn zero_epochs_leaves_net() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut net =
            NeuralNet::new_with_rng(&[(4, "none"), (3, "sigmoid")], 0.3, &mut rng).unwrap();
        let before = net.clone();

        let (inputs, labels) = patterns();
        let targets: Vec<Vec<f64>> = labels.iter().map(|&l| one_hot(l, 3).unwrap()).collect();
        Trainer::new(0).train(&mut net, &inputs, &targets).unwrap();

        assert_eq!(net, before);
    }

    #[test]
    fn mismatched_counts() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut net =
            NeuralNet::new_with_rng(&[(4, "none"), (3, "sigmoid")], 0.3, &mut rng).unwrap();
        let (inputs, labels) = patterns();

        assert!(matches!(
            Trainer::new(1).train(&mut net, &inputs, &[vec![0.99, 0.01, 0.01]]),
            Err(Error::DimensionMismatch { .. })
        ));
        assert!(matches!(
            Trainer::accuracy(&net, &inputs, &labels[..2]),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
