use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{neural::layer::UpdateRule, prelude::*};

/// One `(neurons, activation)` entry of a network description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    pub neurons: usize,
    /// Kept as the raw name so unknown activations surface when the network is built.
    pub activation: String,
}

/// Serializable description of a network, e.g.
///
/// ```json
/// {
///     "learning_rate": 0.3,
///     "layers": [
///         { "neurons": 784, "activation": "none" },
///         { "neurons": 100, "activation": "sigmoid" },
///         { "neurons": 10, "activation": "sigmoid" }
///     ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub learning_rate: f64,
    pub layers: Vec<LayerConfig>,
    #[serde(default)]
    pub update_rule: UpdateRule,
}

impl NetworkConfig {
    pub fn new<S: Into<String>>(
        learning_rate: f64,
        layers: impl IntoIterator<Item = (usize, S)>,
    ) -> Self {
        Self {
            learning_rate,
            layers: layers
                .into_iter()
                .map(|(neurons, activation)| LayerConfig {
                    neurons,
                    activation: activation.into(),
                })
                .collect(),
            update_rule: UpdateRule::default(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neural::{activations::Activation, NeuralNet};

    const MNIST: &str = r#"{
        "learning_rate": 0.3,
        "layers": [
            { "neurons": 784, "activation": "none" },
            { "neurons": 100, "activation": "sigmoid" },
            { "neurons": 10, "activation": "sigmoid" }
        ]
    }"#;

    #[test]
    fn parse_defaults_update_rule() {
        let config = NetworkConfig::from_json_str(MNIST).unwrap();

        assert_eq!(config.learning_rate, 0.3);
        assert_eq!(config.layers.len(), 3);
        assert_eq!(config.layers[1].neurons, 100);
        assert_eq!(config.update_rule, UpdateRule::SigmoidDelta);
    }

    #[test]
    fn explicit_update_rule() {
        let json = r#"{
            "learning_rate": 0.1,
            "layers": [
                { "neurons": 2, "activation": "none" },
                { "neurons": 1, "activation": "tanh" }
            ],
            "update_rule": "activation_derivative"
        }"#;
        let config = NetworkConfig::from_json_str(json).unwrap();
        assert_eq!(config.update_rule, UpdateRule::ActivationDerivative);

        let net = NeuralNet::<f64>::from_config(&config).unwrap();
        assert_eq!(net.update_rule(), UpdateRule::ActivationDerivative);
        assert_eq!(net.shape(), [(2, Activation::Identity), (1, Activation::Tanh)]);
    }

    #[test]
    fn json_round_trip() {
        let config = NetworkConfig::new(0.5, [(3, "none"), (2, "relu")]);
        let json = config.to_json_string().unwrap();
        assert_eq!(NetworkConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(
            NetworkConfig::from_json_str(r#"{ "learning_rate": "fast" }"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn invalid_network_from_config() {
        let config = NetworkConfig::new(0.3, [(3, "sigmoid"), (2, "sigmoid")]);
        assert!(matches!(
            NeuralNet::<f32>::from_config(&config),
            Err(Error::InvalidConfiguration(_))
        ));

        let config = NetworkConfig::new(0.3, [(3, "none"), (2, "gelu")]);
        assert!(matches!(
            NeuralNet::<f32>::from_config(&config),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            NetworkConfig::from_path("/definitely/not/here.json"),
            Err(Error::Io(_))
        ));
    }
}
