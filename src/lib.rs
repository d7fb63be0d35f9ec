//! A fully-connected feedforward neural network trained by online backpropagation.
//!
//! ```
//! use backprop_nn::neural::NeuralNet;
//!
//! let mut net = NeuralNet::<f64>::new(&[(3, "none"), (4, "sigmoid"), (2, "sigmoid")], 0.3)?;
//! net.train(&[0.1, 0.2, 0.3], &[0.99, 0.01])?;
//! assert_eq!(net.query(&[0.1, 0.2, 0.3])?.len(), 2);
//! # Ok::<(), backprop_nn::prelude::Error>(())
//! ```

pub mod config;
pub mod data;
pub mod matrix;
pub mod model;
pub mod neural;
pub mod prelude;
