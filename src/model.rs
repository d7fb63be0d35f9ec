//! Plain-text model files.
//!
//! ```text
//! <learning rate>
//! <number of trainable layers N>
//! <neurons_0> none
//! <neurons_1> <activation_1>
//! ...
//! <neurons_N> <activation_N>
//!
//! <weights of layer 1, one row per line>
//!
//! ...
//! <weights of layer N>
//! ```
//!
//! The input layer's unit matrix is never written. Reading splits on whitespace, so
//! line breaks and blank lines only matter to humans.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
    str::{FromStr, SplitWhitespace},
};

use log::debug;

use crate::{
    matrix::Matrix2,
    neural::{layer::DenseLayer, NeuralNet},
    prelude::*,
};

pub fn save<T: Element, W: Write>(net: &NeuralNet<T>, mut writer: W) -> Result<()> {
    let layers = net.layers();

    writeln!(writer, "{}", net.learning_rate())?;
    writeln!(writer, "{}", layers.len() - 1)?;
    for layer in layers {
        writeln!(writer, "{} {}", layer.neurons(), layer.activation())?;
    }

    for layer in layers.iter().skip(1) {
        writeln!(writer)?;
        for row in layer.weights().iter_rows() {
            let line: Vec<String> = row.iter().map(|w| w.to_string()).collect();
            writeln!(writer, "{}", line.join(" "))?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn save_to_path<T: Element>(net: &NeuralNet<T>, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    save(net, BufWriter::new(File::create(path)?))?;
    debug!("saved model {:?} to {}", net.shape(), path.display());
    Ok(())
}

pub fn load<T: Element, R: Read>(mut reader: R) -> Result<NeuralNet<T>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let mut tokens = Tokens::new(&text);

    let learning_rate: T = tokens.next("learning rate")?;
    let trainable: usize = tokens.next("layer count")?;

    let mut shape = Vec::new();
    for _ in 0..=trainable {
        let neurons: usize = tokens.next("neuron count")?;
        let activation = tokens.next_str("activation name")?;
        shape.push((neurons, activation));
    }

    let mut weights = Vec::with_capacity(trainable);
    for pair in shape.windows(2) {
        let ((prev_neurons, _), (neurons, _)) = (pair[0], pair[1]);
        let count = weight_count(&tokens, neurons, prev_neurons)?;
        let mut layer_weights = Vec::new();
        for _ in 0..count {
            layer_weights.push(tokens.next("weight")?);
        }
        weights.push(layer_weights);
    }

    if let Some(extra) = tokens.inner.next() {
        return Err(Error::Parse {
            token: tokens.pos,
            message: format!("unexpected trailing `{extra}`"),
        });
    }

    let (input_neurons, input_activation) = shape[0];
    weight_count(&tokens, input_neurons, input_neurons)?;

    let mut layers = Vec::with_capacity(shape.len());
    layers.push(DenseLayer::new(
        input_neurons,
        input_activation,
        (input_neurons, input_neurons),
        false,
    )?);
    for (pair, layer_weights) in shape.windows(2).zip(weights) {
        let ((prev_neurons, _), (neurons, activation)) = (pair[0], pair[1]);
        let layer_weights = Matrix2::from_flat(neurons, prev_neurons, layer_weights)?;
        layers.push(DenseLayer::from_weights(
            neurons,
            activation.parse()?,
            layer_weights,
        )?);
    }

    NeuralNet::from_layers(layers, learning_rate)
}

fn weight_count(tokens: &Tokens<'_>, rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols).ok_or_else(|| Error::Parse {
        token: tokens.pos,
        message: format!("layer of {rows}x{cols} weights is too large"),
    })
}

pub fn load_from_path<T: Element>(path: impl AsRef<Path>) -> Result<NeuralNet<T>> {
    let path = path.as_ref();
    let net = load(BufReader::new(File::open(path)?))?;
    debug!("loaded model {:?} from {}", net.shape(), path.display());
    Ok(net)
}

struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.split_whitespace(),
            pos: 0,
        }
    }

    fn next_str(&mut self, what: &str) -> Result<&'a str> {
        let tok = self.inner.next().ok_or_else(|| Error::Parse {
            token: self.pos,
            message: format!("expected {what}, found end of input"),
        })?;
        self.pos += 1;
        Ok(tok)
    }

    fn next<U: FromStr>(&mut self, what: &str) -> Result<U> {
        let tok = self.next_str(what)?;
        tok.parse().map_err(|_| Error::Parse {
            token: self.pos - 1,
            message: format!("expected {what}, found `{tok}`"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neural::activations::Activation;
    use rand::{rngs::StdRng, SeedableRng};

    fn trained_net() -> NeuralNet<f64> {
        let mut rng = StdRng::seed_from_u64(31);
        let mut net =
            NeuralNet::new_with_rng(&[(3, "none"), (4, "relu"), (2, "sigmoid")], 0.3, &mut rng)
                .unwrap();
        for _ in 0..5 {
            net.train(&[0.1, 0.5, 0.9], &[0.99, 0.01]).unwrap();
            net.train(&[0.8, 0.3, 0.01], &[0.01, 0.99]).unwrap();
        }
        net
    }

    #[test]
    fn layout() {
        let input_layer = DenseLayer::<f64>::new(2, "none", (2, 2), false).unwrap();
        let out = DenseLayer::from_weights(
            1,
            Activation::Sigmoid,
            Matrix2::from_array([[0.25, -1.5]]),
        )
        .unwrap();
        let net = NeuralNet::from_layers(vec![input_layer, out], 0.3).unwrap();

        let mut buf = Vec::new();
        save(&net, &mut buf).unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "0.3\n1\n2 none\n1 sigmoid\n\n0.25 -1.5\n"
        );
    }

    #[test]
    fn round_trip_preserves_queries() {
        let net = trained_net();

        let mut buf = Vec::new();
        save(&net, &mut buf).unwrap();
        let loaded: NeuralNet<f64> = load(&buf[..]).unwrap();

        assert_eq!(loaded, net);
        for input in [[0.1, 0.5, 0.9], [0.01, 0.01, 0.01], [1.0, 0.2, 0.6]] {
            assert_eq!(loaded.query(&input).unwrap(), net.query(&input).unwrap());
        }
    }

    #[test]
    fn round_trip_f32() {
        let mut rng = StdRng::seed_from_u64(8);
        let net = NeuralNet::<f32>::new_with_rng(
            &[(2, "none"), (3, "tanh"), (1, "sigmoid")],
            0.25,
            &mut rng,
        )
        .unwrap();

        let mut buf = Vec::new();
        save(&net, &mut buf).unwrap();
        assert_eq!(load::<f32, _>(&buf[..]).unwrap(), net);
    }

    #[test]
    fn round_trip_file() {
        let net = trained_net();
        let path =
            std::env::temp_dir().join(format!("backprop_nn_model_{}.txt", std::process::id()));

        save_to_path(&net, &path).unwrap();
        let loaded = load_from_path::<f64>(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, net);
    }

    #[test]
    fn tolerates_irregular_whitespace() {
        let text = "0.5 1\n2 none 1 sigmoid 0.1\n\n\n   0.2\n";
        let net = load::<f64, _>(text.as_bytes()).unwrap();
        assert_eq!(net.layers()[1].weights(), &Matrix2::from_array([[0.1, 0.2]]));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            load_from_path::<f64>("/definitely/not/a/model.txt"),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn malformed_numbers() {
        let text = "0.5\n1\n2 none\n1 sigmoid\n\n0.1 abc\n";
        assert!(matches!(
            load::<f64, _>(text.as_bytes()),
            Err(Error::Parse { token: 7, .. })
        ));

        let text = "fast\n1\n2 none\n1 sigmoid\n\n0.1 0.2\n";
        assert!(matches!(
            load::<f64, _>(text.as_bytes()),
            Err(Error::Parse { token: 0, .. })
        ));
    }

    #[test]
    fn truncated_and_trailing() {
        let text = "0.5\n1\n2 none\n1 sigmoid\n\n0.1\n";
        assert!(matches!(
            load::<f64, _>(text.as_bytes()),
            Err(Error::Parse { .. })
        ));

        let text = "0.5\n1\n2 none\n1 sigmoid\n\n0.1 0.2 0.3\n";
        assert!(matches!(
            load::<f64, _>(text.as_bytes()),
            Err(Error::Parse { token: 8, .. })
        ));
    }

    #[test]
    fn oversized_widths_are_parse_errors() {
        // declared width with none of its weights present
        let text = "0.5\n1\n4294967296 none\n1 sigmoid\n";
        assert!(matches!(
            load::<f64, _>(text.as_bytes()),
            Err(Error::Parse { .. })
        ));

        // weight count overflows usize
        let text = format!("0.5\n1\n{} none\n2 sigmoid\n0.1\n", usize::MAX);
        assert!(matches!(
            load::<f64, _>(text.as_bytes()),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn invalid_layers() {
        let text = "0.5\n1\n2 sigmoid\n1 sigmoid\n\n0.1 0.2\n";
        assert!(matches!(
            load::<f64, _>(text.as_bytes()),
            Err(Error::InvalidConfiguration(_))
        ));

        let text = "0.5\n0\n2 none\n";
        assert!(matches!(
            load::<f64, _>(text.as_bytes()),
            Err(Error::InvalidConfiguration(_))
        ));

        let text = "0.5\n1\n2 none\n1 swish\n\n0.1 0.2\n";
        assert!(matches!(
            load::<f64, _>(text.as_bytes()),
            Err(Error::InvalidConfiguration(_))
        ));
    }
}
