//! Two layer neural network
//!
//! A single tanh hidden layer feeding a tanh output unit, trained by
//! per-example gradient descent on squared error.
use crate::classifier::Classifier;
use crate::constants::{NEGATIVE_LABEL, NN_ETA, NN_HIDDEN_NODES, NN_INIT_WEIGHT, NN_ITERATIONS, POSITIVE_LABEL};
use crate::data::{DataSet, Example};
use crate::errors::LearnerError;
use crate::utils::{check_binary_labels, validate_positive_float_parameter, validate_positive_int_parameter};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Clone, Debug)]
pub struct TwoLayerNN {
    hidden_nodes: usize,
    iterations: usize,
    eta: f64,
    seed: u64,
    /// Feature indices feeding the input layer, bias included.
    inputs: Vec<usize>,
    /// `hidden_weights[k][j]` connects input `j` to hidden node `k`.
    hidden_weights: Vec<Vec<f64>>,
    /// One weight per hidden node, the last one belongs to the hidden bias unit.
    output_weights: Vec<f64>,
    biased: Option<DataSet>,
}

struct Activations {
    hidden_raw: Vec<f64>,
    /// Activated hidden values, followed by the bias unit's 1.0.
    hidden: Vec<f64>,
    output_raw: f64,
}

#[inline]
fn tanh_derivative(v: f64) -> f64 {
    1.0 - v.tanh().powi(2)
}

impl Default for TwoLayerNN {
    fn default() -> Self {
        TwoLayerNN::new(NN_HIDDEN_NODES)
    }
}

impl TwoLayerNN {
    /// * `hidden_nodes` - Number of hidden nodes, not counting the bias unit.
    pub fn new(hidden_nodes: usize) -> Self {
        TwoLayerNN {
            hidden_nodes,
            iterations: NN_ITERATIONS,
            eta: NN_ETA,
            seed: 0,
            inputs: Vec::new(),
            hidden_weights: Vec::new(),
            output_weights: Vec::new(),
            biased: None,
        }
    }

    /// Set the learning rate.
    pub fn set_eta(mut self, eta: f64) -> Self {
        self.eta = eta;
        self
    }

    /// Set the number of passes over the training data.
    pub fn set_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the seed of the weight initialization.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn hidden_nodes(&self) -> usize {
        self.hidden_nodes
    }

    fn input_values(&self, example: &Example) -> Vec<f64> {
        self.inputs.iter().map(|i| example.feature(*i).unwrap_or(0.0)).collect()
    }

    fn forward(&self, x: &[f64]) -> Activations {
        let hidden_raw: Vec<f64> = self
            .hidden_weights
            .iter()
            .map(|w| w.iter().zip(x).map(|(w, v)| w * v).sum())
            .collect();
        let mut hidden: Vec<f64> = hidden_raw.iter().map(|v| v.tanh()).collect();
        hidden.push(1.0);
        let output_raw: f64 = hidden.iter().zip(&self.output_weights).map(|(h, w)| h * w).sum();
        Activations {
            hidden_raw,
            hidden,
            output_raw,
        }
    }

    /// The network output in `(-1, 1)`.
    pub fn predict(&self, example: &Example) -> Result<f64, LearnerError> {
        let biased = self.biased.as_ref().ok_or(LearnerError::UntrainedModel)?;
        let x = self.input_values(&biased.add_bias_feature(example)?);
        Ok(self.forward(&x).output_raw.tanh())
    }

    /// Sum of squared errors over a data set.
    pub fn sum_of_square_error(&self, data: &DataSet) -> Result<f64, LearnerError> {
        data.examples()
            .iter()
            .map(|e| self.predict(e).map(|p| (e.label() - p).powi(2)))
            .sum()
    }

    fn initialize_weights(&mut self, rng: &mut StdRng) {
        let n_inputs = self.inputs.len();
        self.hidden_weights = (0..self.hidden_nodes)
            .map(|_| {
                (0..n_inputs)
                    .map(|_| rng.gen_range(-NN_INIT_WEIGHT..NN_INIT_WEIGHT))
                    .collect()
            })
            .collect();
        self.output_weights = (0..=self.hidden_nodes)
            .map(|_| rng.gen_range(-NN_INIT_WEIGHT..NN_INIT_WEIGHT))
            .collect();
    }

    fn update(&mut self, x: &[f64], label: f64) {
        let act = self.forward(x);
        let error = act.output_raw.tanh() - label;
        let delta = error * tanh_derivative(act.output_raw);

        for k in 0..self.hidden_weights.len() {
            // Backpropagate through the weight before it is updated.
            let back = delta * self.output_weights[k] * tanh_derivative(act.hidden_raw[k]);
            for (w, v) in self.hidden_weights[k].iter_mut().zip(x) {
                *w -= self.eta * back * v;
            }
        }
        for (w, h) in self.output_weights.iter_mut().zip(&act.hidden) {
            *w -= self.eta * delta * h;
        }
    }
}

impl Classifier for TwoLayerNN {
    fn train(&mut self, data: &DataSet) -> Result<(), LearnerError> {
        if data.is_empty() {
            return Err(LearnerError::EmptyDataset);
        }
        validate_positive_int_parameter(self.hidden_nodes, "hidden_nodes")?;
        validate_positive_float_parameter(self.eta, "eta")?;
        check_binary_labels(data)?;

        let biased = data.copy_with_bias();
        self.inputs = biased.feature_indices();
        let mut rng = StdRng::seed_from_u64(self.seed);
        self.initialize_weights(&mut rng);

        for _ in 0..self.iterations {
            for e in biased.examples() {
                let x = self.input_values(e);
                self.update(&x, e.label());
            }
        }

        self.biased = Some(biased.empty_like());
        Ok(())
    }

    fn classify(&self, example: &Example) -> Result<f64, LearnerError> {
        Ok(if self.predict(example)? > 0.0 {
            POSITIVE_LABEL
        } else {
            NEGATIVE_LABEL
        })
    }

    fn confidence(&self, example: &Example) -> Result<f64, LearnerError> {
        Ok(self.predict(example)?.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::accuracy;
    use approx::assert_relative_eq;
    use std::collections::BTreeMap;

    fn line() -> DataSet {
        let mut data = DataSet::new(BTreeMap::from([(0, "x".to_string())]));
        for x in [-2.0, -1.5, -1.0, 1.0, 1.5, 2.0] {
            data.add_example(Example::new(if x > 0.0 { 1.0 } else { -1.0 }).with_feature(0, x));
        }
        data
    }

    #[test]
    fn test_nn_learns_sign() {
        let data = line();
        let mut nn = TwoLayerNN::new(3).set_seed(1);
        nn.train(&data).unwrap();
        assert_relative_eq!(accuracy(&nn, &data).unwrap(), 1.0);
        for e in data.examples() {
            let c = nn.confidence(e).unwrap();
            assert!((0.0..=1.0).contains(&c));
        }
    }

    #[test]
    fn test_nn_training_reduces_error() {
        let data = line();
        let mut short = TwoLayerNN::new(2).set_iterations(1).set_seed(4);
        short.train(&data).unwrap();
        let mut long = TwoLayerNN::new(2).set_iterations(100).set_seed(4);
        long.train(&data).unwrap();
        assert!(long.sum_of_square_error(&data).unwrap() < short.sum_of_square_error(&data).unwrap());
    }

    #[test]
    fn test_nn_errors() {
        let nn = TwoLayerNN::default();
        assert_eq!(nn.hidden_nodes(), 3);
        assert!(matches!(nn.predict(&Example::new(1.0)), Err(LearnerError::UntrainedModel)));
        let mut nn = TwoLayerNN::new(0);
        assert!(matches!(nn.train(&line()), Err(LearnerError::InvalidParameter(..))));
        let mut nn = TwoLayerNN::new(2).set_eta(-1.0);
        assert!(matches!(nn.train(&line()), Err(LearnerError::InvalidParameter(..))));
    }
}
