//! Perceptron
//!
//! Mistake driven linear classifier trained on a bias augmented copy of
//! the data.
use crate::classifier::Classifier;
use crate::constants::{NEGATIVE_LABEL, PERCEPTRON_ITERATIONS, POSITIVE_LABEL};
use crate::data::{DataSet, Example};
use crate::errors::LearnerError;
use crate::utils::check_binary_labels;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
pub struct Perceptron {
    iterations: usize,
    seed: u64,
    weights: BTreeMap<usize, f64>,
    /// Empty data set carrying the bias feature used in training.
    biased: Option<DataSet>,
}

impl Default for Perceptron {
    fn default() -> Self {
        Perceptron {
            iterations: PERCEPTRON_ITERATIONS,
            seed: 0,
            weights: BTreeMap::new(),
            biased: None,
        }
    }
}

impl Perceptron {
    pub fn new() -> Self {
        Perceptron::default()
    }

    /// Set the number of passes over the training data.
    pub fn set_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the seed of the example order shuffle.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn weights(&self) -> &BTreeMap<usize, f64> {
        &self.weights
    }

    fn score(&self, example: &Example) -> f64 {
        self.weights
            .iter()
            .map(|(i, w)| w * example.feature(*i).unwrap_or(0.0))
            .sum()
    }

    fn biased_score(&self, example: &Example) -> Result<f64, LearnerError> {
        let biased = self.biased.as_ref().ok_or(LearnerError::UntrainedModel)?;
        Ok(self.score(&biased.add_bias_feature(example)?))
    }
}

impl Classifier for Perceptron {
    fn train(&mut self, data: &DataSet) -> Result<(), LearnerError> {
        if data.is_empty() {
            return Err(LearnerError::EmptyDataset);
        }
        check_binary_labels(data)?;

        let biased = data.copy_with_bias();
        self.weights = biased.feature_indices().into_iter().map(|i| (i, 0.0)).collect();

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut order: Vec<usize> = (0..biased.len()).collect();
        for _ in 0..self.iterations {
            order.shuffle(&mut rng);
            for &i in &order {
                let e = &biased.examples()[i];
                let label = e.label();
                if label * self.score(e) <= 0.0 {
                    for (feature, w) in self.weights.iter_mut() {
                        *w += label * e.feature(*feature).unwrap_or(0.0);
                    }
                }
            }
        }

        self.biased = Some(biased.empty_like());
        Ok(())
    }

    fn classify(&self, example: &Example) -> Result<f64, LearnerError> {
        let score = self.biased_score(example)?;
        Ok(if score > 0.0 { POSITIVE_LABEL } else { NEGATIVE_LABEL })
    }

    fn confidence(&self, example: &Example) -> Result<f64, LearnerError> {
        Ok(self.biased_score(example)?.abs().tanh())
    }
}
