//! Classifier
//!
//! The capability every learner in the crate provides. Ensembles hold
//! their members as `Box<dyn Classifier>`, so any type implementing this
//! trait, including another ensemble, can be a member.
use crate::data::{DataSet, Example};
use crate::errors::LearnerError;

pub trait Classifier: Send + Sync {
    /// Fit the learner to the data, replacing any previous training.
    ///
    /// Fails with `LearnerError::EmptyDataset` if `data` has no examples.
    fn train(&mut self, data: &DataSet) -> Result<(), LearnerError>;

    /// Predict the label of an example, one of -1 or 1.
    ///
    /// Fails with `LearnerError::UntrainedModel` before `train`.
    fn classify(&self, example: &Example) -> Result<f64, LearnerError>;

    /// Degree of certainty, in `[0, 1]`, behind `classify`.
    fn confidence(&self, example: &Example) -> Result<f64, LearnerError>;

    /// Classify every example of a data set.
    fn classify_all(&self, data: &DataSet) -> Result<Vec<f64>, LearnerError> {
        data.examples().iter().map(|e| self.classify(e)).collect()
    }
}
