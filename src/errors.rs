//! Errors
//!
//! Custom error types used throughout the `bagtree` crate.
use thiserror::Error;

/// Errors that can occur while training or querying a learner.
#[derive(Debug, Error)]
pub enum LearnerError {
    /// Training was requested on a data set without examples.
    #[error("Tried to train without any data.")]
    EmptyDataset,
    /// Inference was requested before the learner was trained.
    #[error("The model has not been trained, call train before classify or confidence.")]
    UntrainedModel,
    /// The ensemble constructor could not be turned into learners.
    #[error("Invalid ensemble configuration: {0}")]
    Configuration(String),
    /// A training label is not one of the two label sentinels.
    #[error("Label {0} is not a binary label, expected -1 or 1.")]
    InvalidLabel(f64),
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
    /// No ensemble member agreed with the majority vote.
    #[error("No ensemble member agrees with the majority label.")]
    NoAgreeingMembers,
    /// The worker pool used for parallel training could not be created.
    #[error("Unable to build thread pool: {0}")]
    ThreadPool(String),
    /// Unable to write configuration to file.
    #[error("Unable to write configuration to file: {0}")]
    UnableToWrite(String),
    /// Unable to read configuration from file.
    #[error("Unable to read configuration from a file {0}")]
    UnableToRead(String),
    /// A bias feature was requested from a data set that does not carry one.
    #[error("The data set does not include a bias feature.")]
    MissingBias,
    /// Fold index out of range, first value is the index, second the number of folds.
    #[error("Fold {0} requested, but only {1} folds exist.")]
    InvalidFold(usize, usize),
}
