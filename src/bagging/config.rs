//! Bagging Configuration
//!
//! Hyperparameters of the bagging ensemble.
use crate::bagging::constructor::EnsembleConstructor;
use crate::config::ConfigIO;
use crate::constants::DEFAULT_ENSEMBLE_SIZE;
use serde::{Deserialize, Serialize};

fn default_n_learners() -> usize {
    DEFAULT_ENSEMBLE_SIZE
}
fn default_constructor() -> Option<EnsembleConstructor> {
    None
}
fn default_seed() -> u64 {
    0
}
fn default_num_threads() -> Option<usize> {
    None
}
fn default_rebuild_learners() -> bool {
    true
}

/// Configuration for the `BaggingClassifier`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaggingConfig {
    /// Number of ensemble slots.
    #[serde(default = "default_n_learners")]
    pub n_learners: usize,
    /// Learners to fill the slots with, `None` for all perceptrons.
    #[serde(default = "default_constructor")]
    pub constructor: Option<EnsembleConstructor>,
    /// Slot `i` resamples with a generator seeded by `seed + i`.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Number of threads for parallel training, `None` for all available.
    #[serde(default = "default_num_threads")]
    pub num_threads: Option<usize>,
    /// Build fresh learners from the constructor on every `train`. When
    /// false, learners already in a slot are kept and retrained.
    #[serde(default = "default_rebuild_learners")]
    pub rebuild_learners: bool,
}

impl Default for BaggingConfig {
    fn default() -> Self {
        BaggingConfig {
            n_learners: default_n_learners(),
            constructor: default_constructor(),
            seed: default_seed(),
            num_threads: default_num_threads(),
            rebuild_learners: default_rebuild_learners(),
        }
    }
}

impl ConfigIO for BaggingConfig {}
