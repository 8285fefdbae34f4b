use crate::bagging::constructor::EnsembleConstructor;
use crate::bagging::core::BaggingClassifier;
use crate::classifier::Classifier;
use crate::errors::LearnerError;

impl BaggingClassifier {
    // Set methods for parameters

    /// Set the seed used for resampling.
    /// * `seed` - Slot `i` draws its resample from a generator seeded with `seed + i`.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.cfg.seed = seed;
        self
    }

    /// Set the number of threads on the ensemble.
    /// * `num_threads` - Set the number of threads to be used during training.
    pub fn set_num_threads(mut self, num_threads: Option<usize>) -> Self {
        self.cfg.num_threads = num_threads;
        self
    }

    /// Set whether learners are rebuilt from the constructor on every train.
    /// * `rebuild_learners` - When false, learners already in a slot are retrained as they are.
    pub fn set_rebuild_learners(mut self, rebuild_learners: bool) -> Self {
        self.cfg.rebuild_learners = rebuild_learners;
        self
    }

    /// Set the learners the slots are filled with.
    /// * `constructor` - Typed form of the constructor string.
    pub fn set_ensemble_constructor(mut self, constructor: EnsembleConstructor) -> Self {
        self.cfg.constructor = Some(constructor);
        self
    }

    // In place updates of an existing ensemble.

    /// Number of ensemble slots.
    pub fn size(&self) -> usize {
        self.cfg.n_learners
    }

    /// Change the number of slots. The ensemble must be trained again before use.
    pub fn set_size(&mut self, n_learners: usize) {
        self.cfg.n_learners = n_learners;
        self.learners.resize_with(n_learners, || None);
        self.trained = false;
    }

    /// The constructor string in effect.
    pub fn constructor(&self) -> String {
        self.ensemble_constructor().to_string()
    }

    /// Parse and set the constructor, e.g. `"3p3 2t5"`.
    pub fn set_constructor(&mut self, constructor: &str) -> Result<(), LearnerError> {
        self.cfg.constructor = Some(constructor.parse()?);
        self.trained = false;
        Ok(())
    }

    /// Replace the learner of slot `i`. The ensemble must be trained again
    /// before use, and the learner is replaced on that train unless
    /// `rebuild_learners` is off.
    pub fn set_learner(&mut self, i: usize, learner: Box<dyn Classifier>) -> Result<(), LearnerError> {
        let n = self.cfg.n_learners;
        let slot = self.learners.get_mut(i).ok_or_else(|| {
            LearnerError::InvalidParameter("slot".to_string(), format!("index below {}", n), i.to_string())
        })?;
        *slot = Some(learner);
        self.trained = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bagging::config::BaggingConfig;
    use crate::decision_tree::DecisionTree;

    #[test]
    fn test_setters() {
        let mut bag = BaggingClassifier::new(2)
            .set_seed(12)
            .set_num_threads(Some(1))
            .set_rebuild_learners(false);
        assert_eq!(bag.cfg.seed, 12);
        assert_eq!(bag.cfg.num_threads, Some(1));
        assert!(!bag.cfg.rebuild_learners);

        assert_eq!(bag.size(), 2);
        assert_eq!(bag.constructor(), "2p");
        bag.set_size(4);
        assert_eq!(bag.size(), 4);
        assert_eq!(bag.constructor(), "4p");
        assert!(bag.set_learner(3, Box::new(DecisionTree::new())).is_ok());
        assert!(bag.learner(3).is_some());

        bag.set_constructor("2t1 2p").unwrap();
        assert_eq!(bag.constructor(), "2t1 2p");
        assert!(matches!(bag.set_constructor("2k"), Err(LearnerError::Configuration(_))));
        assert_eq!(bag.constructor(), "2t1 2p");

        let bag = BaggingClassifier::from_config(BaggingConfig::default())
            .set_ensemble_constructor("1n 2t".parse().unwrap());
        assert_eq!(bag.constructor(), "1n 2t");
    }
}
