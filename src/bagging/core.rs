use crate::bagging::config::BaggingConfig;
use crate::bagging::constructor::EnsembleConstructor;
use crate::classifier::Classifier;
use crate::data::{DataSet, Example};
use crate::errors::LearnerError;
use crate::sampler::bootstrap_resample;
use crate::utils::{validate_positive_int_parameter, LabelCounter};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::time::Instant;

/// Bootstrap aggregating ensemble.
///
/// Every slot trains its own learner on a resample of the training data
/// drawn with replacement. Predictions are a majority vote of the slots.
/// The ensemble is itself a `Classifier`, so it can fill a slot of
/// another ensemble.
pub struct BaggingClassifier {
    pub cfg: BaggingConfig,
    pub(crate) learners: Vec<Option<Box<dyn Classifier>>>,
    pub(crate) samples: Vec<DataSet>,
    pub(crate) out_of_bag: Vec<Vec<usize>>,
    pub(crate) trained: bool,
}

impl Default for BaggingClassifier {
    fn default() -> Self {
        BaggingClassifier::from_config(BaggingConfig::default())
    }
}

impl BaggingClassifier {
    /// Create an ensemble of `n_learners` slots, filled with perceptrons
    /// unless a constructor is set.
    pub fn new(n_learners: usize) -> Self {
        BaggingClassifier::from_config(BaggingConfig {
            n_learners,
            ..Default::default()
        })
    }

    pub fn from_config(cfg: BaggingConfig) -> Self {
        let learners = (0..cfg.n_learners).map(|_| None).collect();
        BaggingClassifier {
            cfg,
            learners,
            samples: Vec::new(),
            out_of_bag: Vec::new(),
            trained: false,
        }
    }

    pub fn is_trained(&self) -> bool {
        self.trained
    }

    /// The resample each slot was trained on in the last `train` call.
    pub fn samples(&self) -> &[DataSet] {
        &self.samples
    }

    /// For each slot, the positions in the last training data of the
    /// examples its resample never drew.
    pub fn out_of_bag(&self) -> &[Vec<usize>] {
        &self.out_of_bag
    }

    /// The learner in slot `i`, if one has been built or set.
    pub fn learner(&self, i: usize) -> Option<&dyn Classifier> {
        self.learners.get(i).and_then(|l| l.as_deref())
    }

    /// The constructor in effect, `n_learners` perceptrons when none is set.
    pub fn ensemble_constructor(&self) -> EnsembleConstructor {
        self.cfg
            .constructor
            .clone()
            .unwrap_or_else(|| EnsembleConstructor::default_for(self.cfg.n_learners))
    }

    /// Fill the slots for the next round of training. Learners built from
    /// the constructor for slot `i` are seeded with `seeds[i]`.
    fn prepare_learners(&mut self, seeds: &[u64]) -> Result<Vec<Box<dyn Classifier>>, LearnerError> {
        let n = self.cfg.n_learners;
        let rebuild = self.cfg.rebuild_learners;
        self.learners.resize_with(n, || None);

        let specs = if rebuild || self.learners.iter().any(Option::is_none) {
            Some(self.ensemble_constructor().expand(n)?)
        } else {
            None
        };

        let mut learners = Vec::with_capacity(n);
        for (i, slot) in self.learners.iter_mut().enumerate() {
            let learner = match (slot.take(), &specs) {
                (Some(existing), _) if !rebuild => existing,
                (_, Some(specs)) => specs[i].build(seeds[i]),
                (existing, None) => existing.ok_or(LearnerError::UntrainedModel)?,
            };
            learners.push(learner);
        }
        Ok(learners)
    }

    /// Train every slot in parallel. Any slot failure fails the ensemble,
    /// which is then left untrained.
    pub fn fit(&mut self, data: &DataSet) -> Result<(), LearnerError> {
        let start = Instant::now();
        self.trained = false;
        if data.is_empty() {
            return Err(LearnerError::EmptyDataset);
        }
        validate_positive_int_parameter(self.cfg.n_learners, "n_learners")?;

        let num_threads = match self.cfg.num_threads {
            Some(num_threads) => num_threads,
            None => std::thread::available_parallelism().map_or(1, |n| n.get()),
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .map_err(|e| LearnerError::ThreadPool(e.to_string()))?;

        let n = self.cfg.n_learners;
        info!(
            "Training bagging ensemble of {} learners ({}) on {} examples.",
            n,
            self.ensemble_constructor(),
            data.len()
        );

        // The learner seed is drawn after the resample, from the same slot generator.
        let seed = self.cfg.seed;
        let draws: Vec<(DataSet, Vec<usize>, u64)> = pool.install(|| {
            (0..n)
                .into_par_iter()
                .map(|i| {
                    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
                    let (sample, out_of_bag) = bootstrap_resample(data, &mut rng);
                    (sample, out_of_bag, rng.gen::<u64>())
                })
                .collect()
        });
        let mut samples = Vec::with_capacity(n);
        let mut out_of_bag = Vec::with_capacity(n);
        let mut seeds = Vec::with_capacity(n);
        for (sample, oob, learner_seed) in draws {
            samples.push(sample);
            out_of_bag.push(oob);
            seeds.push(learner_seed);
        }

        let mut learners = self.prepare_learners(&seeds)?;

        let result: Result<Vec<()>, LearnerError> = pool.install(|| {
            learners
                .par_iter_mut()
                .zip(samples.par_iter())
                .map(|(learner, sample)| learner.train(sample))
                .collect()
        });

        self.learners = learners.into_iter().map(Some).collect();
        self.samples = samples;
        self.out_of_bag = out_of_bag;
        result?;
        self.trained = true;

        info!(
            "Finished training bagging ensemble in {:.3} seconds.",
            start.elapsed().as_secs_f64()
        );
        Ok(())
    }

    fn members(&self) -> Result<Vec<&dyn Classifier>, LearnerError> {
        if !self.trained {
            return Err(LearnerError::UntrainedModel);
        }
        Ok(self
            .learners
            .iter()
            .flatten()
            .map(|l| &**l as &dyn Classifier)
            .collect())
    }

    /// Majority label of the members' votes, and each member's vote.
    fn vote(&self, example: &Example) -> Result<(f64, Vec<f64>), LearnerError> {
        let votes = self
            .members()?
            .iter()
            .map(|l| l.classify(example))
            .collect::<Result<Vec<_>, _>>()?;
        let counter: LabelCounter = votes.iter().copied().collect();
        let (label, _) = counter.majority().ok_or(LearnerError::UntrainedModel)?;
        Ok((label, votes))
    }
}

impl Classifier for BaggingClassifier {
    fn train(&mut self, data: &DataSet) -> Result<(), LearnerError> {
        self.fit(data)
    }

    fn classify(&self, example: &Example) -> Result<f64, LearnerError> {
        self.vote(example).map(|(label, _)| label)
    }

    /// Mean confidence of the members voting with the majority.
    fn confidence(&self, example: &Example) -> Result<f64, LearnerError> {
        let (label, votes) = self.vote(example)?;
        let mut total = 0.0;
        let mut agreeing = 0;
        for (learner, vote) in self.members()?.into_iter().zip(votes) {
            if vote == label {
                total += learner.confidence(example)?;
                agreeing += 1;
            }
        }
        if agreeing == 0 {
            return Err(LearnerError::NoAgreeingMembers);
        }
        Ok(total / agreeing as f64)
    }
}
