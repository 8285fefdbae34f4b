//! Data
//!
//! Labeled examples and the data sets that hold them. Examples are shared
//! between a data set and any data set derived from it (resamples, splits,
//! folds), so deriving a data set never copies feature values.
use crate::constants::BIAS_FEATURE_NAME;
use crate::errors::LearnerError;
use crate::utils::{validate_float_parameter, validate_positive_int_parameter};
use hashbrown::HashMap;
use log::warn;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A labeled, sparse feature vector.
///
/// A feature index that is absent has no value for this example, it is not
/// an implicit zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    label: f64,
    features: HashMap<usize, f64>,
}

impl Example {
    /// Create an example with the given label and no features.
    pub fn new(label: f64) -> Self {
        Example {
            label,
            features: HashMap::new(),
        }
    }

    /// Builder variant of `set_feature`.
    pub fn with_feature(mut self, index: usize, value: f64) -> Self {
        self.features.insert(index, value);
        self
    }

    pub fn label(&self) -> f64 {
        self.label
    }

    pub fn set_label(&mut self, label: f64) {
        self.label = label;
    }

    pub fn set_feature(&mut self, index: usize, value: f64) {
        self.features.insert(index, value);
    }

    /// Value of a feature, `None` if it is not set for this example.
    pub fn feature(&self, index: usize) -> Option<f64> {
        self.features.get(&index).copied()
    }

    /// Value of a feature, or `default` if it is not set for this example.
    #[inline]
    pub fn feature_or(&self, index: usize, default: f64) -> f64 {
        self.features.get(&index).copied().unwrap_or(default)
    }

    pub fn has_feature(&self, index: usize) -> bool {
        self.features.contains_key(&index)
    }

    /// The indices set on this example, in ascending order.
    pub fn feature_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.features.keys().copied().collect();
        indices.sort_unstable();
        indices
    }
}

/// A collection of examples, the names of the features they carry, and
/// the distinct labels observed.
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    examples: Vec<Arc<Example>>,
    feature_map: BTreeMap<usize, String>,
    labels: Vec<f64>,
    bias_feature: Option<usize>,
}

/// A train and test pair derived from a single data set.
#[derive(Debug, Clone)]
pub struct DataSetSplit {
    pub train: DataSet,
    pub test: DataSet,
}

impl DataSet {
    /// Constructs a new empty data set (i.e. no examples) with the features
    /// specified in the feature map.
    pub fn new(feature_map: BTreeMap<usize, String>) -> Self {
        DataSet {
            examples: Vec::new(),
            feature_map,
            labels: Vec::new(),
            bias_feature: None,
        }
    }

    /// An empty data set sharing this data set's features.
    pub fn empty_like(&self) -> Self {
        DataSet {
            examples: Vec::new(),
            feature_map: self.feature_map.clone(),
            labels: Vec::new(),
            bias_feature: self.bias_feature,
        }
    }

    /// Add an example. The feature map is not changed, so the example
    /// should only carry the features the data set was created with.
    pub fn add_example(&mut self, example: Example) {
        self.add_shared(Arc::new(example));
    }

    /// Add an example that is shared with another data set.
    pub fn add_shared(&mut self, example: Arc<Example>) {
        let label = example.label();
        if !self.labels.contains(&label) {
            self.labels.push(label);
        }
        self.examples.push(example);
    }

    pub fn extend<I: IntoIterator<Item = Arc<Example>>>(&mut self, examples: I) {
        for e in examples {
            self.add_shared(e);
        }
    }

    pub fn examples(&self) -> &[Arc<Example>] {
        &self.examples
    }

    /// Mapping from feature indices to feature names.
    pub fn feature_map(&self) -> &BTreeMap<usize, String> {
        &self.feature_map
    }

    /// All feature indices of this data set, in ascending order.
    pub fn feature_indices(&self) -> Vec<usize> {
        self.feature_map.keys().copied().collect()
    }

    /// The distinct labels, in the order they were first added.
    pub fn labels(&self) -> &[f64] {
        &self.labels
    }

    pub fn bias_feature(&self) -> Option<usize> {
        self.bias_feature
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Split this data set into two data sets of size:
    /// - `floor(len * fraction)`
    /// - the remainder
    ///
    /// The examples are shuffled before splitting, this data set is unchanged.
    ///
    /// * `fraction` - The proportion allocated to the train set.
    /// * `rng` - Random source for the shuffle.
    pub fn split<R: Rng + ?Sized>(&self, fraction: f64, rng: &mut R) -> Result<DataSetSplit, LearnerError> {
        validate_float_parameter(fraction, 0.0, 1.0, "fraction")?;
        let mut shuffled = self.examples.clone();
        shuffled.shuffle(rng);
        let train_size = (self.len() as f64 * fraction).floor() as usize;
        let test_examples = shuffled.split_off(train_size);

        let mut train = self.empty_like();
        train.extend(shuffled);
        let mut test = self.empty_like();
        test.extend(test_examples);
        Ok(DataSetSplit { train, test })
    }

    /// Cross validation folds over the data in its current order.
    pub fn cross_validation(&self, folds: usize) -> Result<CrossValidationSet, LearnerError> {
        CrossValidationSet::new(self.clone(), folds)
    }

    /// Cross validation folds over a shuffled copy of the data. This data
    /// set itself is not reordered.
    pub fn random_cross_validation<R: Rng + ?Sized>(
        &self,
        folds: usize,
        rng: &mut R,
    ) -> Result<CrossValidationSet, LearnerError> {
        let mut shuffled = self.examples.clone();
        shuffled.shuffle(rng);
        let mut data = self.empty_like();
        data.extend(shuffled);
        CrossValidationSet::new(data, folds)
    }

    /// A copy of this data set with an added bias feature, set to 1.0 on
    /// every example. This data set remains unchanged. Examples classified
    /// later should be passed through `add_bias_feature` of the *new* data set.
    pub fn copy_with_bias(&self) -> DataSet {
        let bias = self.feature_map.keys().next_back().map_or(0, |max| max + 1);
        let mut feature_map = self.feature_map.clone();
        feature_map.insert(bias, BIAS_FEATURE_NAME.to_string());

        let mut biased = DataSet::new(feature_map);
        biased.bias_feature = Some(bias);
        for e in &self.examples {
            biased.add_example(with_bias(e, bias));
        }
        biased
    }

    /// Copy an example that is not part of this data set, adding the bias
    /// feature of this data set to the copy.
    pub fn add_bias_feature(&self, example: &Example) -> Result<Example, LearnerError> {
        let bias = self.bias_feature.ok_or(LearnerError::MissingBias)?;
        if example.has_feature(bias) {
            warn!("Adding bias feature {} to an example that already has it.", bias);
        }
        Ok(with_bias(example, bias))
    }
}

fn with_bias(example: &Example, bias: usize) -> Example {
    let mut biased = example.clone();
    biased.set_feature(bias, 1.0);
    biased
}

/// A data set cut into `folds` contiguous chunks. Fold `i` validates on
/// chunk `i` and trains on every other chunk.
#[derive(Debug, Clone)]
pub struct CrossValidationSet {
    data: DataSet,
    folds: usize,
}

impl CrossValidationSet {
    pub fn new(data: DataSet, folds: usize) -> Result<Self, LearnerError> {
        validate_positive_int_parameter(folds, "folds")?;
        Ok(CrossValidationSet { data, folds })
    }

    pub fn folds(&self) -> usize {
        self.folds
    }

    /// The train/validation split for fold `i`.
    pub fn fold(&self, i: usize) -> Result<DataSetSplit, LearnerError> {
        if i >= self.folds {
            return Err(LearnerError::InvalidFold(i, self.folds));
        }
        let n = self.data.len();
        let start = i * n / self.folds;
        let stop = (i + 1) * n / self.folds;

        let mut train = self.data.empty_like();
        let mut test = self.data.empty_like();
        for (j, e) in self.data.examples().iter().enumerate() {
            if (start..stop).contains(&j) {
                test.add_shared(Arc::clone(e));
            } else {
                train.add_shared(Arc::clone(e));
            }
        }
        Ok(DataSetSplit { train, test })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn line_data(n: usize) -> DataSet {
        let mut data = DataSet::new(BTreeMap::from([(0, "x".to_string()), (1, "y".to_string())]));
        for i in 0..n {
            let label = if i % 2 == 0 { -1.0 } else { 1.0 };
            data.add_example(Example::new(label).with_feature(0, i as f64).with_feature(1, 2.0 * i as f64));
        }
        data
    }

    #[test]
    fn test_example_sparse_features() {
        let e = Example::new(1.0).with_feature(3, 0.5);
        assert_eq!(e.feature(3), Some(0.5));
        assert_eq!(e.feature(0), None);
        assert_eq!(e.feature_or(0, -7.0), -7.0);
        assert_eq!(e.feature_indices(), vec![3]);
    }

    #[test]
    fn test_labels_distinct_in_order() {
        let data = line_data(5);
        assert_eq!(data.labels(), &[-1.0, 1.0]);
        assert_eq!(data.feature_indices(), vec![0, 1]);
        assert_eq!(data.len(), 5);
    }

    #[test]
    fn test_split_sizes_and_sharing() {
        let data = line_data(10);
        let mut rng = StdRng::seed_from_u64(0);
        let split = data.split(0.75, &mut rng).unwrap();
        assert_eq!(split.train.len(), 7);
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.train.feature_map(), data.feature_map());
        // Every example of the split is one of the originals.
        for e in split.train.examples().iter().chain(split.test.examples()) {
            assert!(data.examples().iter().any(|o| Arc::ptr_eq(o, e)));
        }
        assert!(data.split(1.5, &mut rng).is_err());
    }

    #[test]
    fn test_cross_validation_folds() {
        let data = line_data(10);
        let cvs = data.cross_validation(3).unwrap();
        let mut seen = 0;
        for i in 0..cvs.folds() {
            let fold = cvs.fold(i).unwrap();
            assert_eq!(fold.train.len() + fold.test.len(), 10);
            assert!(fold.test.len() == 3 || fold.test.len() == 4);
            seen += fold.test.len();
        }
        assert_eq!(seen, 10);
        // Unshuffled folds keep the original order.
        let first = cvs.fold(0).unwrap();
        assert_eq!(first.test.examples()[0].feature(0), Some(0.0));
        assert!(matches!(cvs.fold(3), Err(LearnerError::InvalidFold(3, 3))));
        assert!(data.cross_validation(0).is_err());
    }

    #[test]
    fn test_random_cross_validation_keeps_source_order() {
        let data = line_data(6);
        let mut rng = StdRng::seed_from_u64(11);
        let cvs = data.random_cross_validation(2, &mut rng).unwrap();
        assert_eq!(cvs.fold(0).unwrap().test.len(), 3);
        let order: Vec<f64> = data.examples().iter().map(|e| e.feature(0).unwrap()).collect();
        assert_eq!(order, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_copy_with_bias() {
        let data = line_data(3);
        let biased = data.copy_with_bias();
        assert_eq!(biased.bias_feature(), Some(2));
        assert_eq!(biased.feature_map().get(&2).map(String::as_str), Some("bias"));
        assert!(biased.examples().iter().all(|e| e.feature(2) == Some(1.0)));
        // The source is untouched.
        assert_eq!(data.bias_feature(), None);
        assert!(data.examples().iter().all(|e| e.feature(2).is_none()));

        let outside = Example::new(1.0).with_feature(0, 9.0);
        let added = biased.add_bias_feature(&outside).unwrap();
        assert_eq!(added.feature(2), Some(1.0));
        assert_eq!(outside.feature(2), None);
        assert!(matches!(data.add_bias_feature(&outside), Err(LearnerError::MissingBias)));
    }

    #[test]
    fn test_example_serde() {
        let e = Example::new(-1.0).with_feature(0, 2.5).with_feature(7, -1.0);
        let json = serde_json::to_string(&e).unwrap();
        let back: Example = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
        assert_eq!(back.feature_indices(), vec![0, 7]);
    }
}
