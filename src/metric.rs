use crate::classifier::Classifier;
use crate::data::DataSet;
use crate::errors::LearnerError;

/// Fraction of examples whose classification equals their label.
///
/// * `classifier` - A trained classifier.
/// * `data` - Labeled examples to evaluate on.
pub fn accuracy<C: Classifier + ?Sized>(classifier: &C, data: &DataSet) -> Result<f64, LearnerError> {
    if data.is_empty() {
        return Err(LearnerError::EmptyDataset);
    }
    let preds = classifier.classify_all(data)?;
    let correct = preds
        .iter()
        .zip(data.examples())
        .filter(|(p, e)| **p == e.label())
        .count();
    Ok(correct as f64 / data.len() as f64)
}

/// Complement of `accuracy`.
pub fn error_rate<C: Classifier + ?Sized>(classifier: &C, data: &DataSet) -> Result<f64, LearnerError> {
    accuracy(classifier, data).map(|a| 1.0 - a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Example;
    use crate::decision_tree::DecisionTree;
    use approx::assert_relative_eq;
    use std::collections::BTreeMap;

    #[test]
    fn test_accuracy() {
        let mut data = DataSet::new(BTreeMap::from([(0, "x".to_string())]));
        for (x, label) in [(1.0, -1.0), (2.0, -1.0), (3.0, 1.0), (4.0, 1.0)] {
            data.add_example(Example::new(label).with_feature(0, x));
        }
        let mut tree = DecisionTree::new().set_depth_limit(Some(0));
        tree.train(&data).unwrap();
        // A single leaf gets half of a balanced set right.
        assert_relative_eq!(accuracy(&tree, &data).unwrap(), 0.5);
        assert_relative_eq!(error_rate(&tree, &data).unwrap(), 0.5);

        let boxed: Box<dyn Classifier> = Box::new(tree);
        assert!(matches!(
            accuracy(boxed.as_ref(), &data.empty_like()),
            Err(LearnerError::EmptyDataset)
        ));
    }
}
