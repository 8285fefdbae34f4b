use crate::constants::{NEGATIVE_LABEL, POSITIVE_LABEL};
use crate::data::DataSet;
use crate::errors::LearnerError;

/// Create a string of all available items.
pub fn items_to_strings(items: Vec<&str>) -> String {
    items.join(", ")
}

// Validation
pub fn validate_positive_float_parameter(value: f64, parameter: &str) -> Result<(), LearnerError> {
    validate_float_parameter(value, 0.0, f64::INFINITY, parameter)
}

pub fn validate_float_parameter(value: f64, min: f64, max: f64, parameter: &str) -> Result<(), LearnerError> {
    if value.is_nan() || value < min || max < value {
        let ex_msg = format!("real value within range {} and {}", min, max);
        Err(LearnerError::InvalidParameter(
            parameter.to_string(),
            ex_msg,
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

pub fn validate_positive_int_parameter(value: usize, parameter: &str) -> Result<(), LearnerError> {
    if value == 0 {
        Err(LearnerError::InvalidParameter(
            parameter.to_string(),
            "integer greater than 0".to_string(),
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Is the value one of the two label sentinels.
#[inline]
pub fn is_binary_label(label: f64) -> bool {
    label == NEGATIVE_LABEL || label == POSITIVE_LABEL
}

/// Every learner in the crate is strictly two-label.
pub fn check_binary_labels(data: &DataSet) -> Result<(), LearnerError> {
    match data.examples().iter().find(|e| !is_binary_label(e.label())) {
        Some(e) => Err(LearnerError::InvalidLabel(e.label())),
        None => Ok(()),
    }
}

/// Counts of label values, kept in the order labels were first seen.
///
/// Used for the majority label of a set of examples, and for tallying
/// the votes of ensemble members. Ties in `majority` go to the larger
/// label value, so a tie between -1 and 1 yields 1.
#[derive(Debug, Default, Clone)]
pub struct LabelCounter {
    counts: Vec<(f64, usize)>,
    total: usize,
}

impl LabelCounter {
    pub fn new() -> Self {
        LabelCounter::default()
    }

    pub fn increment(&mut self, label: f64) {
        self.total += 1;
        match self.counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, c)) => *c += 1,
            None => self.counts.push((label, 1)),
        }
    }

    pub fn count(&self, label: f64) -> usize {
        self.counts.iter().find(|(l, _)| *l == label).map_or(0, |(_, c)| *c)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// The label with the highest count and that count.
    pub fn majority(&self) -> Option<(f64, usize)> {
        let mut best: Option<(f64, usize)> = None;
        for &(label, count) in &self.counts {
            best = match best {
                Some((b_label, b_count)) if count < b_count || (count == b_count && label < b_label) => {
                    Some((b_label, b_count))
                }
                _ => Some((label, count)),
            };
        }
        best
    }
}

impl FromIterator<f64> for LabelCounter {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut counter = LabelCounter::new();
        for label in iter {
            counter.increment(label);
        }
        counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Example;
    use std::collections::BTreeMap;

    #[test]
    fn test_majority_highest_count() {
        let counter: LabelCounter = vec![-1.0, 1.0, -1.0, -1.0, 1.0].into_iter().collect();
        assert_eq!(counter.majority(), Some((-1.0, 3)));
        assert_eq!(counter.count(1.0), 2);
        assert_eq!(counter.total(), 5);
    }

    #[test]
    fn test_majority_tie_prefers_larger_label() {
        let counter: LabelCounter = vec![-1.0, 1.0].into_iter().collect();
        assert_eq!(counter.majority(), Some((1.0, 1)));
        let counter: LabelCounter = vec![1.0, -1.0, -1.0, 1.0].into_iter().collect();
        assert_eq!(counter.majority(), Some((1.0, 2)));
    }

    #[test]
    fn test_majority_empty() {
        assert_eq!(LabelCounter::new().majority(), None);
    }

    #[test]
    fn test_check_binary_labels() {
        let mut data = DataSet::new(BTreeMap::from([(0, "x".to_string())]));
        data.add_example(Example::new(1.0).with_feature(0, 1.0));
        data.add_example(Example::new(-1.0).with_feature(0, 2.0));
        assert!(check_binary_labels(&data).is_ok());
        data.add_example(Example::new(0.0).with_feature(0, 3.0));
        assert!(matches!(check_binary_labels(&data), Err(LearnerError::InvalidLabel(l)) if l == 0.0));
    }

    #[test]
    fn test_validate_float_parameter() {
        assert!(validate_float_parameter(0.5, 0.0, 1.0, "fraction").is_ok());
        assert!(validate_float_parameter(1.5, 0.0, 1.0, "fraction").is_err());
        assert!(validate_float_parameter(f64::NAN, 0.0, 1.0, "fraction").is_err());
        assert!(validate_positive_float_parameter(-0.1, "eta").is_err());
        assert!(validate_positive_int_parameter(0, "n_learners").is_err());
    }

    #[test]
    fn test_items_to_strings() {
        assert_eq!(items_to_strings(vec!["p", "t", "n"]), "p, t, n");
        assert_eq!(items_to_strings(vec![]), "");
    }
}
