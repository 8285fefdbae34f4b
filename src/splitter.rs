//! Splitter
//!
//! Split search for the decision tree. A split is scored by the training
//! accuracy obtained when each side predicts its own majority label.
use crate::constants::{DISCRETE_THRESHOLD, NEGATIVE_LABEL};
use crate::data::Example;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// How candidate thresholds are chosen.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug, Default)]
pub enum SplitStrategy {
    /// Real valued features, every distinct value is a candidate threshold.
    #[default]
    Continuous,
    /// Binary indicator features, split `<= 0` against `> 0`.
    Discrete,
}

/// The outcome of scoring one feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitInfo {
    pub split_feature: usize,
    pub split_value: f64,
    /// Examples predicted correctly by the two majority labels.
    pub correct: usize,
    pub total: usize,
}

impl SplitInfo {
    pub fn accuracy(&self) -> f64 {
        self.correct as f64 / self.total as f64
    }

    pub fn error(&self) -> f64 {
        1.0 - self.accuracy()
    }
}

/// Negative and positive label counts on one side of a split.
#[derive(Debug, Default, Clone, Copy)]
struct SideCounts {
    neg: usize,
    pos: usize,
}

impl SideCounts {
    #[inline]
    fn add(&mut self, label: f64) {
        if label == NEGATIVE_LABEL {
            self.neg += 1;
        } else {
            self.pos += 1;
        }
    }

    #[inline]
    fn remove(&mut self, label: f64) {
        if label == NEGATIVE_LABEL {
            self.neg -= 1;
        } else {
            self.pos -= 1;
        }
    }

    #[inline]
    fn majority_count(&self) -> usize {
        self.neg.max(self.pos)
    }
}

pub trait Splitter {
    /// Score a single feature over the examples selected by `index`,
    /// returning the best threshold found for it. `index` may be reordered.
    fn split_feature(
        &self,
        examples: &[Arc<Example>],
        index: &mut [usize],
        feature: usize,
        missing: f64,
    ) -> Option<SplitInfo>;

    /// Find the best unused feature to split on. A feature replaces the
    /// current best only with strictly more correct examples, so features
    /// visited earlier (lower indices, when `features` is ascending) win ties.
    fn best_split(
        &self,
        examples: &[Arc<Example>],
        index: &mut [usize],
        features: &[usize],
        used: &HashSet<usize>,
        missing: f64,
    ) -> Option<SplitInfo> {
        let mut best: Option<SplitInfo> = None;
        for &feature in features.iter().filter(|f| !used.contains(*f)) {
            if let Some(info) = self.split_feature(examples, index, feature, missing) {
                match best {
                    Some(b) if info.correct <= b.correct => (),
                    _ => best = Some(info),
                }
            }
        }
        best
    }
}

/// Sorted sweep over real valued features.
///
/// The examples are sorted by feature value and moved one at a time from
/// the right side to the left side, keeping running label counts. A
/// threshold is scored only after the last example holding a given value
/// has moved, so the counted partition is exactly `<= value` / `> value`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContinuousSplitter;

impl Splitter for ContinuousSplitter {
    fn split_feature(
        &self,
        examples: &[Arc<Example>],
        index: &mut [usize],
        feature: usize,
        missing: f64,
    ) -> Option<SplitInfo> {
        let value = |i: usize| examples[i].feature_or(feature, missing);
        index.sort_by(|a, b| value(*a).total_cmp(&value(*b)));

        let mut left = SideCounts::default();
        let mut right = SideCounts::default();
        for &i in index.iter() {
            right.add(examples[i].label());
        }

        let mut best: Option<SplitInfo> = None;
        for (pos, &i) in index.iter().enumerate() {
            let label = examples[i].label();
            left.add(label);
            right.remove(label);

            let v = value(i);
            let at_boundary = match index.get(pos + 1) {
                Some(&next) => value(next) != v,
                None => true,
            };
            if !at_boundary {
                continue;
            }

            let correct = left.majority_count() + right.majority_count();
            match best {
                Some(b) if correct <= b.correct => (),
                _ => {
                    best = Some(SplitInfo {
                        split_feature: feature,
                        split_value: v,
                        correct,
                        total: index.len(),
                    })
                }
            }
        }
        best
    }
}

/// Fixed threshold split for binary indicator features.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscreteSplitter;

impl Splitter for DiscreteSplitter {
    fn split_feature(
        &self,
        examples: &[Arc<Example>],
        index: &mut [usize],
        feature: usize,
        missing: f64,
    ) -> Option<SplitInfo> {
        if index.is_empty() {
            return None;
        }
        let mut left = SideCounts::default();
        let mut right = SideCounts::default();
        for &i in index.iter() {
            let e = &examples[i];
            if e.feature_or(feature, missing) <= DISCRETE_THRESHOLD {
                left.add(e.label());
            } else {
                right.add(e.label());
            }
        }
        Some(SplitInfo {
            split_feature: feature,
            split_value: DISCRETE_THRESHOLD,
            correct: left.majority_count() + right.majority_count(),
            total: index.len(),
        })
    }
}
