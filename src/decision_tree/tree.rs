use crate::config::ConfigIO;
use crate::constants::POSITIVE_LABEL;
use crate::data::{DataSet, Example};
use crate::errors::LearnerError;
use crate::node::Node;
use crate::splitter::{ContinuousSplitter, DiscreteSplitter, SplitStrategy, Splitter};
use crate::utils::{check_binary_labels, LabelCounter};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt::{self, Display};
use std::sync::Arc;

fn default_missing() -> f64 {
    0.0
}

/// Hyperparameters of a decision tree.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum number of splits from the root to any leaf, `None` for unbounded.
    #[serde(default)]
    pub depth_limit: Option<usize>,
    /// Threshold search used for each feature.
    #[serde(default)]
    pub split_strategy: SplitStrategy,
    /// Value read for a feature that is not set on an example.
    #[serde(default = "default_missing")]
    pub missing: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            depth_limit: None,
            split_strategy: SplitStrategy::Continuous,
            missing: default_missing(),
        }
    }
}

impl ConfigIO for TreeConfig {}

/// Binary decision tree over real valued features.
///
/// Each internal node tests `feature <= threshold`, sending the example
/// left when it holds and right otherwise. A feature is used at most once
/// on any root to leaf path.
#[derive(Clone, Debug, Default)]
pub struct DecisionTree {
    pub cfg: TreeConfig,
    pub(crate) nodes: Vec<Node>,
    feature_map: BTreeMap<usize, String>,
    depth: usize,
    n_leaves: usize,
}

/// A node waiting to be grown from the examples in `index`.
struct GrowTask {
    slot: usize,
    index: Vec<usize>,
    used: HashSet<usize>,
    depth: usize,
}

impl DecisionTree {
    pub fn new() -> Self {
        DecisionTree::default()
    }

    pub fn from_config(cfg: TreeConfig) -> Self {
        DecisionTree {
            cfg,
            ..Default::default()
        }
    }

    /// Set the maximum depth of the tree to be learned.
    /// * `depth_limit` - `None` grows until the leaves are pure or features run out.
    pub fn set_depth_limit(mut self, depth_limit: Option<usize>) -> Self {
        self.cfg.depth_limit = depth_limit;
        self
    }

    /// Set the split strategy of the tree.
    pub fn set_split_strategy(mut self, split_strategy: SplitStrategy) -> Self {
        self.cfg.split_strategy = split_strategy;
        self
    }

    /// Choose between continuous (`true`) and binary indicator (`false`) features.
    pub fn set_real_data(self, is_real_data: bool) -> Self {
        if is_real_data {
            self.set_split_strategy(SplitStrategy::Continuous)
        } else {
            self.set_split_strategy(SplitStrategy::Discrete)
        }
    }

    /// Set the value used for a feature that is absent from an example.
    pub fn set_missing(mut self, missing: f64) -> Self {
        self.cfg.missing = missing;
        self
    }

    pub fn is_trained(&self) -> bool {
        !self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.n_leaves
    }

    /// Number of splits on the longest root to leaf path.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Build the tree from a non-empty data set, replacing any previous tree.
    pub fn fit(&mut self, data: &DataSet) -> Result<(), LearnerError> {
        if data.is_empty() {
            return Err(LearnerError::EmptyDataset);
        }
        check_binary_labels(data)?;

        self.feature_map = data.feature_map().clone();
        let features = data.feature_indices();
        match self.cfg.split_strategy {
            SplitStrategy::Continuous => self.grow(data.examples(), &features, &ContinuousSplitter),
            SplitStrategy::Discrete => self.grow(data.examples(), &features, &DiscreteSplitter),
        }

        debug!(
            "Grew decision tree with {} nodes, {} leaves and depth {}.",
            self.nodes.len(),
            self.n_leaves,
            self.depth
        );
        Ok(())
    }

    /// Grow the tree top down with an explicit work stack. The right task is
    /// pushed before the left one, so left subtrees are always grown first.
    ///
    /// When a node is split, both child slots are filled with a leaf carrying
    /// the parent's majority label. That leaf stays in place for a side that
    /// receives no examples, and is overwritten when the side is grown.
    fn grow<T: Splitter>(&mut self, examples: &[Arc<Example>], features: &[usize], splitter: &T) {
        self.nodes.clear();
        self.nodes.push(Node::leaf(POSITIVE_LABEL, 0.0, 0));

        let mut stack = vec![GrowTask {
            slot: 0,
            index: (0..examples.len()).collect(),
            used: HashSet::new(),
            depth: 0,
        }];

        while let Some(mut task) = stack.pop() {
            let (label, count) = majority_label(examples, &task.index);
            let confidence = count as f64 / task.index.len() as f64;
            self.nodes[task.slot] = Node::leaf(label, confidence, task.depth);

            let pure = count == task.index.len();
            let out_of_features = features.iter().all(|f| task.used.contains(f));
            let at_depth_limit = self.cfg.depth_limit.is_some_and(|limit| task.depth >= limit);
            if pure || out_of_features || at_depth_limit {
                continue;
            }

            let split = match splitter.best_split(examples, &mut task.index, features, &task.used, self.cfg.missing) {
                Some(split) => split,
                None => continue,
            };

            let missing = self.cfg.missing;
            let (left, right): (Vec<usize>, Vec<usize>) = task
                .index
                .iter()
                .partition(|&&i| examples[i].feature_or(split.split_feature, missing) <= split.split_value);

            let left_child = self.nodes.len();
            let right_child = left_child + 1;
            self.nodes.push(Node::leaf(label, confidence, task.depth + 1));
            self.nodes.push(Node::leaf(label, confidence, task.depth + 1));
            self.nodes[task.slot] = Node::Internal {
                split_feature: split.split_feature,
                split_value: split.split_value,
                left_child,
                right_child,
                depth: task.depth,
            };

            let mut used = task.used;
            used.insert(split.split_feature);
            for (slot, index) in [(right_child, right), (left_child, left)] {
                if !index.is_empty() {
                    stack.push(GrowTask {
                        slot,
                        index,
                        used: used.clone(),
                        depth: task.depth + 1,
                    });
                }
            }
        }

        self.n_leaves = self.nodes.iter().filter(|n| n.is_leaf()).count();
        self.depth = self.nodes.iter().map(Node::depth).max().unwrap_or(0);
    }
}

/// The majority label over `index` and how many times it occurs.
fn majority_label(examples: &[Arc<Example>], index: &[usize]) -> (f64, usize) {
    let counter: LabelCounter = index.iter().map(|&i| examples[i].label()).collect();
    counter.majority().unwrap_or((POSITIVE_LABEL, 0))
}

impl Display for DecisionTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut print_buffer: Vec<usize> = if self.nodes.is_empty() { Vec::new() } else { vec![0] };
        let mut r = String::new();
        while let Some(idx) = print_buffer.pop() {
            let node = &self.nodes[idx];
            let indent = "  ".repeat(node.depth());
            match node {
                Node::Leaf {
                    prediction, confidence, ..
                } => {
                    r += format!("{}predict: {} (confidence: {:.4})\n", indent, prediction, confidence).as_str();
                }
                Node::Internal {
                    split_feature,
                    split_value,
                    left_child,
                    right_child,
                    ..
                } => {
                    let name = self
                        .feature_map
                        .get(split_feature)
                        .cloned()
                        .unwrap_or_else(|| split_feature.to_string());
                    r += format!("{}{} <= {}\n", indent, name, split_value).as_str();
                    print_buffer.push(*right_child);
                    print_buffer.push(*left_child);
                }
            }
        }
        write!(f, "{}", r)
    }
}
