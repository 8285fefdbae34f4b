use super::tree::DecisionTree;
use crate::classifier::Classifier;
use crate::data::{DataSet, Example};
use crate::errors::LearnerError;
use crate::node::Node;

impl DecisionTree {
    /// Figure out which leaf this example falls into.
    pub fn find_leaf(&self, example: &Example) -> Result<&Node, LearnerError> {
        let mut node_idx = 0;
        loop {
            let node = self.nodes.get(node_idx).ok_or(LearnerError::UntrainedModel)?;
            match node {
                Node::Leaf { .. } => return Ok(node),
                Node::Internal { split_feature, .. } => {
                    let v = example.feature_or(*split_feature, self.cfg.missing);
                    node_idx = node.get_child_idx(v).ok_or(LearnerError::UntrainedModel)?;
                }
            }
        }
    }

    /// Prediction and confidence of the leaf an example falls into.
    pub fn predict_row(&self, example: &Example) -> Result<(f64, f64), LearnerError> {
        match self.find_leaf(example)? {
            Node::Leaf {
                prediction, confidence, ..
            } => Ok((*prediction, *confidence)),
            Node::Internal { .. } => Err(LearnerError::UntrainedModel),
        }
    }
}

impl Classifier for DecisionTree {
    fn train(&mut self, data: &DataSet) -> Result<(), LearnerError> {
        self.fit(data)
    }

    fn classify(&self, example: &Example) -> Result<f64, LearnerError> {
        self.predict_row(example).map(|(prediction, _)| prediction)
    }

    fn confidence(&self, example: &Example) -> Result<f64, LearnerError> {
        self.predict_row(example).map(|(_, confidence)| confidence)
    }
}
