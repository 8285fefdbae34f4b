/// A node of a binary decision tree, stored in the tree's node arena.
/// Children are referenced by their position in the arena, and are owned
/// by exactly one parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Node {
    Leaf {
        prediction: f64,
        confidence: f64,
        depth: usize,
    },
    Internal {
        split_feature: usize,
        split_value: f64,
        left_child: usize,
        right_child: usize,
        depth: usize,
    },
}

impl Node {
    pub fn leaf(prediction: f64, confidence: f64, depth: usize) -> Self {
        Node::Leaf {
            prediction,
            confidence,
            depth,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf { depth, .. } | Node::Internal { depth, .. } => *depth,
        }
    }

    /// Get the path that should be traveled down, given a value.
    /// Leaves have no children.
    pub fn get_child_idx(&self, v: f64) -> Option<usize> {
        match self {
            Node::Leaf { .. } => None,
            Node::Internal {
                split_value,
                left_child,
                right_child,
                ..
            } => {
                if v <= *split_value {
                    Some(*left_child)
                } else {
                    Some(*right_child)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_idx_threshold_goes_left() {
        let node = Node::Internal {
            split_feature: 0,
            split_value: 2.0,
            left_child: 1,
            right_child: 2,
            depth: 0,
        };
        assert_eq!(node.get_child_idx(2.0), Some(1));
        assert_eq!(node.get_child_idx(1.5), Some(1));
        assert_eq!(node.get_child_idx(2.5), Some(2));
        assert!(!node.is_leaf());
        assert_eq!(Node::leaf(1.0, 1.0, 3).get_child_idx(0.0), None);
        assert_eq!(Node::leaf(1.0, 1.0, 3).depth(), 3);
    }
}
