//! Ensemble constructor
//!
//! Describes which learners fill the slots of a bagging ensemble. The
//! textual form is a whitespace separated list of
//! `[repeat]<code>[hyperparameter]` tokens, e.g. `3p3 2t5` for three
//! perceptrons running 3 iterations followed by two trees of depth 5.
use crate::classifier::Classifier;
use crate::decision_tree::DecisionTree;
use crate::errors::LearnerError;
use crate::neural_network::TwoLayerNN;
use crate::perceptron::Perceptron;
use crate::utils::items_to_strings;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Base learner types an ensemble can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearnerKind {
    /// `p`, hyperparameter is the number of iterations.
    Perceptron,
    /// `t`, hyperparameter is the depth limit.
    DecisionTree,
    /// `n`, hyperparameter is the number of hidden nodes.
    TwoLayerNN,
}

impl LearnerKind {
    pub fn code(&self) -> char {
        match self {
            LearnerKind::Perceptron => 'p',
            LearnerKind::DecisionTree => 't',
            LearnerKind::TwoLayerNN => 'n',
        }
    }

    pub fn from_code(code: char) -> Result<Self, LearnerError> {
        match code {
            'p' => Ok(LearnerKind::Perceptron),
            't' => Ok(LearnerKind::DecisionTree),
            'n' => Ok(LearnerKind::TwoLayerNN),
            _ => Err(LearnerError::Configuration(format!(
                "unknown learner type code '{}', expected one of {}",
                code,
                items_to_strings(vec!["p", "t", "n"])
            ))),
        }
    }
}

/// A single learner to place in an ensemble slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearnerSpec {
    pub kind: LearnerKind,
    pub hyperparameter: Option<usize>,
}

impl LearnerSpec {
    /// Create an untrained learner. `seed` drives any randomness the learner
    /// uses while training.
    pub fn build(&self, seed: u64) -> Box<dyn Classifier> {
        match self.kind {
            LearnerKind::Perceptron => {
                let p = Perceptron::new().set_seed(seed);
                match self.hyperparameter {
                    Some(iterations) => Box::new(p.set_iterations(iterations)),
                    None => Box::new(p),
                }
            }
            LearnerKind::DecisionTree => Box::new(DecisionTree::new().set_depth_limit(self.hyperparameter)),
            LearnerKind::TwoLayerNN => {
                let nn = match self.hyperparameter {
                    Some(hidden_nodes) => TwoLayerNN::new(hidden_nodes),
                    None => TwoLayerNN::default(),
                };
                Box::new(nn.set_seed(seed))
            }
        }
    }
}

/// `repeat` copies of the same learner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearnerGroup {
    pub repeat: usize,
    pub spec: LearnerSpec,
}

impl FromStr for LearnerGroup {
    type Err = LearnerError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let malformed = || {
            LearnerError::Configuration(format!(
                "malformed token '{}', expected [repeat]<code>[hyperparameter]",
                token
            ))
        };
        let code_pos = token.find(|c: char| !c.is_ascii_digit()).ok_or_else(malformed)?;
        let (repeat, rest) = token.split_at(code_pos);
        let mut chars = rest.chars();
        let code = chars.next().ok_or_else(malformed)?;
        let hyper = chars.as_str();

        let repeat = if repeat.is_empty() {
            1
        } else {
            repeat.parse::<usize>().map_err(|_| malformed())?
        };
        if repeat == 0 {
            return Err(LearnerError::Configuration(format!(
                "token '{}' repeats its learner zero times",
                token
            )));
        }
        let hyperparameter = if hyper.is_empty() {
            None
        } else {
            Some(hyper.parse::<usize>().map_err(|_| malformed())?)
        };

        Ok(LearnerGroup {
            repeat,
            spec: LearnerSpec {
                kind: LearnerKind::from_code(code)?,
                hyperparameter,
            },
        })
    }
}

impl Display for LearnerGroup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.repeat, self.spec.kind.code())?;
        if let Some(h) = self.spec.hyperparameter {
            write!(f, "{}", h)?;
        }
        Ok(())
    }
}

/// Ordered list of learner groups. Serialized in its textual form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EnsembleConstructor(Vec<LearnerGroup>);

impl EnsembleConstructor {
    pub fn new(groups: Vec<LearnerGroup>) -> Self {
        EnsembleConstructor(groups)
    }

    /// `n` default perceptrons.
    pub fn default_for(n: usize) -> Self {
        EnsembleConstructor(vec![LearnerGroup {
            repeat: n,
            spec: LearnerSpec {
                kind: LearnerKind::Perceptron,
                hyperparameter: None,
            },
        }])
    }

    pub fn groups(&self) -> &[LearnerGroup] {
        &self.0
    }

    /// Total number of learners described.
    pub fn len(&self) -> usize {
        self.0.iter().map(|g| g.repeat).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Expand the groups into exactly `n` learner descriptions, consuming
    /// groups in order. Fails when fewer than `n` learners are described.
    pub fn expand(&self, n: usize) -> Result<Vec<LearnerSpec>, LearnerError> {
        let available = self.len();
        if available < n {
            return Err(LearnerError::Configuration(format!(
                "constructor '{}' describes {} learners, but the ensemble has {} slots",
                self, available, n
            )));
        }
        if available > n {
            warn!(
                "Constructor '{}' describes {} learners, only the first {} are used.",
                self, available, n
            );
        }
        Ok(self
            .0
            .iter()
            .flat_map(|g| std::iter::repeat(g.spec).take(g.repeat))
            .take(n)
            .collect())
    }
}

impl FromStr for EnsembleConstructor {
    type Err = LearnerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let groups = s
            .split_whitespace()
            .map(LearnerGroup::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EnsembleConstructor(groups))
    }
}

impl TryFrom<String> for EnsembleConstructor {
    type Error = LearnerError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<EnsembleConstructor> for String {
    fn from(c: EnsembleConstructor) -> Self {
        c.to_string()
    }
}

impl Display for EnsembleConstructor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tokens: Vec<String> = self.0.iter().map(|g| g.to_string()).collect();
        write!(f, "{}", tokens.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_constructor() {
        let c: EnsembleConstructor = "3p3 2t5 n".parse().unwrap();
        assert_eq!(c.groups().len(), 3);
        assert_eq!(c.len(), 6);
        assert_eq!(
            c.groups()[1],
            LearnerGroup {
                repeat: 2,
                spec: LearnerSpec {
                    kind: LearnerKind::DecisionTree,
                    hyperparameter: Some(5)
                }
            }
        );
        assert_eq!(c.groups()[2].repeat, 1);
        assert_eq!(c.groups()[2].spec.hyperparameter, None);
        assert_eq!(c.to_string(), "3p3 2t5 1n");
        assert_eq!(c.to_string().parse::<EnsembleConstructor>().unwrap(), c);
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["3x1", "0t2", "3", "2t5a", "t-1"] {
            assert!(
                matches!(bad.parse::<EnsembleConstructor>(), Err(LearnerError::Configuration(_))),
                "{} should not parse",
                bad
            );
        }
        assert!("".parse::<EnsembleConstructor>().unwrap().is_empty());
        match "2q".parse::<EnsembleConstructor>() {
            Err(LearnerError::Configuration(msg)) => assert!(msg.ends_with("expected one of p, t, n")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_expand() {
        let c: EnsembleConstructor = "2p 1t3".parse().unwrap();
        let specs = c.expand(3).unwrap();
        assert_eq!(specs.len(), 3);
        assert_eq!(specs[0].kind, LearnerKind::Perceptron);
        assert_eq!(specs[2].kind, LearnerKind::DecisionTree);
        assert_eq!(specs[2].hyperparameter, Some(3));

        // Extra learners are dropped in order.
        let specs = c.expand(2).unwrap();
        assert!(specs.iter().all(|s| s.kind == LearnerKind::Perceptron));

        assert!(matches!(c.expand(4), Err(LearnerError::Configuration(_))));
        assert_eq!(EnsembleConstructor::default_for(4).expand(4).unwrap().len(), 4);
    }

    #[test]
    fn test_constructor_serde() {
        let c: EnsembleConstructor = "2t1 n4".parse().unwrap();
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"2t1 1n4\"");
        let back: EnsembleConstructor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
        assert!(serde_json::from_str::<EnsembleConstructor>("\"2q\"").is_err());
    }
}
