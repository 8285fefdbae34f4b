// Modules
pub mod bagging;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod data;
pub mod decision_tree;
pub mod errors;
pub mod metric;
pub mod neural_network;
pub mod node;
pub mod perceptron;
pub mod sampler;
pub mod splitter;
pub mod utils;

// Individual classes, and functions
pub use bagging::BaggingClassifier;
pub use classifier::Classifier;
pub use config::ConfigIO;
pub use data::{DataSet, Example};
pub use decision_tree::DecisionTree;
pub use errors::LearnerError;
pub use neural_network::TwoLayerNN;
pub use perceptron::Perceptron;
