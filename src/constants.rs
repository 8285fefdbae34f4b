pub const NEGATIVE_LABEL: f64 = -1.0;
pub const POSITIVE_LABEL: f64 = 1.0;
pub const DEFAULT_ENSEMBLE_SIZE: usize = 3;
pub const PERCEPTRON_ITERATIONS: usize = 10;
pub const NN_HIDDEN_NODES: usize = 3;
pub const NN_ITERATIONS: usize = 200;
pub const NN_ETA: f64 = 0.1;
pub const NN_INIT_WEIGHT: f64 = 0.1;
pub const DISCRETE_THRESHOLD: f64 = 0.0;
pub const BIAS_FEATURE_NAME: &str = "bias";
