// public modules
pub mod config;
pub mod constructor;
pub mod core;

// private modules
mod setters;

pub use self::core::BaggingClassifier;
