//! Configuration IO
//!
//! JSON persistence for learner configurations. Only hyperparameters are
//! written, trained models are not.
use crate::errors::LearnerError;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::Path;

pub trait ConfigIO: Serialize + DeserializeOwned + Sized {
    /// Save a configuration as a json object to a file.
    ///
    /// * `path` - Path to save the configuration.
    fn save_config<P: AsRef<Path>>(&self, path: P) -> Result<(), LearnerError> {
        fs::write(path, self.json_dump()?).map_err(|e| LearnerError::UnableToWrite(e.to_string()))
    }

    /// Dump a configuration as a json object
    fn json_dump(&self) -> Result<String, LearnerError> {
        serde_json::to_string(self).map_err(|e| LearnerError::UnableToWrite(e.to_string()))
    }

    /// Load a configuration from Json string
    ///
    /// * `json_str` - String object, which can be serialized to json.
    fn from_json(json_str: &str) -> Result<Self, LearnerError> {
        serde_json::from_str::<Self>(json_str).map_err(|e| LearnerError::UnableToRead(e.to_string()))
    }

    /// Load a configuration from a path to a json object.
    ///
    /// * `path` - Path to load the configuration from.
    fn load_config<P: AsRef<Path>>(path: P) -> Result<Self, LearnerError> {
        let json_str = fs::read_to_string(path).map_err(|e| LearnerError::UnableToRead(e.to_string()))?;
        Self::from_json(&json_str)
    }
}
