//! Detector configuration.

use std::path::PathBuf;

use crate::error::{DetectError, DetectResult};

/// Default minimum confidence for a detection to be reported.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Model files and reporting threshold for a detector backend.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectorParams {
    /// Network definition file.
    pub config_file:      PathBuf,
    /// Trained weights file.
    pub weights_file:     PathBuf,
    /// Detections scoring below this are dropped.  Default: 0.5.
    pub detect_threshold: f64,
}

impl DetectorParams {
    pub fn validate(&self) -> DetectResult<()> {
        if !(0.0..=1.0).contains(&self.detect_threshold) {
            return Err(DetectError::Config(format!(
                "detect_threshold {} outside [0, 1]",
                self.detect_threshold
            )));
        }
        if self.config_file.as_os_str().is_empty() || self.weights_file.as_os_str().is_empty() {
            return Err(DetectError::Config("model config and weights paths are required".into()));
        }
        Ok(())
    }
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            config_file:      PathBuf::new(),
            weights_file:     PathBuf::new(),
            detect_threshold: DEFAULT_THRESHOLD,
        }
    }
}
