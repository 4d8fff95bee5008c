//! Detection Parameters
//!
//! Window length and sigma multiplier for the outlier rule.
//! Defaults are the canonical 30-sample window and 2 sigma threshold.

use serde::{Deserialize, Serialize};

/// Canonical window length
pub const DEFAULT_WINDOW_LEN: usize = 30;

/// Canonical threshold multiplier (threshold = multiplier * std_dev)
pub const DEFAULT_SIGMA_MULTIPLIER: f64 = 2.0;

/// Outlier detection configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Number of consecutive samples in a window
    pub window_len: usize,
    /// Standard deviations from the mean before a sample is flagged
    pub sigma_multiplier: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            window_len: DEFAULT_WINDOW_LEN,
            sigma_multiplier: DEFAULT_SIGMA_MULTIPLIER,
        }
    }
}

impl DetectionConfig {
    pub fn with_window_len(mut self, len: usize) -> Self {
        self.window_len = len;
        self
    }

    pub fn with_sigma_multiplier(mut self, multiplier: f64) -> Self {
        self.sigma_multiplier = multiplier;
        self
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.window_len < 2 {
            return Err(ParamsError::InvalidWindowLen(self.window_len));
        }
        if !self.sigma_multiplier.is_finite() || self.sigma_multiplier <= 0.0 {
            return Err(ParamsError::InvalidSigmaMultiplier(self.sigma_multiplier));
        }
        Ok(())
    }
}

/// Parameter validation errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParamsError {
    #[error("Invalid window length: {0} (minimum 2)")]
    InvalidWindowLen(usize),
    #[error("Invalid sigma multiplier: {0} (must be finite and > 0)")]
    InvalidSigmaMultiplier(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DetectionConfig::default();
        assert_eq!(config.window_len, 30);
        assert_eq!(config.sigma_multiplier, 2.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = DetectionConfig::default()
            .with_window_len(10)
            .with_sigma_multiplier(3.0);
        assert_eq!(config.window_len, 10);
        assert_eq!(config.sigma_multiplier, 3.0);
    }

    #[test]
    fn test_invalid_window_len() {
        let config = DetectionConfig::default().with_window_len(1);
        assert!(matches!(config.validate(), Err(ParamsError::InvalidWindowLen(1))));
    }

    #[test]
    fn test_invalid_sigma_multiplier() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = DetectionConfig::default().with_sigma_multiplier(bad);
            assert!(matches!(config.validate(), Err(ParamsError::InvalidSigmaMultiplier(_))));
        }
    }
}
