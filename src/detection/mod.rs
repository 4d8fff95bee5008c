//! Detection Layer - Window selection and outlier classification
//!
//! - `WindowSelector`: fixed-length contiguous window at an injected offset
//! - `OutlierDetector`: mean / population std-dev threshold rule
//! - `DetectionConfig`: window length and sigma multiplier

pub mod outlier_detector;
pub mod params;
pub mod window;

pub use outlier_detector::{Detection, OutlierDetector, WindowStats};
pub use params::{DetectionConfig, ParamsError, DEFAULT_SIGMA_MULTIPLIER, DEFAULT_WINDOW_LEN};
pub use window::{Window, WindowSelector};
