//! Outlier Detector
//!
//! Flags samples whose distance from the window mean exceeds a multiple of the
//! population standard deviation.
//!
//! threshold = sigma_multiplier * sqrt(sum((x - mean)^2) / N)
//!
//! A sample is an outlier iff |x - mean| > threshold. Equality is not flagged.

use crate::detection::params::DetectionConfig;
use crate::detection::window::Window;
use crate::domain::{OutlierRecord, Price, Sample, ScanError};

/// Distribution statistics for one window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    /// Arithmetic mean of the window prices
    pub mean: f64,
    /// Population standard deviation (divisor N)
    pub std_dev: f64,
    /// Outlier cutoff, `sigma_multiplier * std_dev`
    pub threshold: f64,
}

impl WindowStats {
    /// Compute statistics over finite prices
    pub fn from_prices(prices: &[f64], sigma_multiplier: f64) -> Self {
        let mean = mean(prices);
        let std_dev = population_std(prices, mean);
        Self {
            mean,
            std_dev,
            threshold: sigma_multiplier * std_dev,
        }
    }

    /// Absolute distance of `price` from the mean
    pub fn distance(&self, price: f64) -> f64 {
        (price - self.mean).abs()
    }

    /// Strict threshold comparison
    pub fn is_outlier(&self, price: f64) -> bool {
        self.distance(price) > self.threshold
    }
}

fn mean(prices: &[f64]) -> f64 {
    let sum: f64 = prices.iter().sum();
    sum / prices.len() as f64
}

fn population_std(prices: &[f64], mean: f64) -> f64 {
    let variance: f64 = prices
        .iter()
        .map(|&price| {
            let diff = price - mean;
            diff * diff
        })
        .sum::<f64>()
        / prices.len() as f64;

    variance.sqrt()
}

/// Result of running the detector over one window
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub stats: WindowStats,
    /// Flagged samples, in window order
    pub outliers: Vec<OutlierRecord>,
}

/// Stateless outlier detector
#[derive(Debug, Clone, Copy)]
pub struct OutlierDetector {
    config: DetectionConfig,
}

impl OutlierDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Run detection over a selected window
    pub fn detect(&self, window: &Window<'_>) -> Result<Detection, ScanError> {
        self.detect_samples(window.samples())
    }

    /// Run detection over any slice of samples.
    ///
    /// Fails on the first invalid price; nothing is skipped.
    pub fn detect_samples(&self, samples: &[Sample]) -> Result<Detection, ScanError> {
        let prices = valid_prices(samples)?;
        let stats = WindowStats::from_prices(&prices, self.config.sigma_multiplier);

        tracing::debug!(
            "Window stats: mean={:.4} std_dev={:.4} threshold={:.4}",
            stats.mean,
            stats.std_dev,
            stats.threshold
        );

        let outliers = samples
            .iter()
            .zip(&prices)
            .filter(|(_, price)| stats.is_outlier(**price))
            .map(|(sample, &price)| {
                OutlierRecord::from_stats(
                    sample.instrument_id(),
                    sample.timestamp(),
                    price,
                    stats.mean,
                    stats.threshold,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Detection { stats, outliers })
    }
}

impl Default for OutlierDetector {
    fn default() -> Self {
        Self::new(DetectionConfig::default())
    }
}

fn valid_prices(samples: &[Sample]) -> Result<Vec<f64>, ScanError> {
    samples
        .iter()
        .map(|sample| match sample.price() {
            Price::Valid(v) => Ok(*v),
            Price::Invalid(raw) => Err(ScanError::InvalidPriceData {
                instrument_id: sample.instrument_id().to_string(),
                timestamp: sample.timestamp().to_string(),
                raw: raw.clone(),
            }),
        })
        .collect()
}
