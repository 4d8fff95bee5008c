//! Window Selector
//!
//! Picks a contiguous run of `window_len` samples starting at an offset drawn
//! from the injected `OffsetSource`.

use crate::domain::{Sample, ScanError};
use crate::ports::OffsetSource;

/// A contiguous slice of samples handed to the detector
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    start_offset: usize,
    samples: &'a [Sample],
}

impl<'a> Window<'a> {
    pub fn start_offset(&self) -> usize {
        self.start_offset
    }

    pub fn samples(&self) -> &'a [Sample] {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Selects fixed-length windows
#[derive(Debug, Clone, Copy)]
pub struct WindowSelector {
    window_len: usize,
}

impl WindowSelector {
    pub fn new(window_len: usize) -> Self {
        Self { window_len }
    }

    pub fn window_len(&self) -> usize {
        self.window_len
    }

    /// Select one window from `samples`
    pub fn select<'a>(
        &self,
        samples: &'a [Sample],
        offsets: &mut dyn OffsetSource,
    ) -> Result<Window<'a>, ScanError> {
        let total = samples.len();
        if total < self.window_len {
            return Err(ScanError::InsufficientData {
                required: self.window_len,
                actual: total,
            });
        }

        let max = total - self.window_len;
        let offset = offsets.pick(max);
        if offset > max {
            return Err(ScanError::OffsetOutOfRange { offset, max });
        }

        tracing::debug!(
            "Selected window [{}, {}) of {} samples",
            offset,
            offset + self.window_len,
            total
        );

        Ok(Window {
            start_offset: offset,
            samples: &samples[offset..offset + self.window_len],
        })
    }
}
