//! Window offset port
//!
//! The only source of randomness in the pipeline. Tests inject a fixed offset.

/// Produces the start offset of a detection window
pub trait OffsetSource: Send {
    /// Return an offset in `0..=max_offset`
    fn pick(&mut self, max_offset: usize) -> usize;
}

