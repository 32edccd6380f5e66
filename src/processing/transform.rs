//! Per-frame transforms applied by the processor

use log::debug;
use crate::audio::{AudioBuffer, Frame};
use crate::error::Result;

/// A transform visits every frame of a buffer once, in order.
pub trait FrameTransform {
    fn name(&self) -> &str;

    /// Inspect the whole buffer before any frame is visited.
    fn prepare(&mut self, _buffer: &AudioBuffer) -> Result<()> {
        Ok(())
    }

    fn apply(&mut self, index: usize, frame: &mut Frame);
}

/// Run `transform` over `buffer`, writing every frame back.
///
/// Frames are clipped before they are re-encoded so that a hot transform
/// saturates instead of wrapping around.
pub fn apply_transform(buffer: &mut AudioBuffer, transform: &mut dyn FrameTransform) -> Result<()> {
    transform.prepare(buffer)?;
    buffer.map_frames(|index, frame| {
        transform.apply(index, frame);
        frame.clip();
    })?;
    debug!("Applied {} to {} frames", transform.name(), buffer.frame_count());
    Ok(())
}

#[derive(Debug, Clone, Copy)]
pub struct Gain {
    factor: f64,
}

impl Gain {
    pub fn new(factor: f64) -> Self {
        Self { factor }
    }
}

impl FrameTransform for Gain {
    fn name(&self) -> &str {
        "gain"
    }

    fn apply(&mut self, _index: usize, frame: &mut Frame) {
        frame.scale(self.factor);
    }
}

/// Scale the buffer so its peak reaches `target`.
///
/// The peak is `Frame::peak`, the largest positive sample, so a signal whose
/// loudest excursions are negative can still clip after normalization.
#[derive(Debug, Clone, Copy)]
pub struct Normalize {
    target: f64,
    factor: f64,
}

impl Normalize {
    pub fn new(target: f64) -> Self {
        Self { target, factor: 1.0 }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }
}

impl FrameTransform for Normalize {
    fn name(&self) -> &str {
        "normalize"
    }

    fn prepare(&mut self, buffer: &AudioBuffer) -> Result<()> {
        let peak = buffer.peak()?;
        // Silent or all-negative input: leave it alone.
        self.factor = if peak > 0.0 { self.target / peak } else { 1.0 };
        debug!("Normalize: peak {:.6}, factor {:.6}", peak, self.factor);
        Ok(())
    }

    fn apply(&mut self, _index: usize, frame: &mut Frame) {
        frame.scale(self.factor);
    }
}
