//! Frame: one time slice of normalized samples, one per channel

use crate::error::{PcmError, Result};

/// Largest sample that encodes without wrapping at every width.
pub const MAX_SAMPLE: f64 = 1.0 - f64::EPSILON;

/// Normalized samples of a single frame.
///
/// A frame is a plain value: it keeps no link to the buffer it was read
/// from, so changes only land in a buffer through `AudioBuffer::set_frame`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    samples: Vec<f64>,
}

impl Frame {
    pub fn new(samples: Vec<f64>) -> Self {
        Self { samples }
    }

    pub fn silent(channels: usize) -> Self {
        Self { samples: vec![0.0; channels] }
    }

    pub fn channel_count(&self) -> usize {
        self.samples.len()
    }

    pub fn sample(&self, channel: usize) -> Result<f64> {
        self.samples
            .get(channel)
            .copied()
            .ok_or_else(|| PcmError::out_of_bounds(channel, self.samples.len()))
    }

    pub fn set_sample(&mut self, channel: usize, value: f64) -> Result<()> {
        let len = self.samples.len();
        let slot = self
            .samples
            .get_mut(channel)
            .ok_or_else(|| PcmError::out_of_bounds(channel, len))?;
        *slot = value;
        Ok(())
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [f64] {
        &mut self.samples
    }

    /// Add `other` channel by channel. Only the channels both frames have
    /// are mixed; the rest of `self` is left as is.
    pub fn sum_with(&mut self, other: &Frame) {
        for (dst, src) in self.samples.iter_mut().zip(&other.samples) {
            *dst += src;
        }
    }

    pub fn scale(&mut self, factor: f64) {
        for sample in &mut self.samples {
            *sample *= factor;
        }
    }

    /// Limit every sample to [-1.0, MAX_SAMPLE].
    pub fn clip(&mut self) {
        for sample in &mut self.samples {
            *sample = sample.clamp(-1.0, MAX_SAMPLE);
        }
    }

    /// Largest sample value, starting from 0.0.
    ///
    /// This is the signed maximum, not the maximum magnitude: a frame whose
    /// samples are all negative reports 0.0.
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0, |max, &s| f64::max(max, s))
    }
}

impl From<Vec<f64>> for Frame {
    fn from(samples: Vec<f64>) -> Self {
        Self::new(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_partial_mix() {
        let mut frame = Frame::new(vec![0.1, 0.2, 0.3]);
        frame.sum_with(&Frame::new(vec![0.5, 0.5]));
        assert_relative_eq!(frame.sample(0).unwrap(), 0.6);
        assert_relative_eq!(frame.sample(1).unwrap(), 0.7);
        assert_eq!(frame.sample(2).unwrap(), 0.3);
    }

    #[test]
    fn test_mix_with_wider_frame() {
        let mut frame = Frame::new(vec![0.25]);
        frame.sum_with(&Frame::new(vec![0.25, 1.0]));
        assert_eq!(frame.samples(), &[0.5]);
    }

    #[test]
    fn test_scale() {
        let mut frame = Frame::new(vec![0.5, -0.25]);
        frame.scale(2.0);
        assert_eq!(frame.samples(), &[1.0, -0.5]);
    }

    #[test]
    fn test_clip() {
        let mut frame = Frame::new(vec![1.5, -2.0, 0.25]);
        frame.clip();
        assert_eq!(frame.samples(), &[MAX_SAMPLE, -1.0, 0.25]);
    }

    #[test]
    fn test_peak_ignores_negative_magnitude() {
        assert_eq!(Frame::new(vec![-0.5, -0.2]).peak(), 0.0);
        assert_eq!(Frame::new(vec![-0.5, 0.3]).peak(), 0.3);
        assert_eq!(Frame::silent(2).peak(), 0.0);
    }

    #[test]
    fn test_channel_bounds() {
        let mut frame = Frame::silent(2);
        assert!(frame.set_sample(1, 0.5).is_ok());
        assert_eq!(frame.sample(1).unwrap(), 0.5);

        assert!(matches!(frame.sample(2), Err(PcmError::IndexOutOfBounds { index: 2, len: 2 })));
        assert!(frame.set_sample(5, 0.1).is_err());
    }
}
