//! Audio Format Converter

use log::debug;
use crate::audio::{AudioBuffer, Frame, FormatDescriptor};
use crate::error::Result;

pub struct AudioConverter;

impl AudioConverter {
    /// Re-encode `source` into `target`, frame by frame, through the
    /// normalized representation. Sample rate is relabelled, not resampled.
    pub fn convert_format(source: &AudioBuffer, target: FormatDescriptor) -> Result<AudioBuffer> {
        let mut converted = AudioBuffer::zeroed(source.frame_count(), target)?;
        let channels = target.channels as usize;

        for (index, frame) in source.frames().enumerate() {
            let remapped = Self::remap_channels(&frame?, channels);
            converted.set_frame(index, &remapped)?;
        }

        debug!("Converted {} frames: [{}] -> [{}]", source.frame_count(), source.format(), target);
        Ok(converted)
    }

    /// Copy channels positionally; extra target channels repeat channel 0.
    pub fn remap_channels(frame: &Frame, channels: usize) -> Frame {
        let samples = frame.samples();
        let first = samples.first().copied().unwrap_or(0.0);
        (0..channels)
            .map(|ch| samples.get(ch).copied().unwrap_or(first))
            .collect::<Vec<f64>>()
            .into()
    }
}
