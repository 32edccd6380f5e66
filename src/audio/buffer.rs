//! In-memory PCM container with frame-level access

use std::iter::FusedIterator;
use crate::audio::codec;
use crate::audio::converter::AudioConverter;
use crate::audio::format::FormatDescriptor;
use crate::audio::frame::Frame;
use crate::error::{PcmError, Result};

/// Owns one contiguous interleaved PCM byte buffer and its format.
///
/// `Clone` copies the bytes, so a clone never aliases its source.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    raw: Vec<u8>,
    format: FormatDescriptor,
    frame_count: usize,
}

impl AudioBuffer {
    /// Build a buffer from raw bytes. The bytes are copied.
    pub fn new(raw: &[u8], format: FormatDescriptor) -> Result<Self> {
        Self::from_vec(raw.to_vec(), format)
    }

    /// Build a buffer that takes ownership of `raw`.
    pub fn from_vec(raw: Vec<u8>, format: FormatDescriptor) -> Result<Self> {
        format.validate()?;

        let frame_size = format.frame_size as usize;
        if raw.len() % frame_size != 0 {
            let expected = (raw.len() / frame_size + 1) * frame_size;
            return Err(PcmError::size_mismatch(expected, raw.len()));
        }

        let frame_count = raw.len() / frame_size;
        Ok(Self { raw, format, frame_count })
    }

    /// Zero-filled buffer of `frame_count` frames.
    ///
    /// Zero bytes are silence only for signed formats; unsigned buffers start
    /// at full negative scale until every frame is written.
    pub fn zeroed(frame_count: usize, format: FormatDescriptor) -> Result<Self> {
        format.validate()?;
        let len = frame_count
            .checked_mul(format.frame_size as usize)
            .ok_or_else(|| PcmError::size_mismatch(usize::MAX, frame_count))?;
        Ok(Self { raw: vec![0u8; len], format, frame_count })
    }

    pub fn format(&self) -> &FormatDescriptor {
        &self.format
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count == 0
    }

    pub fn channels(&self) -> u32 {
        self.format.channels
    }

    pub fn duration_secs(&self) -> f64 {
        self.format.duration_secs(self.frame_count)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn into_parts(self) -> (Vec<u8>, FormatDescriptor) {
        (self.raw, self.format)
    }

    fn byte_range(&self, index: usize) -> Result<std::ops::Range<usize>> {
        if index >= self.frame_count {
            return Err(PcmError::out_of_bounds(index, self.frame_count));
        }
        let frame_size = self.format.frame_size as usize;
        let start = index * frame_size;
        Ok(start..start + frame_size)
    }

    /// Decode frame `index`.
    pub fn frame(&self, index: usize) -> Result<Frame> {
        let range = self.byte_range(index)?;
        codec::decode_frame(
            &self.raw[range],
            self.format.channels,
            self.format.encoding,
            self.format.big_endian,
        )
    }

    /// Encode `frame` into slot `index`.
    ///
    /// The frame is fully encoded before any byte is copied, so on error the
    /// buffer is unchanged. The frame must have exactly `channels()` samples.
    pub fn set_frame(&mut self, index: usize, frame: &Frame) -> Result<()> {
        let range = self.byte_range(index)?;
        let encoded = codec::encode_frame(
            frame,
            self.format.bytes_per_sample(),
            self.format.encoding,
            self.format.big_endian,
        )?;

        if encoded.len() != range.len() {
            return Err(PcmError::size_mismatch(range.len(), encoded.len()));
        }

        self.raw[range].copy_from_slice(&encoded);
        Ok(())
    }

    /// Lazy iterator over all frames in order. Each call starts over at
    /// frame 0.
    pub fn frames(&self) -> Frames<'_> {
        Frames { buffer: self, next: 0 }
    }

    /// Run `transform` on every frame and write the result back.
    pub fn map_frames<F>(&mut self, mut transform: F) -> Result<()>
    where
        F: FnMut(usize, &mut Frame),
    {
        for index in 0..self.frame_count {
            let mut frame = self.frame(index)?;
            transform(index, &mut frame);
            self.set_frame(index, &frame)?;
        }
        Ok(())
    }

    /// Highest `Frame::peak` over the buffer (0.0 when empty).
    pub fn peak(&self) -> Result<f64> {
        let mut peak = 0.0;
        for frame in self.frames() {
            peak = f64::max(peak, frame?.peak());
        }
        Ok(peak)
    }

    /// Re-encode every frame into a new buffer of format `target`.
    pub fn convert_format(&self, target: FormatDescriptor) -> Result<AudioBuffer> {
        AudioConverter::convert_format(self, target)
    }
}

/// Iterator returned by [`AudioBuffer::frames`].
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    buffer: &'a AudioBuffer,
    next: usize,
}

impl Iterator for Frames<'_> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.buffer.frame_count {
            return None;
        }
        let frame = self.buffer.frame(self.next);
        self.next += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.frame_count.saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Frames<'_> {}

impl FusedIterator for Frames<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::format::SampleEncoding;

    fn stereo_16() -> FormatDescriptor {
        FormatDescriptor::new(8000.0, 16, 2, true, false)
    }

    #[test]
    fn test_buffer_creation() {
        let raw = [0x00, 0x40, 0x00, 0xC0, 0x00, 0x00, 0xFF, 0x7F];
        let buffer = AudioBuffer::new(&raw, stereo_16()).unwrap();
        assert_eq!(buffer.frame_count(), 2);
        assert_eq!(buffer.channels(), 2);
        assert_eq!(buffer.as_bytes(), &raw);
        assert!((buffer.duration_secs() - 0.00025).abs() < 1e-12);

        let frame = buffer.frame(0).unwrap();
        assert_eq!(frame.samples(), &[0.5, -0.5]);
    }

    #[test]
    fn test_ragged_length_rejected() {
        let err = AudioBuffer::new(&[0u8; 7], stereo_16()).unwrap_err();
        assert!(matches!(err, PcmError::SizeMismatch { expected: 8, actual: 7 }));
    }

    #[test]
    fn test_oversized_sample_width_rejected() {
        let format = FormatDescriptor::new(8000.0, 72, 1, true, false);
        let err = AudioBuffer::new(&[0u8; 18], format).unwrap_err();
        assert!(matches!(err, PcmError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_frame_bounds() {
        let buffer = AudioBuffer::zeroed(3, stereo_16()).unwrap();
        assert!(buffer.frame(2).is_ok());
        assert!(matches!(buffer.frame(3), Err(PcmError::IndexOutOfBounds { index: 3, len: 3 })));
        assert!(matches!(buffer.frame(usize::MAX), Err(PcmError::IndexOutOfBounds { .. })));
    }

    #[test]
    fn test_set_frame_writes_in_place() {
        let mut buffer = AudioBuffer::zeroed(2, stereo_16()).unwrap();
        buffer.set_frame(1, &Frame::new(vec![0.5, -1.0])).unwrap();
        assert_eq!(buffer.as_bytes(), &[0, 0, 0, 0, 0x00, 0x40, 0x00, 0x80]);
        assert_eq!(buffer.frame(1).unwrap().samples(), &[0.5, -1.0]);
    }

    #[test]
    fn test_set_frame_channel_mismatch_leaves_buffer_untouched() {
        let mut buffer = AudioBuffer::zeroed(1, stereo_16()).unwrap();
        let err = buffer.set_frame(0, &Frame::new(vec![0.5])).unwrap_err();
        assert!(matches!(err, PcmError::SizeMismatch { expected: 4, actual: 2 }));
        assert_eq!(buffer.as_bytes(), &[0, 0, 0, 0]);

        assert!(buffer.set_frame(1, &Frame::silent(2)).is_err());
    }

    #[test]
    fn test_frames_iterator_is_restartable() {
        let raw = [0x00, 0x00, 0x00, 0x40, 0x00, 0xC0];
        let format = FormatDescriptor::new(8000.0, 16, 1, true, false);
        let buffer = AudioBuffer::new(&raw, format).unwrap();

        let frames = buffer.frames();
        assert_eq!(frames.len(), 3);
        let first: Vec<f64> = frames.map(|f| f.unwrap().sample(0).unwrap()).collect();
        assert_eq!(first, vec![0.0, 0.5, -0.5]);

        let again: Vec<Frame> = buffer.frames().collect::<Result<_>>().unwrap();
        assert_eq!(again.len(), 3);

        let mut iter = buffer.frames().skip(3);
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = AudioBuffer::zeroed(1, stereo_16()).unwrap();
        let copy = original.clone();
        original.set_frame(0, &Frame::new(vec![0.5, 0.5])).unwrap();
        assert_eq!(copy.as_bytes(), &[0, 0, 0, 0]);
        assert_ne!(original, copy);
    }

    #[test]
    fn test_into_parts_returns_owned_storage() {
        let raw = vec![0x00, 0x40, 0x00, 0xC0];
        let buffer = AudioBuffer::from_vec(raw.clone(), stereo_16()).unwrap();
        let (bytes, format) = buffer.into_parts();
        assert_eq!(bytes, raw);
        assert_eq!(format, stereo_16());

        let rebuilt = AudioBuffer::from_vec(bytes, format).unwrap();
        assert_eq!(rebuilt.frame(0).unwrap().samples(), &[0.5, -0.5]);
    }

    #[test]
    fn test_new_copies_caller_bytes() {
        let mut raw = vec![0u8; 4];
        let buffer = AudioBuffer::new(&raw, stereo_16()).unwrap();
        raw[0] = 0xFF;
        assert_eq!(buffer.as_bytes()[0], 0);
    }

    #[test]
    fn test_map_frames_and_peak() {
        let format = FormatDescriptor::new(8000.0, 8, 1, false, false);
        let mut buffer = AudioBuffer::new(&[128, 160, 64], format).unwrap();
        assert_eq!(buffer.peak().unwrap(), 0.25);

        buffer.map_frames(|_, frame| frame.scale(2.0)).unwrap();
        assert_eq!(buffer.as_bytes(), &[128, 192, 0]);
        assert_eq!(buffer.peak().unwrap(), 0.5);
    }

    #[test]
    fn test_float_format_rejected() {
        let format = stereo_16().with_encoding(SampleEncoding::PcmFloat);
        assert!(AudioBuffer::zeroed(1, format).is_err());
    }
}
