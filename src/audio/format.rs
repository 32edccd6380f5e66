//! PCM format descriptor

use std::fmt;
use serde::{Deserialize, Serialize};
use crate::error::{PcmError, Result};

/// Widest sample the codec can hold in its 64-bit intermediate.
pub const MAX_BYTES_PER_SAMPLE: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleEncoding {
    PcmSigned,
    PcmUnsigned,
    /// IEEE float samples. Containers may report it, the codec never accepts it.
    PcmFloat,
}

impl SampleEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            SampleEncoding::PcmSigned => "PCM_SIGNED",
            SampleEncoding::PcmUnsigned => "PCM_UNSIGNED",
            SampleEncoding::PcmFloat => "PCM_FLOAT",
        }
    }

    pub fn from_signed(signed: bool) -> Self {
        if signed { SampleEncoding::PcmSigned } else { SampleEncoding::PcmUnsigned }
    }

    /// Integer PCM encodings are the only ones the codec handles.
    pub fn is_integer_pcm(&self) -> bool {
        matches!(self, SampleEncoding::PcmSigned | SampleEncoding::PcmUnsigned)
    }
}

/// Layout of one interleaved PCM stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormatDescriptor {
    pub channels: u32,
    /// Bytes per frame (all channels).
    pub frame_size: u32,
    pub sample_rate: f32,
    pub frame_rate: f32,
    pub big_endian: bool,
    pub encoding: SampleEncoding,
}

impl FormatDescriptor {
    /// Integer PCM format where the frame rate equals the sample rate.
    pub fn new(sample_rate: f32, bits_per_sample: u32, channels: u32, signed: bool, big_endian: bool) -> Self {
        let bytes_per_sample = bits_per_sample.div_ceil(8);
        Self {
            channels,
            frame_size: bytes_per_sample * channels,
            sample_rate,
            frame_rate: sample_rate,
            big_endian,
            encoding: SampleEncoding::from_signed(signed),
        }
    }

    /// CD layout: 44.1kHz, 16-bit signed, little-endian.
    pub fn cd_quality(channels: u32) -> Self {
        Self::new(44100.0, 16, channels, true, false)
    }

    pub fn bytes_per_sample(&self) -> u32 {
        if self.channels == 0 { 0 } else { self.frame_size / self.channels }
    }

    pub fn bits_per_sample(&self) -> u32 {
        self.bytes_per_sample() * 8
    }

    pub fn is_signed(&self) -> bool {
        self.encoding == SampleEncoding::PcmSigned
    }

    pub fn with_channels(self, channels: u32) -> Self {
        Self { channels, frame_size: self.bytes_per_sample() * channels, ..self }
    }

    pub fn with_bits(self, bits_per_sample: u32) -> Self {
        Self { frame_size: bits_per_sample.div_ceil(8) * self.channels, ..self }
    }

    pub fn with_encoding(self, encoding: SampleEncoding) -> Self {
        Self { encoding, ..self }
    }

    pub fn with_big_endian(self, big_endian: bool) -> Self {
        Self { big_endian, ..self }
    }

    pub fn validate(&self) -> Result<()> {
        if self.channels == 0 {
            return Err(PcmError::unsupported("Channel count must be at least 1"));
        }

        if self.frame_size % self.channels != 0 {
            return Err(PcmError::unsupported(format!(
                "Frame size {} is not a multiple of {} channels", self.frame_size, self.channels
            )));
        }

        let bytes_per_sample = self.bytes_per_sample();
        if bytes_per_sample == 0 || bytes_per_sample > MAX_BYTES_PER_SAMPLE {
            return Err(PcmError::unsupported(format!(
                "Unsupported number of bytes per sample: {}", bytes_per_sample
            )));
        }

        if !self.encoding.is_integer_pcm() {
            return Err(PcmError::unsupported(format!("Unsupported encoding: {}", self.encoding.name())));
        }

        Ok(())
    }

    /// Seconds covered by `frame_count` frames at this frame rate.
    pub fn duration_secs(&self, frame_count: usize) -> f64 {
        if self.frame_rate <= 0.0 {
            return 0.0;
        }
        frame_count as f64 / self.frame_rate as f64
    }
}

impl fmt::Display for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channels = match self.channels {
            1 => "mono".to_string(),
            2 => "stereo".to_string(),
            n => format!("{} channels", n),
        };
        write!(
            f,
            "{} {:.1} Hz, {} bit, {}, {} bytes/frame, {:.1} frames/second, {}",
            self.encoding.name(),
            self.sample_rate,
            self.bits_per_sample(),
            channels,
            self.frame_size,
            self.frame_rate,
            if self.big_endian { "big-endian" } else { "little-endian" },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_creation() {
        let format = FormatDescriptor::new(44100.0, 24, 2, true, false);
        assert_eq!(format.bytes_per_sample(), 3);
        assert_eq!(format.bits_per_sample(), 24);
        assert_eq!(format.frame_size, 6);
        assert_eq!(format.frame_rate, 44100.0);
        assert!(format.is_signed());
        assert!(format.validate().is_ok());
    }

    #[test]
    fn test_format_validation() {
        assert!(FormatDescriptor::new(8000.0, 8, 0, true, false).validate().is_err());
        assert!(FormatDescriptor::new(8000.0, 72, 1, true, false).validate().is_err());
        assert!(FormatDescriptor::new(8000.0, 64, 1, true, true).validate().is_ok());

        let float = FormatDescriptor::new(8000.0, 32, 1, true, false).with_encoding(SampleEncoding::PcmFloat);
        assert!(matches!(float.validate(), Err(PcmError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_with_channels_keeps_sample_width() {
        let mono = FormatDescriptor::cd_quality(1);
        let stereo = mono.with_channels(2);
        assert_eq!(stereo.frame_size, 4);
        assert_eq!(stereo.bytes_per_sample(), 2);
    }

    #[test]
    fn test_display() {
        let text = FormatDescriptor::cd_quality(2).to_string();
        assert!(text.starts_with("PCM_SIGNED 44100.0 Hz, 16 bit, stereo, 4 bytes/frame"));
        assert!(text.ends_with("little-endian"));
    }
}
