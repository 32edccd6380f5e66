//! WAV audio file processing

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{debug, info};
use crate::audio::codec::{read_word, write_word};
use crate::audio::{AudioBuffer, FormatDescriptor, SampleEncoding};
use crate::error::{PcmError, Result};
use crate::transcode::Transcoder;

/// Widest integer sample a WAV file holds.
const MAX_WAV_BYTES_PER_SAMPLE: u32 = 4;

/// WAVE container adapter.
///
/// WAV PCM is always little-endian, unsigned at 8 bits and signed above.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavFile;

impl WavFile {
    /// Read a WAV file into raw interleaved PCM bytes.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<(Vec<u8>, FormatDescriptor)> {
        let path = path.as_ref();

        let file = File::open(path)
            .map_err(|e| PcmError::audio(format!("Cannot open audio file {}: {}", path.display(), e)))?;

        let reader = WavReader::new(BufReader::new(file))
            .map_err(|e| PcmError::audio(format!("Cannot create WAV reader for {}: {}", path.display(), e)))?;

        let spec = reader.spec();
        let format = Self::format_from_spec(&spec)?;
        let bytes_per_sample = format.bytes_per_sample() as usize;

        let mut raw = Vec::with_capacity(reader.len() as usize * bytes_per_sample);
        let mut word = vec![0u8; bytes_per_sample];
        for sample in reader.into_samples::<i32>() {
            let sample = sample.map_err(|e| PcmError::audio(format!("Failed to read sample: {}", e)))?;
            write_word(sample as i64, &mut word, format.encoding, false);
            raw.extend_from_slice(&word);
        }

        // A truncated data chunk can end mid-frame; drop the partial frame.
        let whole = raw.len() - raw.len() % format.frame_size as usize;
        raw.truncate(whole);

        info!("Loaded {}: {} frames, {}", path.display(), whole / format.frame_size as usize, format);
        Ok((raw, format))
    }

    /// Write raw PCM bytes as a WAV file, converting to a WAV layout first
    /// when `format` is not one.
    pub fn write<P: AsRef<Path>>(raw: &[u8], format: &FormatDescriptor, path: P) -> Result<()> {
        let path = path.as_ref();
        format.validate()?;
        if raw.len() % format.frame_size as usize != 0 {
            let expected = (raw.len() / format.frame_size as usize + 1) * format.frame_size as usize;
            return Err(PcmError::size_mismatch(expected, raw.len()));
        }

        let target = Self::compatible_format(format);

        let converted;
        let raw = if target == *format {
            raw
        } else {
            debug!("Converting [{}] to WAV layout [{}]", format, target);
            converted = AudioBuffer::new(raw, *format)?.convert_format(target)?;
            converted.as_bytes()
        };

        let spec = Self::spec_from_format(&target)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| PcmError::audio(format!("Cannot create output directory: {}", e)))?;
            }
        }

        let mut writer = WavWriter::create(path, spec)
            .map_err(|e| PcmError::audio(format!("Cannot create output file {}: {}", path.display(), e)))?;

        for word in raw.chunks_exact(target.bytes_per_sample() as usize) {
            let sample = read_word(word, target.encoding, false) as i32;
            writer.write_sample(sample)
                .map_err(|e| PcmError::audio(format!("Failed to write sample: {}", e)))?;
        }

        writer.finalize()
            .map_err(|e| PcmError::audio(format!("Failed to finalize WAV writing: {}", e)))?;

        info!("Wrote {} ({})", path.display(), target);
        Ok(())
    }

    /// Nearest layout a WAV file can store: little-endian, at most 32 bits,
    /// unsigned only at 8 bits.
    pub fn compatible_format(format: &FormatDescriptor) -> FormatDescriptor {
        let bytes_per_sample = format.bytes_per_sample().clamp(1, MAX_WAV_BYTES_PER_SAMPLE);
        let encoding = if bytes_per_sample == 1 { SampleEncoding::PcmUnsigned } else { SampleEncoding::PcmSigned };
        format
            .with_bits(bytes_per_sample * 8)
            .with_encoding(encoding)
            .with_big_endian(false)
    }

    fn format_from_spec(spec: &WavSpec) -> Result<FormatDescriptor> {
        if spec.sample_format == SampleFormat::Float {
            return Err(PcmError::unsupported(format!(
                "Unsupported encoding: {}-bit float WAV", spec.bits_per_sample
            )));
        }

        if spec.bits_per_sample == 0 || spec.bits_per_sample % 8 != 0 {
            return Err(PcmError::unsupported(format!(
                "Unsupported bit depth: {}", spec.bits_per_sample
            )));
        }

        if spec.channels == 0 {
            return Err(PcmError::audio("WAV file declares no channels"));
        }

        let signed = spec.bits_per_sample > 8;
        let format = FormatDescriptor::new(
            spec.sample_rate as f32,
            spec.bits_per_sample as u32,
            spec.channels as u32,
            signed,
            false,
        );
        format.validate()?;
        Ok(format)
    }

    fn spec_from_format(format: &FormatDescriptor) -> Result<WavSpec> {
        let channels = u16::try_from(format.channels)
            .map_err(|_| PcmError::unsupported(format!("Too many channels for WAV: {}", format.channels)))?;

        if format.sample_rate < 1.0 {
            return Err(PcmError::audio(format!("Invalid sample rate: {}", format.sample_rate)));
        }

        Ok(WavSpec {
            channels,
            sample_rate: format.sample_rate.round() as u32,
            bits_per_sample: format.bits_per_sample() as u16,
            sample_format: SampleFormat::Int,
        })
    }
}

impl Transcoder for WavFile {
    fn name(&self) -> &str {
        "wav"
    }

    fn decode_to_pcm(&self, path: &Path) -> Result<(Vec<u8>, FormatDescriptor)> {
        Self::read(path)
    }

    fn encode_from_pcm(&self, raw: &[u8], format: &FormatDescriptor, path: &Path) -> Result<()> {
        Self::write(raw, format, path)
    }
}
