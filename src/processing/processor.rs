//! File-to-file processing pipeline

use std::path::{Path, PathBuf};
use std::time::Instant;
use log::info;
use crate::audio::{AudioBuffer, FormatDescriptor};
use crate::config::Config;
use crate::error::Result;
use crate::processing::transform::{apply_transform, FrameTransform, Gain, Normalize};
use crate::transcode::TranscoderRegistry;

#[derive(Debug, Clone)]
pub struct ProcessingResult {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub input_format: FormatDescriptor,
    pub output_format: FormatDescriptor,
    pub frame_count: usize,
    pub duration_seconds: f64,
    pub output_peak: f64,
    pub processing_time_seconds: f64,
}

pub struct AudioProcessor {
    config: Config,
    registry: TranscoderRegistry,
    transforms: Vec<Box<dyn FrameTransform>>,
}

impl AudioProcessor {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let registry = TranscoderRegistry::from_config(&config.transcoder);
        Ok(Self::with_registry(config, registry))
    }

    pub fn with_registry(config: Config, registry: TranscoderRegistry) -> Self {
        let mut transforms: Vec<Box<dyn FrameTransform>> = Vec::new();
        if config.gain() != 1.0 {
            transforms.push(Box::new(Gain::new(config.gain())));
        }
        if let Some(peak) = config.normalize_peak() {
            transforms.push(Box::new(Normalize::new(peak)));
        }

        Self { config, registry, transforms }
    }

    /// Append a transform that runs after the configured ones.
    pub fn add_transform(&mut self, transform: Box<dyn FrameTransform>) {
        self.transforms.push(transform);
    }

    /// Apply all transforms, then convert to the configured output layout.
    pub fn process_buffer(&mut self, mut buffer: AudioBuffer) -> Result<AudioBuffer> {
        for transform in &mut self.transforms {
            apply_transform(&mut buffer, transform.as_mut())?;
        }

        if self.config.output.is_identity() {
            return Ok(buffer);
        }

        let target = self.config.output.resolve(buffer.format());
        if target == *buffer.format() {
            return Ok(buffer);
        }
        buffer.convert_format(target)
    }

    pub fn process_file(&mut self, input_path: &Path, output_path: &Path) -> Result<ProcessingResult> {
        let start_time = Instant::now();

        let input = self.registry.read_audio(input_path)?;
        let input_format = *input.format();
        info!("Input: {:.2}s, {}", input.duration_secs(), input_format);

        let output = self.process_buffer(input)?;
        self.registry.write_audio(&output, output_path)?;

        let result = ProcessingResult {
            input_path: input_path.to_path_buf(),
            output_path: output_path.to_path_buf(),
            input_format,
            output_format: *output.format(),
            frame_count: output.frame_count(),
            duration_seconds: output.duration_secs(),
            output_peak: output.peak()?,
            processing_time_seconds: start_time.elapsed().as_secs_f64(),
        };
        info!("Processed {} frames in {:.3}s", result.frame_count, result.processing_time_seconds);
        Ok(result)
    }

    pub fn run(&mut self) -> Result<ProcessingResult> {
        let input = self.config.input_path.clone();
        let output = self.config.output_path.clone();
        self.process_file(&input, &output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{Frame, SampleEncoding, WavFile};
    use tempfile::TempDir;

    fn write_fixture(path: &Path) -> AudioBuffer {
        let format = FormatDescriptor::new(8000.0, 16, 1, true, false);
        let mut buffer = AudioBuffer::zeroed(3, format).unwrap();
        buffer.set_frame(0, &Frame::new(vec![0.25])).unwrap();
        buffer.set_frame(1, &Frame::new(vec![-0.5])).unwrap();
        WavFile::write(buffer.as_bytes(), buffer.format(), path).unwrap();
        buffer
    }

    #[test]
    fn test_identity_config_passes_through() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in.wav");
        let output = temp_dir.path().join("out.wav");
        let original = write_fixture(&input);

        let mut processor = AudioProcessor::new(Config::default()).unwrap();
        let result = processor.process_file(&input, &output).unwrap();
        assert_eq!(result.frame_count, 3);
        assert_eq!(result.output_format, *original.format());

        let (raw, _) = WavFile::read(&output).unwrap();
        assert_eq!(raw, original.as_bytes());
    }

    #[test]
    fn test_gain_normalize_and_convert() {
        let mut config = Config::default();
        config.processing.gain = 0.5;
        config.processing.normalize_peak = Some(1.0);
        config.output.channels = Some(2);
        config.output.bits_per_sample = Some(8);
        config.output.signed = Some(false);

        let format = FormatDescriptor::new(8000.0, 16, 1, true, false);
        let mut buffer = AudioBuffer::zeroed(2, format).unwrap();
        buffer.set_frame(0, &Frame::new(vec![0.5])).unwrap();
        buffer.set_frame(1, &Frame::new(vec![-0.25])).unwrap();

        let mut processor = AudioProcessor::new(config).unwrap();
        let output = processor.process_buffer(buffer).unwrap();

        assert_eq!(output.format().channels, 2);
        assert_eq!(output.format().encoding, SampleEncoding::PcmUnsigned);
        assert_eq!(output.as_bytes(), &[255, 255, 64, 64]);
    }

    #[test]
    fn test_added_transform_runs_after_configured_ones() {
        struct Invert;
        impl FrameTransform for Invert {
            fn name(&self) -> &str { "invert" }
            fn apply(&mut self, _index: usize, frame: &mut Frame) {
                frame.scale(-1.0);
            }
        }

        let mut config = Config::default();
        config.processing.gain = 0.5;

        let format = FormatDescriptor::new(8000.0, 16, 1, true, false);
        let mut buffer = AudioBuffer::zeroed(1, format).unwrap();
        buffer.set_frame(0, &Frame::new(vec![0.5])).unwrap();

        let mut processor = AudioProcessor::new(config).unwrap();
        processor.add_transform(Box::new(Invert));
        let output = processor.process_buffer(buffer).unwrap();
        assert_eq!(output.frame(0).unwrap().samples(), &[-0.25]);
    }

    #[test]
    fn test_unknown_extension_fails() {
        let mut processor = AudioProcessor::new(Config::default()).unwrap();
        let err = processor.process_file(Path::new("in.flac"), Path::new("out.wav"));
        assert!(err.is_err());
    }
}
