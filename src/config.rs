//! Configuration management for PCM processing

use crate::audio::{FormatDescriptor, SampleEncoding, MAX_BYTES_PER_SAMPLE};
use crate::error::{PcmError, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub output: OutputConfig,
    pub processing: ProcessingConfig,
    pub transcoder: TranscoderConfig,
}

/// Target layout overrides. Unset fields keep the input's value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub bits_per_sample: Option<u32>,
    pub channels: Option<u32>,
    pub signed: Option<bool>,
    pub big_endian: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Linear gain applied to every frame.
    pub gain: f64,
    /// Scale so the buffer peak lands on this value.
    pub normalize_peak: Option<f64>,
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscoderConfig {
    pub program: String,
    pub decode_args: Vec<String>,
    pub encode_args: Vec<String>,
    /// File extensions routed to `program`.
    pub extensions: Vec<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            gain: 1.0,
            normalize_peak: None,
            verbose: false,
        }
    }
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            program: "lame".to_string(),
            decode_args: ["--decode", "-h", "{input}", "{output}"].map(String::from).to_vec(),
            encode_args: ["-h", "{input}", "{output}"].map(String::from).to_vec(),
            extensions: vec!["mp3".to_string()],
        }
    }
}

impl OutputConfig {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the overrides to `source`.
    pub fn resolve(&self, source: &FormatDescriptor) -> FormatDescriptor {
        let mut target = *source;
        if let Some(channels) = self.channels {
            target = target.with_channels(channels);
        }
        if let Some(bits) = self.bits_per_sample {
            target = target.with_bits(bits);
        }
        if let Some(signed) = self.signed {
            target = target.with_encoding(SampleEncoding::from_signed(signed));
        }
        if let Some(big_endian) = self.big_endian {
            target = target.with_big_endian(big_endian);
        }
        target
    }
}

impl Config {
    pub fn verbose(&self) -> bool {
        self.processing.verbose
    }

    pub fn gain(&self) -> f64 {
        self.processing.gain
    }

    pub fn normalize_peak(&self) -> Option<f64> {
        self.processing.normalize_peak
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "pcmframe", about = "Frame-level PCM audio processor", version, author)]
pub struct Args {
    #[arg(short = 'i', long = "input", help = "Input audio file path")]
    pub input: PathBuf,

    #[arg(short = 'o', long = "output", default_value = "output.wav", help = "Output audio file path")]
    pub output: PathBuf,

    #[arg(short = 'g', long = "gain", help = "Linear gain applied to every frame")]
    pub gain: Option<f64>,

    #[arg(short = 'n', long = "normalize", help = "Scale so the signal peak reaches this value (0.0 - 1.0]")]
    pub normalize: Option<f64>,

    #[arg(short = 'b', long = "bits", help = "Output bits per sample (8 - 64, multiple of 8)")]
    pub bits: Option<u32>,

    #[arg(long = "channels", help = "Output channel count")]
    pub channels: Option<u32>,

    #[arg(long = "signed", conflicts_with = "unsigned", help = "Write signed PCM")]
    pub signed: bool,

    #[arg(long = "unsigned", help = "Write unsigned PCM")]
    pub unsigned: bool,

    #[arg(long = "big-endian", help = "Write big-endian samples")]
    pub big_endian: bool,

    #[arg(short = 'v', long = "verbose", help = "Enable verbose output mode")]
    pub verbose: bool,

    #[arg(short = 'c', long = "config", help = "Config file path (TOML format)")]
    pub config_file: Option<PathBuf>,
}

impl Config {
    /// Create config from command line arguments and config file
    pub fn from_args_and_config(args: Args) -> Result<Self> {
        let mut config = if let Some(config_path) = &args.config_file {
            Self::from_file(config_path)?
        } else {
            Self::default()
        };

        // Command line arguments override config file settings
        config.input_path = args.input;
        config.output_path = args.output;
        config.processing.verbose |= args.verbose;
        if let Some(gain) = args.gain {
            config.processing.gain = gain;
        }
        if args.normalize.is_some() {
            config.processing.normalize_peak = args.normalize;
        }
        if args.bits.is_some() {
            config.output.bits_per_sample = args.bits;
        }
        if args.channels.is_some() {
            config.output.channels = args.channels;
        }
        if args.signed || args.unsigned {
            config.output.signed = Some(args.signed);
        }
        if args.big_endian {
            config.output.big_endian = Some(true);
        }

        config.validate()?;

        Ok(config)
    }

    /// Load config from TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PcmError::config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| PcmError::config(format!("Failed to parse config file: {}", e)))
    }

    /// Validate configuration parameter validity
    pub fn validate(&self) -> Result<()> {
        if !self.processing.gain.is_finite() {
            return Err(PcmError::config("Gain must be a finite number"));
        }

        if let Some(peak) = self.processing.normalize_peak {
            if !(peak > 0.0 && peak <= 1.0) {
                return Err(PcmError::config("Normalize peak must be in range (0.0, 1.0]"));
            }
        }

        if let Some(bits) = self.output.bits_per_sample {
            if bits == 0 || bits % 8 != 0 || bits > MAX_BYTES_PER_SAMPLE * 8 {
                return Err(PcmError::config(format!(
                    "Bits per sample must be a multiple of 8 between 8 and {}", MAX_BYTES_PER_SAMPLE * 8
                )));
            }
        }

        if self.output.channels == Some(0) {
            return Err(PcmError::config("Channel count must be greater than 0"));
        }

        if self.transcoder.program.trim().is_empty() {
            return Err(PcmError::config("Transcoder program cannot be empty"));
        }

        Ok(())
    }

    /// Save config to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PcmError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| PcmError::config(format!("Failed to write config file: {}", e)))
    }
}
