//! Transcoding Module
//!
//! Everything that turns files into raw PCM and back sits behind the
//! [`Transcoder`] trait. [`TranscoderRegistry`] picks one by file extension.

pub mod external;

pub use external::CommandTranscoder;

use std::path::Path;
use log::debug;
use crate::audio::{AudioBuffer, FormatDescriptor, WavFile};
use crate::config::TranscoderConfig;
use crate::error::{PcmError, Result};

/// Converts between a file on disk and raw PCM bytes.
pub trait Transcoder {
    fn name(&self) -> &str;

    /// Produce raw interleaved PCM bytes and their format from `path`.
    fn decode_to_pcm(&self, path: &Path) -> Result<(Vec<u8>, FormatDescriptor)>;

    /// Store raw PCM bytes of `format` at `path`.
    fn encode_from_pcm(&self, raw: &[u8], format: &FormatDescriptor, path: &Path) -> Result<()>;
}

/// Extension-to-transcoder table.
pub struct TranscoderRegistry {
    entries: Vec<(String, Box<dyn Transcoder>)>,
}

impl Default for TranscoderRegistry {
    fn default() -> Self {
        let mut registry = Self { entries: Vec::new() };
        registry.register("wav", Box::new(WavFile));
        registry.register("wave", Box::new(WavFile));
        registry
    }
}

impl TranscoderRegistry {
    /// WAV support plus the external command for every configured extension.
    pub fn from_config(config: &TranscoderConfig) -> Self {
        let mut registry = Self::default();
        for extension in &config.extensions {
            registry.register(extension, Box::new(CommandTranscoder::from_config(config)));
        }
        registry
    }

    /// Register `transcoder` for `extension`, replacing any earlier entry.
    pub fn register(&mut self, extension: &str, transcoder: Box<dyn Transcoder>) {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        self.entries.retain(|(ext, _)| *ext != extension);
        self.entries.push((extension, transcoder));
    }

    pub fn for_path(&self, path: &Path) -> Result<&dyn Transcoder> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .ok_or_else(|| PcmError::unsupported(format!("No file extension: {}", path.display())))?;

        self.entries
            .iter()
            .find(|(ext, _)| *ext == extension)
            .map(|(_, transcoder)| transcoder.as_ref())
            .ok_or_else(|| PcmError::unsupported(format!("No transcoder for .{} files", extension)))
    }

    pub fn read_audio(&self, path: &Path) -> Result<AudioBuffer> {
        let transcoder = self.for_path(path)?;
        debug!("Reading {} with {}", path.display(), transcoder.name());
        let (raw, format) = transcoder.decode_to_pcm(path)?;
        AudioBuffer::from_vec(raw, format)
    }

    pub fn write_audio(&self, buffer: &AudioBuffer, path: &Path) -> Result<()> {
        let transcoder = self.for_path(path)?;
        debug!("Writing {} with {}", path.display(), transcoder.name());
        transcoder.encode_from_pcm(buffer.as_bytes(), buffer.format(), path)
    }
}
