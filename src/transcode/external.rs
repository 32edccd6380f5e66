//! External command transcoder
//!
//! Compressed formats are handed to an outside tool. The tool only ever sees
//! WAV files: decoding runs it into a temporary WAV that is then read back,
//! encoding writes a temporary WAV for it to consume.

use std::path::Path;
use std::process::Command;
use log::{debug, warn};
use tempfile::TempPath;
use crate::audio::{FormatDescriptor, WavFile};
use crate::config::TranscoderConfig;
use crate::error::{PcmError, Result};
use crate::transcode::Transcoder;

const INPUT_PLACEHOLDER: &str = "{input}";
const OUTPUT_PLACEHOLDER: &str = "{output}";

#[derive(Debug, Clone)]
pub struct CommandTranscoder {
    program: String,
    decode_args: Vec<String>,
    encode_args: Vec<String>,
}

impl CommandTranscoder {
    pub fn new<S: Into<String>>(program: S, decode_args: Vec<String>, encode_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            decode_args,
            encode_args,
        }
    }

    pub fn from_config(config: &TranscoderConfig) -> Self {
        Self::new(config.program.clone(), config.decode_args.clone(), config.encode_args.clone())
    }

    fn expand(template: &[String], input: &Path, output: &Path) -> Vec<String> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        template
            .iter()
            .map(|arg| arg.replace(INPUT_PLACEHOLDER, &input).replace(OUTPUT_PLACEHOLDER, &output))
            .collect()
    }

    fn run(&self, template: &[String], input: &Path, output: &Path) -> Result<()> {
        let args = Self::expand(template, input, output);
        debug!("Running {} {}", self.program, args.join(" "));

        let result = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| PcmError::transcode(format!("Cannot run {}: {}", self.program, e)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(PcmError::transcode(format!(
                "{} failed ({}): {}", self.program, result.status, stderr.trim()
            )));
        }

        Ok(())
    }

    fn temp_wav(prefix: &str) -> Result<TempPath> {
        let file = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(".wav")
            .tempfile()?;
        Ok(file.into_temp_path())
    }

    fn remove(temp: TempPath) {
        let path = temp.to_path_buf();
        if let Err(e) = temp.close() {
            warn!("Failed to remove temporary file {}: {}", path.display(), e);
        }
    }
}

impl Transcoder for CommandTranscoder {
    fn name(&self) -> &str {
        "external"
    }

    fn decode_to_pcm(&self, path: &Path) -> Result<(Vec<u8>, FormatDescriptor)> {
        let temp = Self::temp_wav("decoded")?;
        let result = self
            .run(&self.decode_args, path, &temp)
            .and_then(|_| WavFile::read(&temp));
        Self::remove(temp);
        result
    }

    fn encode_from_pcm(&self, raw: &[u8], format: &FormatDescriptor, path: &Path) -> Result<()> {
        let temp = Self::temp_wav("encoded")?;
        let result = WavFile::write(raw, format, &temp)
            .and_then(|_| self.run(&self.encode_args, &temp, path));
        Self::remove(temp);
        result
    }
}
