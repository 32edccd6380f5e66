//! Error Types

use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum PcmError {
    #[error("Unsupported format: {message}")]
    UnsupportedFormat { message: String },

    #[error("Index out of bounds: {index} (length {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Audio error: {message}")]
    Audio { message: String },

    #[error("Transcode error: {message}")]
    Transcode { message: String },

    #[error("Config error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PcmError {
    pub fn unsupported<S: Into<String>>(msg: S) -> Self { Self::UnsupportedFormat { message: msg.into() } }
    pub fn out_of_bounds(index: usize, len: usize) -> Self { Self::IndexOutOfBounds { index, len } }
    pub fn size_mismatch(expected: usize, actual: usize) -> Self { Self::SizeMismatch { expected, actual } }
    pub fn audio<S: Into<String>>(msg: S) -> Self { Self::Audio { message: msg.into() } }
    pub fn transcode<S: Into<String>>(msg: S) -> Self { Self::Transcode { message: msg.into() } }
    pub fn config<S: Into<String>>(msg: S) -> Self { Self::Config { message: msg.into() } }
}

pub type Result<T> = std::result::Result<T, PcmError>;

impl From<hound::Error> for PcmError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => Self::Io(e),
            hound::Error::Unsupported => Self::unsupported("WAV: unsupported sample layout"),
            other => Self::audio(format!("WAV: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = PcmError::unsupported("9 bytes per sample");
        assert!(e.to_string().contains("Unsupported format"));

        let e = PcmError::out_of_bounds(4, 4);
        assert_eq!(e.to_string(), "Index out of bounds: 4 (length 4)");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let e: PcmError = io.into();
        assert!(matches!(e, PcmError::Io(_)));
    }

    #[test]
    fn test_hound_unsupported_maps_to_format_error() {
        let e: PcmError = hound::Error::Unsupported.into();
        assert!(matches!(e, PcmError::UnsupportedFormat { .. }));
    }
}
