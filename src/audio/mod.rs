//! Audio Module
//!
//! PCM format description, the frame codec, the in-memory buffer and
//! WAV container support.

pub mod buffer;
pub mod codec;
pub mod converter;
pub mod format;
pub mod frame;
pub mod wav;

pub use buffer::{AudioBuffer, Frames};
pub use codec::{decode_frame, encode_frame};
pub use converter::AudioConverter;
pub use format::{FormatDescriptor, SampleEncoding, MAX_BYTES_PER_SAMPLE};
pub use frame::{Frame, MAX_SAMPLE};
pub use wav::WavFile;
