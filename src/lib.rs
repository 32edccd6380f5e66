//! pcmframe - Frame-Level PCM Audio Library
//!
//! Loads PCM audio of any integer layout into a byte-exact buffer, exposes it
//! frame by frame as normalized samples, and re-encodes it to a target layout.

pub mod audio;
pub mod config;
pub mod error;
pub mod processing;
pub mod transcode;

pub use audio::{AudioBuffer, FormatDescriptor, Frame, SampleEncoding};
pub use config::{Args, Config};
pub use error::{PcmError, Result};
pub use transcode::{Transcoder, TranscoderRegistry};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Install the `env_logger` backend. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init()
        .ok();
}
