//! Audio Processing Pipeline

pub mod processor;
pub mod transform;

pub use processor::{AudioProcessor, ProcessingResult};
pub use transform::{apply_transform, FrameTransform, Gain, Normalize};
