//! Batch pipeline components.
//!
//! - **discovery**: List supported images in the input directory
//! - **decode**: Load and decode source images
//! - **resize**: Scale to a target width, keeping aspect ratio
//! - **scratch**: Scoped storage for resized copies
//! - **processor**: Drives images × sizes through the API and into rows

pub mod decode;
pub mod discovery;
pub mod processor;
pub mod resize;
pub mod scratch;

// Re-exports for convenient access
pub use decode::{DecodedImage, ImageDecoder};
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use processor::{AltTextPipeline, RunOutput};
pub use resize::Resizer;
pub use scratch::{ScratchDir, ScratchImage};
