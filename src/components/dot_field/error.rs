//! Errors surfaced by the dot field.
//!
//! None of these are fatal: the session keeps its previous state and the
//! caller decides whether to log or show them.

use thiserror::Error;

/// Errors that can occur while loading an image or exporting a snapshot.
#[derive(Error, Debug)]
pub enum DotFieldError {
	/// The bytes could not be decoded as a raster image.
	#[error("Failed to decode image: {0}")]
	Decode(#[from] image::ImageError),

	/// The image decoded but has no pixels.
	#[error("Image has zero width or height")]
	EmptyImage,

	/// The export document could not be (de)serialized.
	#[error("Snapshot serialization failed: {0}")]
	Serialize(#[from] serde_json::Error),

	/// The export bundle could not be written as a ZIP archive.
	#[error("Failed to build archive: {0}")]
	Archive(#[from] zip::result::ZipError),

	/// Writing archive contents failed.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

/// Result type for dot field operations.
pub type Result<T> = std::result::Result<T, DotFieldError>;
