//! Portable snapshots of the dot field.
//!
//! The export document is a durable data contract: canvas size and
//! background, the display-relevant configuration, and each particle's home
//! position, shared radius and color. Per-particle animation state is not
//! captured. A bundle adds a standalone JavaScript player and usage notes,
//! packed into one ZIP archive for download.

use std::io::{Cursor, Write};

use log::info;
use serde::{Deserialize, Serialize};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::color::clamp;
use super::error::Result;
use super::field::ParticleField;
use super::types::{AnimationStyle, HoverEffect, SecondaryHoverEffect, Shape, SimConfig, Viewport};

/// Standalone player shipped next to `dots.json`.
pub const PLAYER_JS: &str = include_str!("../../../assets/player.js");
/// Usage notes shipped in the bundle.
pub const README_MD: &str = include_str!("../../../assets/README.export.md");

/// Name of the JSON snapshot.
pub const JSON_FILE_NAME: &str = "dots.json";
/// Name of the standalone player script.
pub const PLAYER_FILE_NAME: &str = "player.js";
/// Name of the usage notes.
pub const README_FILE_NAME: &str = "README.md";
/// Name of the still-image download.
pub const PNG_FILE_NAME: &str = "dots.png";
/// Archive holding the JSON, the player and the README.
pub const ZIP_FILE_NAME: &str = "animated-dots.zip";

/// Rounds to two decimals, the precision of every exported coordinate.
pub fn round2(value: f64) -> f64 {
	(value * 100.0).round() / 100.0
}

/// Canvas section of the export document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportCanvas {
	/// Canvas width in pixels.
	pub width: i32,
	/// Canvas height in pixels.
	pub height: i32,
	/// `#rrggbb`.
	pub background_color: String,
}

/// Configuration section of the export document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
	/// Dot radius in pixels.
	pub dot_size: f64,
	/// Sampling stride.
	pub density: i32,
	/// Glyph for every dot.
	#[serde(default)]
	pub default_shape: Shape,
	/// Animation style.
	#[serde(default)]
	pub animation_style: AnimationStyle,
	/// Primary hover effect.
	#[serde(default)]
	pub hover_effect: HoverEffect,
	/// Glyph for hovered dots.
	#[serde(default)]
	pub shape_type: Shape,
	/// Secondary hover effect.
	#[serde(default)]
	pub hover_effect2: SecondaryHoverEffect,
}

/// Particle color; alpha is always 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportColor {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Always 1.
	pub a: u8,
}

/// One exported particle: home position, radius and color.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportParticle {
	/// Home x, two decimals.
	pub x: f64,
	/// Home y, two decimals.
	pub y: f64,
	/// Dot radius, two decimals.
	pub r: f64,
	/// Dot color.
	pub color: ExportColor,
}

/// The complete export document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
	/// Canvas size and background.
	pub canvas: ExportCanvas,
	/// Display configuration.
	pub config: ExportConfig,
	/// One entry per particle, in field order.
	pub particles: Vec<ExportParticle>,
}

impl ExportDocument {
	/// Snapshots the field's home positions with the current configuration.
	pub fn capture(field: &ParticleField, config: &SimConfig, viewport: Viewport) -> Self {
		let size = clamp(config.dot_size, SimConfig::MIN_DOT_SIZE, SimConfig::MAX_DOT_SIZE);
		let r = round2(size);
		let particles = field
			.iter()
			.map(|p| ExportParticle {
				x: round2(p.home_x()),
				y: round2(p.home_y()),
				r,
				color: ExportColor {
					r: p.color.r,
					g: p.color.g,
					b: p.color.b,
					a: 1,
				},
			})
			.collect();

		Self {
			canvas: ExportCanvas {
				width: viewport.width(),
				height: viewport.height(),
				background_color: config.background_color.to_css_rgb(),
			},
			config: ExportConfig {
				dot_size: size,
				density: config.density,
				default_shape: config.default_shape,
				animation_style: config.animation_style,
				hover_effect: config.hover_effect,
				shape_type: config.shape_type,
				hover_effect2: config.hover_effect2,
			},
			particles,
		}
	}

	/// Compact JSON.
	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string(self)?)
	}

	/// Indented JSON, as shipped in the bundle.
	pub fn to_json_pretty(&self) -> Result<String> {
		Ok(serde_json::to_string_pretty(self)?)
	}

	/// Parses a document written by [`ExportDocument::to_json`].
	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}
}

/// A file ready to hand to the browser for download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportFile {
	/// File name inside the bundle.
	pub name: &'static str,
	/// MIME type for the download.
	pub mime: &'static str,
	/// File body.
	pub contents: String,
}

/// `dots.json` plus the standalone player and its README.
#[derive(Clone, Debug)]
pub struct ExportBundle {
	/// Files in bundle order.
	pub files: Vec<ExportFile>,
}

impl ExportBundle {
	/// Serializes `document` and adds the player and README.
	pub fn new(document: &ExportDocument) -> Result<Self> {
		let json = document.to_json_pretty()?;
		info!(
			"dotfield: bundled {} particles ({} bytes of JSON)",
			document.particles.len(),
			json.len()
		);
		Ok(Self {
			files: vec![
				ExportFile {
					name: JSON_FILE_NAME,
					mime: "application/json",
					contents: json,
				},
				ExportFile {
					name: PLAYER_FILE_NAME,
					mime: "text/javascript",
					contents: PLAYER_JS.to_string(),
				},
				ExportFile {
					name: README_FILE_NAME,
					mime: "text/markdown",
					contents: README_MD.to_string(),
				},
			],
		})
	}

	/// Looks up a bundled file by name.
	pub fn file(&self, name: &str) -> Option<&ExportFile> {
		self.files.iter().find(|f| f.name == name)
	}

	/// Packs every file into an uncompressed ZIP archive, in bundle order.
	pub fn to_zip(&self) -> Result<Vec<u8>> {
		let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
		let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
		for file in &self.files {
			writer.start_file(file.name, options)?;
			writer.write_all(file.contents.as_bytes())?;
		}
		let bytes = writer.finish()?.into_inner();
		info!("dotfield: packed {} files into {} bytes", self.files.len(), bytes.len());
		Ok(bytes)
	}
}
