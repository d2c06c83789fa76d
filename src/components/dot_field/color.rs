//! Color helpers shared by the sampler, renderer and exporter.

use serde::{Deserialize, Serialize};

/// Clamps `value` into `[min, max]`.
///
/// Unlike [`f64::clamp`] this never panics on an inverted range and maps NaN
/// to `min`, so it is safe to use on values coming straight from the UI.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
	if value.is_nan() {
		return min;
	}
	min.max(max.min(value))
}

/// RGBA color. Channels are bytes, alpha is a fraction in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha in `[0, 1]`.
	pub a: f64,
}

impl Default for Color {
	fn default() -> Self {
		Self::BLACK
	}
}

impl Color {
	/// Opaque black.
	pub const BLACK: Color = Color::rgb(0, 0, 0);
	/// Opaque white.
	pub const WHITE: Color = Color::rgb(255, 255, 255);

	/// Opaque color from channels.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with explicit alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color with `a` as alpha.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Parses `#rrggbb`, `rrggbb` or the shorthand `#rgb`.
	///
	/// Anything else falls back to opaque white, which keeps a malformed
	/// color input from breaking the frame.
	pub fn from_hex(hex: &str) -> Self {
		Self::parse_hex(hex).unwrap_or(Self::WHITE)
	}

	/// Strict variant of [`Color::from_hex`].
	pub fn parse_hex(hex: &str) -> Option<Self> {
		let digits = hex.strip_prefix('#').unwrap_or(hex);
		if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
			return None;
		}
		let expanded: String = match digits.len() {
			3 => digits.chars().flat_map(|c| [c, c]).collect(),
			6 => digits.to_string(),
			_ => return None,
		};
		let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
		Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
	}

	/// `rgba(r, g, b, a)` with the alpha clamped into `[0, 1]`.
	pub fn to_css(self) -> String {
		format!(
			"rgba({}, {}, {}, {})",
			self.r,
			self.g,
			self.b,
			clamp(self.a, 0.0, 1.0)
		)
	}

	/// `#rrggbb`, alpha dropped.
	pub fn to_css_rgb(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}
}

/// Serde adapter storing a [`Color`] as a `#rrggbb` string.
pub mod hex {
	use serde::{Deserialize, Deserializer, Serializer};

	use super::Color;

	/// Writes the color as `#rrggbb`.
	pub fn serialize<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&color.to_css_rgb())
	}

	/// Reads a `#rgb` or `#rrggbb` string; bad input falls back to white.
	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
		let s = String::deserialize(deserializer)?;
		Ok(Color::from_hex(&s))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_clamp_handles_nan_and_bounds() {
		assert_eq!(clamp(5.0, 0.0, 1.0), 1.0);
		assert_eq!(clamp(-5.0, 0.0, 1.0), 0.0);
		assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
		assert_eq!(clamp(f64::NAN, 0.0, 1.0), 0.0);
	}

	#[test]
	fn test_hex_parsing() {
		assert_eq!(Color::from_hex("#ff8000"), Color::rgb(255, 128, 0));
		assert_eq!(Color::from_hex("FF8000"), Color::rgb(255, 128, 0));
		assert_eq!(Color::from_hex("#f80"), Color::rgb(255, 136, 0));
		assert_eq!(Color::from_hex("#12345"), Color::WHITE);
		assert_eq!(Color::from_hex("#gg0000"), Color::WHITE);
		assert_eq!(Color::from_hex(""), Color::WHITE);
	}

	#[test]
	fn test_css_output() {
		assert_eq!(Color::rgb(1, 2, 3).to_css(), "rgba(1, 2, 3, 1)");
		assert_eq!(Color::rgba(1, 2, 3, 0.5).to_css(), "rgba(1, 2, 3, 0.5)");
		assert_eq!(Color::rgba(1, 2, 3, 4.0).to_css(), "rgba(1, 2, 3, 1)");
		assert_eq!(Color::rgb(255, 0, 16).to_css_rgb(), "#ff0010");
	}
}
