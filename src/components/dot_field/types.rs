//! Configuration, pointer and viewport types consumed by the simulation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::color::{self, Color};

/// Largest canvas the field is laid out on.
pub const MAX_CANVAS_WIDTH: i32 = 1920;
/// Largest canvas the field is laid out on.
pub const MAX_CANVAS_HEIGHT: i32 = 1080;

/// Generates `as_str`, `ALL`, `Display` and `FromStr` for a plain option enum
/// using its lowercase serialized names.
macro_rules! option_enum {
	($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
		impl $name {
			/// Every variant, in menu order.
			pub const ALL: &'static [$name] = &[$($name::$variant),+];

			/// Lowercase name used in the UI and the export document.
			pub fn as_str(self) -> &'static str {
				match self {
					$($name::$variant => $text),+
				}
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(self.as_str())
			}
		}

		impl FromStr for $name {
			type Err = UnknownOption;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				match s {
					$($text => Ok($name::$variant),)+
					other => Err(UnknownOption(other.to_string())),
				}
			}
		}
	};
}

/// A select value that does not name any known option.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownOption(pub String);

impl fmt::Display for UnknownOption {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "unknown option: {}", self.0)
	}
}

/// Glyph drawn for a particle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
	/// Filled circle.
	#[default]
	Dots,
	/// Five-pointed star.
	Star,
	/// Crescent.
	Moon,
	/// Heart.
	Heart,
	/// Right-pointing arrow.
	Arrow,
	/// Axis-aligned square.
	Square,
	/// Square rotated 45 degrees.
	Diamond,
	/// Upward triangle.
	Triangle,
}

option_enum!(Shape {
	Dots => "dots",
	Star => "star",
	Moon => "moon",
	Heart => "heart",
	Arrow => "arrow",
	Square => "square",
	Diamond => "diamond",
	Triangle => "triangle",
});

/// Per-frame size/opacity modulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationStyle {
	/// Static dots.
	#[default]
	None,
	/// Size breathes in a slow wave.
	Pulse,
	/// Dots bob vertically.
	Float,
	/// Opacity flickers per dot.
	Twinkle,
}

option_enum!(AnimationStyle {
	None => "none",
	Pulse => "pulse",
	Float => "float",
	Twinkle => "twinkle",
});

/// Primary reaction of particles near the pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoverEffect {
	/// No pointer reaction.
	None,
	/// Push dots away from the pointer.
	#[default]
	Repel,
	/// Pull dots toward the pointer.
	Attract,
	/// Dim dots near the pointer.
	Fade,
	/// Swap the glyph to [`SimConfig::shape_type`] and run
	/// [`SimConfig::hover_effect2`] on top.
	Shape,
}

option_enum!(HoverEffect {
	None => "none",
	Repel => "repel",
	Attract => "attract",
	Fade => "fade",
	Shape => "shape",
});

/// Secondary reaction, only consulted while [`HoverEffect::Shape`] is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecondaryHoverEffect {
	/// Nothing extra.
	#[default]
	None,
	/// Also repel.
	Repel,
	/// Also attract.
	Attract,
	/// Also fade.
	Fade,
}

option_enum!(SecondaryHoverEffect {
	None => "none",
	Repel => "repel",
	Attract => "attract",
	Fade => "fade",
});

/// Pointer reaction after resolving primary/secondary gating.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerReaction {
	/// No reaction.
	None,
	/// Push away.
	Repel,
	/// Pull in.
	Attract,
	/// Dim near the pointer.
	Fade,
}

impl From<SecondaryHoverEffect> for PointerReaction {
	fn from(effect: SecondaryHoverEffect) -> Self {
		match effect {
			SecondaryHoverEffect::None => PointerReaction::None,
			SecondaryHoverEffect::Repel => PointerReaction::Repel,
			SecondaryHoverEffect::Attract => PointerReaction::Attract,
			SecondaryHoverEffect::Fade => PointerReaction::Fade,
		}
	}
}

/// Everything the UI can tweak about the simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimConfig {
	/// Base glyph radius in canvas pixels, `[1, 20]`.
	pub dot_size: f64,
	/// Sampling stride in source pixels, `[2, 64]`.
	pub density: i32,
	/// Glyph for dots outside the hover set.
	pub default_shape: Shape,
	/// Animation style.
	pub animation_style: AnimationStyle,
	/// Primary pointer effect.
	pub hover_effect: HoverEffect,
	/// Glyph for hovered particles when `hover_effect == Shape`.
	pub shape_type: Shape,
	/// Extra effect when `hover_effect == Shape`.
	pub hover_effect2: SecondaryHoverEffect,
	/// Canvas background.
	#[serde(with = "color::hex")]
	pub background_color: Color,
	/// Pointer influence radius in pixels.
	pub hover_radius: f64,
	/// Repel strength.
	pub repel_force: f64,
	/// Negative: the repel formula then pulls inward.
	pub attract_force: f64,
}

impl Default for SimConfig {
	fn default() -> Self {
		Self {
			dot_size: 3.0,
			density: 6,
			default_shape: Shape::Dots,
			animation_style: AnimationStyle::None,
			hover_effect: HoverEffect::Repel,
			shape_type: Shape::Star,
			hover_effect2: SecondaryHoverEffect::None,
			background_color: Color::BLACK,
			hover_radius: 150.0,
			repel_force: 520.0,
			attract_force: -360.0,
		}
	}
}

impl SimConfig {
	/// Smallest dot radius.
	pub const MIN_DOT_SIZE: f64 = 1.0;
	/// Largest dot radius.
	pub const MAX_DOT_SIZE: f64 = 20.0;
	/// Finest sampling stride.
	pub const MIN_DENSITY: i32 = 2;
	/// Coarsest sampling stride.
	pub const MAX_DENSITY: i32 = 64;

	/// Returns a copy with every numeric field pulled back into range.
	///
	/// Out-of-range input is never an error; it is clamped to the nearest
	/// usable value.
	pub fn sanitized(&self) -> Self {
		let defaults = Self::default();
		let finite_or = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };
		Self {
			dot_size: color::clamp(self.dot_size, Self::MIN_DOT_SIZE, Self::MAX_DOT_SIZE),
			density: self.clamped_density(),
			hover_radius: finite_or(self.hover_radius, defaults.hover_radius).max(1.0),
			repel_force: finite_or(self.repel_force, defaults.repel_force),
			attract_force: finite_or(self.attract_force, defaults.attract_force),
			..self.clone()
		}
	}

	/// Sampling stride actually used by the sampler.
	pub fn clamped_density(&self) -> i32 {
		self.density.clamp(Self::MIN_DENSITY, Self::MAX_DENSITY)
	}

	/// Force/opacity reaction for the pointer, with the secondary effect only
	/// reachable through [`HoverEffect::Shape`].
	pub fn pointer_reaction(&self) -> PointerReaction {
		match self.hover_effect {
			HoverEffect::None => PointerReaction::None,
			HoverEffect::Repel => PointerReaction::Repel,
			HoverEffect::Attract => PointerReaction::Attract,
			HoverEffect::Fade => PointerReaction::Fade,
			HoverEffect::Shape => self.hover_effect2.into(),
		}
	}

	/// Glyph for hovered particles, if hovering swaps glyphs at all.
	pub fn hover_shape(&self) -> Option<Shape> {
		match self.hover_effect {
			HoverEffect::Shape => Some(self.shape_type),
			HoverEffect::None | HoverEffect::Repel | HoverEffect::Attract | HoverEffect::Fade => {
				None
			}
		}
	}
}

/// Pointer position in canvas-buffer pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
	/// Canvas-buffer x.
	pub x: f64,
	/// Canvas-buffer y.
	pub y: f64,
	/// Whether the pointer is over the canvas.
	pub inside: bool,
}

impl Pointer {
	/// Pointer inside the canvas at `(x, y)`.
	pub fn at(x: f64, y: f64) -> Self {
		Self { x, y, inside: true }
	}

	/// Pointer outside the canvas.
	pub fn outside() -> Self {
		Self::default()
	}

	/// Distance from the pointer to `(x, y)`.
	pub fn distance_to(&self, x: f64, y: f64) -> f64 {
		let (dx, dy) = (x - self.x, y - self.y);
		(dx * dx + dy * dy).sqrt()
	}
}

/// Canvas size in pixels, always within `[1, 1920] × [1, 1080]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Viewport {
	width: i32,
	height: i32,
}

impl Default for Viewport {
	fn default() -> Self {
		Self::new(800, 600)
	}
}

impl Viewport {
	/// Viewport clamped to `[1, 1920] × [1, 1080]`.
	pub fn new(width: i32, height: i32) -> Self {
		Self {
			width: width.clamp(1, MAX_CANVAS_WIDTH),
			height: height.clamp(1, MAX_CANVAS_HEIGHT),
		}
	}

	/// Builds a viewport from fractional CSS pixel sizes.
	pub fn from_css(width: f64, height: f64) -> Self {
		let to_i32 = |v: f64| if v.is_finite() { v.floor() as i32 } else { 1 };
		Self::new(to_i32(width), to_i32(height))
	}

	/// Width in pixels.
	pub fn width(&self) -> i32 {
		self.width
	}

	/// Height in pixels.
	pub fn height(&self) -> i32 {
		self.height
	}
}
