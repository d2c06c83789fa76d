//! Frame planning and canvas drawing.
//!
//! Rendering is split in two passes:
//! 1. [`plan_frame`] decides, per particle, which glyph, size and color to
//!    draw. It is pure and knows nothing about the canvas.
//! 2. [`render`] replays a plan on a `CanvasRenderingContext2d`: background
//!    first, then every glyph with additive ("lighter") blending so
//!    overlapping dots brighten instead of hiding each other.

use web_sys::CanvasRenderingContext2d;

use super::color::{Color, clamp};
use super::field::ParticleField;
use super::shapes::{self, PathOp};
use super::types::{Pointer, Shape, SimConfig, Viewport};

/// Canvas composite mode used for particles.
pub const PARTICLE_COMPOSITE: &str = "lighter";

/// Which particles are inside the hover radius this frame.
///
/// Computed once per frame so every glyph decision in that frame agrees.
#[derive(Clone, Debug, Default)]
pub struct HoverSet {
	hovered: Vec<bool>,
}

impl HoverSet {
	/// Empty unless the pointer is inside and hovering swaps glyphs.
	pub fn compute(field: &ParticleField, pointer: &Pointer, config: &SimConfig) -> Self {
		if !pointer.inside || config.hover_shape().is_none() {
			return Self::default();
		}
		let radius_sq = config.hover_radius * config.hover_radius;
		let hovered = field
			.iter()
			.map(|p| {
				let (dx, dy) = (p.x - pointer.x, p.y - pointer.y);
				dx * dx + dy * dy < radius_sq
			})
			.collect();
		Self { hovered }
	}

	/// Whether particle `index` is hovered.
	pub fn contains(&self, index: usize) -> bool {
		self.hovered.get(index).copied().unwrap_or(false)
	}

	/// Number of hovered particles.
	pub fn count(&self) -> usize {
		self.hovered.iter().filter(|h| **h).count()
	}
}

/// One glyph to draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand {
	/// Glyph to draw.
	pub shape: Shape,
	/// Centre x.
	pub x: f64,
	/// Centre y.
	pub y: f64,
	/// Outer radius in canvas pixels.
	pub size: f64,
	/// Fill color; alpha is the particle's opacity.
	pub color: Color,
}

impl DrawCommand {
	/// Path of the glyph at its position and size.
	pub fn outline(&self) -> Vec<PathOp> {
		shapes::outline(self.shape, self.x, self.y, self.size)
	}
}

/// Everything needed to draw one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FramePlan {
	/// Canvas width.
	pub width: f64,
	/// Canvas height.
	pub height: f64,
	/// Background fill.
	pub background: Color,
	/// Glyphs in draw order.
	pub commands: Vec<DrawCommand>,
}

/// Decides glyph, size and color for every particle.
///
/// Hovered particles use `shape_type` while `hover_effect` is `Shape`;
/// everyone else uses `default_shape`. Fully transparent particles are
/// dropped from the plan.
pub fn plan_frame(
	field: &ParticleField,
	config: &SimConfig,
	pointer: &Pointer,
	viewport: Viewport,
) -> FramePlan {
	let size = clamp(config.dot_size, SimConfig::MIN_DOT_SIZE, SimConfig::MAX_DOT_SIZE);
	let hover = HoverSet::compute(field, pointer, config);
	let hover_shape = config.hover_shape();

	let commands = field
		.iter()
		.enumerate()
		.filter(|(_, p)| p.opacity > 0.0)
		.map(|(i, p)| {
			let shape = match hover_shape {
				Some(shape) if hover.contains(i) => shape,
				_ => config.default_shape,
			};
			DrawCommand {
				shape,
				x: p.x,
				y: p.y,
				size: size * p.size_scale,
				color: p.color.with_alpha(clamp(p.opacity, 0.0, 1.0)),
			}
		})
		.collect();

	FramePlan {
		width: viewport.width() as f64,
		height: viewport.height() as f64,
		background: config.background_color,
		commands,
	}
}

/// Draws a frame plan onto the canvas.
pub fn render(ctx: &CanvasRenderingContext2d, plan: &FramePlan) {
	ctx.set_fill_style_str(&plan.background.to_css_rgb());
	ctx.fill_rect(0.0, 0.0, plan.width, plan.height);

	ctx.save();
	let _ = ctx.set_global_composite_operation(PARTICLE_COMPOSITE);
	for cmd in &plan.commands {
		ctx.set_fill_style_str(&cmd.color.to_css());
		ctx.begin_path();
		trace(ctx, &cmd.outline());
		ctx.fill();
	}
	ctx.restore();
}

fn trace(ctx: &CanvasRenderingContext2d, ops: &[PathOp]) {
	for op in ops {
		match *op {
			PathOp::MoveTo(x, y) => ctx.move_to(x, y),
			PathOp::LineTo(x, y) => ctx.line_to(x, y),
			PathOp::BezierTo { cp1, cp2, to } => {
				ctx.bezier_curve_to(cp1.0, cp1.1, cp2.0, cp2.1, to.0, to.1)
			}
			PathOp::Arc {
				x,
				y,
				radius,
				start,
				end,
				anticlockwise,
			} => {
				let _ = ctx.arc_with_anticlockwise(x, y, radius, start, end, anticlockwise);
			}
			PathOp::Close => ctx.close_path(),
		}
	}
}
