//! Image sampling: turns decoded pixels into particle seeds.
//!
//! The image is fitted into the canvas preserving aspect ratio, rasterized at
//! the fitted size, then walked on a square grid. Each grid cell contributes
//! at most one seed, read from its top-left pixel; nearly transparent pixels
//! are treated as background and skipped.

use image::RgbaImage;
use image::imageops::{self, FilterType};

use super::color::Color;
use super::error::{DotFieldError, Result};
use super::types::Viewport;

/// Pixels with alpha below this are background.
pub const ALPHA_THRESHOLD: u8 = 16;

/// How the image is scaled into the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FitPolicy {
	/// Largest size that fits, upscaling small images.
	#[default]
	Contain,
	/// Like `Contain`, but never upscales.
	ShrinkToFit,
}

/// Decodes raw image bytes (PNG, JPEG, GIF, BMP, WebP) into RGBA pixels.
pub fn decode(bytes: &[u8]) -> Result<RgbaImage> {
	let image = image::load_from_memory(bytes)?.to_rgba8();
	if image.width() == 0 || image.height() == 0 {
		return Err(DotFieldError::EmptyImage);
	}
	Ok(image)
}

/// Placement of the fitted image inside the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
	/// Image-to-canvas scale factor.
	pub scale: f64,
	/// Fitted width in pixels.
	pub target_width: u32,
	/// Fitted height in pixels.
	pub target_height: u32,
	/// Left edge of the fitted image.
	pub offset_x: i32,
	/// Top edge of the fitted image.
	pub offset_y: i32,
	/// Grid stride in fitted pixels, `[2, 64]`.
	pub stride: u32,
}

impl Layout {
	/// Fits an `image_width × image_height` image into `viewport`.
	pub fn fit(
		image_width: u32,
		image_height: u32,
		viewport: Viewport,
		density: i32,
		policy: FitPolicy,
	) -> Self {
		let (canvas_w, canvas_h) = (viewport.width() as f64, viewport.height() as f64);
		let (image_w, image_h) = (image_width.max(1) as f64, image_height.max(1) as f64);

		let contain = (canvas_w / image_w).min(canvas_h / image_h);
		let scale = match policy {
			FitPolicy::Contain => contain,
			FitPolicy::ShrinkToFit => contain.min(1.0),
		};

		let target_width = ((image_w * scale).floor() as u32).clamp(1, viewport.width() as u32);
		let target_height = ((image_h * scale).floor() as u32).clamp(1, viewport.height() as u32);

		Self {
			scale,
			target_width,
			target_height,
			offset_x: (viewport.width() - target_width as i32) / 2,
			offset_y: (viewport.height() - target_height as i32) / 2,
			stride: density.clamp(2, 64) as u32,
		}
	}
}

/// A sampled point before it becomes a particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Seed {
	/// Home x in canvas pixels.
	pub x: f64,
	/// Home y in canvas pixels.
	pub y: f64,
	/// Pixel color with alpha forced to 1.
	pub color: Color,
}

/// Result of sampling one image at one layout.
#[derive(Clone, Debug)]
pub struct Sampling {
	/// Where the image landed.
	pub layout: Layout,
	/// Seeds in row-major order.
	pub seeds: Vec<Seed>,
}

/// Samples `image` for a canvas of size `viewport` at the given density.
///
/// Pure: the same pixels, viewport and density always give the same seeds.
pub fn sample(image: &RgbaImage, viewport: Viewport, density: i32, policy: FitPolicy) -> Sampling {
	let layout = Layout::fit(image.width(), image.height(), viewport, density, policy);
	let raster = rasterize(image, &layout);
	let seeds = grid_seeds(&raster, &layout);
	Sampling { layout, seeds }
}

fn rasterize<'a>(image: &'a RgbaImage, layout: &Layout) -> std::borrow::Cow<'a, RgbaImage> {
	if image.width() == layout.target_width && image.height() == layout.target_height {
		std::borrow::Cow::Borrowed(image)
	} else {
		std::borrow::Cow::Owned(imageops::resize(
			image,
			layout.target_width,
			layout.target_height,
			FilterType::Triangle,
		))
	}
}

fn grid_seeds(raster: &RgbaImage, layout: &Layout) -> Vec<Seed> {
	let (w, h, step) = (raster.width(), raster.height(), layout.stride);
	let half = step as f64 / 2.0;
	let mut seeds = Vec::with_capacity(((w / step + 1) * (h / step + 1)) as usize);

	for y in (0..h).step_by(step as usize) {
		for x in (0..w).step_by(step as usize) {
			let [r, g, b, a] = raster.get_pixel(x, y).0;
			if a < ALPHA_THRESHOLD {
				continue;
			}
			// Half a stride in, even when the last cell is cut short by the edge.
			seeds.push(Seed {
				x: layout.offset_x as f64 + x as f64 + half,
				y: layout.offset_y as f64 + y as f64 + half,
				color: Color::rgb(r, g, b),
			});
		}
	}

	seeds
}
