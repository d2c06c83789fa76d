//! Vector outlines for every particle glyph.
//!
//! Outlines are plain path operations centred on `(x, y)` and scaled by
//! `size` (the glyph's outer radius), so they can be replayed on any 2D
//! canvas and checked without one.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use super::types::Shape;

/// Star inner radius relative to the outer radius.
pub const STAR_INNER_RATIO: f64 = 0.4;
/// Offset of the erased disk in a moon, relative to the radius.
pub const MOON_OFFSET_RATIO: f64 = 0.6;

/// One path-building operation, mirroring the canvas 2D path API.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathOp {
	/// Start a new subpath.
	MoveTo(f64, f64),
	/// Straight segment.
	LineTo(f64, f64),
	/// Cubic Bézier: two control points then the end point.
	BezierTo {
		/// First control point.
		cp1: (f64, f64),
		/// Second control point.
		cp2: (f64, f64),
		/// End point.
		to: (f64, f64),
	},
	/// Circular arc around `(x, y)`.
	Arc {
		/// Centre x.
		x: f64,
		/// Centre y.
		y: f64,
		/// Radius.
		radius: f64,
		/// Start angle in radians.
		start: f64,
		/// End angle in radians.
		end: f64,
		/// Sweep direction.
		anticlockwise: bool,
	},
	/// Close the current subpath.
	Close,
}

/// Closed outline of `shape` centred on `(x, y)`.
pub fn outline(shape: Shape, x: f64, y: f64, size: f64) -> Vec<PathOp> {
	match shape {
		Shape::Dots => vec![
			PathOp::Arc {
				x,
				y,
				radius: size,
				start: 0.0,
				end: TAU,
				anticlockwise: false,
			},
			PathOp::Close,
		],
		Shape::Star => star(x, y, size),
		Shape::Moon => moon(x, y, size),
		Shape::Heart => heart(x, y, size),
		Shape::Arrow => polygon(&[
			(x + size, y),
			(x, y - size),
			(x, y - size * 0.4),
			(x - size, y - size * 0.4),
			(x - size, y + size * 0.4),
			(x, y + size * 0.4),
			(x, y + size),
		]),
		Shape::Square => polygon(&[
			(x - size, y - size),
			(x + size, y - size),
			(x + size, y + size),
			(x - size, y + size),
		]),
		Shape::Diamond => polygon(&[(x, y - size), (x + size, y), (x, y + size), (x - size, y)]),
		Shape::Triangle => {
			let corner = |angle: f64| (x + size * angle.cos(), y + size * angle.sin());
			polygon(&[
				corner(-FRAC_PI_2),
				corner(-FRAC_PI_2 + TAU / 3.0),
				corner(-FRAC_PI_2 + 2.0 * TAU / 3.0),
			])
		}
	}
}

fn polygon(points: &[(f64, f64)]) -> Vec<PathOp> {
	let mut ops = Vec::with_capacity(points.len() + 1);
	for (i, &(px, py)) in points.iter().enumerate() {
		ops.push(if i == 0 {
			PathOp::MoveTo(px, py)
		} else {
			PathOp::LineTo(px, py)
		});
	}
	ops.push(PathOp::Close);
	ops
}

/// Five points, starting straight up, alternating outer and inner radius.
fn star(x: f64, y: f64, size: f64) -> Vec<PathOp> {
	let inner = size * STAR_INNER_RATIO;
	let points: Vec<(f64, f64)> = (0..10)
		.map(|i| {
			let r = if i % 2 == 0 { size } else { inner };
			let angle = -FRAC_PI_2 + i as f64 * PI / 5.0;
			(x + r * angle.cos(), y + r * angle.sin())
		})
		.collect();
	polygon(&points)
}

/// Disk minus an equal disk shifted right by `MOON_OFFSET_RATIO * size`.
///
/// Traced as one closed path (outer arc, then the inner edge of the shifted
/// disk) so it can be filled without erasing whatever is underneath.
fn moon(x: f64, y: f64, size: f64) -> Vec<PathOp> {
	let offset = size * MOON_OFFSET_RATIO;
	// Both circles meet where cos(theta) = offset / (2 * size).
	let theta = (offset / (2.0 * size)).acos();
	vec![
		PathOp::Arc {
			x,
			y,
			radius: size,
			start: theta,
			end: TAU - theta,
			anticlockwise: false,
		},
		PathOp::Arc {
			x: x + offset,
			y,
			radius: size,
			start: PI + theta,
			end: PI - theta,
			anticlockwise: true,
		},
		PathOp::Close,
	]
}

/// Two lobes and a bottom tip made of four cubic curves.
fn heart(x: f64, y: f64, s: f64) -> Vec<PathOp> {
	let top = (x, y - 0.35 * s);
	vec![
		PathOp::MoveTo(top.0, top.1),
		PathOp::BezierTo {
			cp1: (x, y - 0.8 * s),
			cp2: (x - s, y - 0.8 * s),
			to: (x - s, y - 0.2 * s),
		},
		PathOp::BezierTo {
			cp1: (x - s, y + 0.3 * s),
			cp2: (x - 0.4 * s, y + 0.6 * s),
			to: (x, y + s),
		},
		PathOp::BezierTo {
			cp1: (x + 0.4 * s, y + 0.6 * s),
			cp2: (x + s, y + 0.3 * s),
			to: (x + s, y - 0.2 * s),
		},
		PathOp::BezierTo {
			cp1: (x + s, y - 0.8 * s),
			cp2: (x, y - 0.8 * s),
			to: top,
		},
		PathOp::Close,
	]
}

#[cfg(test)]
mod tests {
	use super::*;

	fn vertices(ops: &[PathOp]) -> Vec<(f64, f64)> {
		ops.iter()
			.filter_map(|op| match *op {
				PathOp::MoveTo(x, y) | PathOp::LineTo(x, y) => Some((x, y)),
				_ => None,
			})
			.collect()
	}

	#[test]
	fn test_every_shape_is_closed() {
		for shape in Shape::ALL {
			let ops = outline(*shape, 10.0, 10.0, 5.0);
			assert_eq!(ops.last(), Some(&PathOp::Close), "{shape}");
		}
	}

	#[test]
	fn test_star_radii() {
		let points = vertices(&outline(Shape::Star, 0.0, 0.0, 10.0));
		assert_eq!(points.len(), 10);
		for (i, (x, y)) in points.iter().enumerate() {
			let r = (x * x + y * y).sqrt();
			let expected = if i % 2 == 0 { 10.0 } else { 4.0 };
			assert!((r - expected).abs() < 1e-9);
		}
		// First point straight up.
		assert!(points[0].0.abs() < 1e-9 && (points[0].1 + 10.0).abs() < 1e-9);
	}

	#[test]
	fn test_arrow_has_seven_points() {
		assert_eq!(vertices(&outline(Shape::Arrow, 0.0, 0.0, 3.0)).len(), 7);
	}

	#[test]
	fn test_polygons_fit_in_size_box() {
		for shape in [Shape::Square, Shape::Diamond, Shape::Triangle, Shape::Arrow] {
			for (x, y) in vertices(&outline(shape, 50.0, 50.0, 8.0)) {
				assert!((x - 50.0).abs() <= 8.0 + 1e-9);
				assert!((y - 50.0).abs() <= 8.0 + 1e-9);
			}
		}
	}

	fn arc_ends(op: PathOp) -> ((f64, f64), (f64, f64)) {
		let PathOp::Arc { x, y, radius, start, end, .. } = op else {
			panic!("expected an arc, got {op:?}");
		};
		let at = |angle: f64| (x + radius * angle.cos(), y + radius * angle.sin());
		(at(start), at(end))
	}

	#[test]
	fn test_moon_arcs_meet() {
		let ops = outline(Shape::Moon, 0.0, 0.0, 10.0);
		let (outer_start, outer_end) = arc_ends(ops[0]);
		let (inner_start, inner_end) = arc_ends(ops[1]);
		let close = |a: (f64, f64), b: (f64, f64)| (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9;
		assert!(close(outer_end, inner_start));
		assert!(close(inner_end, outer_start));
	}

	#[test]
	fn test_heart_returns_to_start() {
		let ops = outline(Shape::Heart, 5.0, 5.0, 4.0);
		let PathOp::MoveTo(sx, sy) = ops[0] else { panic!("heart starts with MoveTo") };
		let PathOp::BezierTo { to, .. } = ops[ops.len() - 2] else { panic!("heart ends with a curve") };
		assert_eq!(to, (sx, sy));
	}
}
