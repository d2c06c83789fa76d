//! Per-frame particle integration.
//!
//! Each particle is pulled toward its home by a spring, damped with an
//! exponential decay (frame-rate independent), pushed or pulled by the
//! pointer, integrated with semi-implicit Euler, then modulated by the
//! animation style and fade effects.

use super::color::clamp;
use super::field::{Particle, ParticleField};
use super::types::{AnimationStyle, Pointer, PointerReaction, SimConfig, Viewport};

/// Spring constant toward home.
pub const SPRING_STRENGTH: f64 = 7.5;
/// Exponential velocity decay rate, per second.
pub const DAMPING: f64 = 9.0;
/// Longest step a single frame may take, in seconds.
pub const MAX_DT: f64 = 0.033;
/// How far past the canvas edge a particle may travel.
pub const BOUNDS_MARGIN: f64 = 50.0;
/// Keeps the pointer direction finite when a particle sits under the pointer.
const DIST_EPSILON: f64 = 1e-4;

/// Opacity at the pointer for fade effects; rises linearly to 1 at the radius.
pub const FADE_MIN_OPACITY: f64 = 0.15;

/// Time input for one integration step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Step {
	/// Seconds since the previous step, within `[0, MAX_DT]`.
	pub dt: f64,
	/// Monotonic clock in milliseconds, drives pulse and float.
	pub now_ms: f64,
}

impl Step {
	/// Step of `dt` seconds, clamped to `[0, MAX_DT]`.
	pub fn new(dt: f64, now_ms: f64) -> Self {
		Self {
			dt: clamp(dt, 0.0, MAX_DT),
			now_ms,
		}
	}
}

/// Turns frame timestamps into [`Step`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
	last_ms: Option<f64>,
}

impl FrameClock {
	/// Step for a frame at `timestamp_ms`. The first frame after a
	/// (re)start has `dt = 0`.
	pub fn tick(&mut self, timestamp_ms: f64) -> Step {
		let elapsed = self.last_ms.map_or(0.0, |last| (timestamp_ms - last) / 1000.0);
		self.last_ms = Some(timestamp_ms);
		Step::new(elapsed, timestamp_ms)
	}

	/// Forgets the last frame, so the next tick starts from `dt = 0`.
	pub fn reset(&mut self) {
		self.last_ms = None;
	}
}

/// Linear falloff: 1 at the pointer, 0 at and beyond `radius`.
pub fn falloff(dist: f64, radius: f64) -> f64 {
	if dist < radius {
		1.0 - dist / radius
	} else {
		0.0
	}
}

/// Opacity for a particle `dist` away from the pointer under a fade effect.
pub fn fade_opacity(dist: f64, radius: f64) -> f64 {
	let t = clamp(dist / radius, 0.0, 1.0);
	FADE_MIN_OPACITY + t * (1.0 - FADE_MIN_OPACITY)
}

/// Spring toward home, then exponential damping. `decay` is
/// `exp(-DAMPING * dt)`, computed once per frame by the caller.
pub fn spring_damp(p: &mut Particle, dt: f64, decay: f64) {
	p.vx += (p.home_x() - p.x) * SPRING_STRENGTH * dt;
	p.vy += (p.home_y() - p.y) * SPRING_STRENGTH * dt;
	p.vx *= decay;
	p.vy *= decay;
}

/// Radial pointer force. Positive `strength` pushes away, negative pulls in.
pub fn pointer_push(p: &mut Particle, pointer: &Pointer, radius: f64, strength: f64, dt: f64) {
	let (dx, dy) = (p.x - pointer.x, p.y - pointer.y);
	let dist_sq = dx * dx + dy * dy;
	if dist_sq >= radius * radius {
		return;
	}
	let dist = dist_sq.sqrt() + DIST_EPSILON;
	let force = strength * falloff(dist, radius);
	p.vx += dx / dist * force * dt;
	p.vy += dy / dist * force * dt;
}

/// Size/opacity modulation for the active animation style.
pub fn animate(p: &mut Particle, style: AnimationStyle, step: &Step) {
	match style {
		AnimationStyle::Pulse => {
			let phase = (p.home_x() + p.home_y()) * 0.01 + step.now_ms * 0.002;
			p.size_scale = 0.9 + phase.sin() * 0.1;
			p.opacity = 1.0;
		}
		AnimationStyle::Float => {
			p.size_scale = 1.0;
			p.y += (p.home_x() * 0.02 + step.now_ms * 0.0015).sin() * 0.08;
			p.opacity = 1.0;
		}
		AnimationStyle::Twinkle => {
			p.twinkle_phase += step.dt * 6.0;
			p.opacity = 0.6 + p.twinkle_phase.sin() * 0.4;
		}
		AnimationStyle::None => {
			p.size_scale = 1.0;
			p.opacity = 1.0;
		}
	}
}

/// Advances every particle by one step.
///
/// Tolerates an empty field; a field replaced between frames is simply the
/// new field.
pub fn advance(
	field: &mut ParticleField,
	step: &Step,
	pointer: &Pointer,
	config: &SimConfig,
	viewport: Viewport,
) {
	let dt = step.dt;
	let decay = (-DAMPING * dt).exp();
	let radius = config.hover_radius;
	let reaction = if pointer.inside {
		config.pointer_reaction()
	} else {
		PointerReaction::None
	};
	let strength = match reaction {
		PointerReaction::Repel => Some(config.repel_force),
		PointerReaction::Attract => Some(config.attract_force),
		PointerReaction::None | PointerReaction::Fade => None,
	};
	let fades =
		reaction == PointerReaction::Fade && config.animation_style != AnimationStyle::Twinkle;
	let (max_x, max_y) = (
		viewport.width() as f64 + BOUNDS_MARGIN,
		viewport.height() as f64 + BOUNDS_MARGIN,
	);

	for p in &mut field.particles {
		spring_damp(p, dt, decay);

		if let Some(strength) = strength {
			pointer_push(p, pointer, radius, strength, dt);
		}

		p.x += p.vx * dt;
		p.y += p.vy * dt;

		animate(p, config.animation_style, step);

		if fades {
			p.opacity = fade_opacity(pointer.distance_to(p.x, p.y), radius);
		}

		p.opacity = clamp(p.opacity, 0.0, 1.0);
		p.x = clamp(p.x, -BOUNDS_MARGIN, max_x);
		p.y = clamp(p.y, -BOUNDS_MARGIN, max_y);
	}
}

#[cfg(test)]
mod tests {
	use super::super::color::Color;
	use super::super::sampler::Seed;
	use super::super::types::{HoverEffect, SecondaryHoverEffect, Shape};
	use super::*;

	fn single(x: f64, y: f64) -> ParticleField {
		ParticleField {
			particles: vec![Particle::at_home(x, y, Color::WHITE, 0.0)],
		}
	}

	fn quiet_config() -> SimConfig {
		SimConfig {
			hover_effect: HoverEffect::None,
			..SimConfig::default()
		}
	}

	#[test]
	fn test_frame_clock_first_frame_and_stall_clamp() {
		let mut clock = FrameClock::default();
		assert_eq!(clock.tick(1000.0).dt, 0.0);
		assert!((clock.tick(1016.0).dt - 0.016).abs() < 1e-12);
		assert_eq!(clock.tick(9000.0).dt, MAX_DT);
		assert_eq!(clock.tick(8000.0).dt, 0.0);
		clock.reset();
		assert_eq!(clock.tick(20000.0).dt, 0.0);
	}

	#[test]
	fn test_zero_dt_is_a_fixed_point() {
		let mut field = ParticleField::from_seeds(
			&[
				Seed { x: 10.0, y: 20.0, color: Color::WHITE },
				Seed { x: 30.0, y: 40.0, color: Color::WHITE },
			],
			1,
		);
		for p in &mut field.particles {
			p.vx = 3.0;
			p.vy = -2.0;
		}
		let before = field.particles.clone();
		let config = SimConfig {
			hover_effect: HoverEffect::Repel,
			..SimConfig::default()
		};
		let pointer = Pointer::at(12.0, 20.0);
		advance(&mut field, &Step::new(0.0, 0.0), &pointer, &config, Viewport::default());

		for (a, b) in before.iter().zip(field.iter()) {
			assert_eq!((a.x, a.y, a.vx, a.vy), (b.x, b.y, b.vx, b.vy));
		}
	}

	#[test]
	fn test_converges_home_without_pointer() {
		let mut field = single(100.0, 100.0);
		field.particles[0].x = 160.0;
		field.particles[0].y = 40.0;
		field.particles[0].vx = 200.0;
		let pointer = Pointer { x: 1000.0, y: 1000.0, inside: false };

		for frame in 0..2000 {
			let step = Step::new(0.016, frame as f64 * 16.0);
			advance(&mut field, &step, &pointer, &quiet_config(), Viewport::default());
		}
		let p = &field.particles[0];
		assert!((p.x - 100.0).abs() < 1e-3, "x = {}", p.x);
		assert!((p.y - 100.0).abs() < 1e-3, "y = {}", p.y);
		assert!(p.vx.abs() < 1e-3 && p.vy.abs() < 1e-3);
	}

	#[test]
	fn test_falloff_is_full_at_pointer_and_zero_at_radius() {
		assert!((falloff(0.0 + DIST_EPSILON, 150.0) - 1.0).abs() < 1e-6);
		assert_eq!(falloff(150.0, 150.0), 0.0);
		assert_eq!(falloff(200.0, 150.0), 0.0);
		assert!((falloff(75.0, 150.0) - 0.5).abs() < 1e-12);
	}

	#[test]
	fn test_repel_pushes_away_and_attract_pulls_in() {
		let step = Step::new(0.016, 0.0);
		let pointer = Pointer::at(100.0, 100.0);

		let mut p = Particle::at_home(110.0, 100.0, Color::WHITE, 0.0);
		pointer_push(&mut p, &pointer, 150.0, 520.0, step.dt);
		assert!(p.vx > 0.0);
		assert!(p.vy.abs() < 1e-12);

		let mut p = Particle::at_home(110.0, 100.0, Color::WHITE, 0.0);
		pointer_push(&mut p, &pointer, 150.0, -360.0, step.dt);
		assert!(p.vx < 0.0);
	}

	#[test]
	fn test_pointer_force_vanishes_at_radius_and_under_pointer() {
		let pointer = Pointer::at(0.0, 0.0);

		let mut at_edge = Particle::at_home(150.0, 0.0, Color::WHITE, 0.0);
		pointer_push(&mut at_edge, &pointer, 150.0, 520.0, 0.016);
		assert_eq!((at_edge.vx, at_edge.vy), (0.0, 0.0));

		let mut under = Particle::at_home(0.0, 0.0, Color::WHITE, 0.0);
		pointer_push(&mut under, &pointer, 150.0, 520.0, 0.016);
		assert_eq!((under.vx, under.vy), (0.0, 0.0));
		assert!(under.vx.is_finite());
	}

	#[test]
	fn test_pointer_outside_has_no_effect() {
		let config = SimConfig {
			hover_effect: HoverEffect::Repel,
			..SimConfig::default()
		};
		let mut with = single(100.0, 100.0);
		let mut without = single(100.0, 100.0);
		let step = Step::new(0.016, 0.0);
		let pointer = Pointer { x: 105.0, y: 100.0, inside: false };
		advance(&mut with, &step, &pointer, &config, Viewport::default());
		advance(&mut without, &step, &pointer, &quiet_config(), Viewport::default());
		assert_eq!(with.particles, without.particles);
	}

	#[test]
	fn test_secondary_effect_gated_on_shape_hover() {
		let step = Step::new(0.016, 0.0);
		let pointer = Pointer::at(95.0, 100.0);

		let mut config = SimConfig {
			hover_effect: HoverEffect::None,
			hover_effect2: SecondaryHoverEffect::Repel,
			..SimConfig::default()
		};
		let mut field = single(100.0, 100.0);
		advance(&mut field, &step, &pointer, &config, Viewport::default());
		assert_eq!(field.particles[0].vx, 0.0);

		config.hover_effect = HoverEffect::Shape;
		let mut field = single(100.0, 100.0);
		advance(&mut field, &step, &pointer, &config, Viewport::default());
		assert!(field.particles[0].vx > 0.0);
	}

	#[test]
	fn test_fade_lowers_opacity_near_pointer() {
		let step = Step::new(0.016, 0.0);
		let config = SimConfig {
			hover_effect: HoverEffect::Fade,
			..SimConfig::default()
		};
		let mut field = ParticleField {
			particles: vec![
				Particle::at_home(100.0, 100.0, Color::WHITE, 0.0),
				Particle::at_home(400.0, 100.0, Color::WHITE, 0.0),
			],
		};
		let pointer = Pointer::at(100.0, 100.0);
		advance(&mut field, &step, &pointer, &config, Viewport::default());
		assert!((field.particles[0].opacity - FADE_MIN_OPACITY).abs() < 1e-9);
		assert!((field.particles[1].opacity - 1.0).abs() < 1e-12);
	}

	#[test]
	fn test_secondary_fade_and_twinkle_exclusion() {
		let step = Step::new(0.016, 0.0);
		let pointer = Pointer::at(100.0, 100.0);
		let mut config = SimConfig {
			hover_effect: HoverEffect::Shape,
			hover_effect2: SecondaryHoverEffect::Fade,
			..SimConfig::default()
		};
		let mut field = single(100.0, 100.0);
		advance(&mut field, &step, &pointer, &config, Viewport::default());
		assert!(field.particles[0].opacity < 0.2);

		config.animation_style = AnimationStyle::Twinkle;
		let mut field = single(100.0, 100.0);
		advance(&mut field, &step, &pointer, &config, Viewport::default());
		let expected = 0.6 + (6.0 * step.dt).sin() * 0.4;
		assert!((field.particles[0].opacity - expected).abs() < 1e-12);
	}

	#[test]
	fn test_animation_styles() {
		let step = Step::new(0.02, 500.0);
		let mut p = Particle::at_home(50.0, 50.0, Color::WHITE, 0.0);

		animate(&mut p, AnimationStyle::Pulse, &step);
		let expected = 0.9 + (100.0f64 * 0.01 + 500.0 * 0.002).sin() * 0.1;
		assert!((p.size_scale - expected).abs() < 1e-12);
		assert_eq!(p.opacity, 1.0);

		let y = p.y;
		animate(&mut p, AnimationStyle::Float, &step);
		assert_eq!(p.size_scale, 1.0);
		assert!((p.y - y - (50.0f64 * 0.02 + 500.0 * 0.0015).sin() * 0.08).abs() < 1e-12);

		animate(&mut p, AnimationStyle::Twinkle, &step);
		assert!((p.twinkle_phase - 0.12).abs() < 1e-12);
		assert!((p.opacity - (0.6 + 0.12f64.sin() * 0.4)).abs() < 1e-12);

		p.size_scale = 0.85;
		p.opacity = 0.3;
		animate(&mut p, AnimationStyle::None, &step);
		assert_eq!((p.size_scale, p.opacity), (1.0, 1.0));
	}

	#[test]
	fn test_opacity_and_size_stay_valid_for_every_config() {
		let viewport = Viewport::new(300, 200);
		for style in AnimationStyle::ALL {
			for hover in HoverEffect::ALL {
				for hover2 in SecondaryHoverEffect::ALL {
					let config = SimConfig {
						animation_style: *style,
						hover_effect: *hover,
						hover_effect2: *hover2,
						shape_type: Shape::Moon,
						..SimConfig::default()
					};
					let mut field = ParticleField::from_seeds(
						&(0..30)
							.map(|i| Seed {
								x: (i * 10) as f64,
								y: (i * 7) as f64,
								color: Color::WHITE,
							})
							.collect::<Vec<_>>(),
						9,
					);
					for frame in 0..120 {
						let pointer = Pointer {
							x: (frame * 3) as f64,
							y: 100.0,
							inside: frame % 40 != 0,
						};
						let step = Step::new(0.016 + (frame % 3) as f64 * 0.02, frame as f64 * 16.0);
						advance(&mut field, &step, &pointer, &config, viewport);
						for p in field.iter() {
							assert!((0.0..=1.0).contains(&p.opacity));
							assert!(p.size_scale > 0.0);
							assert!(p.x >= -BOUNDS_MARGIN && p.x <= 350.0);
							assert!(p.y >= -BOUNDS_MARGIN && p.y <= 250.0);
						}
					}
				}
			}
		}
	}

	#[test]
	fn test_positions_clamped_to_soft_margin() {
		let mut field = single(10.0, 10.0);
		field.particles[0].vx = -1.0e6;
		field.particles[0].vy = 1.0e6;
		let step = Step::new(0.033, 0.0);
		let viewport = Viewport::new(100, 80);
		advance(&mut field, &step, &Pointer::outside(), &quiet_config(), viewport);
		assert_eq!(field.particles[0].x, -BOUNDS_MARGIN);
		assert_eq!(field.particles[0].y, 130.0);
	}

	#[test]
	fn test_empty_field_is_fine() {
		let mut field = ParticleField::default();
		let step = Step::new(0.016, 0.0);
		let pointer = Pointer::at(1.0, 1.0);
		advance(&mut field, &step, &pointer, &SimConfig::default(), Viewport::default());
		assert!(field.is_empty());
	}
}
