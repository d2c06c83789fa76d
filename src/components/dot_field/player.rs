//! Replays an export document with the reduced feature set of the
//! standalone player: spring, damping, primary repel/attract/fade and the
//! animation styles, drawn as circles only.
//!
//! Mirrors `assets/player.js`, so exported snapshots can be checked without
//! a browser.

use std::f64::consts::TAU;

use super::color::{Color, clamp};
use super::export::ExportDocument;
use super::field::{Particle, ParticleField, pseudo_random};
use super::physics::{self, DAMPING, Step};
use super::render::{DrawCommand, FramePlan};
use super::types::{AnimationStyle, HoverEffect, Pointer, Shape, Viewport};

/// Hover constants baked into the standalone player.
const HOVER_RADIUS: f64 = 150.0;
const REPEL_FORCE: f64 = 520.0;
const ATTRACT_FORCE: f64 = -360.0;

/// Field and settings rebuilt from an export document.
#[derive(Clone, Debug)]
pub struct Player {
	field: ParticleField,
	viewport: Viewport,
	background: Color,
	dot_size: f64,
	animation_style: AnimationStyle,
	hover_effect: HoverEffect,
}

impl Player {
	/// Rebuilds the field: every particle starts at rest on its home.
	pub fn from_document(doc: &ExportDocument) -> Self {
		let particles = doc
			.particles
			.iter()
			.enumerate()
			.map(|(i, p)| {
				let color = Color::rgb(p.color.r, p.color.g, p.color.b);
				Particle::at_home(p.x, p.y, color, pseudo_random(i as f64 + 1.0) * TAU)
			})
			.collect();

		Self {
			field: ParticleField { particles },
			viewport: Viewport::new(doc.canvas.width, doc.canvas.height),
			background: Color::from_hex(&doc.canvas.background_color),
			dot_size: doc.config.dot_size,
			animation_style: doc.config.animation_style,
			hover_effect: doc.config.hover_effect,
		}
	}

	/// Current particles.
	pub fn field(&self) -> &ParticleField {
		&self.field
	}

	/// Canvas size from the document.
	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	/// One player step. `Shape` hovering and secondary effects do nothing
	/// here, and positions are not clamped to the canvas.
	pub fn advance(&mut self, step: &Step, pointer: &Pointer) {
		let dt = step.dt;
		let decay = (-DAMPING * dt).exp();
		let effect = if pointer.inside {
			self.hover_effect
		} else {
			HoverEffect::None
		};
		let strength = match effect {
			HoverEffect::Repel => Some(REPEL_FORCE),
			HoverEffect::Attract => Some(ATTRACT_FORCE),
			HoverEffect::None | HoverEffect::Fade | HoverEffect::Shape => None,
		};
		let fades = effect == HoverEffect::Fade && self.animation_style != AnimationStyle::Twinkle;

		for p in &mut self.field.particles {
			physics::spring_damp(p, dt, decay);
			if let Some(strength) = strength {
				physics::pointer_push(p, pointer, HOVER_RADIUS, strength, dt);
			}
			p.x += p.vx * dt;
			p.y += p.vy * dt;
			physics::animate(p, self.animation_style, step);
			if fades {
				p.opacity = physics::fade_opacity(pointer.distance_to(p.x, p.y), HOVER_RADIUS);
			}
		}
	}

	/// Circle-only frame.
	pub fn plan(&self) -> FramePlan {
		let commands = self
			.field
			.iter()
			.map(|p| DrawCommand {
				shape: Shape::Dots,
				x: p.x,
				y: p.y,
				size: self.dot_size * p.size_scale,
				color: p.color.with_alpha(clamp(p.opacity, 0.0, 1.0)),
			})
			.collect();

		FramePlan {
			width: self.viewport.width() as f64,
			height: self.viewport.height() as f64,
			background: self.background,
			commands,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::super::export::ExportDocument;
	use super::super::sampler::Seed;
	use super::super::types::{SecondaryHoverEffect, SimConfig};
	use super::*;

	fn document(config: &SimConfig) -> ExportDocument {
		let seeds: Vec<Seed> = (0..5)
			.map(|i| Seed {
				x: 100.0 + i as f64 * 10.0,
				y: 100.0,
				color: Color::rgb(200, 100, i as u8),
			})
			.collect();
		let field = ParticleField::from_seeds(&seeds, 7);
		ExportDocument::capture(&field, config, Viewport::new(400, 300))
	}

	#[test]
	fn test_rebuilds_field_at_rest_on_homes() {
		let config = SimConfig {
			dot_size: 4.0,
			background_color: Color::rgb(9, 8, 7),
			..SimConfig::default()
		};
		let player = Player::from_document(&document(&config));
		assert_eq!(player.field().len(), 5);
		assert_eq!(player.viewport(), Viewport::new(400, 300));
		for (i, p) in player.field().iter().enumerate() {
			assert_eq!((p.x, p.y), (p.home_x(), p.home_y()));
			assert_eq!(p.home_x(), 100.0 + i as f64 * 10.0);
		}

		let plan = player.plan();
		assert_eq!(plan.background, Color::rgb(9, 8, 7));
		assert!(plan.commands.iter().all(|c| c.shape == Shape::Dots && c.size == 4.0));
	}

	#[test]
	fn test_custom_shapes_are_not_replayed() {
		let config = SimConfig {
			default_shape: Shape::Star,
			hover_effect: HoverEffect::Shape,
			hover_effect2: SecondaryHoverEffect::Repel,
			..SimConfig::default()
		};
		let mut player = Player::from_document(&document(&config));
		let before = player.field().clone();
		player.advance(&Step::new(0.016, 0.0), &Pointer::at(105.0, 100.0));

		// Secondary repel is dropped, and nothing moves from rest.
		assert_eq!(player.field().particles, before.particles);
		assert!(player.plan().commands.iter().all(|c| c.shape == Shape::Dots));
	}

	#[test]
	fn test_repel_and_settle() {
		let config = SimConfig {
			hover_effect: HoverEffect::Repel,
			..SimConfig::default()
		};
		let mut player = Player::from_document(&document(&config));
		let pointer = Pointer::at(95.0, 100.0);
		for frame in 0..10 {
			player.advance(&Step::new(0.016, frame as f64 * 16.0), &pointer);
		}
		assert!(player.field().particles[0].x > 100.0);

		for frame in 0..2000 {
			player.advance(&Step::new(0.016, frame as f64 * 16.0), &Pointer::outside());
		}
		let p = &player.field().particles[0];
		assert!((p.x - p.home_x()).abs() < 1e-3);
	}

	#[test]
	fn test_fade_near_pointer() {
		let config = SimConfig {
			hover_effect: HoverEffect::Fade,
			..SimConfig::default()
		};
		let mut player = Player::from_document(&document(&config));
		player.advance(&Step::new(0.016, 0.0), &Pointer::at(100.0, 100.0));
		let opacity = player.field().particles[0].opacity;
		assert!((opacity - physics::FADE_MIN_OPACITY).abs() < 1e-9);
	}
}
