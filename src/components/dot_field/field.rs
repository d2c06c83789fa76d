//! Particle storage.

use std::f64::consts::TAU;

use super::color::Color;
use super::sampler::Seed;

/// Largest initial offset from home along each axis.
const JITTER: f64 = 0.25;

/// A single dot. Home is fixed at creation, everything else moves per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	home_x: f64,
	home_y: f64,
	/// Current x.
	pub x: f64,
	/// Current y.
	pub y: f64,
	/// Velocity along x, pixels per second.
	pub vx: f64,
	/// Velocity along y, pixels per second.
	pub vy: f64,
	/// Sampled color, fully opaque.
	pub color: Color,
	/// Draw opacity in `[0, 1]`.
	pub opacity: f64,
	/// Multiplier on the configured dot size.
	pub size_scale: f64,
	/// Twinkle oscillator phase in radians.
	pub twinkle_phase: f64,
}

impl Particle {
	/// A particle resting exactly at its home, with the given twinkle phase.
	pub fn at_home(home_x: f64, home_y: f64, color: Color, twinkle_phase: f64) -> Self {
		Self {
			home_x,
			home_y,
			x: home_x,
			y: home_y,
			vx: 0.0,
			vy: 0.0,
			color: color.with_alpha(1.0),
			opacity: 1.0,
			size_scale: 1.0,
			twinkle_phase,
		}
	}

	/// Home x, fixed at creation.
	pub fn home_x(&self) -> f64 {
		self.home_x
	}

	/// Home y, fixed at creation.
	pub fn home_y(&self) -> f64 {
		self.home_y
	}
}

/// Hash-based pseudo-random value in `[0, 1)`.
///
/// Same input, same output, on every platform, so a field built from the
/// same seeds looks identical across runs.
pub fn pseudo_random(seed: f64) -> f64 {
	let x = (seed * 12.9898 + seed * 78.233).sin() * 43758.5453;
	x - x.floor()
}

/// All particles of the current image, in sampling order.
#[derive(Clone, Debug, Default)]
pub struct ParticleField {
	/// Particles in sampling order.
	pub particles: Vec<Particle>,
}

impl ParticleField {
	/// Builds a field from sampled seeds.
	///
	/// Each particle starts within ±0.25 px of its home with a random twinkle
	/// phase. `variation` selects a different but equally reproducible jitter.
	pub fn from_seeds(seeds: &[Seed], variation: u64) -> Self {
		let base = (variation % 1_000_003) as f64 * 0.618;
		let particles = seeds
			.iter()
			.enumerate()
			.map(|(i, seed)| {
				let s = base + i as f64 + 1.0;
				let mut p = Particle::at_home(seed.x, seed.y, seed.color, pseudo_random(s * 7.9) * TAU);
				p.x += (pseudo_random(s * 1.1) - 0.5) * 2.0 * JITTER;
				p.y += (pseudo_random(s * 2.3) - 0.5) * 2.0 * JITTER;
				p
			})
			.collect();
		Self { particles }
	}

	/// Number of particles.
	pub fn len(&self) -> usize {
		self.particles.len()
	}

	/// True when no image is loaded or nothing was sampled.
	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	/// Drops every particle.
	pub fn clear(&mut self) {
		self.particles.clear();
	}

	/// Iterates particles in sampling order.
	pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
		self.particles.iter()
	}
}
