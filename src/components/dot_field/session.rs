//! Dot field session state and frame stepping.
//!
//! A [`Session`] owns everything the simulation reads and writes: the decoded
//! image, the particle field, configuration, pointer and viewport. UI event
//! handlers never touch that state directly; they enqueue [`Command`]s which
//! are drained at the start of the next frame, so no mutation ever lands in
//! the middle of a step.

use std::collections::VecDeque;

use image::RgbaImage;
use log::{debug, info};

use super::error::Result;
use super::export::{ExportBundle, ExportDocument};
use super::field::ParticleField;
use super::physics::{self, FrameClock, Step};
use super::render::{self, FramePlan};
use super::sampler::{self, FitPolicy};
use super::types::{Pointer, SimConfig, Viewport};

/// A state change requested by the UI.
#[derive(Clone, Debug)]
pub enum Command {
	/// Replace the source image (already decoded).
	SetImage(RgbaImage),
	/// Replace the configuration. Only a density change resamples.
	SetConfig(SimConfig),
	/// Canvas buffer size changed.
	Resize(Viewport),
	/// Pointer moved or entered, in canvas-buffer pixels.
	PointerMoved { x: f64, y: f64 },
	/// Pointer left the canvas.
	PointerLeft,
	/// Drop the image and all particles.
	Reset,
}

/// Inputs that determine the sampled field. Resampling happens only when
/// this changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SampleKey {
	image: u64,
	viewport: Viewport,
	density: i32,
}

struct SourceImage {
	pixels: RgbaImage,
	generation: u64,
}

/// Simulation context for one canvas.
pub struct Session {
	image: Option<SourceImage>,
	field: ParticleField,
	config: SimConfig,
	pointer: Pointer,
	viewport: Viewport,
	clock: FrameClock,
	fit: FitPolicy,
	commands: VecDeque<Command>,
	sampled: Option<SampleKey>,
	next_generation: u64,
}

impl Session {
	/// Empty session for `viewport`; `config` is clamped.
	pub fn new(viewport: Viewport, config: SimConfig) -> Self {
		Self {
			image: None,
			field: ParticleField::default(),
			config: config.sanitized(),
			pointer: Pointer::outside(),
			viewport,
			clock: FrameClock::default(),
			fit: FitPolicy::Contain,
			commands: VecDeque::new(),
			sampled: None,
			next_generation: 0,
		}
	}

	/// Overrides how images are fitted into the canvas.
	pub fn with_fit(mut self, fit: FitPolicy) -> Self {
		self.fit = fit;
		self
	}

	/// Queues `command` for the next frame.
	pub fn enqueue(&mut self, command: Command) {
		self.commands.push_back(command);
	}

	/// Decodes `bytes` and queues the image for the next frame.
	///
	/// On failure nothing is queued and the current field stays as it is.
	pub fn load_image(&mut self, bytes: &[u8]) -> Result<()> {
		let pixels = sampler::decode(bytes)?;
		info!(
			"dotfield: decoded {}x{} image",
			pixels.width(),
			pixels.height()
		);
		self.enqueue(Command::SetImage(pixels));
		Ok(())
	}

	/// Applies queued commands, resampling if the sample inputs changed.
	pub fn drain_commands(&mut self) {
		while let Some(command) = self.commands.pop_front() {
			self.apply(command);
		}
		self.resample_if_needed();
	}

	fn apply(&mut self, command: Command) {
		match command {
			Command::SetImage(pixels) => {
				let generation = self.next_generation;
				self.next_generation += 1;
				self.image = Some(SourceImage { pixels, generation });
			}
			Command::SetConfig(config) => self.config = config.sanitized(),
			Command::Resize(viewport) => self.viewport = viewport,
			Command::PointerMoved { x, y } => self.pointer = Pointer::at(x, y),
			Command::PointerLeft => self.pointer.inside = false,
			Command::Reset => {
				self.image = None;
				self.field.clear();
				self.sampled = None;
				info!("dotfield: reset");
			}
		}
	}

	fn sample_key(&self) -> Option<SampleKey> {
		self.image.as_ref().map(|image| SampleKey {
			image: image.generation,
			viewport: self.viewport,
			density: self.config.clamped_density(),
		})
	}

	fn resample_if_needed(&mut self) {
		let key = self.sample_key();
		if key == self.sampled {
			return;
		}
		let (Some(key), Some(image)) = (key, self.image.as_ref()) else {
			return;
		};
		debug!("dotfield: resampling for {:?}", key);

		let sampling = sampler::sample(&image.pixels, key.viewport, key.density, self.fit);
		self.field = ParticleField::from_seeds(&sampling.seeds, key.image);
		self.sampled = Some(key);
		info!(
			"dotfield: built {} particles ({}x{} at stride {})",
			self.field.len(),
			sampling.layout.target_width,
			sampling.layout.target_height,
			sampling.layout.stride
		);
	}

	/// Runs one frame at `timestamp_ms`: drain commands, advance, plan.
	pub fn frame(&mut self, timestamp_ms: f64) -> FramePlan {
		let step = self.clock.tick(timestamp_ms);
		self.step(&step)
	}

	/// Like [`Session::frame`] with an explicit step.
	pub fn step(&mut self, step: &Step) -> FramePlan {
		self.drain_commands();
		physics::advance(
			&mut self.field,
			step,
			&self.pointer,
			&self.config,
			self.viewport,
		);
		render::plan_frame(&self.field, &self.config, &self.pointer, self.viewport)
	}

	/// Restarts frame timing; the next frame has `dt = 0`.
	pub fn restart_clock(&mut self) {
		self.clock.reset();
	}

	/// Snapshot of the current field.
	pub fn export(&self) -> ExportDocument {
		ExportDocument::capture(&self.field, &self.config, self.viewport)
	}

	/// Snapshot plus player and README.
	pub fn bundle(&self) -> Result<ExportBundle> {
		ExportBundle::new(&self.export())
	}

	/// Current particles.
	pub fn field(&self) -> &ParticleField {
		&self.field
	}

	/// Active configuration.
	pub fn config(&self) -> &SimConfig {
		&self.config
	}

	/// Last known pointer.
	pub fn pointer(&self) -> Pointer {
		self.pointer
	}

	/// Current canvas size.
	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	/// Whether an image has been loaded since the last reset.
	pub fn has_image(&self) -> bool {
		self.image.is_some()
	}
}
