//! Image-to-particle field component.
//!
//! Turns a raster image into a field of colored particles drawn on an HTML
//! canvas:
//! - Grid sampling of the image, fitted and centred in the canvas
//! - Spring physics pulling each particle back to its home position
//! - Pointer repel, attract, fade and glyph-swap hover effects
//! - Pulse, float and twinkle animation styles
//! - JSON export with a standalone player bundle
//!
//! # Example
//!
//! ```ignore
//! use dotfield::{Command, DotFieldCanvas, Session, SimConfig, Viewport};
//!
//! let session = Rc::new(RefCell::new(Session::new(Viewport::default(), SimConfig::default())));
//! session.borrow_mut().load_image(&png_bytes)?;
//!
//! view! { <DotFieldCanvas session=session on_error=|msg| log::warn!("{msg}") /> }
//! ```

pub mod color;
mod component;
mod controls;
mod error;
pub mod export;
mod field;
pub mod physics;
pub mod player;
pub mod render;
pub mod sampler;
mod session;
pub mod shapes;
mod types;

pub use color::Color;
pub use component::{CANVAS_ID, DotFieldCanvas, SessionHandle, load_file};
pub use controls::DotFieldControls;
pub use error::{DotFieldError, Result};
pub use export::{ExportBundle, ExportDocument};
pub use field::{Particle, ParticleField};
pub use player::Player;
pub use sampler::FitPolicy;
pub use session::{Command, Session};
pub use types::{
	AnimationStyle, HoverEffect, Pointer, SecondaryHoverEffect, Shape, SimConfig, UnknownOption,
	Viewport,
};
