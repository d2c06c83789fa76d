//! dotfield: turns an image into an interactive field of animated particles.
//!
//! This crate provides a WASM canvas component that samples a raster image
//! into colored particles, springs them back to their home positions, reacts
//! to the pointer, and exports the result as JSON with a standalone player.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};

pub mod components;

pub use components::dot_field::{
	Command, DotFieldCanvas, DotFieldControls, DotFieldError, ExportDocument, Player, Session,
	SimConfig, Viewport,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("dotfield: logging initialized");
}

/// Main application component.
/// Renders the full-window particle canvas with its control panel.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let session = Rc::new(RefCell::new(Session::new(
		Viewport::default(),
		SimConfig::default(),
	)));
	let status = RwSignal::new(None::<String>);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Dot Field" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-field">
			<DotFieldCanvas session=session.clone() on_error=move |msg: String| status.set(Some(msg)) />
			<div class="field-overlay">
				<h1>"Dot Field"</h1>
				<p class="subtitle">"Drop an image on the canvas or pick one below."</p>
				<DotFieldControls session=session status=status />
			</div>
		</div>
	}
}
