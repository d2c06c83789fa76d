//! Leptos component wrapping the dot field canvas.
//!
//! The component sizes the canvas to its stage, forwards pointer, resize and
//! drop events to the session as commands, and runs the frame loop via
//! `requestAnimationFrame`. Each frame drains the session's command queue,
//! advances the particles and draws the resulting plan.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, DragEvent, File, FileReader, HtmlCanvasElement, PointerEvent, Window,
};

use super::render;
use super::session::{Command, Session};
use super::types::Viewport;

/// Shared handle to the session driven by the canvas and the controls.
pub type SessionHandle = Rc<RefCell<Session>>;

/// DOM id of the canvas, used by the PNG export.
pub const CANVAS_ID: &str = "dot-field-canvas";

/// Holds the frame callback and the id of the pending frame.
///
/// At most one loop runs: starting again cancels the pending frame first.
#[derive(Clone, Default)]
struct FrameLoop {
	callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
	pending: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
	fn start(&self, window: &Window, session: SessionHandle, ctx: CanvasRenderingContext2d) {
		if let Some(id) = self.pending.take() {
			let _ = window.cancel_animation_frame(id);
		}
		session.borrow_mut().restart_clock();

		let this = self.clone();
		*self.callback.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
			let plan = session.borrow_mut().frame(timestamp);
			render::render(&ctx, &plan);
			this.request_next();
		}));
		self.request_next();
	}

	fn request_next(&self) {
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Some(ref cb) = *self.callback.borrow() {
			match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				Ok(id) => self.pending.set(Some(id)),
				Err(e) => error!("dotfield: requestAnimationFrame failed: {:?}", e),
			}
		}
	}
}

/// Reads `file` and hands its bytes to the session.
///
/// Decoding happens when the read completes; failures are passed to
/// `on_error` and leave the current field untouched.
pub fn load_file(session: &SessionHandle, file: &File, on_error: impl Fn(String) + 'static) {
	let reader = match FileReader::new() {
		Ok(reader) => reader,
		Err(e) => {
			error!("dotfield: FileReader unavailable: {:?}", e);
			return;
		}
	};
	let name = file.name();
	let (session, reader_done) = (session.clone(), reader.clone());
	let onload = Closure::once_into_js(move || {
		let Ok(result) = reader_done.result() else {
			on_error(format!("Could not read {name}"));
			return;
		};
		let bytes = js_sys::Uint8Array::new(&result).to_vec();
		match session.borrow_mut().load_image(&bytes) {
			Ok(()) => info!("dotfield: loaded {} ({} bytes)", name, bytes.len()),
			Err(e) => {
				warn!("dotfield: {}: {}", name, e);
				on_error(format!("{name}: {e}"));
			}
		}
	});
	reader.set_onload(Some(onload.unchecked_ref()));
	if let Err(e) = reader.read_as_array_buffer(file) {
		error!("dotfield: failed to start reading file: {:?}", e);
	}
}

/// Converts client coordinates to canvas-buffer pixels.
fn canvas_point(canvas: &HtmlCanvasElement, client_x: f64, client_y: f64) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	let sx = if rect.width() > 0.0 {
		canvas.width() as f64 / rect.width()
	} else {
		1.0
	};
	let sy = if rect.height() > 0.0 {
		canvas.height() as f64 / rect.height()
	} else {
		1.0
	};
	((client_x - rect.left()) * sx, (client_y - rect.top()) * sy)
}

/// Sizes the canvas buffer to its parent, capped at 1920×1080.
fn fit_canvas(canvas: &HtmlCanvasElement) -> Viewport {
	let (w, h) = canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.unwrap_or((800.0, 600.0));
	let viewport = Viewport::from_css(w, h);
	if canvas.width() != viewport.width() as u32 || canvas.height() != viewport.height() as u32 {
		canvas.set_width(viewport.width() as u32);
		canvas.set_height(viewport.height() as u32);
	}
	viewport
}

/// Renders the particle canvas for `session`.
///
/// The canvas fills its parent element and follows window resizes. Images
/// dropped onto it are loaded into the session; decode errors are reported
/// through `on_error`.
#[component]
pub fn DotFieldCanvas(
	/// Session drawn and fed by this canvas.
	session: SessionHandle,
	/// Receives a message when a dropped file cannot be loaded.
	#[prop(into)]
	on_error: Callback<String>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let frame_loop = FrameLoop::default();
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (drag_over, set_drag_over) = signal(false);

	let (session_init, resize_cb_init) = (session.clone(), resize_cb.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let viewport = fit_canvas(&canvas);
		session_init.borrow_mut().enqueue(Command::Resize(viewport));

		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into().ok())
		{
			Some(ctx) => ctx,
			None => {
				error!("dotfield: 2d canvas context unavailable");
				return;
			}
		};

		// The listener holds a reference to the closure, so it is never replaced.
		if resize_cb_init.borrow().is_none() {
			let (session_resize, canvas_resize) = (session_init.clone(), canvas.clone());
			let cb: Closure<dyn FnMut()> = Closure::new(move || {
				let viewport = fit_canvas(&canvas_resize);
				session_resize.borrow_mut().enqueue(Command::Resize(viewport));
			});
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			*resize_cb_init.borrow_mut() = Some(cb);
		}

		frame_loop.start(&window, session_init.clone(), ctx);
	});

	let session_move = session.clone();
	let on_pointermove = move |ev: PointerEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, ev.client_x() as f64, ev.client_y() as f64);
		session_move
			.borrow_mut()
			.enqueue(Command::PointerMoved { x, y });
	};
	let on_pointerenter = on_pointermove.clone();

	let session_leave = session.clone();
	let on_pointerleave = move |_: PointerEvent| {
		session_leave.borrow_mut().enqueue(Command::PointerLeft);
	};

	let on_dragover = move |ev: DragEvent| {
		ev.prevent_default();
		let has_files = ev
			.data_transfer()
			.map(|dt| dt.types().includes(&JsValue::from_str("Files"), 0))
			.unwrap_or(false);
		set_drag_over.set(has_files);
	};
	let on_dragleave = move |_: DragEvent| set_drag_over.set(false);

	let session_drop = session.clone();
	let on_drop = move |ev: DragEvent| {
		ev.prevent_default();
		set_drag_over.set(false);
		let file = ev
			.data_transfer()
			.and_then(|dt| dt.files())
			.and_then(|files| files.get(0));
		if let Some(file) = file {
			load_file(&session_drop, &file, move |msg| on_error.run(msg));
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			id=CANVAS_ID
			class="dot-field-canvas"
			class:drag-over=move || drag_over.get()
			on:pointerenter=on_pointerenter
			on:pointermove=on_pointermove
			on:pointerleave=on_pointerleave
			on:dragover=on_dragover
			on:dragleave=on_dragleave
			on:drop=on_drop
			style="display: block; width: 100%; height: 100%;"
		/>
	}
}
