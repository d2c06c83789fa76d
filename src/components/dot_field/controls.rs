//! Control panel for the dot field: configuration inputs, image upload,
//! reset and downloads.

use std::fmt::Display;
use std::str::FromStr;

use leptos::prelude::*;
use log::{error, info};
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, HtmlCanvasElement, HtmlInputElement, Url};

use super::color::Color;
use super::component::{CANVAS_ID, SessionHandle, load_file};
use super::export::{JSON_FILE_NAME, PNG_FILE_NAME, ZIP_FILE_NAME};
use super::session::Command;
use super::types::{AnimationStyle, HoverEffect, SecondaryHoverEffect, Shape, SimConfig};

/// How long an object URL stays valid after its download was triggered.
const REVOKE_DELAY_MS: i32 = 10_000;

fn click_download(href: &str, name: &str) -> Result<(), JsValue> {
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| JsValue::from_str("no document"))?;
	let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
	anchor.set_href(href);
	anchor.set_download(name);
	anchor.click();
	Ok(())
}

/// Downloads one blob built from `part` through a temporary object URL.
fn download_blob(name: &str, mime: &str, part: JsValue) -> Result<(), JsValue> {
	let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
	let options = BlobPropertyBag::new();
	options.set_type(mime);
	let blob = Blob::new_with_u8_array_sequence_and_options(&js_sys::Array::of1(&part), &options)?;
	let url = Url::create_object_url_with_blob(&blob)?;
	let result = click_download(&url, name);

	// The download starts asynchronously, so the URL must outlive this call.
	let revoke = Closure::once_into_js(move || {
		let _ = Url::revoke_object_url(&url);
	});
	window.set_timeout_with_callback_and_timeout_and_arguments_0(
		revoke.unchecked_ref(),
		REVOKE_DELAY_MS,
	)?;
	result
}

fn download_text(name: &str, mime: &str, contents: &str) -> Result<(), JsValue> {
	download_blob(name, mime, JsValue::from_str(contents))
}

fn download_bytes(name: &str, mime: &str, bytes: &[u8]) -> Result<(), JsValue> {
	download_blob(name, mime, js_sys::Uint8Array::from(bytes).into())
}

fn download_png() -> Result<(), JsValue> {
	let canvas: HtmlCanvasElement = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.get_element_by_id(CANVAS_ID))
		.ok_or_else(|| JsValue::from_str("canvas not mounted"))?
		.dyn_into()?;
	let url = canvas.to_data_url_with_type("image/png")?;
	click_download(&url, PNG_FILE_NAME)
}

/// Select values for one of the option enums, in menu order.
fn option_values<T: Display>(all: &[T]) -> Vec<String> {
	all.iter().map(ToString::to_string).collect()
}

/// `<option>` list for one of the option enums.
fn options<T: Display>(all: &[T]) -> impl IntoView {
	option_values(all)
		.into_iter()
		.map(|name| {
			let label = name.clone();
			view! { <option value=name>{label}</option> }
		})
		.collect_view()
}

/// Parses a select value and applies it to the configuration.
fn on_select<T: FromStr + 'static>(
	config: RwSignal<SimConfig>,
	apply: impl Fn(&mut SimConfig, T) + 'static,
) -> impl FnMut(web_sys::Event) + 'static {
	move |ev| {
		if let Ok(value) = event_target_value(&ev).parse::<T>() {
			config.update(|c| apply(c, value));
		}
	}
}

/// Inputs for every configuration field plus upload, reset and export.
///
/// Configuration changes are queued on the session and take effect on the
/// next frame. Errors from loading or exporting are written to `status`.
#[component]
pub fn DotFieldControls(
	/// Session the controls configure.
	session: SessionHandle,
	/// Last error message, cleared on success.
	status: RwSignal<Option<String>>,
) -> impl IntoView {
	let config = RwSignal::new(session.borrow().config().clone());

	let session_cfg = session.clone();
	Effect::new(move |_| {
		let cfg = config.get();
		session_cfg.borrow_mut().enqueue(Command::SetConfig(cfg));
	});

	let report = move |what: &str, result: Result<(), JsValue>| match result {
		Ok(()) => status.set(None),
		Err(e) => {
			error!("dotfield: {} failed: {:?}", what, e);
			status.set(Some(format!("{what} failed")));
		}
	};

	let session_file = session.clone();
	let on_file = move |ev: web_sys::Event| {
		let input: HtmlInputElement = event_target(&ev);
		if let Some(file) = input.files().and_then(|files| files.get(0)) {
			status.set(None);
			load_file(&session_file, &file, move |msg| status.set(Some(msg)));
		}
	};

	let session_reset = session.clone();
	let on_reset = move |_| {
		session_reset.borrow_mut().enqueue(Command::Reset);
		status.set(None);
	};

	let on_png = move |_| report("PNG export", download_png());

	let session_json = session.clone();
	let on_json = move |_| {
		let result = session_json
			.borrow()
			.export()
			.to_json_pretty()
			.map_err(|e| JsValue::from_str(&e.to_string()))
			.and_then(|json| download_text(JSON_FILE_NAME, "application/json", &json));
		report("JSON export", result);
	};

	let session_bundle = session.clone();
	let on_bundle = move |_| {
		let zipped = session_bundle.borrow().bundle().and_then(|b| b.to_zip());
		let result = match zipped {
			Ok(bytes) => {
				info!("dotfield: downloading {} ({} bytes)", ZIP_FILE_NAME, bytes.len());
				download_bytes(ZIP_FILE_NAME, "application/zip", &bytes)
			}
			Err(e) => Err(JsValue::from_str(&e.to_string())),
		};
		report("Bundle export", result);
	};

	let on_shape = on_select(config, |c, v: Shape| c.default_shape = v);
	let on_animation = on_select(config, |c, v: AnimationStyle| c.animation_style = v);
	let on_hover = on_select(config, |c, v: HoverEffect| c.hover_effect = v);
	let on_hover_shape = on_select(config, |c, v: Shape| c.shape_type = v);
	let on_hover2 = on_select(config, |c, v: SecondaryHoverEffect| c.hover_effect2 = v);

	let shape_hover_only = move || {
		if config.get().hover_effect == HoverEffect::Shape {
			""
		} else {
			"none"
		}
	};

	view! {
		<div class="dot-field-controls">
			<label>
				"Image"
				<input type="file" accept="image/*" on:change=on_file />
			</label>

			<label>
				"Dot size"
				<input
					type="range"
					min=SimConfig::MIN_DOT_SIZE
					max=SimConfig::MAX_DOT_SIZE
					step="1"
					prop:value=move || config.get().dot_size
					on:input=move |ev| {
						if let Ok(v) = event_target_value(&ev).parse::<f64>() {
							config.update(|c| c.dot_size = v);
						}
					}
				/>
				<span>{move || config.get().dot_size}</span>
			</label>

			<label>
				"Density"
				<input
					type="range"
					min=SimConfig::MIN_DENSITY
					max=SimConfig::MAX_DENSITY
					step="1"
					prop:value=move || config.get().density
					on:change=move |ev| {
						if let Ok(v) = event_target_value(&ev).parse::<i32>() {
							config.update(|c| c.density = v);
						}
					}
				/>
				<span>{move || config.get().density}</span>
			</label>

			<label>
				"Shape"
				<select
					prop:value=move || config.get().default_shape.as_str()
					on:change=on_shape
				>
					{options(Shape::ALL)}
				</select>
			</label>

			<label>
				"Animation"
				<select
					prop:value=move || config.get().animation_style.as_str()
					on:change=on_animation
				>
					{options(AnimationStyle::ALL)}
				</select>
			</label>

			<label>
				"Hover"
				<select
					prop:value=move || config.get().hover_effect.as_str()
					on:change=on_hover
				>
					{options(HoverEffect::ALL)}
				</select>
			</label>

			<label style:display=shape_hover_only>
				"Hover shape"
				<select
					prop:value=move || config.get().shape_type.as_str()
					on:change=on_hover_shape
				>
					{options(Shape::ALL)}
				</select>
			</label>

			<label style:display=shape_hover_only>
				"Also"
				<select
					prop:value=move || config.get().hover_effect2.as_str()
					on:change=on_hover2
				>
					{options(SecondaryHoverEffect::ALL)}
				</select>
			</label>

			<label>
				"Background"
				<input
					type="color"
					prop:value=move || config.get().background_color.to_css_rgb()
					on:input=move |ev| {
						if let Some(color) = Color::parse_hex(&event_target_value(&ev)) {
							config.update(|c| c.background_color = color);
						}
					}
				/>
			</label>

			<div class="buttons">
				<button on:click=on_reset>"Reset"</button>
				<button on:click=on_png>"PNG"</button>
				<button on:click=on_json>"JSON"</button>
				<button on:click=on_bundle>"Bundle"</button>
			</div>

			<p class="status">{move || status.get()}</p>
		</div>
	}
}
