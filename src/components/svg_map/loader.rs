use std::cell::Cell;
use std::rc::Rc;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use gloo_net::http::Request;
use log::{error, info, warn};
use wasm_bindgen::JsValue;
use web_sys::{DomParser, Element, SupportedType};

use crate::error::{LoadError, MapError};

const SVG_DATA_PREFIX: &str = "data:image/svg+xml";
const BASE64_MARKER: &str = "base64,";

/// Where the map markup comes from, decided from the configured string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SvgSource {
	Markup(String),
	DataUri { payload: String, base64: bool },
	Remote(String),
}

impl SvgSource {
	pub fn classify(input: &str) -> Result<Self, LoadError> {
		let trimmed = input.trim();
		if trimmed.is_empty() {
			return Err(LoadError::EmptySource);
		}
		if trimmed.starts_with('<') {
			return Ok(Self::Markup(trimmed.to_owned()));
		}
		if trimmed.starts_with(SVG_DATA_PREFIX) {
			if let Some(idx) = trimmed.find(BASE64_MARKER) {
				return Ok(Self::DataUri {
					payload: trimmed[idx + BASE64_MARKER.len()..].to_owned(),
					base64: true,
				});
			}
			let payload = trimmed
				.strip_prefix("data:image/svg+xml;utf8,")
				.or_else(|| trimmed.strip_prefix("data:image/svg+xml,"))
				.unwrap_or(trimmed);
			return Ok(Self::DataUri {
				payload: payload.to_owned(),
				base64: false,
			});
		}
		Ok(Self::Remote(trimmed.to_owned()))
	}
}

pub fn decode_base64(payload: &str) -> Result<String, LoadError> {
	let bytes = STANDARD
		.decode(payload.trim())
		.map_err(|e| LoadError::Decode(e.to_string()))?;
	String::from_utf8(bytes).map_err(|e| LoadError::Decode(e.to_string()))
}

fn js_message(value: JsValue) -> String {
	value
		.as_string()
		.unwrap_or_else(|| format!("{:?}", value))
}

async fn fetch_markup(url: &str) -> Result<String, LoadError> {
	let response = Request::get(url)
		.send()
		.await
		.map_err(|e| LoadError::Fetch(e.to_string()))?;
	if !response.ok() {
		return Err(LoadError::HttpStatus {
			status: response.status(),
			text: response.status_text(),
		});
	}
	response
		.text()
		.await
		.map_err(|e| LoadError::Fetch(e.to_string()))
}

pub async fn read_markup(source: &SvgSource) -> Result<String, LoadError> {
	match source {
		SvgSource::Markup(markup) => Ok(markup.clone()),
		SvgSource::DataUri {
			payload,
			base64: true,
		} => decode_base64(payload),
		SvgSource::DataUri {
			payload,
			base64: false,
		} => js_sys::decode_uri_component(payload)
			.map(String::from)
			.map_err(|e| LoadError::Decode(js_message(e.into()))),
		SvgSource::Remote(url) => fetch_markup(url).await,
	}
}

/// Parses markup into a detached `<svg>` element.
pub fn parse_svg(markup: &str) -> Result<Element, LoadError> {
	let parser = DomParser::new().map_err(|e| LoadError::Parse(js_message(e)))?;
	let doc = parser
		.parse_from_string(markup, SupportedType::ImageSvgXml)
		.map_err(|e| LoadError::Parse(js_message(e)))?;
	let root = doc
		.document_element()
		.ok_or_else(|| LoadError::Parse("empty document".into()))?;
	// Gecko replaces the root with <parsererror>, Blink nests it inside the partial root.
	if let Ok(Some(parser_error)) = doc.query_selector("parsererror") {
		return Err(LoadError::Parse(
			parser_error.text_content().unwrap_or_default(),
		));
	}
	if !root.tag_name().eq_ignore_ascii_case("svg") {
		return Err(LoadError::NotSvg(root.tag_name()));
	}
	Ok(root)
}

pub async fn fetch_document(input: &str) -> Result<Element, LoadError> {
	let source = SvgSource::classify(input)?;
	let markup = read_markup(&source).await?;
	parse_svg(&markup)
}

fn clear_children(container: &Element) -> Result<(), JsValue> {
	while let Some(child) = container.first_child() {
		container.remove_child(&child)?;
	}
	Ok(())
}

/// Replaces the container's content with the map, sized to fill it.
pub fn mount(container: &Element, svg: &Element) -> Result<(), LoadError> {
	let dom = |e: JsValue| LoadError::Mount(js_message(e));
	clear_children(container).map_err(dom)?;
	container.append_child(svg).map_err(dom)?;
	svg.set_attribute("width", "100%").map_err(dom)?;
	svg.set_attribute("height", "100%").map_err(dom)?;
	Ok(())
}

fn replace_with_text(
	container: &Element,
	class: Option<&str>,
	message: &str,
) -> Result<(), JsValue> {
	let doc = container
		.owner_document()
		.ok_or_else(|| JsValue::from_str("container is detached"))?;
	clear_children(container)?;
	let div = doc.create_element("div")?;
	if let Some(class) = class {
		div.set_class_name(class);
	}
	div.set_text_content(Some(message));
	container.append_child(&div)?;
	Ok(())
}

/// Swaps the container's content for an inline error panel.
pub fn show_error(container: &Element, message: &str) {
	if let Err(e) = replace_with_text(container, Some("error"), message) {
		error!("Could not display error {:?}: {}", message, js_message(e));
	}
}

pub fn show_message(container: &Element, message: &str) {
	if let Err(e) = replace_with_text(container, None, message) {
		error!("Could not display message {:?}: {}", message, js_message(e));
	}
}

/// Monotonic load counter; only the most recently started load may mount.
#[derive(Clone, Debug, Default)]
pub struct LoadGeneration(Rc<Cell<u64>>);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

impl LoadGeneration {
	pub fn begin(&self) -> LoadTicket {
		let next = self.0.get() + 1;
		self.0.set(next);
		LoadTicket(next)
	}

	pub fn is_current(&self, ticket: LoadTicket) -> bool {
		self.0.get() == ticket.0
	}
}

pub enum LoadOutcome {
	Mounted(Element),
	Failed(LoadError),
	/// A newer load started while this one was in flight.
	Superseded,
}

/// Loads and mounts `input` unless a newer load has begun in the meantime.
///
/// A superseded result touches nothing, so the container keeps showing
/// whatever the newer load (or the previous map) put there.
pub async fn load_latest(
	input: &str,
	container: &Element,
	generation: &LoadGeneration,
	ticket: LoadTicket,
) -> LoadOutcome {
	let result = fetch_document(input).await;
	if !generation.is_current(ticket) {
		warn!("Discarding superseded SVG load");
		return LoadOutcome::Superseded;
	}
	match result.and_then(|svg| mount(container, &svg).map(|()| svg)) {
		Ok(svg) => {
			info!("SVG loaded");
			LoadOutcome::Mounted(svg)
		}
		Err(err) => {
			error!("Error loading SVG: {}", err);
			show_error(container, &MapError::from(err.clone()).to_string());
			LoadOutcome::Failed(err)
		}
	}
}
