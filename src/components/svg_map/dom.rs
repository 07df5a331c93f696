use std::cell::RefCell;
use std::collections::HashMap;

use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{
	CssStyleDeclaration, Document, Element, HtmlElement, MouseEvent, SvgElement, SvgGraphicsElement,
};

use super::document::{ClickHandler, Label, NodeStyle, ShapeDocument};
use super::types::{BBox, MapClick};
use crate::error::RenderError;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const LABEL_CLASS: &str = "data-label";

type ClickListener = Closure<dyn FnMut(MouseEvent)>;

fn dom_err(e: JsValue) -> RenderError {
	RenderError::Dom(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

fn style_of(node: &Element) -> Option<CssStyleDeclaration> {
	if let Some(svg) = node.dyn_ref::<SvgElement>() {
		return Some(svg.style());
	}
	node.dyn_ref::<HtmlElement>().map(HtmlElement::style)
}

/// Labels and tooltips are ours, not part of the map.
fn is_annotation(node: &Element) -> bool {
	node.local_name() == "title"
		|| node
			.get_attribute("class")
			.is_some_and(|c| c.split_whitespace().any(|c| c == LABEL_CLASS))
}

/// A mounted `<svg>` element driven through `web-sys`.
pub struct SvgDom {
	root: Element,
	shape_listeners: RefCell<HashMap<usize, (Element, ClickListener)>>,
	background_listener: RefCell<Option<ClickListener>>,
}

impl SvgDom {
	pub fn new(root: Element) -> Self {
		Self {
			root,
			shape_listeners: RefCell::new(HashMap::new()),
			background_listener: RefCell::new(None),
		}
	}

	fn document(&self) -> Result<Document, RenderError> {
		self.root.owner_document().ok_or(RenderError::NoDocument)
	}
}

impl Drop for SvgDom {
	fn drop(&mut self) {
		for (node, listener) in self.shape_listeners.get_mut().values() {
			let callback = listener.as_ref().unchecked_ref();
			let _ = node.remove_event_listener_with_callback("click", callback);
		}
		if let Some(listener) = self.background_listener.get_mut().take() {
			let _ = self
				.root
				.remove_event_listener_with_callback("click", listener.as_ref().unchecked_ref());
		}
	}
}

impl ShapeDocument for SvgDom {
	type Node = Element;

	fn elements(&self) -> Vec<Element> {
		let Ok(list) = self.root.query_selector_all("*") else {
			return Vec::new();
		};
		(0..list.length())
			.filter_map(|i| list.item(i))
			.filter_map(|node| node.dyn_into::<Element>().ok())
			.filter(|el| !is_annotation(el))
			.collect()
	}

	fn element_id(&self, node: &Element) -> Option<String> {
		node.get_attribute("id")
	}

	fn set_style(&self, node: &Element, style: &NodeStyle) -> Result<(), RenderError> {
		let Some(css) = style_of(node) else {
			return Ok(());
		};
		css.set_property("fill", &style.fill).map_err(dom_err)?;
		css.set_property("fill-opacity", &style.fill_opacity.to_string())
			.map_err(dom_err)?;
		css.set_property("opacity", &style.opacity.to_string())
			.map_err(dom_err)?;
		match &style.stroke {
			Some(stroke) => {
				css.set_property("stroke", stroke.color).map_err(dom_err)?;
				css.set_property("stroke-width", &format!("{}px", stroke.width_px))
					.map_err(dom_err)?;
			}
			None => {
				css.remove_property("stroke").map_err(dom_err)?;
				css.remove_property("stroke-width").map_err(dom_err)?;
			}
		}
		Ok(())
	}

	fn set_click_handler(
		&self,
		node: &Element,
		position: usize,
		handler: Option<ClickHandler>,
	) -> Result<(), RenderError> {
		let mut listeners = self.shape_listeners.borrow_mut();
		if let Some((old_node, old)) = listeners.remove(&position) {
			old_node
				.remove_event_listener_with_callback("click", old.as_ref().unchecked_ref())
				.map_err(dom_err)?;
		}
		let css = style_of(node);

		let Some(handler) = handler else {
			if let Some(css) = css {
				css.remove_property("cursor").map_err(dom_err)?;
				css.remove_property("pointer-events").map_err(dom_err)?;
			}
			return Ok(());
		};

		let listener = ClickListener::new(move |ev: MouseEvent| {
			// Keep the background handler from clearing what we just selected.
			ev.stop_propagation();
			handler(MapClick::Shape {
				position,
				multi_select: ev.ctrl_key() || ev.meta_key(),
			});
		});
		node.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())
			.map_err(dom_err)?;
		listeners.insert(position, (node.clone(), listener));

		if let Some(css) = css {
			css.set_property("cursor", "pointer").map_err(dom_err)?;
			css.set_property("pointer-events", "all").map_err(dom_err)?;
		}
		Ok(())
	}

	fn set_background_handler(&self, handler: ClickHandler) -> Result<(), RenderError> {
		let mut slot = self.background_listener.borrow_mut();
		if let Some(old) = slot.take() {
			self.root
				.remove_event_listener_with_callback("click", old.as_ref().unchecked_ref())
				.map_err(dom_err)?;
		}
		let listener = ClickListener::new(move |_: MouseEvent| handler(MapClick::Background));
		self.root
			.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())
			.map_err(dom_err)?;
		*slot = Some(listener);
		Ok(())
	}

	fn set_tooltip(&self, node: &Element, text: Option<&str>) -> Result<(), RenderError> {
		let children = node.children();
		let titles: Vec<Element> = (0..children.length())
			.filter_map(|i| children.item(i))
			.filter(|child| child.local_name() == "title")
			.collect();
		titles.iter().for_each(Element::remove);

		if let Some(text) = text {
			let title = self
				.document()?
				.create_element_ns(Some(SVG_NS), "title")
				.map_err(dom_err)?;
			title.set_text_content(Some(text));
			node.append_child(&title).map_err(dom_err)?;
		}
		Ok(())
	}

	fn bounding_box(&self, node: &Element) -> Option<BBox> {
		let rect = node.dyn_ref::<SvgGraphicsElement>()?.get_b_box().ok()?;
		Some(BBox {
			x: rect.x() as f64,
			y: rect.y() as f64,
			width: rect.width() as f64,
			height: rect.height() as f64,
		})
	}

	fn remove_labels(&self) -> Result<(), RenderError> {
		let labels = self
			.root
			.query_selector_all(&format!(".{}", LABEL_CLASS))
			.map_err(dom_err)?;
		(0..labels.length())
			.filter_map(|i| labels.item(i))
			.filter_map(|node| node.dyn_into::<Element>().ok())
			.for_each(|label| label.remove());
		Ok(())
	}

	fn append_label(&self, label: &Label) -> Result<(), RenderError> {
		let text = self
			.document()?
			.create_element_ns(Some(SVG_NS), "text")
			.map_err(dom_err)?;
		for (name, value) in [
			("class", LABEL_CLASS.to_owned()),
			("x", label.x.to_string()),
			("y", label.y.to_string()),
			("dy", "0.35em".to_owned()),
			("text-anchor", "middle".to_owned()),
		] {
			text.set_attribute(name, &value).map_err(dom_err)?;
		}
		if let Some(css) = style_of(&text) {
			css.set_property("font-size", &format!("{}px", label.font_size))
				.map_err(dom_err)?;
			css.set_property("font-family", "sans-serif").map_err(dom_err)?;
			css.set_property("fill", label.fill).map_err(dom_err)?;
			css.set_property("pointer-events", "none").map_err(dom_err)?;
		}
		text.set_text_content(Some(&label.text));
		self.root.append_child(&text).map_err(dom_err)?;
		Ok(())
	}
}

/// Overlays a red error banner on the container without touching the map.
pub fn overlay_error(container: &Element, message: &str) {
	let banner = container.owner_document().map(|doc| doc.create_element("div"));
	let Some(Ok(banner)) = banner else {
		error!("Could not display error {:?}", message);
		return;
	};
	let _ = banner.set_attribute(
		"style",
		"position: absolute; top: 50px; left: 0; background: red; color: white; z-index: 10001;",
	);
	banner.set_class_name("error");
	banner.set_text_content(Some(message));
	if container.append_child(&banner).is_err() {
		error!("Could not display error {:?}", message);
	}
}
