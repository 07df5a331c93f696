use std::rc::Rc;

use super::types::{BBox, MapClick, NEUTRAL_GRAY};
use crate::error::RenderError;

/// Callback invoked by a document when a shape or its background is clicked.
pub type ClickHandler = Rc<dyn Fn(MapClick)>;

#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
	pub color: &'static str,
	pub width_px: f64,
}

/// Inline presentation applied to one element.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	pub fill: String,
	pub fill_opacity: f64,
	pub stroke: Option<Stroke>,
	pub opacity: f64,
}

impl NodeStyle {
	pub fn neutral() -> Self {
		Self {
			fill: NEUTRAL_GRAY.to_owned(),
			fill_opacity: 1.0,
			stroke: None,
			opacity: 1.0,
		}
	}
}

/// Centered text annotation drawn over a shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
	pub x: f64,
	pub y: f64,
	pub text: String,
	pub font_size: f64,
	pub fill: &'static str,
}

/// The attached map, as seen by the engine.
///
/// `elements` must return the styleable elements in document order, excluding
/// the annotations the engine itself adds (labels and tooltips), so positions
/// stay stable for the lifetime of a loaded document.
pub trait ShapeDocument {
	type Node: Clone;

	fn elements(&self) -> Vec<Self::Node>;

	fn element_id(&self, node: &Self::Node) -> Option<String>;

	fn set_style(&self, node: &Self::Node, style: &NodeStyle) -> Result<(), RenderError>;

	/// Replaces any previous click handler; `None` detaches it.
	fn set_click_handler(
		&self,
		node: &Self::Node,
		position: usize,
		handler: Option<ClickHandler>,
	) -> Result<(), RenderError>;

	fn set_background_handler(&self, handler: ClickHandler) -> Result<(), RenderError>;

	/// Replaces the element's tooltip; `None` removes it.
	fn set_tooltip(&self, node: &Self::Node, text: Option<&str>) -> Result<(), RenderError>;

	/// `None` for elements without renderable geometry.
	fn bounding_box(&self, node: &Self::Node) -> Option<BBox>;

	fn remove_labels(&self) -> Result<(), RenderError>;

	fn append_label(&self, label: &Label) -> Result<(), RenderError>;
}
