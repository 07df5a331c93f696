//! In-memory document used by the native tests.

use std::cell::RefCell;

use super::document::{ClickHandler, Label, NodeStyle, ShapeDocument};
use super::selection_manager::SelectionId;
use super::types::{BBox, DataPoint, MapClick};
use crate::error::RenderError;

#[derive(Default)]
pub struct MemoryNode {
	pub id: Option<String>,
	pub style: Option<NodeStyle>,
	pub tooltip: Option<String>,
	pub bbox: Option<BBox>,
	handler: Option<(usize, ClickHandler)>,
}

#[derive(Default)]
pub struct MemoryDocument {
	nodes: RefCell<Vec<MemoryNode>>,
	labels: RefCell<Vec<Label>>,
	background: RefCell<Option<ClickHandler>>,
	fail_styling: bool,
}

impl MemoryDocument {
	pub fn new(ids: Vec<Option<&str>>) -> Self {
		let nodes = ids
			.into_iter()
			.enumerate()
			.map(|(i, id)| MemoryNode {
				id: id.map(str::to_owned),
				bbox: Some(BBox {
					x: i as f64 * 10.0,
					y: 0.0,
					width: 10.0,
					height: 20.0,
				}),
				..MemoryNode::default()
			})
			.collect();
		Self {
			nodes: RefCell::new(nodes),
			..Self::default()
		}
	}

	pub fn with_ids(ids: &[&str]) -> Self {
		Self::new(ids.iter().map(|id| Some(*id)).collect())
	}

	/// Every `set_style` call fails, simulating a detached document.
	pub fn failing(mut self) -> Self {
		self.fail_styling = true;
		self
	}

	pub fn without_bbox(self, position: usize) -> Self {
		self.nodes.borrow_mut()[position].bbox = None;
		self
	}

	pub fn style(&self, position: usize) -> Option<NodeStyle> {
		self.nodes.borrow()[position].style.clone()
	}

	pub fn tooltip(&self, position: usize) -> Option<String> {
		self.nodes.borrow()[position].tooltip.clone()
	}

	pub fn has_handler(&self, position: usize) -> bool {
		self.nodes.borrow()[position].handler.is_some()
	}

	pub fn labels(&self) -> Vec<Label> {
		self.labels.borrow().clone()
	}

	/// Fires the element's click handler, if one is attached.
	pub fn click(&self, position: usize, multi_select: bool) -> bool {
		let handler = self.nodes.borrow()[position].handler.clone();
		match handler {
			Some((pos, handler)) => {
				handler(MapClick::Shape {
					position: pos,
					multi_select,
				});
				true
			}
			None => false,
		}
	}

	pub fn click_background(&self) -> bool {
		let handler = self.background.borrow().clone();
		match handler {
			Some(handler) => {
				handler(MapClick::Background);
				true
			}
			None => false,
		}
	}
}

impl ShapeDocument for MemoryDocument {
	type Node = usize;

	fn elements(&self) -> Vec<usize> {
		(0..self.nodes.borrow().len()).collect()
	}

	fn element_id(&self, node: &usize) -> Option<String> {
		self.nodes.borrow()[*node].id.clone()
	}

	fn set_style(&self, node: &usize, style: &NodeStyle) -> Result<(), RenderError> {
		if self.fail_styling {
			return Err(RenderError::Dom("style rejected".into()));
		}
		self.nodes.borrow_mut()[*node].style = Some(style.clone());
		Ok(())
	}

	fn set_click_handler(
		&self,
		node: &usize,
		position: usize,
		handler: Option<ClickHandler>,
	) -> Result<(), RenderError> {
		self.nodes.borrow_mut()[*node].handler = handler.map(|h| (position, h));
		Ok(())
	}

	fn set_background_handler(&self, handler: ClickHandler) -> Result<(), RenderError> {
		*self.background.borrow_mut() = Some(handler);
		Ok(())
	}

	fn set_tooltip(&self, node: &usize, text: Option<&str>) -> Result<(), RenderError> {
		self.nodes.borrow_mut()[*node].tooltip = text.map(str::to_owned);
		Ok(())
	}

	fn bounding_box(&self, node: &usize) -> Option<BBox> {
		self.nodes.borrow()[*node].bbox
	}

	fn remove_labels(&self) -> Result<(), RenderError> {
		self.labels.borrow_mut().clear();
		Ok(())
	}

	fn append_label(&self, label: &Label) -> Result<(), RenderError> {
		self.labels.borrow_mut().push(label.clone());
		Ok(())
	}
}

pub fn point(category: &str, value: f64) -> DataPoint {
	DataPoint {
		category: category.to_owned(),
		value,
		color: "#1f77b4".to_owned(),
		opacity: Some(1.0),
		highlighted: false,
		selection_id: SelectionId::for_row("Region", 0, category),
		tooltip: Vec::new(),
	}
}
