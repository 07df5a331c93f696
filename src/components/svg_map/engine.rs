use log::{debug, info};

use super::binder::{self, BindingTable, ElementIndex};
use super::document::{ClickHandler, NodeStyle, ShapeDocument};
use super::labels;
use super::selection;
use super::selection_manager::{SelectionId, SelectionManager};
use super::types::{DataPoint, LabelSettings, MapClick, RefreshStats};
use crate::error::RenderError;

/// Factor applied to the fill opacity of rows outside an active highlight.
pub const HIGHLIGHT_DIM: f64 = 0.5;

/// What a click asks of the selection manager.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectionRequest {
	Select { id: SelectionId, multi_select: bool },
	Clear,
	/// The click hit nothing bound.
	Ignore,
}

impl SelectionRequest {
	/// Runs the round trip and returns the snapshot to re-apply, if any.
	pub async fn execute<M>(self, manager: &M) -> Option<Vec<SelectionId>>
	where
		M: SelectionManager + ?Sized,
	{
		match self {
			Self::Select { id, multi_select } => Some(manager.select(&id, multi_select).await),
			Self::Clear => {
				manager.clear().await;
				Some(Vec::new())
			}
			Self::Ignore => None,
		}
	}
}

/// Fill for a freshly bound shape before any selection is considered.
pub fn assigned_style(point: &DataPoint, has_highlights: bool) -> NodeStyle {
	let dim = if has_highlights && !point.highlighted {
		HIGHLIGHT_DIM
	} else {
		1.0
	};
	NodeStyle {
		fill: point.color.clone(),
		fill_opacity: point.fill_opacity() * dim,
		stroke: None,
		opacity: 1.0,
	}
}

/// Drives one loaded document: binding, coloring, selection sync and labels.
pub struct RenderEngine<D: ShapeDocument> {
	document: D,
	nodes: Vec<D::Node>,
	index: ElementIndex,
	bindings: BindingTable,
	on_click: ClickHandler,
}

impl<D: ShapeDocument> RenderEngine<D> {
	/// Indexes the document once; `on_click` receives every shape and
	/// background click the document reports.
	pub fn new(document: D, on_click: ClickHandler) -> Self {
		let nodes = document.elements();
		let index = ElementIndex::build(&document, &nodes);
		let bindings = BindingTable::with_len(nodes.len());
		debug!("Indexed {} elements", nodes.len());
		Self {
			document,
			nodes,
			index,
			bindings,
			on_click,
		}
	}

	pub fn document(&self) -> &D {
		&self.document
	}

	pub fn bindings(&self) -> &BindingTable {
		&self.bindings
	}

	/// Full refresh: reset, bind, color, sync selection, label, wire clicks.
	///
	/// The selection pass only runs when `selection` is non-empty, so the
	/// highlight dimming from the coloring pass survives a plain refresh.
	pub fn refresh(
		&mut self,
		points: &[DataPoint],
		label_settings: &LabelSettings,
		selection: &[SelectionId],
	) -> Result<RefreshStats, RenderError> {
		info!("Refreshing map with {} data points", points.len());
		self.reset()?;

		let binding = binder::bind(&self.index, points, &mut self.bindings);
		let has_highlights = points.iter().any(|p| p.highlighted);

		for matched in &binding.matched {
			let node = &self.nodes[matched.position];
			self.document
				.set_style(node, &assigned_style(&matched.point, has_highlights))?;
			self.document
				.set_tooltip(node, Some(&matched.point.tooltip_text()))?;
			self.document.set_click_handler(
				node,
				matched.position,
				Some(self.on_click.clone()),
			)?;
		}

		if !selection.is_empty() {
			self.sync_selection(selection)?;
		}

		let labelled = binding
			.matched
			.iter()
			.map(|m| (&self.nodes[m.position], &m.point));
		let labels_placed = labels::place(&self.document, labelled, label_settings)?;

		self.document.set_background_handler(self.on_click.clone())?;

		let stats = RefreshStats {
			total_elements: binding.all_element_ids.len(),
			matched_count: binding.matched.len(),
			matched_ids: binding
				.matched
				.iter()
				.map(|m| m.point.category.clone())
				.collect(),
			unmatched_ids: binding.unmatched_data_ids,
			all_ids: binding.all_element_ids,
			labels_placed,
		};
		info!("{}", stats);
		Ok(stats)
	}

	/// Re-applies the selection state machine to every element.
	pub fn sync_selection(&self, selection: &[SelectionId]) -> Result<(), RenderError> {
		debug!("Syncing selection of {} ids", selection.len());
		selection::apply(&self.document, &self.nodes, &self.bindings, selection)
	}

	pub fn resolve_click(&self, click: MapClick) -> SelectionRequest {
		match click {
			MapClick::Background => SelectionRequest::Clear,
			MapClick::Shape {
				position,
				multi_select,
			} => match self.bindings.datum(position) {
				Some(datum) => {
					debug!("Clicked element {}", datum.category);
					SelectionRequest::Select {
						id: datum.selection_id.clone(),
						multi_select,
					}
				}
				None => SelectionRequest::Ignore,
			},
		}
	}

	fn reset(&self) -> Result<(), RenderError> {
		for (position, node) in self.nodes.iter().enumerate() {
			self.document.set_style(node, &NodeStyle::neutral())?;
			if self.bindings.datum(position).is_some() {
				self.document.set_click_handler(node, position, None)?;
				self.document.set_tooltip(node, None)?;
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use futures::executor::block_on;
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::components::svg_map::document::Stroke;
	use crate::components::svg_map::memory::{MemoryDocument, point};
	use crate::components::svg_map::selection_manager::LocalSelectionManager;
	use crate::components::svg_map::types::TooltipItem;

	type Clicks = Rc<RefCell<Vec<MapClick>>>;

	fn engine(ids: &[&str]) -> (RenderEngine<MemoryDocument>, Clicks) {
		let clicks: Clicks = Rc::default();
		let sink = clicks.clone();
		let engine = RenderEngine::new(
			MemoryDocument::with_ids(ids),
			Rc::new(move |click: MapClick| sink.borrow_mut().push(click)),
		);
		(engine, clicks)
	}

	fn row(category: &str, value: f64, row: usize, highlighted: bool) -> DataPoint {
		DataPoint {
			highlighted,
			selection_id: SelectionId::for_row("Region", row, category),
			..point(category, value)
		}
	}

	fn hidden() -> LabelSettings {
		LabelSettings::default()
	}

	/// Plays a click through the engine and manager, as the component does.
	fn click(
		engine: &RenderEngine<MemoryDocument>,
		manager: &LocalSelectionManager,
		click: MapClick,
	) {
		let request = engine.resolve_click(click);
		if let Some(snapshot) = block_on(request.execute(manager)) {
			engine.sync_selection(&snapshot).unwrap();
		}
	}

	#[test]
	fn highlight_dims_only_unhighlighted_rows() {
		let (mut engine, _) = engine(&["A", "B"]);
		let data = vec![row("A", 15.0, 0, true), row("B", 30.0, 1, false)];

		engine.refresh(&data, &hidden(), &[]).unwrap();

		let doc = engine.document();
		assert_eq!(doc.style(0).map(|s| s.fill_opacity), Some(1.0));
		assert_eq!(doc.style(1).map(|s| s.fill_opacity), Some(0.5));
	}

	#[test]
	fn no_dimming_without_highlights() {
		let (mut engine, _) = engine(&["A", "B"]);
		let data = vec![
			DataPoint {
				opacity: Some(0.8),
				..row("A", 15.0, 0, false)
			},
			row("B", 30.0, 1, false),
		];
		engine.refresh(&data, &hidden(), &[]).unwrap();
		assert_eq!(engine.document().style(0).map(|s| s.fill_opacity), Some(0.8));
		assert_eq!(engine.document().style(1).map(|s| s.fill_opacity), Some(1.0));
	}

	fn selected(fill: &str) -> NodeStyle {
		NodeStyle {
			fill: fill.to_owned(),
			fill_opacity: 1.0,
			stroke: Some(Stroke {
				color: "black",
				width_px: 2.0,
			}),
			opacity: 1.0,
		}
	}

	#[test]
	fn click_selects_then_background_clears() {
		let (mut engine, clicks) = engine(&["A", "B", "legend"]);
		let manager = LocalSelectionManager::new();
		let data = vec![row("A", 15.0, 0, true), row("B", 30.0, 1, false)];
		engine.refresh(&data, &hidden(), &[]).unwrap();

		assert!(engine.document().click(0, false));
		let recorded = clicks.borrow()[0];
		click(&engine, &manager, recorded);

		let doc = engine.document();
		assert_eq!(doc.style(0), Some(selected("#1f77b4")));
		assert_eq!(doc.style(1), Some(NodeStyle::neutral()));
		assert_eq!(doc.style(2), Some(NodeStyle::neutral()));

		assert!(engine.document().click_background());
		let recorded = clicks.borrow()[1];
		assert_eq!(recorded, MapClick::Background);
		click(&engine, &manager, recorded);

		let doc = engine.document();
		assert!(manager.current().is_empty());
		for (position, datum) in data.iter().enumerate() {
			assert_eq!(
				doc.style(position),
				Some(selection::target_style(Some(datum), &[]))
			);
		}
		assert_eq!(doc.style(2), Some(NodeStyle::neutral()));
	}

	#[test]
	fn selecting_an_unhighlighted_row_shows_it_at_full_opacity() {
		let (mut engine, _) = engine(&["A", "B"]);
		let manager = LocalSelectionManager::new();
		let data = vec![row("A", 15.0, 0, true), row("B", 30.0, 1, false)];
		engine.refresh(&data, &hidden(), &[]).unwrap();
		assert_eq!(engine.document().style(1).map(|s| s.fill_opacity), Some(0.5));

		let shape = MapClick::Shape {
			position: 1,
			multi_select: false,
		};
		click(&engine, &manager, shape);

		let doc = engine.document();
		assert_eq!(doc.style(0), Some(NodeStyle::neutral()));
		assert_eq!(doc.style(1), Some(selected("#1f77b4")));

		click(&engine, &manager, MapClick::Background);

		// Clearing restores the plain data color; dimming returns on the next refresh.
		let doc = engine.document();
		assert_eq!(
			doc.style(1),
			Some(NodeStyle {
				fill: "#1f77b4".into(),
				fill_opacity: 1.0,
				stroke: None,
				opacity: 1.0,
			})
		);
		engine.refresh(&data, &hidden(), &manager.current()).unwrap();
		assert_eq!(engine.document().style(1).map(|s| s.fill_opacity), Some(0.5));
	}

	#[test]
	fn refresh_reapplies_existing_selection() {
		let (mut engine, _) = engine(&["A", "B"]);
		let data = vec![row("A", 15.0, 0, false), row("B", 30.0, 1, false)];
		let selection = vec![data[1].selection_id.clone()];

		engine.refresh(&data, &hidden(), &selection).unwrap();

		assert_eq!(engine.document().style(0), Some(NodeStyle::neutral()));
		assert!(engine.document().style(1).unwrap().stroke.is_some());
	}

	#[test]
	fn sync_is_idempotent() {
		let (mut engine, _) = engine(&["A", "B"]);
		let data = vec![row("A", 15.0, 0, false), row("B", 30.0, 1, false)];
		engine.refresh(&data, &hidden(), &[]).unwrap();
		let selection = vec![data[0].selection_id.clone()];

		engine.sync_selection(&selection).unwrap();
		let first: Vec<_> = (0..2).map(|p| engine.document().style(p)).collect();
		engine.sync_selection(&selection).unwrap();
		let second: Vec<_> = (0..2).map(|p| engine.document().style(p)).collect();
		assert_eq!(first, second);
	}

	#[test]
	fn dropped_rows_lose_handlers_and_styling() {
		let (mut engine, _) = engine(&["A", "B"]);
		engine
			.refresh(
				&[row("A", 1.0, 0, false), row("B", 2.0, 1, false)],
				&hidden(),
				&[],
			)
			.unwrap();
		assert!(engine.document().has_handler(1));

		engine
			.refresh(&[row("A", 1.0, 0, false)], &hidden(), &[])
			.unwrap();

		let doc = engine.document();
		assert!(!doc.has_handler(1));
		assert_eq!(doc.tooltip(1), None);
		assert_eq!(doc.style(1), Some(NodeStyle::neutral()));
		assert_eq!(
			engine.resolve_click(MapClick::Shape {
				position: 1,
				multi_select: false
			}),
			SelectionRequest::Ignore
		);
	}

	#[test]
	fn refresh_reports_statistics() {
		let (mut engine, _) = engine(&["A", "B", "C"]);
		let data = vec![
			row("A", 1.0, 0, false),
			row("Q", 2.0, 1, false),
			row("C", 3.0, 2, false),
		];
		let labels = LabelSettings {
			show: true,
			font_size: 10.0,
		};

		let stats = engine.refresh(&data, &labels, &[]).unwrap();

		assert_eq!(
			stats,
			RefreshStats {
				total_elements: 3,
				matched_count: 2,
				matched_ids: vec!["A".into(), "C".into()],
				unmatched_ids: vec!["Q".into()],
				all_ids: vec!["A".into(), "B".into(), "C".into()],
				labels_placed: 2,
			}
		);
		assert_eq!(engine.bindings().bound_count(), 2);
	}

	#[test]
	fn tooltip_lists_fields_or_falls_back() {
		let (mut engine, _) = engine(&["A", "B"]);
		let a = DataPoint {
			tooltip: vec![
				TooltipItem {
					display_name: "Room".into(),
					value: "A".into(),
				},
				TooltipItem {
					display_name: "Load".into(),
					value: "15".into(),
				},
			],
			..row("A", 15.0, 0, false)
		};
		engine
			.refresh(&[a, row("B", 2.5, 1, false)], &hidden(), &[])
			.unwrap();
		assert_eq!(engine.document().tooltip(0).as_deref(), Some("Room: A\nLoad: 15"));
		assert_eq!(engine.document().tooltip(1).as_deref(), Some("B: 2.5"));
	}

	#[test]
	fn multi_select_keeps_both_shapes_colored() {
		let (mut engine, _) = engine(&["A", "B", "C"]);
		let manager = LocalSelectionManager::new();
		let data = vec![
			row("A", 1.0, 0, false),
			row("B", 2.0, 1, false),
			row("C", 3.0, 2, false),
		];
		engine.refresh(&data, &hidden(), &[]).unwrap();

		for position in [0, 2] {
			let shape = MapClick::Shape {
				position,
				multi_select: true,
			};
			click(&engine, &manager, shape);
		}

		let doc = engine.document();
		assert!(doc.style(0).unwrap().stroke.is_some());
		assert_eq!(doc.style(1), Some(NodeStyle::neutral()));
		assert!(doc.style(2).unwrap().stroke.is_some());
	}

	#[test]
	fn render_failures_surface_as_errors() {
		let doc = MemoryDocument::with_ids(&["A"]).failing();
		let mut engine = RenderEngine::new(doc, Rc::new(|_: MapClick| {}));
		let err = engine
			.refresh(&[row("A", 1.0, 0, false)], &hidden(), &[])
			.unwrap_err();
		assert!(matches!(err, RenderError::Dom(_)));
	}
}
