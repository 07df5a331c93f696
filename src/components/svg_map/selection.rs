use super::binder::BindingTable;
use super::document::{NodeStyle, ShapeDocument, Stroke};
use super::selection_manager::SelectionId;
use super::types::DataPoint;
use crate::error::RenderError;

const SELECTED_STROKE: Stroke = Stroke {
	color: "black",
	width_px: 2.0,
};

pub fn is_selected(datum: &DataPoint, selection: &[SelectionId]) -> bool {
	selection.iter().any(|id| id.equals(&datum.selection_id))
}

/// Target appearance of one element given its datum and the active selection.
///
/// Unbound elements are always neutral. With no selection a bound element
/// shows its data color; with a selection only members keep their color and
/// gain the border, everything else turns neutral.
pub fn target_style(datum: Option<&DataPoint>, selection: &[SelectionId]) -> NodeStyle {
	let Some(datum) = datum else {
		return NodeStyle::neutral();
	};
	let colored = NodeStyle {
		fill: datum.color.clone(),
		fill_opacity: datum.fill_opacity(),
		stroke: None,
		opacity: 1.0,
	};
	if selection.is_empty() {
		colored
	} else if is_selected(datum, selection) {
		NodeStyle {
			stroke: Some(SELECTED_STROKE),
			..colored
		}
	} else {
		NodeStyle::neutral()
	}
}

/// Restyles every element from scratch; re-applying the same inputs is a no-op.
pub fn apply<D: ShapeDocument>(
	document: &D,
	nodes: &[D::Node],
	bindings: &BindingTable,
	selection: &[SelectionId],
) -> Result<(), RenderError> {
	for (position, node) in nodes.iter().enumerate() {
		let style = target_style(bindings.datum(position), selection);
		document.set_style(node, &style)?;
	}
	Ok(())
}
