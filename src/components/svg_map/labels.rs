use super::color::contrast_color;
use super::document::{Label, ShapeDocument};
use super::types::{BBox, DataPoint, LabelSettings};
use crate::error::RenderError;

pub fn label_for(point: &DataPoint, bbox: BBox, settings: &LabelSettings) -> Label {
	let (x, y) = bbox.center();
	Label {
		x,
		y,
		text: point.label_text(),
		font_size: settings.font_size,
		fill: contrast_color(&point.color),
	}
}

/// Drops previous labels, then centers one label on each matched shape.
///
/// Shapes without a bounding box are skipped. Returns how many were placed.
pub fn place<'a, D, I>(
	document: &D,
	matched: I,
	settings: &LabelSettings,
) -> Result<usize, RenderError>
where
	D: ShapeDocument,
	D::Node: 'a,
	I: IntoIterator<Item = (&'a D::Node, &'a DataPoint)>,
{
	document.remove_labels()?;
	if !settings.show {
		return Ok(0);
	}

	let mut placed = 0;
	for (node, point) in matched {
		let Some(bbox) = document.bounding_box(node) else {
			continue;
		};
		document.append_label(&label_for(point, bbox, settings))?;
		placed += 1;
	}
	Ok(placed)
}
