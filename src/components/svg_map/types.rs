use std::fmt;

use serde::{Deserialize, Serialize};

use super::selection_manager::SelectionId;

/// Fill used for shapes that carry no data or are outside an active selection.
pub const NEUTRAL_GRAY: &str = "#CCCCCC";
pub const THRESHOLD_SLOTS: usize = 5;
pub const COLOR_SLOTS: usize = THRESHOLD_SLOTS + 1;

#[derive(Clone, Debug, PartialEq)]
pub struct TooltipItem {
	pub display_name: String,
	pub value: String,
}

/// One row of the bound dataset, rebuilt on every refresh.
#[derive(Clone, Debug, PartialEq)]
pub struct DataPoint {
	/// Join key matched against element ids.
	pub category: String,
	pub value: f64,
	pub color: String,
	pub opacity: Option<f64>,
	pub highlighted: bool,
	pub selection_id: SelectionId,
	pub tooltip: Vec<TooltipItem>,
}

impl DataPoint {
	pub fn fill_opacity(&self) -> f64 {
		self.opacity.unwrap_or(1.0)
	}

	/// `label: value` lines, or `category: value` when no tooltip fields exist.
	pub fn tooltip_text(&self) -> String {
		if self.tooltip.is_empty() {
			return format!("{}: {}", self.category, self.value);
		}
		self.tooltip
			.iter()
			.map(|item| format!("{}: {}", item.display_name, item.value))
			.collect::<Vec<_>>()
			.join("\n")
	}

	pub fn label_text(&self) -> String {
		format!("{} [{}]", self.category, self.value)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct ThresholdBucket {
	pub threshold: Option<f64>,
	pub color: Option<String>,
}

/// Five optional (threshold, color) pairs plus the fallback color in slot six.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricColors {
	pub thresholds: [Option<f64>; THRESHOLD_SLOTS],
	pub colors: [Option<String>; COLOR_SLOTS],
}

impl MetricColors {
	pub fn buckets(&self) -> Vec<ThresholdBucket> {
		self.thresholds
			.iter()
			.zip(self.colors.iter())
			.map(|(threshold, color)| ThresholdBucket {
				threshold: *threshold,
				color: color.clone(),
			})
			.collect()
	}

	pub fn fallback_color(&self) -> &str {
		self.colors[THRESHOLD_SLOTS]
			.as_deref()
			.unwrap_or(NEUTRAL_GRAY)
	}

	/// Threshold coloring only takes over from the palette once a color is set.
	pub fn is_configured(&self) -> bool {
		self.colors.iter().any(Option::is_some)
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelSettings {
	pub show: bool,
	pub font_size: f64,
}

impl Default for LabelSettings {
	fn default() -> Self {
		Self {
			show: false,
			font_size: 12.0,
		}
	}
}

/// Everything a refresh needs besides the rows themselves.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapConfig {
	/// Markup, `data:` URI or URL of the map.
	pub svg_source: String,
	pub metric_colors: MetricColors,
	pub labels: LabelSettings,
}

/// Outcome of one refresh pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RefreshStats {
	pub total_elements: usize,
	pub matched_count: usize,
	pub matched_ids: Vec<String>,
	pub unmatched_ids: Vec<String>,
	pub all_ids: Vec<String>,
	pub labels_placed: usize,
}

impl fmt::Display for RefreshStats {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} of {} data points matched ({} elements with ids, {} labels)",
			self.matched_count,
			self.matched_count + self.unmatched_ids.len(),
			self.total_elements,
			self.labels_placed
		)
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BBox {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl BBox {
	pub fn center(&self) -> (f64, f64) {
		(self.x + self.width / 2.0, self.y + self.height / 2.0)
	}
}

/// Pointer input routed from the document back to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapClick {
	/// A bound shape, by its position in the document's element order.
	Shape { position: usize, multi_select: bool },
	Background,
}
