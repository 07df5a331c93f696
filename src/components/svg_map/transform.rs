use super::color::{ColorPalette, resolve};
use super::selection_manager::SelectionId;
use super::types::{DataPoint, MapConfig, TooltipItem};

/// A named column of optional values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Column<T> {
	pub display_name: String,
	pub values: Vec<Option<T>>,
}

impl<T> Column<T> {
	pub fn new(display_name: &str, values: Vec<Option<T>>) -> Self {
		Self {
			display_name: display_name.to_owned(),
			values,
		}
	}

	fn get(&self, row: usize) -> Option<&T> {
		self.values.get(row).and_then(Option::as_ref)
	}
}

/// Categorical rows as the host delivers them: one key column, one measure,
/// optional cross-filter highlights and any number of extra tooltip columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoricalTable {
	pub category: Column<String>,
	pub measure: Column<f64>,
	/// Present only while a cross-filter is active; `Some` marks a highlighted row.
	pub highlights: Option<Vec<Option<f64>>>,
	pub tooltips: Vec<Column<String>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewModel {
	pub data_points: Vec<DataPoint>,
	pub min_value: Option<f64>,
	pub max_value: Option<f64>,
}

pub fn transform(
	table: &CategoricalTable,
	config: &MapConfig,
	palette: &mut ColorPalette,
) -> ViewModel {
	let rows = table.category.values.len().max(table.measure.values.len());
	let metric_colors = &config.metric_colors;
	let buckets = metric_colors.buckets();

	let mut data_points = Vec::with_capacity(rows);
	for row in 0..rows {
		let category = table.category.get(row).cloned().unwrap_or_default();
		let measure = table.measure.get(row).copied();
		let value = measure.unwrap_or(f64::NAN);

		let (color, opacity) = if metric_colors.is_configured() {
			let resolved = resolve(value, &buckets, metric_colors.fallback_color());
			(resolved.color, resolved.opacity)
		} else {
			(palette.color_for(&category).to_owned(), 1.0)
		};

		let mut tooltip = vec![
			TooltipItem {
				display_name: table.category.display_name.clone(),
				value: category.clone(),
			},
			TooltipItem {
				display_name: table.measure.display_name.clone(),
				value: measure.map(|v| v.to_string()).unwrap_or_default(),
			},
		];
		tooltip.extend(table.tooltips.iter().map(|column| TooltipItem {
			display_name: column.display_name.clone(),
			value: column.get(row).cloned().unwrap_or_default(),
		}));

		let highlighted = table
			.highlights
			.as_ref()
			.is_some_and(|h| h.get(row).is_some_and(Option::is_some));

		data_points.push(DataPoint {
			selection_id: SelectionId::for_row(&table.category.display_name, row, &category),
			category,
			value,
			color,
			opacity: Some(opacity),
			highlighted,
			tooltip,
		});
	}

	let finite = || table.measure.values.iter().flatten().copied().filter(|v| v.is_finite());
	ViewModel {
		data_points,
		min_value: finite().reduce(f64::min),
		max_value: finite().reduce(f64::max),
	}
}
