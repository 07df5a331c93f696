use serde::Serialize;

use super::types::{COLOR_SLOTS, MapConfig, NEUTRAL_GRAY, THRESHOLD_SLOTS};

/// Groups of properties a host settings panel can show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsObject {
	Settings,
	MetricColors,
	DataLabels,
}

impl SettingsObject {
	pub const ALL: [SettingsObject; 3] = [Self::Settings, Self::MetricColors, Self::DataLabels];

	pub fn name(self) -> &'static str {
		match self {
			Self::Settings => "settings",
			Self::MetricColors => "metricColors",
			Self::DataLabels => "dataLabels",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
	Text(String),
	Color { solid: SolidColor },
	Number(Option<f64>),
	Toggle(bool),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SolidColor {
	pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SettingsProperty {
	pub name: String,
	pub value: SettingValue,
}

impl SettingsProperty {
	fn new(name: impl Into<String>, value: SettingValue) -> Self {
		Self {
			name: name.into(),
			value,
		}
	}
}

/// Lists the properties of `object` from the last applied configuration.
///
/// Metric colors come out color-first (`color1`, `threshold1`, ...) with the
/// fallback `color6` last; unset colors read as the neutral gray.
pub fn enumerate(object: SettingsObject, config: &MapConfig) -> Vec<SettingsProperty> {
	match object {
		SettingsObject::Settings => vec![SettingsProperty::new(
			"svgUrl",
			SettingValue::Text(config.svg_source.clone()),
		)],
		SettingsObject::MetricColors => {
			let colors = &config.metric_colors.colors;
			let color = |slot: usize| SettingValue::Color {
				solid: SolidColor {
					color: colors[slot].clone().unwrap_or_else(|| NEUTRAL_GRAY.to_owned()),
				},
			};
			let mut properties = Vec::with_capacity(THRESHOLD_SLOTS + COLOR_SLOTS);
			for (slot, threshold) in config.metric_colors.thresholds.iter().enumerate() {
				properties.push(SettingsProperty::new(format!("color{}", slot + 1), color(slot)));
				properties.push(SettingsProperty::new(
					format!("threshold{}", slot + 1),
					SettingValue::Number(*threshold),
				));
			}
			properties.push(SettingsProperty::new(
				format!("color{}", COLOR_SLOTS),
				color(THRESHOLD_SLOTS),
			));
			properties
		}
		SettingsObject::DataLabels => vec![
			SettingsProperty::new("show", SettingValue::Toggle(config.labels.show)),
			SettingsProperty::new(
				"fontSize",
				SettingValue::Number(Some(config.labels.font_size)),
			),
		],
	}
}
