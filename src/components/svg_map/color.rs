use std::collections::HashMap;

use super::types::{NEUTRAL_GRAY, ThresholdBucket};

/// Category palette used when no metric colors are configured.
const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

#[derive(Clone, Debug, PartialEq)]
pub struct Resolved {
	pub color: String,
	pub opacity: f64,
}

/// Picks the first bucket, by ascending threshold, whose threshold is `>= value`.
///
/// Buckets without a threshold never match. Values above every threshold (and
/// NaN, which compares false against everything) get the fallback color.
pub fn resolve(value: f64, buckets: &[ThresholdBucket], fallback_color: &str) -> Resolved {
	let mut ordered: Vec<(f64, &str)> = buckets
		.iter()
		.filter_map(|b| {
			b.threshold
				.map(|t| (t, b.color.as_deref().unwrap_or(NEUTRAL_GRAY)))
		})
		.collect();
	ordered.sort_by(|a, b| a.0.total_cmp(&b.0));

	let color = ordered
		.iter()
		.find(|(threshold, _)| value <= *threshold)
		.map(|(_, color)| *color)
		.unwrap_or(fallback_color);

	Resolved {
		color: color.to_owned(),
		opacity: 1.0,
	}
}

/// Hands out palette colors, stable per key for the lifetime of the palette.
#[derive(Clone, Debug, Default)]
pub struct ColorPalette {
	assigned: HashMap<String, usize>,
}

impl ColorPalette {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn color_for(&mut self, key: &str) -> &'static str {
		let next = self.assigned.len();
		let slot = *self.assigned.entry(key.to_owned()).or_insert(next);
		COLORS[slot % COLORS.len()]
	}
}

/// Parses `#rgb`, `#rrggbb`, `rgb(r, g, b)` and a few named colors.
pub fn parse_rgb(value: &str) -> Option<(u8, u8, u8)> {
	let s = value.trim().to_ascii_lowercase();
	if let Some(hex) = s.strip_prefix('#') {
		if !hex.is_ascii() {
			return None;
		}
		return match hex.len() {
			3 => {
				let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
				Some((digit(0)?, digit(1)?, digit(2)?))
			}
			6 => Some((
				u8::from_str_radix(&hex[0..2], 16).ok()?,
				u8::from_str_radix(&hex[2..4], 16).ok()?,
				u8::from_str_radix(&hex[4..6], 16).ok()?,
			)),
			_ => None,
		};
	}
	if let Some(args) = s
		.strip_prefix("rgb(")
		.or_else(|| s.strip_prefix("rgba("))
		.and_then(|rest| rest.strip_suffix(')'))
	{
		let mut channels = args.split(',').map(|c| c.trim().parse::<f64>().ok());
		let mut next = || channels.next().flatten().map(|c| c.clamp(0.0, 255.0).round() as u8);
		return Some((next()?, next()?, next()?));
	}
	match s.as_str() {
		"black" => Some((0, 0, 0)),
		"white" => Some((255, 255, 255)),
		"gray" | "grey" => Some((128, 128, 128)),
		"silver" => Some((192, 192, 192)),
		"red" => Some((255, 0, 0)),
		"green" => Some((0, 128, 0)),
		"blue" => Some((0, 0, 255)),
		"yellow" => Some((255, 255, 0)),
		"orange" => Some((255, 165, 0)),
		_ => None,
	}
}

/// Luminance on the 0..=1 scale: `0.2126R + 0.7152G + 0.0722B`.
pub fn luminance((r, g, b): (u8, u8, u8)) -> f64 {
	(0.2126 * r as f64 + 0.7152 * g as f64 + 0.0722 * b as f64) / 255.0
}

/// Black text on light fills, white on dark. Unparseable colors get black.
pub fn contrast_color(fill: &str) -> &'static str {
	match parse_rgb(fill) {
		Some(rgb) if luminance(rgb) <= 0.5 => "white",
		_ => "black",
	}
}
