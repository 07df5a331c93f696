use leptos::prelude::*;

use crate::components::svg_map::color::ColorPalette;
use crate::components::svg_map::settings::{SettingValue, SettingsObject, enumerate};
use crate::components::svg_map::{
	CategoricalTable, Column, MapConfig, MetricColors, RefreshStats, SvgDataMap, transform,
};

/// Small floor plan; room ids double as the data's category keys.
const SAMPLE_PLAN: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 420 260">
	<rect id="outline" x="2" y="2" width="416" height="256" fill="none" stroke="#444"/>
	<rect id="Room-101" x="10" y="10" width="130" height="110"/>
	<rect id="Room-102" x="145" y="10" width="130" height="110"/>
	<rect id="Room-103" x="280" y="10" width="130" height="110"/>
	<path id="Room-104" d="M10 130 H200 V250 H10 Z"/>
	<g id="Wing-B">
		<rect id="Room-105" x="210" y="130" width="95" height="120"/>
		<circle id="Room-106" cx="357" cy="190" r="52"/>
	</g>
	<rect id="Stairs" x="190" y="115" width="30" height="20"/>
</svg>"##;

fn sample_table(cross_filter: bool) -> CategoricalTable {
	let rooms = [
		"Room-101", "Room-102", "Room-103", "Room-104", "Room-105", "Room-106", "Room-999",
	];
	let loads = [12.0, 27.0, 45.0, 8.0, 33.0, 61.0, 5.0];
	let owners = ["Ops", "Finance", "Ops", "HR", "R&D", "R&D", "Unknown"];
	CategoricalTable {
		category: Column::new("Room", rooms.iter().map(|r| Some(r.to_string())).collect()),
		measure: Column::new("Occupancy", loads.iter().map(|l| Some(*l)).collect()),
		highlights: cross_filter.then(|| {
			loads
				.iter()
				.zip(owners)
				.map(|(load, owner)| (owner == "Ops").then_some(*load))
				.collect()
		}),
		tooltips: vec![Column::new(
			"Owner",
			owners.iter().map(|o| Some(o.to_string())).collect(),
		)],
	}
}

fn sample_config(show_labels: bool, thresholds: bool) -> MapConfig {
	let mut config = MapConfig {
		svg_source: SAMPLE_PLAN.to_owned(),
		..MapConfig::default()
	};
	config.labels.show = show_labels;
	if thresholds {
		config.metric_colors = MetricColors {
			thresholds: [Some(10.0), Some(20.0), Some(30.0), Some(40.0), Some(50.0)],
			colors: [
				Some("#1a9850".into()),
				Some("#91cf60".into()),
				Some("#d9ef8b".into()),
				Some("#fee08b".into()),
				Some("#fc8d59".into()),
				Some("#d73027".into()),
			],
		};
	}
	config
}

fn describe(value: &SettingValue) -> String {
	match value {
		SettingValue::Text(text) if text.trim_start().starts_with('<') => {
			format!("inline SVG ({} chars)", text.len())
		}
		SettingValue::Text(text) => text.clone(),
		SettingValue::Color { solid } => solid.color.clone(),
		SettingValue::Number(Some(n)) => n.to_string(),
		SettingValue::Number(None) => "unset".to_owned(),
		SettingValue::Toggle(on) => on.to_string(),
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let (show_labels, set_show_labels) = signal(true);
	let (thresholds, set_thresholds) = signal(true);
	let (cross_filter, set_cross_filter) = signal(false);
	let stats = RwSignal::new(None::<RefreshStats>);

	let config = Signal::derive(move || sample_config(show_labels.get(), thresholds.get()));
	let data = Signal::derive(move || {
		transform(
			&sample_table(cross_filter.get()),
			&config.get(),
			&mut ColorPalette::new(),
		)
		.data_points
	});

	let settings_rows = move || {
		let config = config.get();
		SettingsObject::ALL
			.into_iter()
			.flat_map(|object| {
				enumerate(object, &config)
					.into_iter()
					.map(move |property| (object.name(), property))
			})
			.map(|(object, property)| {
				view! {
					<li>
						<code>{format!("{}.{}", object, property.name)}</code>
						" = "
						{describe(&property.value)}
					</li>
				}
			})
			.collect_view()
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="map-page">
				<div class="map-toolbar">
					<h1>"Floor Occupancy"</h1>
					<label>
						<input
							type="checkbox"
							prop:checked=show_labels
							on:change=move |ev| set_show_labels.set(event_target_checked(&ev))
						/>
						"Data labels"
					</label>
					<label>
						<input
							type="checkbox"
							prop:checked=thresholds
							on:change=move |ev| set_thresholds.set(event_target_checked(&ev))
						/>
						"Threshold colors"
					</label>
					<label>
						<input
							type="checkbox"
							prop:checked=cross_filter
							on:change=move |ev| set_cross_filter.set(event_target_checked(&ev))
						/>
						"Highlight Ops rooms"
					</label>
					<p class="subtitle">
						"Click a room to select it, Ctrl-click to add to the selection, "
						"click the background to clear."
					</p>
					<p class="stats">
						{move || {
							stats
								.get()
								.map(|s| s.to_string())
								.unwrap_or_else(|| "Loading map...".to_owned())
						}}
					</p>
				</div>
				<div class="map-canvas">
					<SvgDataMap config=config data=data stats=stats />
				</div>
				<details class="map-settings">
					<summary>"Settings"</summary>
					<ul>{settings_rows}</ul>
				</details>
			</div>
		</ErrorBoundary>
	}
}
