use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info};
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use super::document::ClickHandler;
use super::dom::{self, SvgDom};
use super::engine::RenderEngine;
use super::loader::{self, LoadGeneration, LoadOutcome};
use super::selection_manager::{LocalSelectionManager, SelectionManager};
use super::types::{DataPoint, LabelSettings, MapClick, MapConfig, RefreshStats};
use crate::error::MapError;

const MISSING_SOURCE: &str = "Please provide an SVG URL in the format settings.";

type EngineSlot = Rc<RefCell<Option<RenderEngine<SvgDom>>>>;

fn run_refresh(
	engine: &mut RenderEngine<SvgDom>,
	manager: &LocalSelectionManager,
	points: &[DataPoint],
	labels: &LabelSettings,
	container: &Element,
) -> Option<RefreshStats> {
	match engine.refresh(points, labels, &manager.current()) {
		Ok(stats) => Some(stats),
		Err(err) => {
			let err = MapError::from(err);
			error!("{}", err);
			dom::overlay_error(container, &err.to_string());
			None
		}
	}
}

/// Routes document clicks through the selection manager and re-syncs the
/// engine once the manager answers.
fn click_dispatcher(engine: &EngineSlot, manager: &Rc<LocalSelectionManager>) -> ClickHandler {
	let engine = Rc::downgrade(engine);
	let manager = manager.clone();
	Rc::new(move |click: MapClick| {
		let Some(engine) = engine.upgrade() else {
			return;
		};
		let request = match engine.borrow().as_ref() {
			Some(current) => current.resolve_click(click),
			None => return,
		};
		let manager = manager.clone();
		spawn_local(async move {
			let Some(snapshot) = request.execute(manager.as_ref()).await else {
				return;
			};
			if let Some(current) = engine.borrow().as_ref() {
				if let Err(err) = current.sync_selection(&snapshot) {
					error!("{}", MapError::from(err));
				}
			}
		});
	})
}

/// Loads the configured map and keeps its shapes in sync with `data`.
#[component]
pub fn SvgDataMap(
	#[prop(into)] config: Signal<MapConfig>,
	#[prop(into)] data: Signal<Vec<DataPoint>>,
	/// Receives the statistics of every successful refresh.
	#[prop(optional)]
	stats: Option<RwSignal<Option<RefreshStats>>>,
) -> impl IntoView {
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let engine: EngineSlot = Rc::new(RefCell::new(None));
	let manager = Rc::new(LocalSelectionManager::new());
	let requested: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(None));
	let latest: Rc<RefCell<(Vec<DataPoint>, LabelSettings)>> = Rc::default();
	let generation = LoadGeneration::default();
	let dispatch = click_dispatcher(&engine, &manager);

	let report = move |result: Option<RefreshStats>| {
		if let (Some(signal), Some(result)) = (stats, result) {
			signal.set(Some(result));
		}
	};

	Effect::new(move |_| {
		let config = config.get();
		let points = data.get();
		let Some(div) = container_ref.get() else {
			return;
		};
		let container: Element = div.into();
		*latest.borrow_mut() = (points, config.labels.clone());

		let source = config.svg_source.trim().to_owned();
		if source.is_empty() {
			generation.begin();
			*requested.borrow_mut() = None;
			*engine.borrow_mut() = None;
			loader::show_message(&container, MISSING_SOURCE);
			return;
		}

		if requested.borrow().as_deref() != Some(source.as_str()) {
			info!("Loading SVG source ({} chars)", source.len());
			*requested.borrow_mut() = Some(source.clone());
			let ticket = generation.begin();
			let (generation, engine, manager, latest, dispatch) = (
				generation.clone(),
				engine.clone(),
				manager.clone(),
				latest.clone(),
				dispatch.clone(),
			);
			spawn_local(async move {
				match loader::load_latest(&source, &container, &generation, ticket).await {
					LoadOutcome::Mounted(svg) => {
						let mut loaded = RenderEngine::new(SvgDom::new(svg), dispatch);
						let (points, labels) = latest.borrow().clone();
						report(run_refresh(&mut loaded, &manager, &points, &labels, &container));
						*engine.borrow_mut() = Some(loaded);
					}
					LoadOutcome::Failed(_) => *engine.borrow_mut() = None,
					LoadOutcome::Superseded => {}
				}
			});
			return;
		}

		// While a load is pending the previous map, if any, keeps refreshing.
		if let Some(current) = engine.borrow_mut().as_mut() {
			let (points, labels) = latest.borrow().clone();
			report(run_refresh(current, &manager, &points, &labels, &container));
		}
	});

	view! {
		<div
			node_ref=container_ref
			class="svg-data-map"
			style="position: relative; width: 100%; height: 100%;"
		/>
	}
}
