//! Binds data rows to the shapes of a loaded SVG map by element id and keeps
//! their fill, labels and selection state in sync with the data.

pub mod binder;
pub mod color;
mod component;
pub mod document;
pub mod dom;
pub mod engine;
pub mod labels;
pub mod loader;
#[cfg(test)]
mod memory;
pub mod selection;
pub mod selection_manager;
pub mod settings;
pub mod transform;
mod types;

pub use component::SvgDataMap;
pub use engine::{RenderEngine, SelectionRequest};
pub use selection_manager::{LocalSelectionManager, SelectionId, SelectionManager};
pub use transform::{CategoricalTable, Column, ViewModel, transform};
pub use types::{
	BBox, COLOR_SLOTS, DataPoint, LabelSettings, MapClick, MapConfig, MetricColors,
	NEUTRAL_GRAY, RefreshStats, THRESHOLD_SLOTS, ThresholdBucket, TooltipItem,
};
