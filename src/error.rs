//! Error types surfaced by loading and rendering a map.

use thiserror::Error;

/// Failure to obtain a usable SVG document from the configured source.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LoadError {
	#[error("no SVG source configured")]
	EmptySource,
	#[error("request failed: {0}")]
	Fetch(String),
	#[error("Failed to load SVG: {status} {text}")]
	HttpStatus { status: u16, text: String },
	#[error("could not decode data URI: {0}")]
	Decode(String),
	#[error("XML Parsing Error: {0}")]
	Parse(String),
	#[error("Invalid SVG content: root element is <{0}>")]
	NotSvg(String),
	#[error("could not attach SVG to the page: {0}")]
	Mount(String),
}

/// Failure while styling, labelling or wiring the attached document.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
	#[error("no SVG document is attached")]
	NoDocument,
	#[error("DOM operation failed: {0}")]
	Dom(String),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MapError {
	#[error("Error loading SVG: {0}")]
	Load(#[from] LoadError),
	#[error("Renderer Error: {0}")]
	Render(#[from] RenderError),
}
