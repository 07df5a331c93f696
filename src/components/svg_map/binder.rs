use std::collections::HashMap;

use log::debug;

use super::document::ShapeDocument;
use super::types::DataPoint;

/// Id lookup over a loaded document, built once per document.
///
/// When several elements share an id the first one in document order wins.
#[derive(Clone, Debug, Default)]
pub struct ElementIndex {
	ids: Vec<Option<String>>,
	by_id: HashMap<String, usize>,
}

impl ElementIndex {
	pub fn build<D: ShapeDocument>(document: &D, nodes: &[D::Node]) -> Self {
		let ids: Vec<Option<String>> = nodes
			.iter()
			.map(|node| document.element_id(node).filter(|id| !id.is_empty()))
			.collect();
		let mut by_id = HashMap::new();
		for (position, id) in ids.iter().enumerate() {
			if let Some(id) = id {
				by_id.entry(id.clone()).or_insert(position);
			}
		}
		Self { ids, by_id }
	}

	pub fn position_of(&self, id: &str) -> Option<usize> {
		self.by_id.get(id).copied()
	}

	pub fn len(&self) -> usize {
		self.ids.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}

	/// Every element id in document order, duplicates included.
	pub fn all_ids(&self) -> Vec<String> {
		self.ids.iter().flatten().cloned().collect()
	}
}

/// The datum currently bound to each element, by position.
#[derive(Clone, Debug, Default)]
pub struct BindingTable {
	slots: Vec<Option<DataPoint>>,
}

impl BindingTable {
	pub fn with_len(len: usize) -> Self {
		Self {
			slots: vec![None; len],
		}
	}

	pub fn datum(&self, position: usize) -> Option<&DataPoint> {
		self.slots.get(position).and_then(Option::as_ref)
	}

	pub fn bound_count(&self) -> usize {
		self.slots.iter().filter(|s| s.is_some()).count()
	}

	fn clear(&mut self) {
		self.slots.iter_mut().for_each(|slot| *slot = None);
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct MatchedShape {
	pub position: usize,
	pub point: DataPoint,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Binding {
	pub matched: Vec<MatchedShape>,
	pub unmatched_data_ids: Vec<String>,
	pub all_element_ids: Vec<String>,
}

/// Binds each data point to the element whose id equals its category.
///
/// Every slot is cleared first so elements that lost their row in this refresh
/// carry no stale datum. Points without an element are reported, not errors.
pub fn bind(index: &ElementIndex, points: &[DataPoint], table: &mut BindingTable) -> Binding {
	if table.slots.len() != index.len() {
		*table = BindingTable::with_len(index.len());
	} else {
		table.clear();
	}

	let mut binding = Binding {
		all_element_ids: index.all_ids(),
		..Binding::default()
	};
	for point in points {
		match index.position_of(&point.category) {
			Some(position) => {
				table.slots[position] = Some(point.clone());
				binding.matched.push(MatchedShape {
					position,
					point: point.clone(),
				});
			}
			None => {
				debug!("No element with id {:?}", point.category);
				binding.unmatched_data_ids.push(point.category.clone());
			}
		}
	}
	binding
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::components::svg_map::memory::{MemoryDocument, point};

	fn index_for(doc: &MemoryDocument) -> ElementIndex {
		ElementIndex::build(doc, &doc.elements())
	}

	#[test]
	fn matches_by_exact_id() {
		let doc = MemoryDocument::with_ids(&["A", "B", "c"]);
		let index = index_for(&doc);
		let mut table = BindingTable::default();
		let points = vec![point("A", 1.0), point("C", 2.0), point("Z", 3.0)];

		let binding = bind(&index, &points, &mut table);

		assert_eq!(binding.matched.len(), 1);
		assert_eq!(binding.matched[0].position, 0);
		assert_eq!(binding.unmatched_data_ids, vec!["C".to_owned(), "Z".to_owned()]);
		assert_eq!(binding.all_element_ids, vec!["A", "B", "c"]);
		assert_eq!(
			binding.matched.len() + binding.unmatched_data_ids.len(),
			points.len()
		);
	}

	#[test]
	fn duplicate_ids_bind_first_in_document_order() {
		let doc = MemoryDocument::with_ids(&["x", "A", "A"]);
		let index = index_for(&doc);
		let mut table = BindingTable::default();

		let binding = bind(&index, &[point("A", 1.0)], &mut table);

		assert_eq!(binding.matched[0].position, 1);
		assert!(table.datum(2).is_none());
	}

	#[test]
	fn rebinding_is_idempotent_and_clears_stale_slots() {
		let doc = MemoryDocument::with_ids(&["A", "B"]);
		let index = index_for(&doc);
		let mut table = BindingTable::default();

		let first = bind(&index, &[point("A", 1.0), point("B", 2.0)], &mut table);
		let second = bind(&index, &[point("A", 1.0), point("B", 2.0)], &mut table);
		assert_eq!(first, second);
		assert_eq!(table.bound_count(), 2);

		bind(&index, &[point("B", 5.0)], &mut table);
		assert!(table.datum(0).is_none());
		assert_eq!(table.datum(1).map(|d| d.value), Some(5.0));
	}

	#[test]
	fn elements_without_ids_are_not_indexed() {
		let doc = MemoryDocument::new(vec![None, Some(""), Some("A")]);
		let index = index_for(&doc);
		assert_eq!(index.len(), 3);
		assert_eq!(index.position_of(""), None);
		assert_eq!(index.position_of("A"), Some(2));
		assert_eq!(index.all_ids(), vec!["A"]);
	}
}
