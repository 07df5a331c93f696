use std::cell::RefCell;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::{self, LocalBoxFuture};

/// Opaque identity of one data row. Only ever compared, never inspected.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SelectionId {
	column: String,
	row: usize,
	key: String,
}

impl SelectionId {
	pub fn for_row(column: &str, row: usize, key: &str) -> Self {
		Self {
			column: column.to_owned(),
			row,
			key: key.to_owned(),
		}
	}

	pub fn equals(&self, other: &SelectionId) -> bool {
		self == other
	}
}

/// Grants and revokes selection identities on behalf of the host.
pub trait SelectionManager {
	/// Resolves to the selection snapshot after the request was applied.
	fn select(&self, id: &SelectionId, multi_select: bool)
	-> LocalBoxFuture<'static, Vec<SelectionId>>;

	fn clear(&self) -> LocalBoxFuture<'static, ()>;

	fn current(&self) -> Vec<SelectionId>;
}

/// In-process selection manager following the usual host semantics: a plain
/// select replaces the selection (or clears it when the id was the only one
/// selected), a multi-select toggles membership.
#[derive(Clone, Debug, Default)]
pub struct LocalSelectionManager {
	selected: Rc<RefCell<Vec<SelectionId>>>,
}

impl LocalSelectionManager {
	pub fn new() -> Self {
		Self::default()
	}
}

impl SelectionManager for LocalSelectionManager {
	fn select(
		&self,
		id: &SelectionId,
		multi_select: bool,
	) -> LocalBoxFuture<'static, Vec<SelectionId>> {
		let mut selected = self.selected.borrow_mut();
		if multi_select {
			if let Some(pos) = selected.iter().position(|s| s.equals(id)) {
				selected.remove(pos);
			} else {
				selected.push(id.clone());
			}
		} else if selected.len() == 1 && selected[0].equals(id) {
			selected.clear();
		} else {
			*selected = vec![id.clone()];
		}
		future::ready(selected.clone()).boxed_local()
	}

	fn clear(&self) -> LocalBoxFuture<'static, ()> {
		self.selected.borrow_mut().clear();
		future::ready(()).boxed_local()
	}

	fn current(&self) -> Vec<SelectionId> {
		self.selected.borrow().clone()
	}
}
