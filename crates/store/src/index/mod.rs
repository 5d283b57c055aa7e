//! Dual index over stored widgets.
//!
//! [`StackIndex`] owns both lookups (`by_z` and `by_id`) and is the only code
//! allowed to touch them, so the two can never drift apart. Every method
//! leaves the pair consistent on return:
//!
//! - `by_z.len() == by_id.len()`
//! - for every stored widget `w`: `by_z[w.z] == w == by_id[w.id]`

mod placement;

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use stratum_primitives::{Widget, WidgetId, ZIndex};

use crate::error::{Result, StoreError};


pub(crate) struct StackIndex {
	/// Occupied stack positions, ordered so listing and max lookups are cheap.
	by_z: BTreeMap<ZIndex, Widget>,
	by_id: FxHashMap<WidgetId, Widget>,
}

impl StackIndex {
	pub(crate) fn with_capacity(capacity: usize) -> Self {
		Self {
			by_z: BTreeMap::new(),
			by_id: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
		}
	}

	pub(crate) fn len(&self) -> usize {
		self.by_id.len()
	}

	pub(crate) fn is_empty(&self) -> bool {
		self.by_id.is_empty()
	}

	pub(crate) fn get(&self, id: &str) -> Option<&Widget> {
		self.by_id.get(id)
	}

	pub(crate) fn at(&self, z: ZIndex) -> Option<&Widget> {
		self.by_z.get(&z)
	}

	pub(crate) fn contains_z(&self, z: ZIndex) -> bool {
		self.by_z.contains_key(&z)
	}

	pub(crate) fn max_z(&self) -> Option<ZIndex> {
		self.by_z.last_key_value().map(|(&z, _)| z)
	}

	/// Slot for a widget created without an explicit z: one above the current
	/// top, or `floor` when nothing is stored.
	pub(crate) fn next_z(&self, floor: ZIndex) -> Result<ZIndex> {
		match self.max_z() {
			None => Ok(floor),
			Some(max) => max
				.checked_add(1)
				.ok_or(StoreError::CapacityExceeded { requested: max }),
		}
	}

	/// Swaps in a new value for a widget that keeps both its id and its slot.
	pub(crate) fn replace(&mut self, widget: Widget) {
		debug_assert!(
			self.by_z.get(&widget.z()).is_some_and(|w| w.id() == widget.id()),
			"replace must keep the widget in its current slot"
		);
		self.by_z.insert(widget.z(), widget.clone());
		self.by_id.insert(widget.id().clone(), widget);
	}

	/// Stores a widget whose slot and id are both known to be free.
	pub(crate) fn insert_vacant(&mut self, widget: Widget) {
		debug_assert!(!self.by_z.contains_key(&widget.z()), "slot {} is occupied", widget.z());
		debug_assert!(!self.by_id.contains_key(widget.id()), "id {} is already stored", widget.id());
		self.by_id.insert(widget.id().clone(), widget.clone());
		self.by_z.insert(widget.z(), widget);
	}

	/// Removes the widget with `id` from both lookups.
	pub(crate) fn detach(&mut self, id: &str) -> Option<Widget> {
		let widget = self.by_id.remove(id)?;
		let slot = self.by_z.remove(&widget.z());
		debug_assert!(
			slot.as_ref().is_some_and(|w| w.id() == widget.id()),
			"by_z[{}] did not hold {}",
			widget.z(),
			widget.id()
		);
		Some(widget)
	}

	pub(crate) fn clear(&mut self) {
		self.by_z.clear();
		self.by_id.clear();
	}

	/// Owned copy of every widget, ascending by z.
	pub(crate) fn snapshot(&self) -> Vec<Widget> {
		self.by_z.values().cloned().collect()
	}

	/// Verifies the bijection between both lookups.
	#[cfg(test)]
	pub(crate) fn check_invariants(&self) -> std::result::Result<(), String> {
		if self.by_z.len() != self.by_id.len() {
			return Err(format!("by_z has {} entries, by_id has {}", self.by_z.len(), self.by_id.len()));
		}
		for (&z, widget) in &self.by_z {
			if widget.z() != z {
				return Err(format!("by_z[{z}] holds widget with z={}", widget.z()));
			}
			match self.by_id.get(widget.id()) {
				Some(other) if other == widget => {}
				Some(other) => return Err(format!("by_id[{}] = {other:?}, by_z[{z}] = {widget:?}", widget.id())),
				None => return Err(format!("by_id is missing {}", widget.id())),
			}
		}
		Ok(())
	}
}
