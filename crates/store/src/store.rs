//! Thread-safe widget store.
//!
//! All state sits in one [`StackIndex`] behind a single `parking_lot::RwLock`.
//! Lookups and listings take the read side; every mutation takes the write side
//! for the whole change, so a cascade that moves many widgets is never
//! observed half done.
//!
//! `parking_lot`'s lock is task-fair: a steady stream of readers can't starve a
//! waiting writer, and the reverse.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use stratum_primitives::{
	Clock, Coordinates, Dimensions, IdGenerator, SystemClock, TimeOrderedIds, Timestamp, Widget,
	ZIndex,
};
use tracing::{debug, trace};

use crate::config::StoreConfig;
use crate::error::Result;
use crate::index::StackIndex;

/// Collection of widgets with unique, collision-resolved z-indexes.
///
/// Share it between threads with an [`Arc`]. Every method returns owned values,
/// so results stay valid after the internal lock is released.
///
/// # Concurrency
///
/// - `list`, `get`, `widget_at`, `len`: read lock.
/// - `create*`, `store`, `update_coordinates`, `update_dimensions`, `remove`,
///   `clear`: write lock.
/// - `update_z`: checks the target slot under the read lock, releases it, then
///   takes the write lock and re-validates before mutating. The two guards are
///   never held together; whatever changed in between is taken into account.
pub struct WidgetStore {
	index: RwLock<StackIndex>,
	ids: Arc<dyn IdGenerator>,
	clock: Arc<dyn Clock>,
	config: StoreConfig,
}

impl Default for WidgetStore {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for WidgetStore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WidgetStore")
			.field("len", &self.len())
			.field("config", &self.config)
			.finish_non_exhaustive()
	}
}

impl WidgetStore {
	/// Creates an empty store with default config, UUIDv7 ids and the system clock.
	pub fn new() -> Self {
		Self::with_config(StoreConfig::default())
	}

	/// Creates an empty store with the given config.
	pub fn with_config(config: StoreConfig) -> Self {
		Self::with_collaborators(config, Arc::new(TimeOrderedIds), Arc::new(SystemClock))
	}

	/// Creates an empty store that draws ids and timestamps from the given sources.
	pub fn with_collaborators(
		config: StoreConfig,
		ids: Arc<dyn IdGenerator>,
		clock: Arc<dyn Clock>,
	) -> Self {
		Self {
			index: RwLock::new(StackIndex::with_capacity(config.initial_capacity)),
			ids,
			clock,
			config,
		}
	}

	/// Returns the config this store was built with.
	pub fn config(&self) -> &StoreConfig {
		&self.config
	}

	/// All widgets, ascending by z.
	pub fn list(&self) -> Vec<Widget> {
		self.index.read().snapshot()
	}

	/// Looks a widget up by id.
	pub fn get(&self, id: &str) -> Option<Widget> {
		self.index.read().get(id).cloned()
	}

	/// Returns the widget occupying `z`, if any.
	pub fn widget_at(&self, z: ZIndex) -> Option<Widget> {
		self.index.read().at(z).cloned()
	}

	/// Number of stored widgets.
	pub fn len(&self) -> usize {
		self.index.read().len()
	}

	/// Returns true if no widgets are stored.
	pub fn is_empty(&self) -> bool {
		self.index.read().is_empty()
	}

	/// Creates a widget at `z`, pushing any occupants up to make room.
	pub fn create_at(
		&self,
		coordinates: Coordinates,
		dimensions: Dimensions,
		z: ZIndex,
	) -> Result<Widget> {
		let widget = Widget::builder(coordinates, dimensions)
			.z(z)
			.build(&*self.ids, &*self.clock);

		let mut index = self.index.write();
		self.place(&mut index, widget.clone())?;
		Ok(widget)
	}

	/// Creates a widget on top of the stack.
	///
	/// The new widget gets one more than the highest stored z, or the configured
	/// `base_z` when the store is empty.
	pub fn create(&self, coordinates: Coordinates, dimensions: Dimensions) -> Result<Widget> {
		let mut index = self.index.write();
		let z = index.next_z(self.config.base_z).inspect_err(|_| {
			debug!(max = ?index.max_z(), "no stack position above the current top");
		})?;
		let widget = Widget::builder(coordinates, dimensions)
			.z(z)
			.build(&*self.ids, &*self.clock);
		self.place(&mut index, widget.clone())?;
		Ok(widget)
	}

	/// Stores a widget built elsewhere and returns it as stored.
	///
	/// A widget still carrying the unplaced sentinel goes on top of the stack.
	/// If a widget with the same id is already stored it is replaced, and its
	/// old slot no longer counts when picking the top. The stored value is
	/// stamped with the current time. On error the store is left as it was.
	pub fn store(&self, widget: Widget) -> Result<Widget> {
		let mut index = self.index.write();
		let previous = index.detach(widget.id().as_str());

		let at = self.clock.now();
		let stamped = if widget.is_placed() {
			Ok(widget.with_z(widget.z(), at))
		} else {
			index.next_z(self.config.base_z).map(|z| widget.with_z(z, at))
		};
		let result = stamped.and_then(|widget| self.place(&mut index, widget.clone()).map(|()| widget));

		if result.is_err()
			&& let Some(previous) = previous
		{
			index.insert_vacant(previous);
		}
		result
	}

	/// Moves a widget to new coordinates, keeping its slot.
	///
	/// Returns the widget unchanged if it is already there, `None` if the id is unknown.
	pub fn update_coordinates(&self, id: &str, coordinates: Coordinates) -> Option<Widget> {
		self.update_in_place(
			id,
			|current| current.coordinates() == coordinates,
			|current, at| current.with_coordinates(coordinates, at),
		)
	}

	/// Resizes a widget, keeping its slot.
	///
	/// Returns the widget unchanged if it already has this size, `None` if the id is unknown.
	pub fn update_dimensions(&self, id: &str, dimensions: Dimensions) -> Option<Widget> {
		self.update_in_place(
			id,
			|current| current.dimensions() == dimensions,
			|current, at| current.with_dimensions(dimensions, at),
		)
	}

	/// Moves a widget to stack position `z`.
	///
	/// An occupied target cascades exactly like [`create_at`](Self::create_at).
	/// Returns `Ok(None)` for an unknown id and the current value if it already sits at `z`.
	pub fn update_z(&self, id: &str, z: ZIndex) -> Result<Option<Widget>> {
		self.update_z_with(id, z, || {})
	}

	/// Applies dimensions, then coordinates, then z, stopping at the first miss.
	pub fn update_all(
		&self,
		id: &str,
		dimensions: Dimensions,
		coordinates: Coordinates,
		z: ZIndex,
	) -> Result<Option<Widget>> {
		if self.update_dimensions(id, dimensions).is_none() {
			return Ok(None);
		}
		if self.update_coordinates(id, coordinates).is_none() {
			return Ok(None);
		}
		self.update_z(id, z)
	}

	/// Removes the stored widget with the same id as `widget`.
	///
	/// Returns the value that was stored, which may be newer than `widget`.
	pub fn remove(&self, widget: &Widget) -> Option<Widget> {
		self.index.write().detach(widget.id().as_str())
	}

	/// Removes every widget.
	pub fn clear(&self) {
		let mut index = self.index.write();
		let removed = index.len();
		index.clear();
		debug!(removed, "cleared widget store");
	}

	fn place(&self, index: &mut StackIndex, widget: Widget) -> Result<()> {
		let id = widget.id().clone();
		match index.place(widget, self.clock.now()) {
			Ok(placement) => {
				trace!(%id, z = placement.z, displaced = placement.displaced, "placed widget");
				Ok(())
			}
			Err(err) => {
				debug!(%id, error = %err, "placement rejected");
				Err(err)
			}
		}
	}

	fn update_in_place(
		&self,
		id: &str,
		unchanged: impl FnOnce(&Widget) -> bool,
		apply: impl FnOnce(&Widget, Timestamp) -> Widget,
	) -> Option<Widget> {
		let mut index = self.index.write();
		let current = index.get(id)?;
		if unchanged(current) {
			return Some(current.clone());
		}
		let updated = apply(current, self.clock.now());
		index.replace(updated.clone());
		Some(updated)
	}

	/// [`update_z`](Self::update_z) with a hook that runs after the read lock
	/// is released and before the write lock is requested.
	fn update_z_with(&self, id: &str, z: ZIndex, between_locks: impl FnOnce()) -> Result<Option<Widget>> {
		let was_occupied = {
			let index = self.index.read();
			let Some(current) = index.get(id) else {
				return Ok(None);
			};
			if current.z() == z {
				return Ok(Some(current.clone()));
			}
			index.contains_z(z)
		};

		between_locks();

		let mut index = self.index.write();
		let Some(current) = index.get(id).cloned() else {
			trace!(id, "widget removed while promoting to write lock");
			return Ok(None);
		};
		if current.z() == z {
			return Ok(Some(current));
		}
		let occupied = index.contains_z(z);
		if occupied != was_occupied {
			trace!(id, z, was_occupied, occupied, "slot occupancy changed while promoting to write lock");
		}

		let at = self.clock.now();
		let moved = current.with_z(z, at);
		index.detach(id);

		if !occupied {
			index.insert_vacant(moved.clone());
			trace!(id, from = current.z(), to = z, "moved widget to free slot");
			return Ok(Some(moved));
		}

		match self.place(&mut index, moved.clone()) {
			Ok(()) => Ok(Some(moved)),
			Err(err) => {
				index.insert_vacant(current);
				Err(err)
			}
		}
	}
}

#[cfg(test)]
mod tests;
