//! Immutable widget records.
//!
//! A [`Widget`] never changes after it is built. Every edit goes through one of
//! the `with_*` methods, which return a new value carrying the same id and a
//! fresh `last_modified` stamp. Whoever owns the widget is responsible for
//! swapping the old value out.

use serde::{Deserialize, Serialize};

use crate::clock::{Clock, Timestamp};
use crate::geometry::{Coordinates, Dimensions};
use crate::ids::{IdGenerator, WidgetId};

/// Stack position. Lower values sit beneath higher ones.
pub type ZIndex = i32;

/// Sentinel z carried by a widget that has not been placed yet.
pub const UNPLACED: ZIndex = ZIndex::MAX;

/// A positioned, sized rectangle with a stack position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
	id: WidgetId,
	coordinates: Coordinates,
	dimensions: Dimensions,
	z: ZIndex,
	last_modified: Timestamp,
}

impl Widget {
	/// Assembles a widget from fields the caller already owns.
	pub fn new(
		id: WidgetId,
		coordinates: Coordinates,
		dimensions: Dimensions,
		z: ZIndex,
		last_modified: Timestamp,
	) -> Self {
		Self {
			id,
			coordinates,
			dimensions,
			z,
			last_modified,
		}
	}

	/// Starts a builder. The id and timestamp come from collaborators at build time.
	pub fn builder(coordinates: Coordinates, dimensions: Dimensions) -> WidgetBuilder {
		WidgetBuilder {
			coordinates,
			dimensions,
			z: UNPLACED,
			id: None,
			last_modified: None,
		}
	}

	/// Identifier assigned when the widget was built.
	#[inline]
	pub fn id(&self) -> &WidgetId {
		&self.id
	}

	/// Top-left corner.
	#[inline]
	pub fn coordinates(&self) -> Coordinates {
		self.coordinates
	}

	/// Width and height.
	#[inline]
	pub fn dimensions(&self) -> Dimensions {
		self.dimensions
	}

	/// Stack position, or [`UNPLACED`].
	#[inline]
	pub fn z(&self) -> ZIndex {
		self.z
	}

	/// When this value was last written.
	#[inline]
	pub fn last_modified(&self) -> Timestamp {
		self.last_modified
	}

	/// Returns true unless the widget still carries the [`UNPLACED`] sentinel.
	pub fn is_placed(&self) -> bool {
		self.z != UNPLACED
	}

	/// Copy with new coordinates, stamped at `at`.
	#[must_use]
	pub fn with_coordinates(&self, coordinates: Coordinates, at: Timestamp) -> Self {
		Self {
			coordinates,
			last_modified: at,
			..self.clone()
		}
	}

	/// Copy with new dimensions, stamped at `at`.
	#[must_use]
	pub fn with_dimensions(&self, dimensions: Dimensions, at: Timestamp) -> Self {
		Self {
			dimensions,
			last_modified: at,
			..self.clone()
		}
	}

	/// Copy moved to stack position `z`, stamped at `at`.
	#[must_use]
	pub fn with_z(&self, z: ZIndex, at: Timestamp) -> Self {
		Self {
			z,
			last_modified: at,
			..self.clone()
		}
	}
}

/// Builder returned by [`Widget::builder`].
#[derive(Debug, Clone)]
pub struct WidgetBuilder {
	coordinates: Coordinates,
	dimensions: Dimensions,
	z: ZIndex,
	id: Option<WidgetId>,
	last_modified: Option<Timestamp>,
}

impl WidgetBuilder {
	/// Requests a stack position. Left unset, the widget stays [`UNPLACED`].
	pub fn z(mut self, z: ZIndex) -> Self {
		self.z = z;
		self
	}

	/// Uses `id` instead of asking the generator.
	pub fn id(mut self, id: impl Into<WidgetId>) -> Self {
		self.id = Some(id.into());
		self
	}

	/// Uses `at` instead of asking the clock.
	pub fn last_modified(mut self, at: Timestamp) -> Self {
		self.last_modified = Some(at);
		self
	}

	/// Finishes the widget, drawing any unset id or stamp from `ids` and `clock`.
	pub fn build(self, ids: &dyn IdGenerator, clock: &dyn Clock) -> Widget {
		Widget {
			id: self.id.unwrap_or_else(|| ids.next_id()),
			coordinates: self.coordinates,
			dimensions: self.dimensions,
			z: self.z,
			last_modified: self.last_modified.unwrap_or_else(|| clock.now()),
		}
	}
}
