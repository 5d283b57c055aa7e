//! Collision resolution for stack positions.
//!
//! Placing a widget onto an occupied slot never overwrites the occupant.
//! Instead the contiguous run of occupied slots starting at the requested z is
//! pushed up by one, which stops at the first gap. Only that run moves; every
//! other widget keeps its slot.
//!
//! ```text
//! before:  1 2 3 . . . 10        place at 2
//! after:   1 N 2'3'. . 10        (2 -> 3, 3 -> 4)
//! ```

use stratum_primitives::{Timestamp, Widget, ZIndex};

use super::StackIndex;
use crate::error::{Result, StoreError};

/// Outcome of a successful [`StackIndex::place`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Placement {
	/// Slot the placed widget now occupies.
	pub z: ZIndex,
	/// How many existing widgets were pushed up one slot.
	pub displaced: usize,
}

impl StackIndex {
	/// Places `widget` at its own z, displacing occupants upward as needed.
	///
	/// Displaced widgets are re-stamped at `at`. Fails without touching either
	/// lookup when the occupied run reaches `ZIndex::MAX`.
	pub(crate) fn place(&mut self, widget: Widget, at: Timestamp) -> Result<Placement> {
		debug_assert!(
			self.get(widget.id().as_str()).is_none(),
			"{} must be detached before it is placed",
			widget.id()
		);

		let z = widget.z();
		let run = self.occupied_run(z)?;

		// Top of the run first, so each move lands on a slot that is already free.
		for from in (z..run.end).rev() {
			let Some(occupant) = self.by_z.remove(&from) else {
				unreachable!("slot {from} is inside the occupied run");
			};
			let shifted = occupant.with_z(from + 1, at);
			self.by_id.insert(shifted.id().clone(), shifted.clone());
			self.by_z.insert(from + 1, shifted);
		}

		self.insert_vacant(widget);

		Ok(Placement {
			z,
			displaced: run.len,
		})
	}

	/// The unbroken run of occupied slots starting at `z`.
	///
	/// Errors when the run ends on `ZIndex::MAX`, since its top widget would have
	/// nowhere to go.
	fn occupied_run(&self, z: ZIndex) -> Result<Run> {
		let mut run = Run { end: z, len: 0 };
		for &slot in self.by_z.range(z..).map(|(slot, _)| slot) {
			if slot != run.end {
				break;
			}
			run.end = slot
				.checked_add(1)
				.ok_or(StoreError::CapacityExceeded { requested: z })?;
			run.len += 1;
		}
		Ok(run)
	}
}

/// Occupied slots `z..end`, where `end` is the first free slot.
struct Run {
	end: ZIndex,
	len: usize,
}
