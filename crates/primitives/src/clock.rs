//! Timestamps for "last modified" bookkeeping.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, TimeDelta, Utc};

/// Instant a widget value was last written.
pub type Timestamp = DateTime<Utc>;

/// Source of timestamps.
pub trait Clock: Send + Sync {
	/// Returns the current instant.
	fn now(&self) -> Timestamp;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> Timestamp {
		Utc::now()
	}
}

/// Deterministic clock that moves forward by `step` on every read.
///
/// Successive reads are strictly increasing as long as `step` is positive,
/// which lets tests compare "before/after" without sleeping. Once the offset
/// no longer fits a [`TimeDelta`] or the result leaves chrono's range, reads
/// saturate at `DateTime::<Utc>::MAX_UTC`.
#[derive(Debug)]
pub struct ManualClock {
	start: Timestamp,
	step: TimeDelta,
	ticks: AtomicI64,
}

impl ManualClock {
	/// Creates a clock that first reports `start`.
	pub fn new(start: Timestamp, step: TimeDelta) -> Self {
		Self {
			start,
			step,
			ticks: AtomicI64::new(0),
		}
	}

	/// Clock starting at the Unix epoch, one millisecond per read.
	pub fn from_epoch() -> Self {
		Self::new(DateTime::<Utc>::UNIX_EPOCH, TimeDelta::milliseconds(1))
	}

	/// Returns the instant the next call to [`Clock::now`] will report, without advancing.
	pub fn peek(&self) -> Timestamp {
		self.at(self.ticks.load(Ordering::Acquire))
	}

	fn at(&self, ticks: i64) -> Timestamp {
		i32::try_from(ticks)
			.ok()
			.and_then(|ticks| self.step.checked_mul(ticks))
			.and_then(|offset| self.start.checked_add_signed(offset))
			.unwrap_or(DateTime::<Utc>::MAX_UTC)
	}
}

impl Clock for ManualClock {
	fn now(&self) -> Timestamp {
		self.at(self.ticks.fetch_add(1, Ordering::AcqRel))
	}
}
