//! Widget identifiers and the generators that hand them out.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Opaque widget identifier.
///
/// Assigned once when a widget is built and never changed afterwards. Clones
/// share the underlying string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WidgetId(Arc<str>);

impl WidgetId {
	/// Wraps an existing identifier string.
	pub fn new(id: impl Into<Arc<str>>) -> Self {
		Self(id.into())
	}

	/// Returns the identifier as a string slice.
	#[inline]
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for WidgetId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl Borrow<str> for WidgetId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for WidgetId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl From<&str> for WidgetId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

impl From<String> for WidgetId {
	fn from(id: String) -> Self {
		Self::new(id)
	}
}

impl Serialize for WidgetId {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.0)
	}
}

impl<'de> Deserialize<'de> for WidgetId {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		String::deserialize(deserializer).map(Self::from)
	}
}

/// Source of fresh widget identifiers.
///
/// Implementations must never return the same id twice. Ids are expected to
/// sort by creation order, though the store only relies on distinctness.
pub trait IdGenerator: Send + Sync {
	/// Returns a new, never-before-seen identifier.
	fn next_id(&self) -> WidgetId;
}

/// Time-ordered ids backed by UUIDv7.
///
/// The canonical hyphenated form sorts lexicographically in creation order.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeOrderedIds;

impl IdGenerator for TimeOrderedIds {
	fn next_id(&self) -> WidgetId {
		WidgetId::new(Uuid::now_v7().to_string())
	}
}

/// Monotonic counter ids, zero padded so they sort as strings.
#[derive(Debug, Default)]
pub struct SequentialIds {
	prefix: String,
	next: AtomicU64,
}

impl SequentialIds {
	/// Creates a generator starting at zero with no prefix.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a generator whose ids start with `prefix`.
	pub fn with_prefix(prefix: impl Into<String>) -> Self {
		Self {
			prefix: prefix.into(),
			next: AtomicU64::new(0),
		}
	}
}

impl IdGenerator for SequentialIds {
	fn next_id(&self) -> WidgetId {
		let n = self.next.fetch_add(1, Ordering::Relaxed);
		WidgetId::new(format!("{}{n:020}", self.prefix))
	}
}
