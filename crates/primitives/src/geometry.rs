use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while constructing geometry values.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
	/// Width or height was zero or negative.
	#[error("invalid dimensions {width}x{height}: width and height must be greater than zero")]
	InvalidDimensions {
		/// Rejected width.
		width: i32,
		/// Rejected height.
		height: i32,
	},
}

/// Position of a widget's origin.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinates {
	/// Horizontal offset.
	pub x: i32,
	/// Vertical offset.
	pub y: i32,
}

impl Coordinates {
	/// Creates coordinates at `(x, y)`.
	pub const fn new(x: i32, y: i32) -> Self {
		Self { x, y }
	}

	/// The origin `(0, 0)`.
	pub const fn origin() -> Self {
		Self::new(0, 0)
	}
}

impl From<(i32, i32)> for Coordinates {
	fn from((x, y): (i32, i32)) -> Self {
		Self::new(x, y)
	}
}

/// Size of a widget.
///
/// Both sides are strictly positive. The fields are private so a value that
/// breaks this can't be built, deserialized included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDimensions")]
pub struct Dimensions {
	width: i32,
	height: i32,
}

impl Dimensions {
	/// Creates dimensions, rejecting a non-positive width or height.
	pub const fn new(width: i32, height: i32) -> Result<Self, GeometryError> {
		if width <= 0 || height <= 0 {
			return Err(GeometryError::InvalidDimensions { width, height });
		}
		Ok(Self { width, height })
	}

	/// Returns the width.
	#[inline]
	pub const fn width(&self) -> i32 {
		self.width
	}

	/// Returns the height.
	#[inline]
	pub const fn height(&self) -> i32 {
		self.height
	}

	/// Area in cells, widened so it can't overflow.
	pub const fn area(&self) -> i64 {
		self.width as i64 * self.height as i64
	}
}

impl TryFrom<(i32, i32)> for Dimensions {
	type Error = GeometryError;

	fn try_from((width, height): (i32, i32)) -> Result<Self, Self::Error> {
		Self::new(width, height)
	}
}

#[derive(Deserialize)]
struct RawDimensions {
	width: i32,
	height: i32,
}

impl TryFrom<RawDimensions> for Dimensions {
	type Error = GeometryError;

	fn try_from(raw: RawDimensions) -> Result<Self, Self::Error> {
		Self::new(raw.width, raw.height)
	}
}
