//! Value types for the widget store: geometry, identifiers, timestamps and widgets.

/// Timestamp source and implementations.
pub mod clock;
/// Coordinates and validated dimensions.
pub mod geometry;
/// Identifier type and generators.
pub mod ids;
/// Immutable widget records and their builder.
pub mod widget;

pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use geometry::{Coordinates, Dimensions, GeometryError};
pub use ids::{IdGenerator, SequentialIds, TimeOrderedIds, WidgetId};
pub use widget::{UNPLACED, Widget, WidgetBuilder, ZIndex};
