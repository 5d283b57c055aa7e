//! Concurrent widget store with dense, collision-resolved stack ordering.
//!
//! Widgets live in a [`WidgetStore`], which keeps each one reachable by id and
//! by z-index and guarantees no two widgets share a z-index. Placing a widget
//! on an occupied z pushes the occupants up until the first free slot instead
//! of overwriting anything.
//!
//! ```
//! use stratum_primitives::{Coordinates, Dimensions};
//! use stratum_store::WidgetStore;
//!
//! let store = WidgetStore::new();
//! let unit = Dimensions::new(1, 1)?;
//! let a = store.create_at(Coordinates::origin(), unit, 1)?;
//! let b = store.create_at(Coordinates::origin(), unit, 1)?;
//!
//! assert_eq!(store.get(a.id().as_str()).map(|w| w.z()), Some(2));
//! assert_eq!(b.z(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod error;
mod index;
mod store;

pub use config::StoreConfig;
pub use error::{ConfigError, Result, StoreError};
pub use store::WidgetStore;
