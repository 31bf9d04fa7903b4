//! Domain core of the company atlas dashboard.
//!
//! The crate is split into focused modules, leaves first:
//! - `record`: canonical records and the raw rows they come from.
//! - `store`: load-time cleaning into an immutable record store.
//! - `filter`: pure category and name filtering.
//! - `map_view`: marker rendering, colour palette and viewport state.
//! - `overlay`: the detail overlay state machine and its content.
//! - `controller`: per-session owner of filter and selection state.

pub mod controller;
pub mod filter;
pub mod map_view;
pub mod overlay;
pub mod record;
pub mod store;

pub use controller::{Controller, ControllerError, DashboardView, ReferenceData, UiEvent};
pub use filter::{CategoryFilter, FilterState, filter};
pub use map_view::{CategoryPalette, MapView, Marker, Viewport};
pub use overlay::{OverlayState, OverlayView};
pub use record::{BusinessType, CompanyRecord, GeoPoint, RawRow, RawValue, RecordId};
pub use store::{RecordStore, load};
