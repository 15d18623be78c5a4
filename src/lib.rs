//! Tracking client for the Airbus Beluga XL fleet.
//!
//! Queries a live flight feed for one aircraft type and operator, enriches
//! every hit with its detail record, classifies it as enroute, on the ground
//! or unknown, and filters by registration, airports, status or zone. Photo
//! metadata and a static fleet description are available alongside.

pub mod api;
pub mod config;
pub mod error;
pub mod filters;
pub mod fleet;
pub mod logging;
pub mod models;
pub mod photos;
pub mod tracker;
pub mod zones;

pub use api::{FeedQuery, FlightDataSource, Fr24Client};
pub use error::{FleetDataError, ProviderError, TrackerError, ValidationError, ZoneError};
pub use filters::{FlightFilters, ZoneFilter};
pub use models::{FlightRecord, PhotoRecord, Status};
pub use photos::{PhotoLookup, DEFAULT_PHOTO_LIMIT};
pub use tracker::{BelugaTracker, FleetStatus};
pub use zones::{Bounds, ZoneDirectory};
