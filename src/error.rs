//! Error types for the Beluga tracker library.
//!
//! Bad caller input is always reported as a [`ValidationError`] before any
//! remote call is made. Flight-provider failures surface unmodified as
//! [`ProviderError`], except while resolving a coordinate zone, where they are
//! folded into [`ValidationError::ZoneResolution`].

use thiserror::Error;

/// Caller input that cannot be used to build a query.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid registration '{0}': expected 5 to 7 characters (e.g. F-GXLG)")]
    InvalidRegistration(String),

    #[error("Invalid {field} '{value}': expected a 4-letter ICAO code")]
    InvalidAirportIcao { field: &'static str, value: String },

    #[error("Invalid status '{0}': must be 'enroute' or 'on_ground'")]
    InvalidStatus(String),

    #[error("Unknown zone '{name}'. Valid zones: {}", .valid.join(", "))]
    UnknownZone { name: String, valid: Vec<String> },

    #[error(
        "Invalid zone coordinates ({latitude}, {longitude}, {radius_km} km): latitude must be \
         in [-90, 90], longitude in [-180, 180], radius in [-10000, 10000]"
    )]
    CoordinatesOutOfRange {
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    },

    #[error("Could not resolve bounds for zone: {0}")]
    ZoneResolution(#[source] ProviderError),

    #[error("Unsupported registration '{registration}'. Supported: {}", .supported.join(", "))]
    UnsupportedRegistration {
        registration: String,
        supported: Vec<String>,
    },

    #[error("Invalid photo limit {0}: must be between 1 and 15")]
    InvalidPhotoLimit(u32),
}

/// Failures talking to a remote data provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Unexpected response payload: {0}")]
    Decode(String),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

/// Malformed zone listing from the provider.
#[derive(Debug, Error)]
pub enum ZoneError {
    #[error("Zone '{0}' is not an object")]
    NotAnObject(String),

    #[error("Zone '{zone}' is missing numeric corner '{key}'")]
    MissingCorner { zone: String, key: &'static str },

    #[error("Zone '{0}' has a 'subzones' entry that is not an object")]
    InvalidSubzones(String),
}

/// Errors returned by the flight query operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Failed to build zone directory: {0}")]
    Zones(#[from] ZoneError),

    #[error("Home zone '{0}' is not present in the provider's zone listing")]
    MissingHomeZone(String),
}

/// Failures reading the bundled fleet description.
#[derive(Debug, Error)]
pub enum FleetDataError {
    #[error("Failed to read fleet data from '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse fleet data from '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
