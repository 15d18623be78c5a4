//! Caller-supplied query filters and their validation.
//!
//! Everything here runs before any remote call, so a malformed filter never
//! costs a round trip.

use crate::error::ValidationError;
use crate::models::Status;
use crate::zones::{Bounds, ZoneDirectory};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where to look for flights: a named provider zone or a point with a radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ZoneFilter {
    Name(String),
    Point {
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    },
}

impl ZoneFilter {
    pub fn name(name: impl Into<String>) -> Self {
        ZoneFilter::Name(name.into())
    }

    pub fn point(latitude: f64, longitude: f64, radius_km: f64) -> Self {
        ZoneFilter::Point {
            latitude,
            longitude,
            radius_km,
        }
    }
}

/// A zone filter that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedZone {
    /// Already resolved through the zone directory.
    Named(Bounds),
    /// Bounds still have to be requested from the provider.
    Point {
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    },
}

/// An upper-cased aircraft registration of 5 to 7 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Registration(String);

impl Registration {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let registration = raw.to_uppercase();
        if !(5..=7).contains(&registration.chars().count()) {
            return Err(ValidationError::InvalidRegistration(registration));
        }
        Ok(Self(registration))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An upper-cased four-letter ICAO airport code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IcaoCode(String);

impl IcaoCode {
    /// `field` names the offending filter in the error message.
    pub fn parse(raw: &str, field: &'static str) -> Result<Self, ValidationError> {
        let code = raw.to_uppercase();
        if code.chars().count() != 4 {
            return Err(ValidationError::InvalidAirportIcao { field, value: code });
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IcaoCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parses a status filter. Only observable states are accepted, so
/// `unknown` is rejected even though the classifier can produce it.
pub fn parse_status(raw: &str) -> Result<Status, ValidationError> {
    match raw.to_lowercase().as_str() {
        "enroute" => Ok(Status::Enroute),
        "on_ground" => Ok(Status::OnGround),
        other => Err(ValidationError::InvalidStatus(other.to_string())),
    }
}

/// Checks a zone filter against coordinate ranges or the zone directory.
pub fn validate_zone(
    zone: &ZoneFilter,
    directory: &ZoneDirectory,
) -> Result<ValidatedZone, ValidationError> {
    match zone {
        ZoneFilter::Name(name) => {
            let name = name.to_lowercase();
            match directory.get(&name) {
                Some(bounds) => Ok(ValidatedZone::Named(*bounds)),
                None => Err(ValidationError::UnknownZone {
                    name,
                    valid: directory.names(),
                }),
            }
        }
        &ZoneFilter::Point {
            latitude,
            longitude,
            radius_km,
        } => {
            let in_range = (-90.0..=90.0).contains(&latitude)
                && (-180.0..=180.0).contains(&longitude)
                && (-10000.0..=10000.0).contains(&radius_km);
            if !in_range {
                return Err(ValidationError::CoordinatesOutOfRange {
                    latitude,
                    longitude,
                    radius_km,
                });
            }
            Ok(ValidatedZone::Point {
                latitude,
                longitude,
                radius_km,
            })
        }
    }
}

/// Optional filters for a flight query. All active filters must match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightFilters {
    pub registration: Option<String>,
    pub status: Option<String>,
    pub from_airport_icao: Option<String>,
    pub to_airport_icao: Option<String>,
    pub zone: Option<ZoneFilter>,
}

impl FlightFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registration(mut self, registration: impl Into<String>) -> Self {
        self.registration = Some(registration.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn from_airport(mut self, icao: impl Into<String>) -> Self {
        self.from_airport_icao = Some(icao.into());
        self
    }

    pub fn to_airport(mut self, icao: impl Into<String>) -> Self {
        self.to_airport_icao = Some(icao.into());
        self
    }

    pub fn zone(mut self, zone: ZoneFilter) -> Self {
        self.zone = Some(zone);
        self
    }

    /// Normalizes and checks every present filter. Empty strings count as absent.
    pub fn validate(
        &self,
        directory: &ZoneDirectory,
    ) -> Result<ValidatedFilters, ValidationError> {
        Ok(ValidatedFilters {
            registration: present(&self.registration)
                .map(Registration::parse)
                .transpose()?,
            status: present(&self.status).map(parse_status).transpose()?,
            from_airport: present(&self.from_airport_icao)
                .map(|c| IcaoCode::parse(c, "from_airport_icao"))
                .transpose()?,
            to_airport: present(&self.to_airport_icao)
                .map(|c| IcaoCode::parse(c, "to_airport_icao"))
                .transpose()?,
            zone: self
                .zone
                .as_ref()
                .map(|z| validate_zone(z, directory))
                .transpose()?,
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Filters after normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedFilters {
    pub registration: Option<Registration>,
    pub status: Option<Status>,
    pub from_airport: Option<IcaoCode>,
    pub to_airport: Option<IcaoCode>,
    pub zone: Option<ValidatedZone>,
}
