//! Flight queries over the live feed.
//!
//! [`BelugaTracker`] is built once per process: it fetches the provider's zone
//! listing, flattens it into a [`ZoneDirectory`], and resolves the home region
//! that queries without a zone fall back to. After that it is read-only, and
//! every query validates its filters before touching the network.
//!
//! A query makes one feed request, then one detail request per candidate,
//! awaited in provider order. Local filters run after enrichment.

use crate::api::{FeedQuery, FlightDataSource};
use crate::config::TrackerConfig;
use crate::error::{TrackerError, ValidationError};
use crate::filters::{FlightFilters, ValidatedZone, ZoneFilter};
use crate::models::{FlightRecord, Status};
use crate::zones::{Bounds, ZoneDirectory};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Per-category counts over one query result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetStatus {
    pub total: usize,
    pub enroute: usize,
    pub on_ground: usize,
    pub unknown: usize,
}

impl FleetStatus {
    pub fn from_records(records: &[FlightRecord]) -> Self {
        records.iter().fold(Self::default(), |mut acc, record| {
            match record.status {
                Status::Enroute => acc.enroute += 1,
                Status::OnGround => acc.on_ground += 1,
                Status::Unknown => acc.unknown += 1,
            }
            acc.total += 1;
            acc
        })
    }
}

pub struct BelugaTracker<P: FlightDataSource> {
    source: P,
    zones: ZoneDirectory,
    home_bounds: Bounds,
    aircraft_type: String,
    airline: String,
}

impl<P: FlightDataSource> BelugaTracker<P> {
    /// Fetches and flattens the zone listing, then resolves the home region.
    ///
    /// Fails fast on a malformed listing or an unknown home zone.
    pub async fn initialize(source: P, config: &TrackerConfig) -> Result<Self, TrackerError> {
        let raw = source.zones().await?;
        let zones = ZoneDirectory::build(&raw)?;
        info!("Zone directory built with {} zones", zones.len());
        Self::with_directory(source, zones, config)
    }

    /// Builds a tracker around an already flattened directory.
    pub fn with_directory(
        source: P,
        zones: ZoneDirectory,
        config: &TrackerConfig,
    ) -> Result<Self, TrackerError> {
        let home_bounds = *zones
            .get(&config.home_zone)
            .ok_or_else(|| TrackerError::MissingHomeZone(config.home_zone.clone()))?;

        Ok(Self {
            source,
            zones,
            home_bounds,
            aircraft_type: config.aircraft_type.clone(),
            airline: config.airline_icao.clone(),
        })
    }

    pub fn source(&self) -> &P {
        &self.source
    }

    pub fn home_bounds(&self) -> Bounds {
        self.home_bounds
    }

    /// Returns every tracked flight matching all active filters, in provider order.
    pub async fn query_flights(
        &self,
        filters: &FlightFilters,
    ) -> Result<Vec<FlightRecord>, TrackerError> {
        let filters = filters.validate(&self.zones)?;

        let bounds = match &filters.zone {
            None => self.home_bounds,
            Some(ValidatedZone::Named(bounds)) => *bounds,
            Some(ValidatedZone::Point {
                latitude,
                longitude,
                radius_km,
            }) => self
                .source
                .bounds_by_point(*latitude, *longitude, *radius_km)
                .await
                .map_err(ValidationError::ZoneResolution)?,
        };

        let query = FeedQuery {
            aircraft_type: self.aircraft_type.clone(),
            airline: self.airline.clone(),
            bounds,
            registration: filters.registration.as_ref().map(|r| r.to_string()),
        };
        let candidates = self.source.flights(&query).await?;
        debug!("Found {} flights", candidates.len());

        let mut results = Vec::new();
        for flight in &candidates {
            let details = self.source.flight_details(flight).await?;

            // Filters, if a condition is not met the flight is skipped
            if let Some(from) = &filters.from_airport {
                if details.origin_icao() != Some(from.as_str()) {
                    continue;
                }
            }
            if let Some(to) = &filters.to_airport {
                if details.destination_icao() != Some(to.as_str()) {
                    continue;
                }
            }
            if let Some(status) = filters.status {
                if flight.status() != status {
                    continue;
                }
            }

            results.push(FlightRecord::from_parts(flight, &details));
        }

        debug!("Returning {} flights after filtering", results.len());
        Ok(results)
    }

    /// True when at least one tracked flight matching the filters is in `zone`.
    ///
    /// Any zone already set on `filters` is replaced.
    pub async fn is_in_zone(
        &self,
        zone: ZoneFilter,
        filters: FlightFilters,
    ) -> Result<bool, TrackerError> {
        let flights = self.query_flights(&filters.zone(zone)).await?;
        Ok(!flights.is_empty())
    }

    /// Counts every tracked flight in the home region by status.
    pub async fn fleet_status(&self) -> Result<FleetStatus, TrackerError> {
        let flights = self.query_flights(&FlightFilters::default()).await?;
        Ok(FleetStatus::from_records(&flights))
    }
}
