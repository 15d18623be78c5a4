//! Named geographic zones and the bounding regions used to scope a feed query.
//!
//! The provider publishes zones as a nested object: every zone carries its
//! corner coordinates (`tl_y`, `tl_x`, `br_y`, `br_x`) and may contain a
//! `subzones` object with more zones of the same shape. [`ZoneDirectory`]
//! flattens that tree once at startup so any zone, top-level or nested, can
//! be looked up by name.

use crate::error::ZoneError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A bounding box in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub west: f64,
    pub east: f64,
}

impl Bounds {
    /// Reads the corner keys of a raw zone object.
    pub fn from_zone(name: &str, zone: &Map<String, Value>) -> Result<Self, ZoneError> {
        let corner = |key: &'static str| {
            zone.get(key)
                .and_then(Value::as_f64)
                .ok_or_else(|| ZoneError::MissingCorner {
                    zone: name.to_string(),
                    key,
                })
        };

        Ok(Self {
            north: corner("tl_y")?,
            south: corner("br_y")?,
            west: corner("tl_x")?,
            east: corner("br_x")?,
        })
    }

    /// Square box around a point, `radius_km` from the centre to each side.
    ///
    /// Corners are projected along the diagonal (bearings 225° and 45°) with
    /// the great-circle destination formula. The sign of the radius is ignored.
    pub fn around_point(latitude: f64, longitude: f64, radius_km: f64) -> Self {
        let half_side = radius_km.abs();
        let angular = (2.0 * half_side.powi(2)).sqrt() / EARTH_RADIUS_KM;
        let lat = latitude.to_radians();
        let lon = longitude.to_radians();

        let project = |bearing_deg: f64| {
            let bearing = bearing_deg.to_radians();
            let lat2 = (lat.sin() * angular.cos()
                + lat.cos() * angular.sin() * bearing.cos())
            .asin();
            let lon2 = lon
                + (bearing.sin() * angular.sin() * lat.cos())
                    .atan2(angular.cos() - lat.sin() * lat2.sin());
            (lat2.to_degrees(), lon2.to_degrees())
        };

        let (south, west) = project(225.0);
        let (north, east) = project(45.0);

        Self {
            north,
            south,
            west,
            east,
        }
    }
}

// Provider query form: north,south,west,east
impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.north, self.south, self.west, self.east)
    }
}

/// Flat, read-only lookup of every known zone by name.
#[derive(Debug, Clone, Default)]
pub struct ZoneDirectory {
    zones: BTreeMap<String, Bounds>,
}

impl ZoneDirectory {
    /// Flattens a nested zone listing depth-first.
    ///
    /// A zone visited later replaces an earlier zone with the same name.
    /// Malformed entries fail the whole build.
    pub fn build(raw: &Map<String, Value>) -> Result<Self, ZoneError> {
        let mut zones = BTreeMap::new();
        flatten_into(raw, &mut zones)?;
        Ok(Self { zones })
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&Bounds> {
        self.zones.get(&name.to_lowercase())
    }

    /// All zone names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.zones.keys().cloned().collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.zones.len()
    }
}

fn flatten_into(
    raw: &Map<String, Value>,
    zones: &mut BTreeMap<String, Bounds>,
) -> Result<(), ZoneError> {
    for (name, value) in raw {
        let zone = value
            .as_object()
            .ok_or_else(|| ZoneError::NotAnObject(name.clone()))?;

        zones.insert(name.to_lowercase(), Bounds::from_zone(name, zone)?);

        if let Some(subzones) = zone.get("subzones") {
            let subzones = subzones
                .as_object()
                .ok_or_else(|| ZoneError::InvalidSubzones(name.clone()))?;
            flatten_into(subzones, zones)?;
        }
    }
    Ok(())
}
