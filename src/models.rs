use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse flight phase derived from altitude and ground speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Enroute,
    OnGround,
    Unknown,
}

impl Status {
    /// Classifies a flight from its altitude (feet) and ground speed (knots).
    ///
    /// First match wins: above 1000 ft and faster than 100 kt is enroute,
    /// below 100 ft and slower than 10 kt is on the ground, anything else
    /// (including the band between the two) is unknown.
    pub fn classify(altitude: i64, ground_speed: i64) -> Self {
        if altitude > 1000 && ground_speed > 100 {
            return Status::Enroute;
        }
        if altitude < 100 && ground_speed < 10 {
            return Status::OnGround;
        }
        Status::Unknown
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Enroute => "enroute",
            Status::OnGround => "on_ground",
            Status::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tracked flight as returned by a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub id: String,
    pub registration: String,
    pub from_airport: Option<String>,
    pub to_airport: Option<String>,
    pub scheduled_departure: Option<i64>,
    pub scheduled_arrival: Option<i64>,
    pub real_departure: Option<i64>,
    pub real_arrival: Option<i64>,
    pub eta: Option<i64>,
    /// Feet.
    pub altitude: i64,
    /// Knots.
    pub ground_speed: i64,
    /// Degrees, 0-360.
    pub heading: i64,
    /// (latitude, longitude)
    pub position: (f64, f64),
    pub status: Status,
    pub last_update: Option<i64>,
}

impl FlightRecord {
    /// Projects a feed row and its detail lookup into a record.
    ///
    /// The status is always recomputed from the feed's altitude and speed.
    pub fn from_parts(flight: &FeedFlight, details: &FlightDetails) -> Self {
        let time = details.time.as_ref();
        let scheduled = time.and_then(|t| t.scheduled.as_ref());
        let real = time.and_then(|t| t.real.as_ref());
        let other = time.and_then(|t| t.other.as_ref());

        Self {
            id: flight.id.clone(),
            registration: flight.registration.clone(),
            from_airport: details.origin().and_then(|a| a.name.clone()),
            to_airport: details.destination().and_then(|a| a.name.clone()),
            scheduled_departure: scheduled.and_then(|b| b.departure),
            scheduled_arrival: scheduled.and_then(|b| b.arrival),
            real_departure: real.and_then(|b| b.departure),
            real_arrival: real.and_then(|b| b.arrival),
            eta: other.and_then(|o| o.eta),
            altitude: flight.altitude,
            ground_speed: flight.ground_speed,
            heading: flight.heading,
            position: (flight.latitude, flight.longitude),
            status: flight.status(),
            last_update: other.and_then(|o| o.updated),
        }
    }

    pub fn eta_utc(&self) -> Option<DateTime<Utc>> {
        self.eta.and_then(|ts| DateTime::from_timestamp(ts, 0))
    }

    pub fn last_update_utc(&self) -> Option<DateTime<Utc>> {
        self.last_update.and_then(|ts| DateTime::from_timestamp(ts, 0))
    }
}

/// A single photo of an aircraft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub registration: String,
    pub url: Option<String>,
    pub location: String,
    pub photographer: String,
    pub date_taken: String,
    pub date_uploaded: String,
}

/// A row of the live feed, before enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedFlight {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub heading: i64,
    pub altitude: i64,
    pub ground_speed: i64,
    pub registration: String,
}

impl FeedFlight {
    pub fn status(&self) -> Status {
        Status::classify(self.altitude, self.ground_speed)
    }
}

// Unmarshal one positional feed row (keyed by flight id) into a FeedFlight.
impl From<(String, &[serde_json::Value])> for FeedFlight {
    fn from((id, data): (String, &[serde_json::Value])) -> Self {
        // Whole numbers sometimes arrive as floats (18000.0)
        let int = |i: usize| {
            data.get(i)
                .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
                .unwrap_or(0)
        };
        let float = |i: usize| data.get(i).and_then(|v| v.as_f64()).unwrap_or(0.0);

        Self {
            id,
            latitude: float(1),
            longitude: float(2),
            heading: int(3),
            altitude: int(4),
            ground_speed: int(5),
            registration: data
                .get(9)
                .and_then(|v| v.as_str())
                .unwrap_or("N/A")
                .trim()
                .to_string(),
        }
    }
}

/// Per-flight detail record from the provider's click handler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightDetails {
    #[serde(default)]
    pub airport: Option<AirportPair>,
    #[serde(default)]
    pub time: Option<TimeDetails>,
}

impl FlightDetails {
    pub fn origin(&self) -> Option<&AirportInfo> {
        self.airport.as_ref().and_then(|a| a.origin.as_ref())
    }

    pub fn destination(&self) -> Option<&AirportInfo> {
        self.airport.as_ref().and_then(|a| a.destination.as_ref())
    }

    pub fn origin_icao(&self) -> Option<&str> {
        self.origin().and_then(AirportInfo::icao)
    }

    pub fn destination_icao(&self) -> Option<&str> {
        self.destination().and_then(AirportInfo::icao)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirportPair {
    #[serde(default)]
    pub origin: Option<AirportInfo>,
    #[serde(default)]
    pub destination: Option<AirportInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirportInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub code: Option<AirportCode>,
}

impl AirportInfo {
    pub fn icao(&self) -> Option<&str> {
        self.code.as_ref().and_then(|c| c.icao.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirportCode {
    #[serde(default)]
    pub icao: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeDetails {
    #[serde(default)]
    pub scheduled: Option<TimeBucket>,
    #[serde(default)]
    pub real: Option<TimeBucket>,
    #[serde(default)]
    pub other: Option<OtherTimes>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeBucket {
    #[serde(default)]
    pub departure: Option<i64>,
    #[serde(default)]
    pub arrival: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OtherTimes {
    #[serde(default)]
    pub eta: Option<i64>,
    #[serde(default)]
    pub updated: Option<i64>,
}
