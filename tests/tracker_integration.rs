//! End-to-end query tests against an in-memory flight source.

use beluga_tracker::config::TrackerConfig;
use beluga_tracker::models::{FeedFlight, FlightDetails};
use beluga_tracker::{
    BelugaTracker, Bounds, FeedQuery, FlightDataSource, FlightFilters, ProviderError, Status,
    TrackerError, ValidationError, ZoneFilter,
};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

struct FakeSource {
    zones: Value,
    flights: Vec<FeedFlight>,
    details: HashMap<String, FlightDetails>,
    fail_point_bounds: bool,
    feed_calls: AtomicUsize,
    detail_calls: AtomicUsize,
    last_query: Mutex<Option<FeedQuery>>,
}

impl FakeSource {
    fn new() -> Self {
        Self {
            zones: json!({
                "europe": {
                    "tl_y": 72.57, "tl_x": -16.96, "br_y": 33.57, "br_x": 53.05,
                    "subzones": {
                        "germany": { "tl_y": 55.1, "tl_x": 5.3, "br_y": 47.2, "br_x": 15.5 }
                    }
                },
                "asia": { "tl_y": 79.98, "tl_x": 40.91, "br_y": 12.48, "br_x": 179.77 }
            }),
            flights: Vec::new(),
            details: HashMap::new(),
            fail_point_bounds: false,
            feed_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        }
    }

    fn with_flight(
        mut self,
        id: &str,
        registration: &str,
        altitude: i64,
        speed: i64,
        from: &str,
        to: &str,
    ) -> Self {
        let row = json!(["3C6DEC", 48.0, 2.0, 90, altitude, speed, "", "", "A337", registration]);
        self.flights
            .push(FeedFlight::from((id.to_string(), row.as_array().unwrap().as_slice())));
        let details = serde_json::from_value(json!({
            "airport": {
                "origin": { "name": format!("{from} Airport"), "code": { "icao": from } },
                "destination": { "name": format!("{to} Airport"), "code": { "icao": to } }
            },
            "time": {
                "scheduled": { "departure": 1700000000, "arrival": 1700007200 },
                "real": { "departure": 1700000300, "arrival": null },
                "other": { "eta": 1700007000, "updated": 1700003600 }
            }
        }))
        .unwrap();
        self.details.insert(id.to_string(), details);
        self
    }
}

impl FlightDataSource for FakeSource {
    async fn zones(&self) -> Result<Map<String, Value>, ProviderError> {
        Ok(self.zones.as_object().unwrap().clone())
    }

    async fn bounds_by_point(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Bounds, ProviderError> {
        if self.fail_point_bounds {
            return Err(ProviderError::Decode("bounds service down".to_string()));
        }
        Ok(Bounds::around_point(latitude, longitude, radius_km))
    }

    async fn flights(&self, query: &FeedQuery) -> Result<Vec<FeedFlight>, ProviderError> {
        self.feed_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.clone());
        Ok(self
            .flights
            .iter()
            .filter(|f| query.registration.as_ref().map_or(true, |r| &f.registration == r))
            .cloned()
            .collect())
    }

    async fn flight_details(&self, flight: &FeedFlight) -> Result<FlightDetails, ProviderError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.details.get(&flight.id).cloned().unwrap_or_default())
    }
}

fn fleet() -> FakeSource {
    FakeSource::new()
        .with_flight("a1", "F-GXLG", 18000, 320, "LFBO", "EDHI")
        .with_flight("a2", "F-GXLH", 0, 0, "EDHI", "LFBO")
        .with_flight("a3", "F-GXLI", 500, 50, "LFBO", "LEGT")
        .with_flight("a4", "F-GXLJ", 24000, 400, "EGNR", "LFBO")
}

async fn build_tracker(source: FakeSource) -> BelugaTracker<FakeSource> {
    BelugaTracker::initialize(source, &TrackerConfig::default())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_unfiltered_query_keeps_provider_order() {
    let tracker = build_tracker(fleet()).await;

    let flights = tracker.query_flights(&FlightFilters::new()).await.unwrap();

    let ids: Vec<&str> = flights.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "a2", "a3", "a4"]);
    assert_eq!(flights[0].status, Status::Enroute);
    assert_eq!(flights[0].from_airport.as_deref(), Some("LFBO Airport"));
    assert_eq!(flights[0].real_arrival, None);
    assert_eq!(flights[0].eta, Some(1700007000));
    assert_eq!(flights[0].last_update, Some(1700003600));
}

#[tokio::test]
async fn test_default_region_is_home_zone() {
    let tracker = build_tracker(fleet()).await;
    tracker.query_flights(&FlightFilters::new()).await.unwrap();

    let query = last_query(&tracker);
    assert_eq!(query.bounds, tracker.home_bounds());
    assert_eq!(query.aircraft_type, "A337");
    assert_eq!(query.airline, "BGA");
    assert_eq!(query.registration, None);
}

fn last_query(tracker: &BelugaTracker<FakeSource>) -> FeedQuery {
    tracker.source().last_query.lock().unwrap().clone().unwrap()
}

#[tokio::test]
async fn test_filters_are_conjunctive() {
    let tracker = build_tracker(fleet()).await;

    // a1 and a3 leave LFBO, only a1 is enroute
    let filters = FlightFilters::new()
        .zone(ZoneFilter::name("Europe"))
        .from_airport("lfbo")
        .status("ENROUTE");
    let flights = tracker.query_flights(&filters).await.unwrap();
    assert_eq!(flights.len(), 1);
    assert_eq!(flights[0].id, "a1");

    // matches the zone but not the departure airport
    let filters = FlightFilters::new()
        .zone(ZoneFilter::name("europe"))
        .from_airport("LFPG");
    assert!(tracker.query_flights(&filters).await.unwrap().is_empty());

    let filters = FlightFilters::new().to_airport("lfbo").status("on_ground");
    let flights = tracker.query_flights(&filters).await.unwrap();
    assert_eq!(flights.iter().map(|f| f.id.as_str()).collect::<Vec<_>>(), vec!["a2"]);
}

#[tokio::test]
async fn test_every_candidate_is_enriched() {
    let tracker = build_tracker(fleet()).await;

    let flights = tracker
        .query_flights(&FlightFilters::new().status("enroute"))
        .await
        .unwrap();

    assert_eq!(flights.len(), 2);
    assert_eq!(tracker.source().feed_calls.load(Ordering::SeqCst), 1);
    assert_eq!(tracker.source().detail_calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_registration_narrows_feed_request() {
    let tracker = build_tracker(fleet()).await;

    let flights = tracker
        .query_flights(&FlightFilters::new().registration("f-gxlh"))
        .await
        .unwrap();

    assert_eq!(flights.len(), 1);
    assert_eq!(flights[0].registration, "F-GXLH");
    let query = last_query(&tracker);
    assert_eq!(query.registration.as_deref(), Some("F-GXLH"));
}

#[tokio::test]
async fn test_invalid_filters_fail_before_any_remote_call() {
    let tracker = build_tracker(fleet()).await;

    let cases = [
        FlightFilters::new().registration("AB"),
        FlightFilters::new().registration("ABCDEFGH"),
        FlightFilters::new().from_airport("LF"),
        FlightFilters::new().to_airport("LFPGX"),
        FlightFilters::new().status("landed"),
        FlightFilters::new().status("unknown"),
        FlightFilters::new().zone(ZoneFilter::name("atlantis")),
        FlightFilters::new().zone(ZoneFilter::point(91.0, 0.0, 0.0)),
        FlightFilters::new().zone(ZoneFilter::point(0.0, 0.0, 20000.0)),
    ];

    for filters in &cases {
        let err = tracker.query_flights(filters).await.unwrap_err();
        assert!(
            matches!(err, TrackerError::Validation(_)),
            "expected validation error for {filters:?}, got {err:?}"
        );
    }
    assert_eq!(tracker.source().feed_calls.load(Ordering::SeqCst), 0);
    assert_eq!(tracker.source().detail_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_point_zone_requests_bounds() {
    let tracker = build_tracker(fleet()).await;

    let flights = tracker
        .query_flights(&FlightFilters::new().zone(ZoneFilter::point(48.8566, 2.3522, 100.0)))
        .await
        .unwrap();

    assert_eq!(flights.len(), 4);
    let query = last_query(&tracker);
    assert_eq!(query.bounds, Bounds::around_point(48.8566, 2.3522, 100.0));
}

#[tokio::test]
async fn test_point_bounds_failure_is_a_validation_error() {
    let mut source = fleet();
    source.fail_point_bounds = true;
    let tracker = build_tracker(source).await;

    let err = tracker
        .query_flights(&FlightFilters::new().zone(ZoneFilter::point(48.8566, 2.3522, 100.0)))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TrackerError::Validation(ValidationError::ZoneResolution(_))
    ));
}

#[tokio::test]
async fn test_is_in_zone() {
    let tracker = build_tracker(fleet()).await;

    assert!(tracker
        .is_in_zone(ZoneFilter::name("germany"), FlightFilters::new())
        .await
        .unwrap());
    assert!(!tracker
        .is_in_zone(ZoneFilter::name("asia"), FlightFilters::new().from_airport("RJTT"))
        .await
        .unwrap());
    assert!(tracker
        .is_in_zone(ZoneFilter::name("nowhere"), FlightFilters::new())
        .await
        .is_err());
}

#[tokio::test]
async fn test_fleet_status_totals() {
    let tracker = build_tracker(fleet()).await;

    let status = tracker.fleet_status().await.unwrap();

    assert_eq!(status.total, 4);
    assert_eq!(status.enroute, 2);
    assert_eq!(status.on_ground, 1);
    assert_eq!(status.unknown, 1);
    assert_eq!(status.total, status.enroute + status.on_ground + status.unknown);

    let empty = build_tracker(FakeSource::new()).await;
    assert_eq!(empty.fleet_status().await.unwrap().total, 0);
}

#[tokio::test]
async fn test_unknown_home_zone_fails_initialization() {
    let config = TrackerConfig {
        home_zone: "antarctica".to_string(),
        ..TrackerConfig::default()
    };

    let result = BelugaTracker::initialize(fleet(), &config).await;

    assert!(matches!(result, Err(TrackerError::MissingHomeZone(_))));
}

#[tokio::test]
async fn test_malformed_zone_listing_fails_initialization() {
    let mut source = fleet();
    source.zones = json!({ "europe": { "tl_y": 1.0 } });

    let result = BelugaTracker::initialize(source, &TrackerConfig::default()).await;

    assert!(matches!(result, Err(TrackerError::Zones(_))));
}
