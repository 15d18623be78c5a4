use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::models::{FeedFlight, FlightDetails};
use crate::zones::Bounds;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ORIGIN, REFERER, USER_AGENT};
use reqwest::Client;
use serde_json::{Map, Value};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Parameters of a live feed request.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedQuery {
    pub aircraft_type: String,
    pub airline: String,
    pub bounds: Bounds,
    pub registration: Option<String>,
}

/// Remote source of zones, live flights and per-flight details.
///
/// The tracker only talks to the provider through this trait, so tests can
/// swap in an in-memory source.
pub trait FlightDataSource: Send + Sync {
    /// Raw nested zone listing.
    fn zones(&self) -> impl Future<Output = Result<Map<String, Value>, ProviderError>> + Send;

    /// Bounding box centred on a point.
    fn bounds_by_point(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> impl Future<Output = Result<Bounds, ProviderError>> + Send;

    /// Flights matching the query, in provider order.
    fn flights(
        &self,
        query: &FeedQuery,
    ) -> impl Future<Output = Result<Vec<FeedFlight>, ProviderError>> + Send;

    /// Full detail record for one feed row.
    fn flight_details(
        &self,
        flight: &FeedFlight,
    ) -> impl Future<Output = Result<FlightDetails, ProviderError>> + Send;
}

/// FlightRadar24 public endpoints.
pub struct Fr24Client {
    client: Client,
    config: ProviderConfig,
}

impl Fr24Client {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| ProviderError::Config(format!("user agent: {}", e)))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ORIGIN, HeaderValue::from_static("https://www.flightradar24.com"));
        headers.insert(REFERER, HeaderValue::from_static("https://www.flightradar24.com/"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(secs) = config.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            config: config.clone(),
        })
    }

    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, ProviderError> {
        let res = self.client.get(url).query(query).send().await?;

        if !res.status().is_success() {
            return Err(ProviderError::Status {
                status: res.status(),
                url: url.to_string(),
            });
        }

        Ok(res.json::<Value>().await?)
    }
}

impl FlightDataSource for Fr24Client {
    async fn zones(&self) -> Result<Map<String, Value>, ProviderError> {
        let body = self.get_json(&self.config.zones_url, &[]).await?;
        let mut zones = match body {
            Value::Object(map) => map,
            other => {
                return Err(ProviderError::Decode(format!(
                    "zone listing is not an object: {}",
                    other
                )))
            }
        };
        zones.remove("version");
        Ok(zones)
    }

    // Computed locally; the endpoint has no bounds service.
    async fn bounds_by_point(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Bounds, ProviderError> {
        Ok(Bounds::around_point(latitude, longitude, radius_km))
    }

    async fn flights(&self, query: &FeedQuery) -> Result<Vec<FeedFlight>, ProviderError> {
        let params = feed_params(query);
        let body = self.get_json(&self.config.feed_url, &params).await?;

        let flights = decode_feed(body)?;

        debug!("Feed returned {} flights for bounds {}", flights.len(), query.bounds);
        Ok(flights)
    }

    async fn flight_details(&self, flight: &FeedFlight) -> Result<FlightDetails, ProviderError> {
        let params = [("flight", flight.id.clone()), ("version", "1.5".to_string())];
        let body = self.get_json(&self.config.details_url, &params).await?;

        serde_json::from_value(body)
            .map_err(|e| ProviderError::Decode(format!("flight {} details: {}", flight.id, e)))
    }
}

/// Decodes a feed body keyed by flight id, keeping the provider's order.
/// Metadata entries (full_count, version, stats) are not arrays and are skipped.
fn decode_feed(body: Value) -> Result<Vec<FeedFlight>, ProviderError> {
    let rows = match body {
        Value::Object(rows) => rows,
        other => {
            return Err(ProviderError::Decode(format!(
                "feed is not an object: {}",
                other
            )))
        }
    };

    Ok(rows
        .into_iter()
        .filter_map(|(id, row)| match row {
            Value::Array(data) => Some(FeedFlight::from((id, data.as_slice()))),
            _ => None,
        })
        .collect())
}

fn feed_params(query: &FeedQuery) -> Vec<(&'static str, String)> {
    let mut params: Vec<(&'static str, String)> = [
        "faa", "satellite", "mlat", "flarm", "adsb", "gnd", "air", "vehicles", "estimated",
        "gliders", "stats", "details",
    ]
    .into_iter()
    .map(|switch| (switch, "1".to_string()))
    .collect();

    params.push(("maxage", "14400".to_string()));
    params.push(("limit", "5000".to_string()));
    params.push(("airline", query.airline.clone()));
    params.push(("type", query.aircraft_type.clone()));
    params.push(("bounds", query.bounds.to_string()));
    if let Some(registration) = &query.registration {
        params.push(("reg", registration.clone()));
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query(registration: Option<&str>) -> FeedQuery {
        FeedQuery {
            aircraft_type: "A337".to_string(),
            airline: "BGA".to_string(),
            bounds: Bounds {
                north: 72.57,
                south: 33.57,
                west: -16.96,
                east: 53.05,
            },
            registration: registration.map(str::to_string),
        }
    }

    fn param<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_feed_params_carry_type_operator_and_bounds() {
        let params = feed_params(&query(None));

        assert_eq!(param(&params, "type"), Some("A337"));
        assert_eq!(param(&params, "airline"), Some("BGA"));
        assert_eq!(param(&params, "bounds"), Some("72.57,33.57,-16.96,53.05"));
        assert_eq!(param(&params, "details"), Some("1"));
        assert_eq!(param(&params, "reg"), None);
    }

    #[test]
    fn test_feed_params_narrow_by_registration() {
        let params = feed_params(&query(Some("F-GXLG")));
        assert_eq!(param(&params, "reg"), Some("F-GXLG"));
    }

    #[test]
    fn test_decode_feed_skips_metadata_and_keeps_order() {
        let body = json!({
            "full_count": 14523,
            "version": 4,
            "zz1": ["3C6DEC", 48.0, 2.0, 90, 18000, 320, "", "", "A337", "F-GXLG"],
            "stats": { "total": { "ads-b": 9000 } },
            "aa2": ["3C6DED", 43.6, 1.4, 0, 0, 0, "", "", "A337", "F-GXLH"]
        });

        let flights = decode_feed(body).unwrap();

        let ids: Vec<&str> = flights.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["zz1", "aa2"]);
        assert_eq!(flights[1].registration, "F-GXLH");
    }

    #[test]
    fn test_decode_feed_rejects_non_object_body() {
        assert!(matches!(
            decode_feed(json!([1, 2, 3])),
            Err(ProviderError::Decode(_))
        ));
        assert!(decode_feed(json!({ "full_count": 0 })).unwrap().is_empty());
    }

    #[test]
    fn test_client_rejects_invalid_user_agent() {
        let config = ProviderConfig {
            user_agent: "bad\nagent".to_string(),
            ..ProviderConfig::default()
        };
        assert!(matches!(Fr24Client::new(&config), Err(ProviderError::Config(_))));
    }

    #[tokio::test]
    async fn test_point_bounds_are_local() {
        let client = Fr24Client::new(&ProviderConfig::default()).unwrap();
        let bounds = client.bounds_by_point(48.8566, 2.3522, 100.0).await.unwrap();
        assert_eq!(bounds, Bounds::around_point(48.8566, 2.3522, 100.0));
    }
}
