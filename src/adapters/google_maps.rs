//! Google Maps Web Service 的 `MapsService` 實作：
//! Directions、Geocoding 與 Places Nearby。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Mutex;
use std::time::Duration;

use crate::config::secrets::Secret;
use crate::domain::model::{Location, TimeOfDay, TravelTimeQuery};
use crate::domain::ports::{MapsError, MapsService};
use crate::utils::error::Result;

const DIRECTIONS_PATH: &str = "/maps/api/directions/json";
const GEOCODE_PATH: &str = "/maps/api/geocode/json";
const PLACES_NEARBY_PATH: &str = "/maps/api/place/nearbysearch/json";

#[derive(Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Deserialize)]
struct Route {
    #[serde(default)]
    legs: Vec<Leg>,
}

#[derive(Deserialize)]
struct Leg {
    duration: TextValue,
}

#[derive(Deserialize)]
struct TextValue {
    value: u64,
}

#[derive(Deserialize)]
struct PlaceResults {
    #[serde(default)]
    results: Vec<PlaceResult>,
}

#[derive(Deserialize)]
struct PlaceResult {
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Geometry {
    location: Location,
}

pub struct GoogleMapsClient {
    client: Client,
    base_url: String,
    secret: Mutex<Secret>,
}

impl GoogleMapsClient {
    pub fn new(base_url: impl Into<String>, secret: Secret) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            secret: Mutex::new(secret),
        }
    }

    pub fn with_timeout(base_url: impl Into<String>, secret: Secret, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            secret: Mutex::new(secret),
        })
    }

    fn current_key(&self) -> std::result::Result<String, MapsError> {
        self.secret
            .lock()
            .map(|secret| secret.key().to_string())
            .map_err(|_| MapsError::UnexpectedResponse("API key lock poisoned".to_string()))
    }

    /// 配額用完時換下一把金鑰；`used_key` 已被其他請求換掉時直接重試
    fn rotate_key(&self, used_key: &str) -> std::result::Result<(), MapsError> {
        let mut secret = self
            .secret
            .lock()
            .map_err(|_| MapsError::UnexpectedResponse("API key lock poisoned".to_string()))?;

        if secret.key() != used_key {
            return Ok(());
        }

        match secret.rotate() {
            Ok(_) => {
                tracing::warn!("🔑 Maps API quota exhausted, rotating to the next key");
                Ok(())
            }
            Err(_) => Err(MapsError::QuotaExceeded(
                "quota exceeded on every configured API key".to_string(),
            )),
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> std::result::Result<T, MapsError> {
        let url = format!("{}{}", self.base_url, path);

        loop {
            let key = self.current_key()?;
            tracing::debug!("📡 GET {}", url);

            let response = self
                .client
                .get(&url)
                .query(params)
                .query(&[("key", key.as_str())])
                .send()
                .await
                .map_err(|e| MapsError::Transport(e.to_string()))?;

            if !response.status().is_success() {
                return Err(MapsError::Transport(format!(
                    "{} responded with {}",
                    path,
                    response.status()
                )));
            }

            let body: serde_json::Value = response
                .json()
                .await
                .map_err(|e| MapsError::UnexpectedResponse(e.to_string()))?;

            let status = body
                .get("status")
                .and_then(|s| s.as_str())
                .unwrap_or("UNKNOWN_ERROR")
                .to_string();
            let detail = body
                .get("error_message")
                .and_then(|s| s.as_str())
                .unwrap_or(status.as_str())
                .to_string();

            match status.as_str() {
                "OK" => {
                    return serde_json::from_value(body)
                        .map_err(|e| MapsError::UnexpectedResponse(e.to_string()))
                }
                "ZERO_RESULTS" | "NOT_FOUND" => return Err(MapsError::NoResult(detail)),
                "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => self.rotate_key(&key)?,
                "REQUEST_DENIED" => return Err(MapsError::Unauthorized(detail)),
                _ => return Err(MapsError::UnexpectedResponse(detail)),
            }
        }
    }
}

/// 下一個該時間點的 UTC 時間戳（今天已過則為明天）
pub fn next_timestamp(time: TimeOfDay, now: DateTime<Utc>) -> i64 {
    let today = now
        .date_naive()
        .and_hms_opt(time.hour(), time.minute(), 0)
        .map(|naive| naive.and_utc())
        .unwrap_or(now);

    if today <= now {
        (today + chrono::Duration::days(1)).timestamp()
    } else {
        today.timestamp()
    }
}

fn directions_params(query: &TravelTimeQuery, now: DateTime<Utc>) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("origin", query.origin.to_string()),
        ("destination", query.destination.to_string()),
        ("mode", query.mode.to_string()),
    ];

    if let Some(arrival) = query.arrival_time {
        params.push(("arrival_time", next_timestamp(arrival, now).to_string()));
        params.push(("traffic_model", "pessimistic".to_string()));
    }
    if let Some(departure) = query.departure_time {
        params.push(("departure_time", next_timestamp(departure, now).to_string()));
        params.push(("traffic_model", "pessimistic".to_string()));
    }

    params
}

#[async_trait]
impl MapsService for GoogleMapsClient {
    async fn travel_time(&self, query: &TravelTimeQuery) -> std::result::Result<u64, MapsError> {
        let params = directions_params(query, Utc::now());
        let response: DirectionsResponse = self.get(DIRECTIONS_PATH, &params).await?;

        response
            .routes
            .first()
            .and_then(|route| route.legs.first())
            .map(|leg| leg.duration.value)
            .ok_or_else(|| {
                MapsError::NoResult(format!("no route from {} to {}", query.origin, query.destination))
            })
    }

    async fn geocode(&self, name: &str) -> std::result::Result<Location, MapsError> {
        let response: PlaceResults = self
            .get(GEOCODE_PATH, &[("address", name.to_string())])
            .await?;

        response
            .results
            .first()
            .map(|result| result.geometry.location)
            .ok_or_else(|| MapsError::NoResult(format!("could not geocode {}", name)))
    }

    async fn nearest_places(
        &self,
        location: Location,
        category: &str,
    ) -> std::result::Result<Vec<Location>, MapsError> {
        let params = [
            ("location", location.to_string()),
            ("rankby", "distance".to_string()),
            ("type", category.to_string()),
            ("keyword", category.to_string()),
        ];
        let response: PlaceResults = self.get(PLACES_NEARBY_PATH, &params).await?;

        Ok(response
            .results
            .into_iter()
            .map(|result| result.geometry.location)
            .collect())
    }
}
