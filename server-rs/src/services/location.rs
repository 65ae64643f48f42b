use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::messages;
use crate::models::Location;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers (haversine).
pub fn distance_km(a: &Location, b: &Location) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

pub fn format_location(location: &Location) -> String {
    match location.address.as_deref() {
        Some(address) if !address.is_empty() => address.to_string(),
        _ => format!("{:.6}, {:.6}", location.latitude, location.longitude),
    }
}

/// Joins street, district, city, region and country, skipping blanks.
pub fn compose_address(parts: &[Option<&str>]) -> Option<String> {
    let joined = parts
        .iter()
        .flatten()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    (!joined.is_empty()).then_some(joined)
}

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("Network request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<String>, GeocodeError>;
}

/// Never resolves an address; used when no geocoder is configured.
pub struct NoopGeocoder;

#[async_trait]
impl ReverseGeocoder for NoopGeocoder {
    async fn reverse(&self, _latitude: f64, _longitude: f64) -> Result<Option<String>, GeocodeError> {
        Ok(None)
    }
}

/// Nominatim-compatible `/reverse` endpoint.
pub struct HttpGeocoder {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ReverseResponse {
    address: Option<AddressParts>,
}

#[derive(Deserialize)]
struct AddressParts {
    road: Option<String>,
    suburb: Option<String>,
    city_district: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

impl HttpGeocoder {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ReverseGeocoder for HttpGeocoder {
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<String>, GeocodeError> {
        let resp: ReverseResponse = self
            .client
            .get(format!("{}/reverse", self.base_url))
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(resp.address.and_then(|a| {
            compose_address(&[
                a.road.as_deref(),
                a.suburb.as_deref().or(a.city_district.as_deref()),
                a.city
                    .as_deref()
                    .or(a.town.as_deref())
                    .or(a.village.as_deref()),
                a.state.as_deref(),
                a.country.as_deref(),
            ])
        }))
    }
}

/// Attaches the caller's device fix (and its address, when resolvable) to
/// records being written. Failing to resolve an address never fails a write.
#[derive(Clone)]
pub struct LocationStamper {
    geocoder: Arc<dyn ReverseGeocoder>,
}

impl LocationStamper {
    pub fn new(geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        Self { geocoder }
    }

    pub async fn stamp(&self, fix: Option<Location>) -> AppResult<Option<Location>> {
        let Some(mut location) = fix else {
            return Ok(None);
        };
        if !location.is_valid() {
            return Err(AppError::BadRequest("Koordinat lokasi tidak valid".into()));
        }
        if location.timestamp.is_none() {
            location.timestamp = Some(chrono::Utc::now().timestamp_millis());
        }
        if location.address.as_deref().map_or(true, str::is_empty) {
            match self
                .geocoder
                .reverse(location.latitude, location.longitude)
                .await
            {
                Ok(address) => location.address = address,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        reason = %messages::network_message(&e.to_string()),
                        "Reverse geocoding failed, keeping bare coordinates"
                    );
                    location.address = None;
                }
            }
        }
        Ok(Some(location))
    }
}
