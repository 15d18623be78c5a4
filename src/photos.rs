//! Aircraft photo lookup through the unofficial JetAPI photo service.
//!
//! Input errors are returned as [`ValidationError`]. Everything that goes wrong
//! after validation (network, HTTP status, payload) is logged and turns into an
//! empty result.

use crate::config::PhotosConfig;
use crate::error::{ProviderError, ValidationError};
use crate::filters::Registration;
use crate::models::PhotoRecord;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Tail numbers the photo lookup accepts.
pub const KNOWN_REGISTRATIONS: [&str; 6] =
    ["F-GXLG", "F-GXLH", "F-GXLI", "F-GXLJ", "F-GXLN", "F-GXLO"];

pub const DEFAULT_PHOTO_LIMIT: u32 = 3;
pub const MAX_PHOTO_LIMIT: u32 = 15;

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Default, Deserialize)]
pub struct PhotoResponse {
    #[serde(rename = "Images", default)]
    pub images: Vec<PhotoEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PhotoEntry {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub photographer: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub date_taken: Option<String>,
    #[serde(default)]
    pub date_uploaded: Option<String>,
}

/// Resolves the registration to look up: a validated allow-listed tail, or a
/// random one when none (or an empty string) is given.
pub fn resolve_registration<R: Rng + ?Sized>(
    registration: Option<&str>,
    rng: &mut R,
) -> Result<Registration, ValidationError> {
    let registration = match registration.filter(|r| !r.is_empty()) {
        Some(raw) => Registration::parse(raw)?,
        None => {
            let pick = KNOWN_REGISTRATIONS.choose(rng).copied().unwrap_or("F-GXLG");
            return Registration::parse(pick);
        }
    };

    if !KNOWN_REGISTRATIONS.contains(&registration.as_str()) {
        return Err(ValidationError::UnsupportedRegistration {
            registration: registration.to_string(),
            supported: KNOWN_REGISTRATIONS.iter().map(|r| r.to_string()).collect(),
        });
    }
    Ok(registration)
}

/// The default is accepted as-is; any other value must be in 1..=15.
pub fn validate_limit(limit: u32) -> Result<u32, ValidationError> {
    if limit != DEFAULT_PHOTO_LIMIT && !(1..=MAX_PHOTO_LIMIT).contains(&limit) {
        return Err(ValidationError::InvalidPhotoLimit(limit));
    }
    Ok(limit)
}

/// Shuffles the returned photos, keeps at most `limit`, and fills in defaults.
pub fn project_photos<R: Rng + ?Sized>(
    registration: &Registration,
    response: PhotoResponse,
    limit: u32,
    rng: &mut R,
) -> Vec<PhotoRecord> {
    let mut images = response.images;
    images.shuffle(rng);
    images.truncate(limit as usize);

    let or_unknown = |field: Option<String>| field.unwrap_or_else(|| UNKNOWN.to_string());

    images
        .into_iter()
        .map(|entry| PhotoRecord {
            registration: registration.to_string(),
            url: entry.image,
            location: or_unknown(entry.location),
            photographer: or_unknown(entry.photographer),
            date_taken: or_unknown(entry.date_taken),
            date_uploaded: or_unknown(entry.date_uploaded),
        })
        .collect()
}

pub struct PhotoLookup {
    client: Client,
    api_url: String,
}

impl PhotoLookup {
    pub fn new(config: &PhotosConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_seconds))
                .build()?,
            api_url: config.api_url.clone(),
        })
    }

    /// Fetches up to `limit` photos of `registration` (or of a random known
    /// tail). Only bad input is an error; service failures yield no photos.
    pub async fn get_images(
        &self,
        registration: Option<&str>,
        limit: u32,
    ) -> Result<Vec<PhotoRecord>, ValidationError> {
        let registration = resolve_registration(registration, &mut rand::rng())?;
        let limit = validate_limit(limit)?;

        let response = match self.fetch(&registration, limit).await {
            Ok(response) => response,
            Err(e) => {
                error!("Photo lookup for {} failed: {}", registration, e);
                return Ok(Vec::new());
            }
        };

        if response.images.is_empty() {
            debug!("No photos found for {}", registration);
            return Ok(Vec::new());
        }

        Ok(project_photos(&registration, response, limit, &mut rand::rng()))
    }

    async fn fetch(
        &self,
        registration: &Registration,
        limit: u32,
    ) -> Result<PhotoResponse, ProviderError> {
        let res = self
            .client
            .get(&self.api_url)
            .query(&[("reg", registration.to_string()), ("photos", limit.to_string())])
            .send()
            .await?;

        if !res.status().is_success() {
            warn!("Photo service returned {} for {}", res.status(), registration);
            return Ok(PhotoResponse::default());
        }

        Ok(res.json::<PhotoResponse>().await?)
    }
}
