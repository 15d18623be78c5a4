use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "beluga.toml";

// Missing sections and keys take their defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub tracker: TrackerConfig,
    pub provider: ProviderConfig,
    pub photos: PhotosConfig,
    pub logging: LoggingConfig,
    pub fleet: FleetConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    pub aircraft_type: String, // ICAO type designator sent to the feed
    pub airline_icao: String,  // Operator code sent to the feed
    pub home_zone: String,     // Zone searched when a query names none
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    pub zones_url: String,
    pub feed_url: String,
    pub details_url: String,
    pub user_agent: String,
    // No timeout unless set; slow networks can block a query indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PhotosConfig {
    pub api_url: String,
    pub timeout_seconds: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: String,
    pub file_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FleetConfig {
    /// Falls back to the fleet file shipped with the package.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<PathBuf>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            aircraft_type: "A337".to_string(),
            airline_icao: "BGA".to_string(),
            home_zone: "europe".to_string(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            zones_url: "https://www.flightradar24.com/js/zones.js.php".to_string(),
            feed_url: "https://data-cloud.flightradar24.com/zones/fcgi/feed.js".to_string(),
            details_url: "https://data-live.flightradar24.com/clickhandler/".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            request_timeout_seconds: None,
        }
    }
}

impl Default for PhotosConfig {
    fn default() -> Self {
        Self {
            api_url: "https://www.jetapi.dev/api".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: "logs".to_string(),
            file_name: "beluga.log".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tracker: TrackerConfig::default(),
            provider: ProviderConfig::default(),
            photos: PhotosConfig::default(),
            logging: LoggingConfig::default(),
            fleet: FleetConfig::default(),
        }
    }
}

impl Config {
    /// Loads beluga.toml from the working directory.
    pub fn load() -> Self {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Loads the config at `path`.
    /// If it doesn't exist, writes the defaults there and uses them.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let config_path = path.as_ref();

        if let Ok(content) = fs::read_to_string(config_path) {
            match toml::from_str(&content) {
                Ok(config) => return config,
                Err(e) => {
                    warn!(
                        "Failed to parse {}: {}. Using defaults.",
                        config_path.display(),
                        e
                    );
                    return Config::default();
                }
            }
        }

        let default_config = Config::default();

        // Save default config to disk for the user to edit later
        match toml::to_string_pretty(&default_config) {
            Ok(toml_string) => {
                if fs::write(config_path, toml_string).is_err() {
                    warn!("Could not write default {} to disk.", config_path.display());
                }
            }
            Err(e) => warn!("Could not serialize default config: {}", e),
        }

        info!("Loaded default configuration.");
        default_config
    }
}
