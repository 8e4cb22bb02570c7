//! Runtime configuration, read from `WAYFARER_*` environment variables (and `.env`).

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entities::Coordinate;
use crate::error::{validation_error, Error};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the Nominatim-compatible address service
    #[serde(default = "default_geocoding_base_url")]
    pub geocoding_base_url: String,

    /// Base URL of the OSRM-compatible routing service
    #[serde(default = "default_routing_base_url")]
    pub routing_base_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Extra attempts after a retryable failure (0 = attempt once)
    #[serde(default = "default_http_retries")]
    pub http_retries: u32,

    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,

    /// Wait before issuing an autocomplete request (0 = no debounce)
    #[serde(default)]
    pub suggestion_debounce_ms: u64,

    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Map center used when the user could not be located
    #[serde(default = "default_center")]
    pub default_center: Coordinate,

    #[serde(default = "default_zoom")]
    pub default_zoom: u8,

    /// Margin in pixels kept around a fitted route
    #[serde(default = "default_fit_padding")]
    pub fit_padding: u32,

    /// Fixed position fix for hosts without a location service
    #[serde(default)]
    pub position: Option<Coordinate>,
}

fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".into()
}

fn default_routing_base_url() -> String {
    "https://router.project-osrm.org".into()
}

fn default_user_agent() -> String {
    concat!("wayfarer/", env!("CARGO_PKG_VERSION")).into()
}

const fn default_http_timeout_secs() -> u64 {
    10
}

const fn default_http_retries() -> u32 {
    1
}

const fn default_suggestion_limit() -> usize {
    5
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(".wayfarer")
}

fn default_storage_key() -> String {
    "communityRoutes".into()
}

fn default_center() -> Coordinate {
    Coordinate {
        longitude: -0.1276,
        latitude: 51.5072,
    }
}

const fn default_zoom() -> u8 {
    13
}

const fn default_fit_padding() -> u32 {
    50
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geocoding_base_url: default_geocoding_base_url(),
            routing_base_url: default_routing_base_url(),
            user_agent: default_user_agent(),
            http_timeout_secs: default_http_timeout_secs(),
            http_retries: default_http_retries(),
            suggestion_limit: default_suggestion_limit(),
            suggestion_debounce_ms: 0,
            storage_dir: default_storage_dir(),
            storage_key: default_storage_key(),
            default_center: default_center(),
            default_zoom: default_zoom(),
            fit_padding: default_fit_padding(),
            position: None,
        }
    }
}

impl Config {
    pub fn for_testing() -> Self {
        Self {
            http_timeout_secs: 2,
            http_retries: 0,
            ..Default::default()
        }
    }

    /// Loads `.env` if present, then overlays every `WAYFARER_*` variable that is set.
    #[tracing::instrument(name = "Config::from_env")]
    pub fn from_env() -> Result<Self, Error> {
        if let Ok(path) = dotenv::dotenv() {
            tracing::debug!("loaded environment from {}", path.display());
        }

        let mut config = Self::default();

        if let Some(v) = var("WAYFARER_GEOCODING_BASE_URL")? {
            config.geocoding_base_url = v;
        }
        if let Some(v) = var("WAYFARER_ROUTING_BASE_URL")? {
            config.routing_base_url = v;
        }
        if let Some(v) = var("WAYFARER_USER_AGENT")? {
            config.user_agent = v;
        }
        if let Some(v) = parsed_var("WAYFARER_HTTP_TIMEOUT_SECS")? {
            config.http_timeout_secs = v;
        }
        if let Some(v) = parsed_var("WAYFARER_HTTP_RETRIES")? {
            config.http_retries = v;
        }
        if let Some(v) = parsed_var("WAYFARER_SUGGESTION_LIMIT")? {
            config.suggestion_limit = v;
        }
        if let Some(v) = parsed_var("WAYFARER_SUGGESTION_DEBOUNCE_MS")? {
            config.suggestion_debounce_ms = v;
        }
        if let Some(v) = var("WAYFARER_STORAGE_DIR")? {
            config.storage_dir = PathBuf::from(v);
        }
        if let Some(v) = var("WAYFARER_STORAGE_KEY")? {
            config.storage_key = v;
        }
        if let Some(v) = parsed_var("WAYFARER_DEFAULT_CENTER")? {
            config.default_center = v;
        }
        if let Some(v) = parsed_var("WAYFARER_DEFAULT_ZOOM")? {
            config.default_zoom = v;
        }
        if let Some(v) = parsed_var("WAYFARER_FIT_PADDING")? {
            config.fit_padding = v;
        }
        if let Some(v) = parsed_var("WAYFARER_POSITION")? {
            config.position = Some(v);
        }

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.geocoding_base_url.trim().is_empty() {
            return Err(validation_error("geocoding_base_url must not be empty"));
        }

        if self.routing_base_url.trim().is_empty() {
            return Err(validation_error("routing_base_url must not be empty"));
        }

        if self.http_timeout_secs == 0 {
            return Err(validation_error("http_timeout_secs must be greater than 0"));
        }

        if !(1..=10).contains(&self.suggestion_limit) {
            return Err(validation_error("suggestion_limit must be between 1 and 10"));
        }

        if self.storage_key.trim().is_empty() {
            return Err(validation_error("storage_key must not be empty"));
        }

        if !self.default_center.is_valid() {
            return Err(validation_error("default_center is out of range"));
        }

        Ok(())
    }
}

fn var(name: &str) -> Result<Option<String>, Error> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn parsed_var<T: FromStr>(name: &str) -> Result<Option<T>, Error> {
    var(name)?
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|_| validation_error(format!("{} has an invalid value: {:?}", name, raw)))
        })
        .transpose()
}
