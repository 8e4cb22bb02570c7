use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    api::Geocoder,
    config::Config,
    entities::{Coordinate, Place},
    error::Error,
    external::http::HttpClient,
};

/// Address lookups against a Nominatim-compatible service.
#[derive(Clone, Debug)]
pub struct NominatimGeocoder {
    http: HttpClient,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResult {
    display_name: Option<String>,
    error: Option<String>,
}

impl NominatimGeocoder {
    pub fn new(config: &Config) -> Result<Self, Error> {
        Ok(Self {
            http: HttpClient::new(config)?,
            base_url: config.geocoding_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn lookup(&self, query: &str, limit: usize) -> Result<Vec<Place>, Error> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/search", self.base_url);
        let results: Vec<SearchResult> = self
            .http
            .get_json(
                &url,
                &[
                    ("q", query.to_string()),
                    ("format", "jsonv2".into()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        Ok(results
            .into_iter()
            .filter_map(|result| match to_place(&result) {
                Some(place) => Some(place),
                None => {
                    tracing::warn!("skipping candidate with bad coordinates: {:?}", result);
                    None
                }
            })
            .take(limit)
            .collect())
    }
}

fn to_place(result: &SearchResult) -> Option<Place> {
    let latitude = result.lat.trim().parse::<f64>().ok()?;
    let longitude = result.lon.trim().parse::<f64>().ok()?;
    let coordinate = Coordinate::new(longitude, latitude).ok()?;

    Some(Place::new(coordinate, result.display_name.clone()))
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[tracing::instrument(skip(self))]
    async fn reverse(&self, coordinate: Coordinate) -> Result<Option<String>, Error> {
        let url = format!("{}/reverse", self.base_url);
        let data: ReverseResult = self
            .http
            .get_json(
                &url,
                &[
                    ("lat", coordinate.latitude.to_string()),
                    ("lon", coordinate.longitude.to_string()),
                    ("format", "jsonv2".into()),
                ],
            )
            .await?;

        if let Some(reason) = data.error {
            tracing::debug!("reverse lookup returned no address: {}", reason);
            return Ok(None);
        }

        Ok(data
            .display_name
            .filter(|name| !name.trim().is_empty()))
    }

    #[tracing::instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<Place>, Error> {
        self.lookup(query, 1).await
    }

    #[tracing::instrument(skip(self))]
    async fn autocomplete(&self, query: &str, limit: usize) -> Result<Vec<Place>, Error> {
        self.lookup(query, limit).await
    }
}
