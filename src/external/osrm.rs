use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    api::RouteEstimator,
    config::Config,
    entities::{Coordinate, RouteLeg, TravelMode},
    error::{upstream_error, Error},
    external::http::HttpClient,
};

/// Point-to-point routing against an OSRM-compatible service.
#[derive(Clone, Debug)]
pub struct OsrmRouteEstimator {
    http: HttpClient,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct Response {
    code: String,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    duration: f64,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<[f64; 2]>,
}

impl OsrmRouteEstimator {
    pub fn new(config: &Config) -> Result<Self, Error> {
        Ok(Self {
            http: HttpClient::new(config)?,
            base_url: config.routing_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, origin: Coordinate, destination: Coordinate, mode: TravelMode) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}",
            self.base_url,
            mode.profile(),
            origin.longitude,
            origin.latitude,
            destination.longitude,
            destination.latitude,
        )
    }
}

fn into_leg(data: Response) -> Result<Option<RouteLeg>, Error> {
    match data.code.as_str() {
        "Ok" => {}
        "NoRoute" | "NoSegment" => return Ok(None),
        other => {
            tracing::warn!("routing service answered {}", other);
            return Err(upstream_error());
        }
    }

    let Some(route) = data.routes.into_iter().next() else {
        return Ok(None);
    };

    let path = route
        .geometry
        .coordinates
        .into_iter()
        .map(Coordinate::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| {
            tracing::warn!("route geometry rejected: {}", err);
            upstream_error()
        })?;

    Ok(Some(RouteLeg {
        duration_seconds: route.duration,
        path,
    }))
}

#[async_trait]
impl RouteEstimator for OsrmRouteEstimator {
    #[tracing::instrument(skip(self))]
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<Option<RouteLeg>, Error> {
        let url = self.url(origin, destination, mode);

        let data: Response = self
            .http
            .get_json(
                &url,
                &[
                    ("overview", "full".into()),
                    ("geometries", "geojson".into()),
                ],
            )
            .await?;

        into_leg(data)
    }
}
