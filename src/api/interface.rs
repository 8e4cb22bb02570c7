use async_trait::async_trait;
use std::sync::Arc;

use crate::entities::{Coordinate, PathHandle, PathStyle, Place, RouteLeg, TravelMode};
use crate::error::Error;

/// One-shot position fix. Denied, unavailable and timed-out requests all surface as an error.
#[async_trait]
pub trait GeoPositionProvider: Send + Sync {
    async fn current_position(&self) -> Result<Coordinate, Error>;
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Address for a coordinate; `Ok(None)` when the service has nothing to say.
    async fn reverse(&self, coordinate: Coordinate) -> Result<Option<String>, Error>;

    /// Candidates for free text, best first.
    async fn search(&self, query: &str) -> Result<Vec<Place>, Error>;

    async fn autocomplete(&self, query: &str, limit: usize) -> Result<Vec<Place>, Error>;
}

#[async_trait]
pub trait RouteEstimator: Send + Sync {
    /// `Ok(None)` when the service found no route for this mode.
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<Option<RouteLeg>, Error>;
}

pub type ClickHandler = Box<dyn Fn(Coordinate) + Send + Sync>;

/// Rendering surface. It never dedupes layers: whoever draws a path owns removing it.
pub trait MapView: Send {
    fn initialize(&mut self, center: Coordinate, zoom: u8);
    fn set_marker(&mut self, coordinate: Coordinate, label: &str);
    fn draw_path(&mut self, coordinates: &[Coordinate], style: &PathStyle) -> PathHandle;
    fn remove_path(&mut self, handle: PathHandle);
    fn fit_to_bounds(&mut self, coordinates: &[Coordinate], padding: u32);
    fn on_click(&mut self, handler: ClickHandler);
    fn teardown(&mut self);
}

/// Named string records, the way browser local storage works.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, Error>;
    fn set(&self, key: &str, value: &str) -> Result<(), Error>;
}

pub type DynPositionProvider = Arc<dyn GeoPositionProvider>;
pub type DynGeocoder = Arc<dyn Geocoder>;
pub type DynRouteEstimator = Arc<dyn RouteEstimator>;
pub type DynMapView = Box<dyn MapView>;
pub type DynStorage = Box<dyn Storage>;
