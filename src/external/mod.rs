pub mod http;
pub mod nominatim;
pub mod osrm;
pub mod position;

pub use nominatim::NominatimGeocoder;
pub use osrm::OsrmRouteEstimator;
pub use position::ConfiguredPosition;
