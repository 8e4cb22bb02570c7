use serde::{Deserialize, Serialize};

use crate::error::{validation_error, Error};

/// WGS84 longitude/latitude pair, serialized in GeoJSON order `[lon, lat]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinate {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, Error> {
        let coordinate = Self {
            longitude,
            latitude,
        };

        if !coordinate.is_valid() {
            return Err(validation_error(format!(
                "coordinate out of range: {}, {}",
                latitude, longitude
            )));
        }

        Ok(coordinate)
    }

    pub fn is_valid(&self) -> bool {
        (-180.0..=180.0).contains(&self.longitude) && (-90.0..=90.0).contains(&self.latitude)
    }

    /// Numeric `"lat, lon"` label shown when no address could be resolved.
    pub fn fallback_label(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

impl TryFrom<[f64; 2]> for Coordinate {
    type Error = Error;

    fn try_from([longitude, latitude]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(longitude, latitude)
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(coordinate: Coordinate) -> Self {
        [coordinate.longitude, coordinate.latitude]
    }
}

impl From<Coordinate> for geo_types::Coord<f64> {
    fn from(coordinate: Coordinate) -> Self {
        geo_types::coord! { x: coordinate.longitude, y: coordinate.latitude }
    }
}

impl From<geo_types::Coord<f64>> for Coordinate {
    fn from(coord: geo_types::Coord<f64>) -> Self {
        Self {
            longitude: coord.x,
            latitude: coord.y,
        }
    }
}

impl std::str::FromStr for Coordinate {
    type Err = Error;

    /// Parses `"lon,lat"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',').map(str::trim);

        let (Some(lon), Some(lat), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(validation_error(format!("expected \"lon,lat\", got {:?}", s)));
        };

        let longitude = lon
            .parse::<f64>()
            .map_err(|_| validation_error(format!("invalid longitude {:?}", lon)))?;
        let latitude = lat
            .parse::<f64>()
            .map_err(|_| validation_error(format!("invalid latitude {:?}", lat)))?;

        Self::new(longitude, latitude)
    }
}
