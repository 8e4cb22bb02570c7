use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathStyle {
    pub color: String,
    pub weight: f64,
    pub dashed: bool,
}

impl PathStyle {
    pub fn solid(color: &str, weight: f64) -> Self {
        Self {
            color: color.into(),
            weight,
            dashed: false,
        }
    }

    pub fn dashed(color: &str, weight: f64) -> Self {
        Self {
            color: color.into(),
            weight,
            dashed: true,
        }
    }

    pub fn draft() -> Self {
        Self::dashed("#7c3aed", 3.0)
    }

    pub fn community() -> Self {
        Self::solid("#db2777", 4.0)
    }
}

/// Opaque handle returned by the map for a drawn path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PathHandle(pub u64);

/// Logical kind of path the engine keeps on the map. At most one path per layer is drawn at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    CurrentRoute,
    Draft,
    Community,
}
