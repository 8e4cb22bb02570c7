use serde::{Deserialize, Serialize};

use crate::entities::Coordinate;

/// Where the user is, as far as this session knows. Only the location flow mutates it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserPosition {
    pub coordinate: Option<Coordinate>,
    pub address: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

impl UserPosition {
    pub fn pending() -> Self {
        Self {
            coordinate: None,
            address: None,
            loading: true,
            error: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.coordinate.is_some()
    }

    /// The address to show: resolved address, numeric fallback, or nothing while unlocated.
    pub fn display_address(&self) -> Option<String> {
        match (&self.address, &self.coordinate) {
            (Some(address), _) if !address.trim().is_empty() => Some(address.clone()),
            (_, Some(coordinate)) => Some(coordinate.fallback_label()),
            _ => None,
        }
    }
}

impl Default for UserPosition {
    fn default() -> Self {
        Self::pending()
    }
}
