use async_trait::async_trait;

use crate::{
    api::GeoPositionProvider,
    entities::Coordinate,
    error::{permission_denied_error, Error},
};

/// Position source for hosts without a location service: answers with the configured
/// fix, or reports denial when none is configured.
#[derive(Clone, Debug, Default)]
pub struct ConfiguredPosition {
    position: Option<Coordinate>,
}

impl ConfiguredPosition {
    pub fn new(position: Option<Coordinate>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl GeoPositionProvider for ConfiguredPosition {
    #[tracing::instrument(skip(self))]
    async fn current_position(&self) -> Result<Coordinate, Error> {
        self.position.ok_or_else(permission_denied_error)
    }
}
