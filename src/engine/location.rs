use super::{Engine, Event, NoticeLevel};

use crate::{
    entities::Coordinate,
    error::Error,
};

const HERE_LABEL: &str = "You are here";

impl Engine {
    /// Session start: one position request, address lookup, then map setup.
    /// Location failure is not fatal; the map opens on the configured default center.
    #[tracing::instrument(skip(self))]
    pub async fn start(&self) -> Option<Coordinate> {
        match self.locate().await {
            Ok(coordinate) => Some(coordinate),
            Err(_) => {
                self.init_map(self.config.default_center, None).await;
                None
            }
        }
    }

    /// Requests a single position fix. No retry on failure.
    #[tracing::instrument(skip(self))]
    pub async fn locate(&self) -> Result<Coordinate, Error> {
        {
            let mut state = self.state.lock().await;
            state.position.loading = true;
            state.position.error = None;
        }

        let coordinate = match self.position_provider.current_position().await {
            Ok(coordinate) => coordinate,
            Err(err) => {
                {
                    let mut state = self.state.lock().await;
                    state.position.loading = false;
                    state.position.error = Some(err.message.clone());
                }
                tracing::warn!("position request failed: {}", err);
                self.events
                    .notice(NoticeLevel::Warning, "Could not get your location");
                return Err(err);
            }
        };

        {
            let mut state = self.state.lock().await;
            state.position.coordinate = Some(coordinate);
            state.position.address = None;
            state.position.loading = false;
        }
        tracing::info!(
            latitude = coordinate.latitude,
            longitude = coordinate.longitude,
            "located"
        );
        self.events.publish(Event::Located(coordinate));

        let address = self.resolve_address(coordinate).await;
        self.state.lock().await.position.address = Some(address.clone());
        self.events.publish(Event::AddressResolved(address));

        self.init_map(coordinate, Some(HERE_LABEL)).await;

        Ok(coordinate)
    }

    /// Reverse lookup, falling back to the numeric label so the address is never blank.
    async fn resolve_address(&self, coordinate: Coordinate) -> String {
        match self.geocoder.reverse(coordinate).await {
            Ok(Some(address)) if !address.trim().is_empty() => address,
            Ok(_) => {
                tracing::info!("no address for position, showing coordinates");
                coordinate.fallback_label()
            }
            Err(err) => {
                tracing::warn!("reverse lookup failed: {}", err);
                coordinate.fallback_label()
            }
        }
    }

    /// Initializes the map on first call and recenters the user marker afterwards.
    async fn init_map(&self, center: Coordinate, marker: Option<&str>) {
        let mut map = self.map.lock().await;

        if !map.is_initialized() {
            let clicks = self.clicks.0.clone();
            map.initialize(
                center,
                self.config.default_zoom,
                Box::new(move |coordinate| {
                    if clicks.try_send(coordinate).is_err() {
                        tracing::debug!("map click after shutdown ignored");
                    }
                }),
            );
        }

        if let Some(label) = marker {
            map.set_marker(center, label);
        }
    }
}
