use futures::stream::{FuturesUnordered, StreamExt};

use super::{Engine, Event, NoticeLevel};

use crate::{
    entities::{Coordinate, Layer, RouteEstimate, TravelMode},
    error::{not_found_error, validation_error, Error},
};

impl Engine {
    /// Plans from the user's position to the destination text.
    ///
    /// The destination is geocoded first; if that fails nothing else changes. All three
    /// modes are then fetched concurrently and a failing mode is left out of the estimate.
    /// Only the selected mode (foot unless chosen) is drawn, but the whole duration table
    /// is published.
    #[tracing::instrument(skip(self))]
    pub async fn plan_route(&self, mode: Option<TravelMode>) -> Result<RouteEstimate, Error> {
        let generation = Self::next_generation(&self.plan_generation);

        let (origin, query, mode) = {
            let mut state = self.state.lock().await;
            let mode = mode.unwrap_or(state.selected_mode);
            state.selected_mode = mode;
            (
                state.position.coordinate,
                state.destination.trim().to_string(),
                mode,
            )
        };

        let Some(origin) = origin else {
            return Err(self.reject("Your location is not available yet"));
        };

        if query.is_empty() {
            return Err(self.reject("Enter a destination first"));
        }

        let destination = self.resolve_destination(&query).await?;
        let estimate = self.fetch_all_modes(origin, destination, generation).await;

        if !Self::is_current(&self.plan_generation, generation) {
            tracing::debug!(generation, "newer plan in progress, not drawing");
            return Ok(estimate);
        }

        self.draw_current_route(mode, &estimate).await;

        self.state.lock().await.estimate = Some(estimate.clone());
        tracing::info!(%mode, modes = estimate.legs.len(), "route planned");
        self.events.publish(Event::EstimatePublished {
            selected: mode,
            estimate: estimate.clone(),
        });

        Ok(estimate)
    }

    /// Switches the travel mode. After a first plan this re-plans all modes for the new selection.
    #[tracing::instrument(skip(self))]
    pub async fn select_mode(&self, mode: TravelMode) -> Result<Option<RouteEstimate>, Error> {
        let planned = {
            let mut state = self.state.lock().await;
            state.selected_mode = mode;
            state.estimate.is_some()
        };

        if !planned {
            return Ok(None);
        }

        self.plan_route(Some(mode)).await.map(Some)
    }

    fn reject(&self, message: &str) -> Error {
        self.events.notice(NoticeLevel::Error, message);
        validation_error(message)
    }

    async fn resolve_destination(&self, query: &str) -> Result<Coordinate, Error> {
        match self.geocoder.search(query).await {
            Ok(places) => match places.into_iter().next() {
                Some(place) => Ok(place.coordinate),
                None => {
                    self.events
                        .notice(NoticeLevel::Error, format!("Could not find \"{}\"", query));
                    Err(not_found_error("destination"))
                }
            },
            Err(err) => {
                tracing::warn!("destination lookup failed: {}", err);
                self.events
                    .notice(NoticeLevel::Error, "Could not look up the destination");
                Err(err)
            }
        }
    }

    async fn fetch_all_modes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        generation: u64,
    ) -> RouteEstimate {
        let mut pending: FuturesUnordered<_> = TravelMode::ALL
            .into_iter()
            .map(|mode| async move { (mode, self.router.route(origin, destination, mode).await) })
            .collect();

        let mut estimate = RouteEstimate::new(destination);

        while let Some((mode, result)) = pending.next().await {
            match result {
                Ok(Some(leg)) => {
                    if Self::is_current(&self.plan_generation, generation) {
                        self.events.publish(Event::DurationResolved {
                            mode,
                            seconds: leg.duration_seconds,
                        });
                    }
                    estimate.insert(mode, leg);
                }
                Ok(None) => tracing::info!(%mode, "no route for mode"),
                Err(err) => tracing::warn!(%mode, "route request failed: {}", err),
            }
        }

        estimate
    }

    async fn draw_current_route(&self, mode: TravelMode, estimate: &RouteEstimate) {
        let mut map = self.map.lock().await;

        match estimate.leg(mode) {
            Some(leg) => {
                map.replace(Layer::CurrentRoute, &leg.path, &mode.path_style());
                map.fit(&leg.path, self.config.fit_padding);
            }
            None => {
                map.clear(Layer::CurrentRoute);
                drop(map);
                self.events
                    .notice(NoticeLevel::Warning, format!("No {} route found", mode));
            }
        }
    }
}
