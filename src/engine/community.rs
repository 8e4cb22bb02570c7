use uuid::Uuid;

use super::{helpers, Engine, Event, NoticeLevel};

use crate::{
    entities::{CommunityRoute, Layer, PathStyle, RatingDraft},
    error::{invalid_state_error, not_found_error, Error},
};

/// A community route with its display-ready rating.
#[derive(Clone, Debug, PartialEq)]
pub struct CommunityRouteSummary {
    pub route: CommunityRoute,
    pub rating_label: String,
}

impl Engine {
    pub async fn community_routes(&self) -> Vec<CommunityRouteSummary> {
        self.state
            .lock()
            .await
            .community_routes
            .iter()
            .map(|route| CommunityRouteSummary {
                rating_label: helpers::rating_label(route),
                route: route.clone(),
            })
            .collect()
    }

    /// Draws a stored route in the community layer and fits the view to it.
    #[tracing::instrument(skip(self))]
    pub async fn show_community_route(&self, id: Uuid) -> Result<CommunityRoute, Error> {
        let route = self
            .state
            .lock()
            .await
            .community_routes
            .iter()
            .find(|route| route.id == id)
            .cloned()
            .ok_or_else(|| not_found_error("community route"))?;

        let mut map = self.map.lock().await;
        map.replace(Layer::Community, &route.coordinates, &PathStyle::community());
        map.fit(&route.coordinates, self.config.fit_padding);

        Ok(route)
    }

    pub async fn hide_community_route(&self) {
        self.map.lock().await.clear(Layer::Community);
    }

    #[tracing::instrument(skip(self))]
    pub async fn open_rating(&self, id: Uuid) -> Result<RatingDraft, Error> {
        let mut state = self.state.lock().await;

        if !state.community_routes.iter().any(|route| route.id == id) {
            return Err(not_found_error("community route"));
        }

        let draft = RatingDraft::new(id);
        state.rating = Some(draft.clone());
        self.events.publish(Event::RatingChanged(Some(draft.clone())));

        Ok(draft)
    }

    /// Picks a star value, 1..=5, or 0 to clear the selection.
    pub async fn select_rating(&self, value: u8) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        let draft = state.rating.as_mut().ok_or_else(invalid_state_error)?;
        draft.select(value)?;

        let draft = draft.clone();
        self.events.publish(Event::RatingChanged(Some(draft)));
        Ok(())
    }

    /// Appends the selected rating to its route and persists the collection.
    #[tracing::instrument(skip(self))]
    pub async fn submit_rating(&self) -> Result<CommunityRoute, Error> {
        let mut state = self.state.lock().await;
        let draft = state.rating.clone().ok_or_else(invalid_state_error)?;

        let value = match draft.value() {
            Ok(value) => value,
            Err(err) => {
                self.events.notice(NoticeLevel::Warning, err.message.clone());
                return Err(err);
            }
        };

        let mut routes = state.community_routes.clone();
        let route = routes
            .iter_mut()
            .find(|route| route.id == draft.route_id)
            .ok_or_else(|| not_found_error("community route"))?;
        route.add_rating(value)?;
        let rated = route.clone();

        if let Err(err) = self.store.save(&routes) {
            self.events
                .notice(NoticeLevel::Error, "Could not save your rating");
            return Err(err);
        }

        state.community_routes = routes;
        state.rating = None;

        tracing::info!(id = %rated.id, value, "route rated");
        self.events
            .publish(Event::CommunityRoutesChanged(state.community_routes.len()));
        self.events.publish(Event::RatingChanged(None));

        Ok(rated)
    }

    pub async fn cancel_rating(&self) {
        let mut state = self.state.lock().await;
        if state.rating.take().is_some() {
            self.events.publish(Event::RatingChanged(None));
        }
    }
}
