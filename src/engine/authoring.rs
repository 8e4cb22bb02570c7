use super::{Engine, Event, NoticeLevel};

use crate::{
    entities::{CommunityRoute, Coordinate, Layer, PathStyle},
    error::Error,
};

impl Engine {
    #[tracing::instrument(skip(self))]
    pub async fn start_authoring(&self) {
        let mut state = self.state.lock().await;
        state.authoring.start();
        self.map.lock().await.clear(Layer::Draft);

        tracing::info!("authoring started");
        self.events
            .publish(Event::AuthoringChanged(state.authoring.session().cloned()));
    }

    /// Appends a point to the draft and redraws it. Fails when not authoring.
    #[tracing::instrument(skip(self))]
    pub async fn add_draft_point(&self, coordinate: Coordinate) -> Result<usize, Error> {
        let mut state = self.state.lock().await;
        let session = state.authoring.add_point(coordinate)?.clone();

        self.map
            .lock()
            .await
            .replace(Layer::Draft, &session.coordinates, &PathStyle::draft());

        let count = session.coordinates.len();
        self.events.publish(Event::AuthoringChanged(Some(session)));

        Ok(count)
    }

    pub async fn set_draft_name(&self, name: &str) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        state.authoring.set_name(name)?;
        self.events
            .publish(Event::AuthoringChanged(state.authoring.session().cloned()));
        Ok(())
    }

    pub async fn set_draft_description(&self, description: &str) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        state.authoring.set_description(description)?;
        self.events
            .publish(Event::AuthoringChanged(state.authoring.session().cloned()));
        Ok(())
    }

    /// Validates and persists the draft as a new community route. On any failure the
    /// collection is untouched and authoring stays open.
    #[tracing::instrument(skip(self))]
    pub async fn save_draft(&self) -> Result<CommunityRoute, Error> {
        let mut state = self.state.lock().await;

        let route = match state.authoring.prepare_save() {
            Ok(route) => route,
            Err(err) => {
                self.events.notice(NoticeLevel::Warning, err.message.clone());
                return Err(err);
            }
        };

        let mut routes = state.community_routes.clone();
        routes.push(route.clone());

        if let Err(err) = self.store.save(&routes) {
            self.events
                .notice(NoticeLevel::Error, "Could not save the route");
            return Err(err);
        }

        state.community_routes = routes;
        state.authoring.finish();
        self.map.lock().await.clear(Layer::Draft);

        tracing::info!(id = %route.id, name = %route.name, "community route saved");
        self.events
            .publish(Event::CommunityRoutesChanged(state.community_routes.len()));
        self.events.publish(Event::AuthoringChanged(None));
        self.events
            .notice(NoticeLevel::Info, format!("Saved \"{}\"", route.name));

        Ok(route)
    }

    #[tracing::instrument(skip(self))]
    pub async fn cancel_authoring(&self) {
        let mut state = self.state.lock().await;
        if !state.authoring.is_active() {
            return;
        }

        state.authoring.cancel();
        self.map.lock().await.clear(Layer::Draft);

        tracing::info!("authoring cancelled");
        self.events.publish(Event::AuthoringChanged(None));
    }

    /// Raw map click. Only meaningful while authoring.
    pub async fn handle_click(&self, coordinate: Coordinate) {
        let authoring = self.state.lock().await.authoring.is_active();

        if !authoring {
            tracing::debug!("click ignored outside authoring: {:?}", coordinate);
            return;
        }

        if let Err(err) = self.add_draft_point(coordinate).await {
            tracing::warn!("could not add draft point: {}", err);
        }
    }

    /// Processes every click the map has reported so far; returns how many.
    pub async fn pump_clicks(&self) -> usize {
        let mut handled = 0;

        while let Ok(coordinate) = self.clicks.1.try_recv() {
            self.handle_click(coordinate).await;
            handled += 1;
        }

        handled
    }
}
