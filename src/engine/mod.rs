mod authoring;
mod community;
mod events;
pub mod helpers;
mod layers;
mod location;
mod planning;
mod suggestions;

use std::sync::atomic::{AtomicU64, Ordering};

use async_channel::{Receiver, Sender};
use tokio::sync::Mutex;

use crate::{
    api::{DynGeocoder, DynMapView, DynPositionProvider, DynRouteEstimator, DynStorage},
    config::Config,
    entities::{
        Authoring, AuthoringSession, CommunityRoute, Coordinate, Layer, Place, RatingDraft,
        RouteEstimate, TravelMode, UserPosition,
    },
    store::CommunityRouteStore,
};

pub use community::CommunityRouteSummary;
pub use events::{Event, EventBus, Notice, NoticeLevel};
use layers::MapLayers;

/// Everything the engine talks to but does not own the behaviour of.
pub struct Collaborators {
    pub position: DynPositionProvider,
    pub geocoder: DynGeocoder,
    pub router: DynRouteEstimator,
    pub storage: DynStorage,
    pub map: DynMapView,
}

#[derive(Debug, Default)]
struct State {
    position: UserPosition,
    destination: String,
    suggestions: Vec<Place>,
    selected_mode: TravelMode,
    estimate: Option<RouteEstimate>,
    community_routes: Vec<CommunityRoute>,
    authoring: Authoring,
    rating: Option<RatingDraft>,
    online: bool,
}

/// Session orchestrator: owns the user position, the planned route, the community
/// routes and every piece of UI-facing state. One instance per session.
pub struct Engine {
    config: Config,
    position_provider: DynPositionProvider,
    geocoder: DynGeocoder,
    router: DynRouteEstimator,
    store: CommunityRouteStore,
    map: Mutex<MapLayers>,
    state: Mutex<State>,
    suggestion_generation: AtomicU64,
    plan_generation: AtomicU64,
    events: EventBus,
    clicks: (Sender<Coordinate>, Receiver<Coordinate>),
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Builds the session and loads the stored community routes once.
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(config: Config, collaborators: Collaborators) -> Self {
        let store = CommunityRouteStore::new(collaborators.storage, config.storage_key.clone());
        let community_routes = store.load();

        let state = State {
            position: UserPosition::pending(),
            community_routes,
            online: true,
            ..Default::default()
        };

        Self {
            config,
            position_provider: collaborators.position,
            geocoder: collaborators.geocoder,
            router: collaborators.router,
            store,
            map: Mutex::new(MapLayers::new(collaborators.map)),
            state: Mutex::new(state),
            suggestion_generation: AtomicU64::new(0),
            plan_generation: AtomicU64::new(0),
            events: EventBus::new(),
            clicks: async_channel::unbounded(),
        }
    }

    pub fn subscribe(&self) -> Receiver<Event> {
        self.events.subscribe()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn position(&self) -> UserPosition {
        self.state.lock().await.position.clone()
    }

    pub async fn destination(&self) -> String {
        self.state.lock().await.destination.clone()
    }

    pub async fn suggestions(&self) -> Vec<Place> {
        self.state.lock().await.suggestions.clone()
    }

    pub async fn selected_mode(&self) -> TravelMode {
        self.state.lock().await.selected_mode
    }

    pub async fn estimate(&self) -> Option<RouteEstimate> {
        self.state.lock().await.estimate.clone()
    }

    pub async fn draft(&self) -> Option<AuthoringSession> {
        self.state.lock().await.authoring.session().cloned()
    }

    pub async fn rating(&self) -> Option<RatingDraft> {
        self.state.lock().await.rating.clone()
    }

    pub async fn is_online(&self) -> bool {
        self.state.lock().await.online
    }

    pub async fn is_layer_drawn(&self, layer: Layer) -> bool {
        self.map.lock().await.is_drawn(layer)
    }

    /// Records connectivity for the offline indicator. Routing behaviour is unaffected.
    pub async fn set_online(&self, online: bool) {
        let mut state = self.state.lock().await;
        if state.online != online {
            state.online = online;
            tracing::info!(online, "connectivity changed");
            self.events.publish(Event::ConnectivityChanged(online));
        }
    }

    /// Removes every drawn layer and tears the map down. Pending clicks are discarded.
    #[tracing::instrument(skip(self))]
    pub async fn shutdown(&self) {
        self.clicks.0.close();
        self.map.lock().await.teardown();
        self.events.close();
    }

    fn next_generation(counter: &AtomicU64) -> u64 {
        counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(counter: &AtomicU64, generation: u64) -> bool {
        counter.load(Ordering::SeqCst) == generation
    }
}
