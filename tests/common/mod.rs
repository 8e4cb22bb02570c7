#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::Notify;

use wayfarer::api::{ClickHandler, GeoPositionProvider, Geocoder, MapView, RouteEstimator, Storage};
use wayfarer::config::Config;
use wayfarer::engine::{Collaborators, Engine, Event};
use wayfarer::entities::{Coordinate, PathHandle, PathStyle, Place, RouteLeg, TravelMode};
use wayfarer::error::{network_error, permission_denied_error, storage_error, Error};
use wayfarer::store::MemoryStorage;

pub fn coord(longitude: f64, latitude: f64) -> Coordinate {
    Coordinate::new(longitude, latitude).unwrap()
}

pub fn home() -> Coordinate {
    coord(-0.1246, 51.5308)
}

pub fn museum() -> Coordinate {
    coord(-0.1269, 51.5194)
}

pub struct FakePosition(pub Result<Coordinate, Error>);

#[async_trait]
impl GeoPositionProvider for FakePosition {
    async fn current_position(&self) -> Result<Coordinate, Error> {
        self.0.clone()
    }
}

#[derive(Default)]
pub struct FakeGeocoder {
    pub reverse: Mutex<Option<Result<Option<String>, Error>>>,
    pub search: Mutex<HashMap<String, Vec<Place>>>,
    pub autocomplete: Mutex<HashMap<String, Vec<Place>>>,
    pub gates: Mutex<HashMap<String, Arc<Notify>>>,
    pub search_calls: AtomicUsize,
    pub autocomplete_calls: AtomicUsize,
}

impl FakeGeocoder {
    pub fn with_address(address: &str) -> Self {
        let geocoder = Self::default();
        *geocoder.reverse.lock().unwrap() = Some(Ok(Some(address.to_string())));
        geocoder
    }

    pub fn set_reverse(&self, result: Result<Option<String>, Error>) {
        *self.reverse.lock().unwrap() = Some(result);
    }

    pub fn add_search(&self, query: &str, places: Vec<Place>) {
        self.search.lock().unwrap().insert(query.to_string(), places);
    }

    pub fn add_autocomplete(&self, query: &str, places: Vec<Place>) {
        self.autocomplete
            .lock()
            .unwrap()
            .insert(query.to_string(), places);
    }

    /// Holds autocomplete answers for `query` until the returned gate is notified.
    pub fn gate(&self, query: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(query.to_string(), gate.clone());
        gate
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn reverse(&self, _coordinate: Coordinate) -> Result<Option<String>, Error> {
        self.reverse.lock().unwrap().clone().unwrap_or(Ok(None))
    }

    async fn search(&self, query: &str) -> Result<Vec<Place>, Error> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .search
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }

    async fn autocomplete(&self, query: &str, _limit: usize) -> Result<Vec<Place>, Error> {
        self.autocomplete_calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.gates.lock().unwrap().get(query).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.autocomplete
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .ok_or_else(network_error)
    }
}

pub fn leg(seconds: f64, path: Vec<Coordinate>) -> RouteLeg {
    RouteLeg {
        duration_seconds: seconds,
        path,
    }
}

pub struct FakeRouter {
    pub answers: Mutex<HashMap<TravelMode, Result<Option<RouteLeg>, Error>>>,
    pub gates: Mutex<HashMap<TravelMode, Arc<Notify>>>,
    pub started: Mutex<Vec<TravelMode>>,
    pub calls: AtomicUsize,
}

impl FakeRouter {
    /// Car 20 min, bike 35 min, foot 1h 2m, each with its own path.
    pub fn all_modes() -> Self {
        let mut answers = HashMap::new();
        answers.insert(
            TravelMode::Car,
            Ok(Some(leg(1200.0, vec![home(), coord(-0.125, 51.525), museum()]))),
        );
        answers.insert(
            TravelMode::Bike,
            Ok(Some(leg(2100.0, vec![home(), coord(-0.126, 51.526), museum()]))),
        );
        answers.insert(
            TravelMode::Foot,
            Ok(Some(leg(
                3725.0,
                vec![home(), coord(-0.127, 51.527), coord(-0.128, 51.522), museum()],
            ))),
        );

        Self {
            answers: Mutex::new(answers),
            gates: Mutex::new(HashMap::new()),
            started: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set(&self, mode: TravelMode, answer: Result<Option<RouteLeg>, Error>) {
        self.answers.lock().unwrap().insert(mode, answer);
    }

    /// Holds the answer for `mode` until the returned gate is notified.
    pub fn gate(&self, mode: TravelMode) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(mode, gate.clone());
        gate
    }

    /// Modes whose request has been issued, in issue order.
    pub fn started(&self) -> Vec<TravelMode> {
        self.started.lock().unwrap().clone()
    }
}

#[async_trait]
impl RouteEstimator for FakeRouter {
    async fn route(
        &self,
        _origin: Coordinate,
        _destination: Coordinate,
        mode: TravelMode,
    ) -> Result<Option<RouteLeg>, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.lock().unwrap().push(mode);

        let gate = self.gates.lock().unwrap().get(&mode).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.answers
            .lock()
            .unwrap()
            .get(&mode)
            .cloned()
            .unwrap_or(Ok(None))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum MapOp {
    Initialize(Coordinate, u8),
    Marker(Coordinate, String),
    Draw(PathHandle, usize, PathStyle),
    Remove(PathHandle),
    Fit(usize, u32),
    Teardown,
}

#[derive(Default)]
pub struct MapLog {
    pub ops: Vec<MapOp>,
    pub live: HashSet<PathHandle>,
    pub paths: HashMap<PathHandle, Vec<Coordinate>>,
    pub next: u64,
    pub handler: Option<ClickHandler>,
}

/// Test-side view of the recording map.
#[derive(Clone, Default)]
pub struct MapProbe(pub Arc<Mutex<MapLog>>);

impl MapProbe {
    pub fn ops(&self) -> Vec<MapOp> {
        self.0.lock().unwrap().ops.clone()
    }

    pub fn live_paths(&self) -> Vec<Vec<Coordinate>> {
        let log = self.0.lock().unwrap();
        let mut handles: Vec<_> = log.live.iter().copied().collect();
        handles.sort_by_key(|h| h.0);
        handles.iter().map(|h| log.paths[h].clone()).collect()
    }

    pub fn click(&self, coordinate: Coordinate) {
        let log = self.0.lock().unwrap();
        let handler = log.handler.as_ref().expect("map has no click handler");
        handler(coordinate);
    }
}

pub struct RecordingMap(pub MapProbe);

impl RecordingMap {
    fn log(&self) -> MutexGuard<'_, MapLog> {
        self.0 .0.lock().unwrap()
    }
}

impl MapView for RecordingMap {
    fn initialize(&mut self, center: Coordinate, zoom: u8) {
        self.log().ops.push(MapOp::Initialize(center, zoom));
    }

    fn set_marker(&mut self, coordinate: Coordinate, label: &str) {
        self.log()
            .ops
            .push(MapOp::Marker(coordinate, label.to_string()));
    }

    fn draw_path(&mut self, coordinates: &[Coordinate], style: &PathStyle) -> PathHandle {
        let mut log = self.log();
        log.next += 1;
        let handle = PathHandle(log.next);
        log.live.insert(handle);
        log.paths.insert(handle, coordinates.to_vec());
        log.ops
            .push(MapOp::Draw(handle, coordinates.len(), style.clone()));
        handle
    }

    fn remove_path(&mut self, handle: PathHandle) {
        let mut log = self.log();
        assert!(log.live.remove(&handle), "removed a path that was not drawn");
        log.ops.push(MapOp::Remove(handle));
    }

    fn fit_to_bounds(&mut self, coordinates: &[Coordinate], padding: u32) {
        self.log().ops.push(MapOp::Fit(coordinates.len(), padding));
    }

    fn on_click(&mut self, handler: ClickHandler) {
        self.log().handler = Some(handler);
    }

    fn teardown(&mut self) {
        let mut log = self.log();
        log.handler = None;
        log.ops.push(MapOp::Teardown);
    }
}

/// Memory storage the test can still read after handing it to the engine.
#[derive(Clone, Default)]
pub struct SharedStorage {
    pub inner: Arc<MemoryStorage>,
    pub writes: Arc<AtomicUsize>,
    pub fail_writes: Arc<std::sync::atomic::AtomicBool>,
}

impl SharedStorage {
    pub fn record(&self, key: &str) -> Option<String> {
        self.inner.get(key).unwrap()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl Storage for SharedStorage {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(storage_error("quota exceeded"));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value)
    }
}

pub struct Harness {
    pub engine: Engine,
    pub geocoder: Arc<FakeGeocoder>,
    pub router: Arc<FakeRouter>,
    pub map: MapProbe,
    pub storage: SharedStorage,
    pub events: async_channel::Receiver<Event>,
}

pub struct HarnessBuilder {
    pub config: Config,
    pub position: Result<Coordinate, Error>,
    pub geocoder: FakeGeocoder,
    pub router: FakeRouter,
    pub storage: SharedStorage,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        let geocoder = FakeGeocoder::with_address("King's Cross, London");
        geocoder.add_search("British Museum", vec![Place::new(museum(), "British Museum, London")]);

        Self {
            config: Config::for_testing(),
            position: Ok(home()),
            geocoder,
            router: FakeRouter::all_modes(),
            storage: SharedStorage::default(),
        }
    }

    pub fn denied(mut self) -> Self {
        self.position = Err(permission_denied_error());
        self
    }

    pub fn build(self) -> Harness {
        let geocoder = Arc::new(self.geocoder);
        let router = Arc::new(self.router);
        let map = MapProbe::default();

        let engine = Engine::new(
            self.config,
            Collaborators {
                position: Arc::new(FakePosition(self.position)),
                geocoder: geocoder.clone(),
                router: router.clone(),
                storage: Box::new(self.storage.clone()),
                map: Box::new(RecordingMap(map.clone())),
            },
        );
        let events = engine.subscribe();

        Harness {
            engine,
            geocoder,
            router,
            map,
            storage: self.storage,
            events,
        }
    }
}

impl Harness {
    pub fn drain_events(&self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    /// Started session with "British Museum" typed in the destination field.
    pub async fn located_with_destination(self) -> Self {
        self.engine.start().await;
        self.geocoder.add_autocomplete("British Museum", Vec::new());
        self.engine.set_destination("British Museum").await;
        self.drain_events();
        self
    }
}
