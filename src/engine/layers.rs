use std::collections::HashMap;

use crate::api::{ClickHandler, DynMapView};
use crate::entities::{Coordinate, Layer, PathHandle, PathStyle};

/// The map plus the one path the engine keeps per logical layer.
pub(crate) struct MapLayers {
    view: DynMapView,
    drawn: HashMap<Layer, PathHandle>,
    initialized: bool,
}

impl MapLayers {
    pub fn new(view: DynMapView) -> Self {
        Self {
            view,
            drawn: HashMap::new(),
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn initialize(&mut self, center: Coordinate, zoom: u8, on_click: ClickHandler) {
        self.view.initialize(center, zoom);
        self.view.on_click(on_click);
        self.initialized = true;
    }

    pub fn set_marker(&mut self, coordinate: Coordinate, label: &str) {
        self.view.set_marker(coordinate, label);
    }

    /// Draws `coordinates` on `layer`, removing whatever that layer showed before.
    pub fn replace(&mut self, layer: Layer, coordinates: &[Coordinate], style: &PathStyle) -> PathHandle {
        self.clear(layer);

        let handle = self.view.draw_path(coordinates, style);
        self.drawn.insert(layer, handle);
        handle
    }

    pub fn clear(&mut self, layer: Layer) {
        if let Some(handle) = self.drawn.remove(&layer) {
            self.view.remove_path(handle);
        }
    }

    pub fn fit(&mut self, coordinates: &[Coordinate], padding: u32) {
        if !coordinates.is_empty() {
            self.view.fit_to_bounds(coordinates, padding);
        }
    }

    pub fn is_drawn(&self, layer: Layer) -> bool {
        self.drawn.contains_key(&layer)
    }

    pub fn teardown(&mut self) {
        for (_, handle) in self.drawn.drain() {
            self.view.remove_path(handle);
        }

        if self.initialized {
            self.view.teardown();
            self.initialized = false;
        }
    }
}
