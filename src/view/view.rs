use crate::engine::RenderedLayer;
use crate::error::LoaderError;
use crate::model::{GeoPoint, LayerId, LoaderResult};
use dashmap::DashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

pub const MAX_ZOOM: f64 = 20.0;
pub const DEFAULT_ZOOM: f64 = 13.0;
pub const DEFAULT_CENTER: GeoPoint = GeoPoint {
    lat: 4.629148723033761,
    lng: -74.06547217080218,
};

/// Rendering surface that loaded layers are attached to.
///
/// `add_layer` only appends, so independent loads may call it concurrently.
pub trait MapSurface: Send + Sync {
    fn add_layer(&self, layer: RenderedLayer) -> LayerId;
    fn set_view(&self, center: GeoPoint, zoom: f64) -> LoaderResult<()>;
    fn view(&self) -> (GeoPoint, f64);
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ViewState {
    center: GeoPoint,
    zoom: f64,
}

/// In-memory map surface keeping attached layers in insertion order.
pub struct MapView {
    id: i32,
    layers: DashMap<LayerId, RenderedLayer>,
    next_layer_id: AtomicU64,
    view: RwLock<ViewState>,
}

impl Default for MapView {
    fn default() -> Self {
        MapView::new(0, DEFAULT_CENTER, DEFAULT_ZOOM)
    }
}

impl MapView {
    pub fn new(id: i32, center: GeoPoint, zoom: f64) -> Self {
        MapView {
            id,
            layers: DashMap::new(),
            next_layer_id: AtomicU64::new(1),
            view: RwLock::new(ViewState {
                center,
                zoom: zoom.clamp(0.0, MAX_ZOOM),
            }),
        }
    }

    pub fn center(&self) -> GeoPoint {
        self.view().0
    }

    pub fn zoom(&self) -> f64 {
        self.view().1
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, id: LayerId) -> Option<RenderedLayer> {
        self.layers.get(&id).map(|entry| entry.value().clone())
    }

    /// Attached layers, oldest first.
    pub fn layers(&self) -> Vec<RenderedLayer> {
        let mut entries: Vec<(LayerId, RenderedLayer)> = self
            .layers
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        entries.sort_by_key(|(id, _)| *id);
        entries.into_iter().map(|(_, layer)| layer).collect()
    }
}

impl MapSurface for MapView {
    fn add_layer(&self, layer: RenderedLayer) -> LayerId {
        let id = self.next_layer_id.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            "Map {} attached layer {} with {} features",
            self.id,
            id,
            layer.len()
        );
        self.layers.insert(id, layer);
        id
    }

    fn set_view(&self, center: GeoPoint, zoom: f64) -> LoaderResult<()> {
        if !center.is_valid() {
            return Err(LoaderError::View("Invalid center coordinates".to_string()));
        }
        if !(0.0..=MAX_ZOOM).contains(&zoom) {
            return Err(LoaderError::View(format!(
                "Zoom must be between 0 and {}",
                MAX_ZOOM
            )));
        }

        let mut view = self.view.write().unwrap_or_else(|e| e.into_inner());
        *view = ViewState { center, zoom };
        Ok(())
    }

    fn view(&self) -> (GeoPoint, f64) {
        let view = self.view.read().unwrap_or_else(|e| e.into_inner());
        (view.center, view.zoom)
    }
}
