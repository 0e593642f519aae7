use crate::model::{GeoBounds, LoaderResult};
use crate::view::style::StyleDescriptor;
use geojson::{Feature, Geometry, JsonObject, JsonValue};

pub mod geometry;
pub mod popup;
pub mod renderer;

/// Callback run once per rendered feature, before the layer is attached.
pub type FeatureHook = fn(&Feature, &mut FeatureLayer);

/// Converts a parsed document into a layer a map surface can display.
pub trait GeometryRenderer: Send + Sync {
    fn render(
        &self,
        document: JsonValue,
        style: &StyleDescriptor,
        on_each_feature: FeatureHook,
    ) -> LoaderResult<RenderedLayer>;
}

/// Fully resolved stroke and fill attributes of a path layer.
#[derive(Clone, Debug, PartialEq)]
pub struct PathStyle {
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
    pub fill_color: String,
    pub fill_opacity: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    Marker,
    Polyline,
    Polygon,
    Collection,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Popup {
    content: String,
}

impl Popup {
    pub fn new(content: String) -> Self {
        Popup { content }
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Visual counterpart of a single feature.
#[derive(Clone, Debug)]
pub struct FeatureLayer {
    pub kind: LayerKind,
    pub geometry: Geometry,
    /// `None` for markers, which are not path-styled.
    pub style: Option<PathStyle>,
    pub properties: Option<JsonObject>,
    popup: Option<Popup>,
}

impl FeatureLayer {
    pub fn new(
        kind: LayerKind,
        geometry: Geometry,
        style: Option<PathStyle>,
        properties: Option<JsonObject>,
    ) -> Self {
        FeatureLayer {
            kind,
            geometry,
            style,
            properties,
            popup: None,
        }
    }

    pub fn bind_popup(&mut self, content: String) {
        self.popup = Some(Popup::new(content));
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    pub fn bounds(&self) -> Option<GeoBounds> {
        geometry::geometry_bounds(&self.geometry)
    }
}

/// Layer built from one document. Ownership passes to the map surface on attach.
#[derive(Clone, Debug)]
pub struct RenderedLayer {
    features: Vec<FeatureLayer>,
    style: PathStyle,
}

impl RenderedLayer {
    pub fn new(features: Vec<FeatureLayer>, style: PathStyle) -> Self {
        RenderedLayer { features, style }
    }

    pub fn features(&self) -> &[FeatureLayer] {
        &self.features
    }

    pub fn style(&self) -> &PathStyle {
        &self.style
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn popup_count(&self) -> usize {
        self.features.iter().filter(|f| f.popup().is_some()).count()
    }

    /// Union of every feature's bounds, `None` when nothing has coordinates.
    pub fn bounds(&self) -> Option<GeoBounds> {
        self.features
            .iter()
            .filter_map(FeatureLayer::bounds)
            .reduce(|acc, b| acc.union(&b))
    }
}
