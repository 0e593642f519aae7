use crate::engine::geometry::layer_kind;
use crate::engine::{FeatureHook, FeatureLayer, GeometryRenderer, LayerKind, PathStyle, RenderedLayer};
use crate::model::{LoaderResult, into_feature_collection};
use crate::view::style::StyleDescriptor;
use geojson::JsonValue;

// Path defaults applied for fields a style descriptor leaves unset
pub const DEFAULT_PATH_COLOR: &str = "#3388ff";
pub const DEFAULT_PATH_WEIGHT: f64 = 3.0;
pub const DEFAULT_PATH_OPACITY: f64 = 1.0;
pub const DEFAULT_FILL_OPACITY: f64 = 0.2;

impl PathStyle {
    /// Resolves each field independently; an unset fill color follows the stroke color.
    pub fn resolve(style: &StyleDescriptor) -> PathStyle {
        let color = style
            .color
            .clone()
            .unwrap_or_else(|| DEFAULT_PATH_COLOR.to_string());
        let fill_color = style.fill_color.clone().unwrap_or_else(|| color.clone());

        PathStyle {
            weight: style.weight.unwrap_or(DEFAULT_PATH_WEIGHT),
            opacity: style.opacity.unwrap_or(DEFAULT_PATH_OPACITY),
            fill_opacity: style.fill_opacity.unwrap_or(DEFAULT_FILL_OPACITY),
            color,
            fill_color,
        }
    }
}

/// Renderer turning GeoJSON documents into marker and path layers.
#[derive(Clone, Copy, Debug, Default)]
pub struct GeoJsonRenderer;

impl GeometryRenderer for GeoJsonRenderer {
    fn render(
        &self,
        document: JsonValue,
        style: &StyleDescriptor,
        on_each_feature: FeatureHook,
    ) -> LoaderResult<RenderedLayer> {
        let collection = into_feature_collection(document)?;
        let path_style = PathStyle::resolve(style);

        let mut features = Vec::with_capacity(collection.features.len());
        for feature in &collection.features {
            let Some(geometry) = &feature.geometry else {
                tracing::trace!("Skipping feature without geometry");
                continue;
            };

            let kind = layer_kind(&geometry.value);
            let feature_style = match kind {
                LayerKind::Marker => None,
                _ => Some(path_style.clone()),
            };
            let mut layer = FeatureLayer::new(
                kind,
                geometry.clone(),
                feature_style,
                feature.properties.clone(),
            );
            on_each_feature(feature, &mut layer);
            features.push(layer);
        }

        tracing::debug!(
            "Rendered {} of {} features",
            features.len(),
            collection.features.len()
        );
        Ok(RenderedLayer::new(features, path_style))
    }
}
