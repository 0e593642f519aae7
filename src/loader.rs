//! Fetch, parse, render and attach a GeoJSON document.

use crate::config::LoaderConfig;
use crate::engine::GeometryRenderer;
use crate::engine::popup::bind_property_popup;
use crate::engine::renderer::GeoJsonRenderer;
use crate::error::LoaderError;
use crate::fetch::{HttpFetcher, ResourceFetcher};
use crate::model::{LayerId, LoaderResult, ResourceRef};
use crate::view::notify::{FailureNotifier, TracingNotifier};
use crate::view::style::StyleDescriptor;
use crate::view::view::MapSurface;
use geojson::JsonValue;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

pub const FAILURE_LOG_PREFIX: &str = "Error loading GeoJSON: ";
pub const FAILURE_ALERT_PREFIX: &str = "Error loading the file: ";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn strip_bom(body: &[u8]) -> &[u8] {
    body.strip_prefix(UTF8_BOM).unwrap_or(body)
}

/// Loads GeoJSON documents onto map surfaces.
///
/// The loader holds no per-load state: every call fetches, renders and
/// attaches an independent layer, so repeated calls add repeated layers.
pub struct GeoJsonLoader<F, R = GeoJsonRenderer, N = TracingNotifier> {
    fetcher: F,
    renderer: R,
    notifier: N,
}

impl GeoJsonLoader<HttpFetcher> {
    pub fn new(config: &LoaderConfig) -> LoaderResult<Self> {
        Ok(GeoJsonLoader::with_parts(
            HttpFetcher::new(config)?,
            GeoJsonRenderer,
            TracingNotifier,
        ))
    }
}

impl<F, R, N> GeoJsonLoader<F, R, N>
where
    F: ResourceFetcher,
    R: GeometryRenderer,
    N: FailureNotifier,
{
    pub fn with_parts(fetcher: F, renderer: R, notifier: N) -> Self {
        GeoJsonLoader {
            fetcher,
            renderer,
            notifier,
        }
    }

    /// Loads `resource` onto `surface`, styled with `style` or the default
    /// descriptor. Any failure is reported through the failure handler before
    /// being returned; on failure the surface is left untouched.
    pub async fn load_geo_data<S>(
        &self,
        resource: &str,
        surface: &S,
        style: Option<StyleDescriptor>,
    ) -> LoaderResult<LayerId>
    where
        S: MapSurface + ?Sized,
    {
        match self.try_load(resource, surface, style).await {
            Ok(id) => Ok(id),
            Err(err) => {
                self.report_failure(&err);
                Err(err)
            }
        }
    }

    async fn try_load<S>(
        &self,
        resource: &str,
        surface: &S,
        style: Option<StyleDescriptor>,
    ) -> LoaderResult<LayerId>
    where
        S: MapSurface + ?Sized,
    {
        let resource = ResourceRef::parse(resource)?;
        let body = self.fetcher.fetch(&resource).await?;
        let document: JsonValue = serde_json::from_slice(strip_bom(&body))?;

        let style = StyleDescriptor::effective(style);
        let layer = self.renderer.render(document, &style, bind_property_popup)?;
        let feature_count = layer.len();
        let bounds = layer.bounds();

        let id = surface.add_layer(layer);

        // Fitting the view to the layer bounds is disabled; keep the caller's view.
        debug!(?bounds, "Viewport left unchanged");

        info!(
            resource = %resource,
            layer = id,
            features = feature_count,
            "GeoJSON loaded successfully"
        );
        Ok(id)
    }

    /// Terminal failure path shared by every load error.
    pub fn report_failure(&self, err: &LoaderError) {
        error!("{}{}", FAILURE_LOG_PREFIX, err);
        self.notifier
            .notify(&format!("{}{}", FAILURE_ALERT_PREFIX, err));
    }
}

impl<F, R, N> GeoJsonLoader<F, R, N>
where
    F: ResourceFetcher + 'static,
    R: GeometryRenderer + 'static,
    N: FailureNotifier + 'static,
{
    /// Fire-and-forget load on the current tokio runtime. The handle may be
    /// dropped; failures are still reported through the failure handler.
    ///
    /// Called outside a runtime, nothing is spawned and the failure is
    /// reported and returned as [`LoaderError::Runtime`].
    pub fn spawn_load<S>(
        self: Arc<Self>,
        resource: impl Into<String>,
        surface: Arc<S>,
        style: Option<StyleDescriptor>,
    ) -> LoaderResult<JoinHandle<LoaderResult<LayerId>>>
    where
        S: MapSurface + 'static,
    {
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                let err = LoaderError::Runtime(e.to_string());
                self.report_failure(&err);
                return Err(err);
            }
        };

        let resource = resource.into();
        Ok(runtime.spawn(async move {
            self.load_geo_data(&resource, surface.as_ref(), style).await
        }))
    }
}

/// Loads `resource` onto `surface` with an HTTP fetcher built from the
/// default configuration.
pub async fn load_geo_data<S>(
    resource: &str,
    surface: &S,
    style: Option<StyleDescriptor>,
) -> LoaderResult<LayerId>
where
    S: MapSurface + ?Sized,
{
    let loader = match GeoJsonLoader::new(&LoaderConfig::default()) {
        Ok(loader) => loader,
        Err(err) => {
            error!("{}{}", FAILURE_LOG_PREFIX, err);
            TracingNotifier.notify(&format!("{}{}", FAILURE_ALERT_PREFIX, err));
            return Err(err);
        }
    };
    loader.load_geo_data(resource, surface, style).await
}
