pub mod config;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod model;
pub mod view;

pub use config::LoaderConfig;
pub use engine::renderer::GeoJsonRenderer;
pub use engine::{FeatureLayer, GeometryRenderer, LayerKind, PathStyle, Popup, RenderedLayer};
pub use error::LoaderError;
pub use fetch::{HttpFetcher, ResourceFetcher};
pub use loader::{GeoJsonLoader, load_geo_data};
pub use model::{GeoBounds, GeoPoint, LayerId, LoaderResult, ResourceRef};
pub use view::notify::{FailureNotifier, TracingNotifier};
pub use view::style::StyleDescriptor;
pub use view::view::{MapSurface, MapView};

use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber filtered by `RUST_LOG` (default `info`).
/// Later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
