/// User-facing channel for load failures.
pub trait FailureNotifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Notifier for headless hosts: the alert becomes a warning event on the
/// `geojson_loader::alert` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl FailureNotifier for TracingNotifier {
    fn notify(&self, message: &str) {
        tracing::warn!(target: "geojson_loader::alert", "{}", message);
    }
}
