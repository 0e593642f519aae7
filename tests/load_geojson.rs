use geojson_loader::{
    FailureNotifier, GeoJsonLoader, GeoJsonRenderer, GeoPoint, HttpFetcher, LoaderConfig,
    LoaderError, MapSurface, MapView, StyleDescriptor,
};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const STOPS: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [-74.0654, 4.6291] },
            "properties": { "k1": "v1", "k2": "v2" }
        },
        {
            "type": "Feature",
            "geometry": {
                "type": "LineString",
                "coordinates": [[-74.08, 4.60], [-74.05, 4.65]]
            },
            "properties": {}
        }
    ]
}"#;

#[derive(Clone, Default)]
struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl FailureNotifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Serves every connection with the same canned response; returns the document URL.
async fn serve(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}/paraderos-sitp.geojson", addr)
}

fn loader(
    config: LoaderConfig,
) -> (
    GeoJsonLoader<HttpFetcher, GeoJsonRenderer, RecordingNotifier>,
    RecordingNotifier,
) {
    let notifier = RecordingNotifier::default();
    let fetcher = HttpFetcher::new(&config.with_system_proxy(false)).unwrap();
    (
        GeoJsonLoader::with_parts(fetcher, GeoJsonRenderer, notifier.clone()),
        notifier,
    )
}

#[tokio::test]
async fn http_load_renders_popups_and_keeps_view() {
    let url = serve("200 OK", STOPS).await;
    let (loader, notifier) = loader(LoaderConfig::default());
    let map = MapView::default();
    let view_before = map.view();

    let id = loader.load_geo_data(&url, &map, None).await.unwrap();

    let layer = map.layer(id).unwrap();
    assert_eq!(layer.len(), 2);
    assert_eq!(layer.popup_count(), 1);
    let popup = layer.features()[0].popup().unwrap().content();
    assert!(popup.starts_with("<b>Properties:</b><br>"));
    assert!(popup.find("k1: v1").unwrap() < popup.find("k2: v2").unwrap());
    assert_eq!(map.view(), view_before);
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn http_404_reports_fetch_failure() {
    let url = serve("404 Not Found", "").await;
    let (loader, notifier) = loader(LoaderConfig::default());
    let map = MapView::default();

    let err = loader.load_geo_data(&url, &map, None).await.unwrap_err();

    assert!(matches!(err, LoaderError::Fetch));
    assert!(err.to_string().contains("Could not load the GeoJSON file"));
    assert_eq!(map.layer_count(), 0);
    assert_eq!(
        notifier.messages(),
        vec!["Error loading the file: Could not load the GeoJSON file.".to_string()]
    );
}

#[tokio::test]
async fn http_non_json_body_reports_parse_failure() {
    let url = serve("200 OK", "<!doctype html><p>maintenance</p>").await;
    let (loader, notifier) = loader(LoaderConfig::default());
    let map = MapView::default();

    let err = loader.load_geo_data(&url, &map, None).await.unwrap_err();

    assert!(matches!(err, LoaderError::Parse(_)));
    assert_eq!(map.layer_count(), 0);
    assert_eq!(notifier.messages().len(), 1);
}

#[tokio::test]
async fn local_file_with_style_override() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("stops.geojson"), STOPS)
        .await
        .unwrap();
    let (loader, _) = loader(LoaderConfig::default().with_base_dir(dir.path()));
    let map = MapView::default();
    let style: StyleDescriptor =
        serde_json::from_str(r#"{"color":"red","weight":3,"fillColor":"orange"}"#).unwrap();

    let id = loader
        .load_geo_data("stops.geojson", &map, Some(style))
        .await
        .unwrap();

    let layer = map.layer(id).unwrap();
    let line_style = layer.features()[1].style.clone().unwrap();
    assert_eq!(line_style.color, "red");
    assert_eq!(line_style.weight, 3.0);
    assert_eq!(line_style.fill_color, "orange");
    assert_eq!(line_style.opacity, 1.0);
    assert_eq!(line_style.fill_opacity, 0.2);
}

#[tokio::test]
async fn bom_prefixed_local_file_loads() {
    let dir = tempfile::tempdir().unwrap();
    let mut contents = b"\xEF\xBB\xBF".to_vec();
    contents.extend_from_slice(STOPS.as_bytes());
    tokio::fs::write(dir.path().join("bom.geojson"), contents)
        .await
        .unwrap();
    let (loader, notifier) = loader(LoaderConfig::default().with_base_dir(dir.path()));
    let map = MapView::default();

    let id = loader.load_geo_data("bom.geojson", &map, None).await.unwrap();

    assert_eq!(map.layer(id).unwrap().len(), 2);
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn missing_local_file_matches_http_404() {
    let dir = tempfile::tempdir().unwrap();
    let (loader, notifier) = loader(LoaderConfig::default().with_base_dir(dir.path()));
    let map = MapView::default();

    let err = loader
        .load_geo_data("nowhere.geojson", &map, None)
        .await
        .unwrap_err();

    assert!(matches!(err, LoaderError::Fetch));
    assert_eq!(map.layer_count(), 0);
    assert_eq!(notifier.messages().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_loads_share_one_surface() {
    let url = serve("200 OK", STOPS).await;
    let (loader, _) = loader(LoaderConfig::default());
    let loader = Arc::new(loader);
    let map = Arc::new(MapView::new(7, GeoPoint::new(4.6, -74.0), 11.0));

    let handles: Vec<_> = (0..3)
        .map(|_| {
            Arc::clone(&loader)
                .spawn_load(url.clone(), Arc::clone(&map), None)
                .unwrap()
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(map.layer_count(), 3);
    assert!(map.layers().iter().all(|layer| layer.len() == 2));
    assert_eq!(map.view(), (GeoPoint::new(4.6, -74.0), 11.0));
}

#[tokio::test]
async fn default_entry_point_loads_absolute_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stops.geojson");
    tokio::fs::write(&path, STOPS).await.unwrap();
    let map = MapView::default();

    let id = geojson_loader::load_geo_data(path.to_str().unwrap(), &map, None)
        .await
        .unwrap();

    assert_eq!(map.layer(id).unwrap().style().weight, 2.0);
}
