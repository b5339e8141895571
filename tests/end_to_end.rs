use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_test::block_on;

use mapzones::api::{CaptureAPI, MapAPI, RouteAPI, ZoneAPI};
use mapzones::capture::{CaptureDriver, CapturePool, Snapshot};
use mapzones::db::Store;
use mapzones::engine::Engine;
use mapzones::error::{Error, ErrorKind};
use mapzones::storage::ImageStore;

const CENTRO_URL: &str = "https://www.google.com/maps/@19.43,-99.13,15z";

struct BlankPage;

#[async_trait]
impl CaptureDriver for BlankPage {
    async fn capture(&self, _url: &str) -> Result<Snapshot, Error> {
        let mut bytes = Cursor::new(Vec::new());
        image::RgbImage::new(1280, 800)
            .write_to(&mut bytes, image::ImageFormat::Png)
            .unwrap();

        Ok(Snapshot {
            image: bytes.into_inner(),
            width: 1280,
            height: 800,
        })
    }
}

#[test]
fn capture_annotate_and_delete_map() {
    block_on(async {
        let store = Store::connect("sqlite::memory:", 1).await.unwrap();
        let public_dir = tempfile::tempdir().unwrap();
        let capture = Arc::new(CapturePool::new(Arc::new(BlankPage), 1));
        let engine = Engine::new(&store, capture, ImageStore::new(public_dir.path()));

        let map = engine.capture_and_store("CentroA", CENTRO_URL).await.unwrap();
        assert_eq!(map.dimensions(), Some((1280, 800)));

        let image = map.captured_image.clone().unwrap();
        assert!(image.starts_with("screenshots/"));
        assert!(public_dir.path().join(&image).is_file());

        let route = engine.create_route(map.id, "R1", "N").await.unwrap();
        let second = engine.add_zone(route.id, 30, 40, "B", 2).await.unwrap();
        let first = engine.add_zone(route.id, 10, 20, "A", 1).await.unwrap();

        let zones = engine.list_zones(route.id).await.unwrap();
        let ids: Vec<i64> = zones.iter().map(|zone| zone.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert_eq!(zones[0].position(), (10, 20));

        let detail = engine.find_route_detail(route.id).await.unwrap();
        assert_eq!(detail.map.id, map.id);
        assert_eq!(detail.zones.len(), 2);

        engine.delete_map(map.id).await.unwrap();

        let err = engine.find_route(route.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(engine.list_routes().await.unwrap().is_empty());
        assert!(engine.list_maps().await.unwrap().is_empty());

        store.close().await;
    });
}

#[test]
fn capture_rejects_foreign_url_without_writing() {
    block_on(async {
        let store = Store::connect("sqlite::memory:", 1).await.unwrap();
        let public_dir = tempfile::tempdir().unwrap();
        let engine = Engine::new(&store, Arc::new(BlankPage), ImageStore::new(public_dir.path()));

        let err = engine
            .capture_and_store("CentroA", "https://example.com/maps")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        assert!(engine.list_maps().await.unwrap().is_empty());
        assert!(!public_dir.path().join("screenshots").exists());

        store.close().await;
    });
}
