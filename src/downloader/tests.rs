use crate::config::{Config, DownloadConfig};
use crate::downloader::{WikiDownloader, download_all};
use crate::error::{DownloadError, Error};
use crate::types::Event;
use tempfile::TempDir;
use tokio::sync::broadcast;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mount a GET mock serving `body` at `route`
async fn serve_bytes(server: &MockServer, route: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

fn test_config(server: &MockServer, download_dir: &TempDir) -> Config {
    Config {
        dump_base_url: server.uri(),
        download: DownloadConfig {
            download_dir: download_dir.path().to_path_buf(),
            max_concurrent_downloads: 2,
        },
        ..Config::default()
    }
}

#[tokio::test]
async fn test_download_all_two_hrefs_sequentially() {
    let server = MockServer::start().await;
    serve_bytes(&server, "/shard1.bz2", b"first shard contents").await;
    serve_bytes(&server, "/shard2.bz2", b"second shard contents").await;

    let dir = TempDir::new().unwrap();
    let client = reqwest::Client::new();
    let (event_tx, _event_rx) = broadcast::channel(64);
    let hrefs = vec!["shard1.bz2".to_string(), "shard2.bz2".to_string()];

    let report = download_all(&client, &hrefs, &server.uri(), dir.path(), 1, &event_tx).await;

    assert!(report.is_success());
    assert_eq!(report.total(), 2);
    assert_eq!(
        std::fs::read(dir.path().join("shard1.bz2")).unwrap(),
        b"first shard contents"
    );
    assert_eq!(
        std::fs::read(dir.path().join("shard2.bz2")).unwrap(),
        b"second shard contents"
    );
}

#[tokio::test]
async fn test_download_all_middle_task_failure_is_fail_soft() {
    let server = MockServer::start().await;
    serve_bytes(&server, "/a.bz2", b"aaa").await;
    // b.bz2 is not mounted: the server answers 404
    serve_bytes(&server, "/c.bz2", b"ccc").await;

    let dir = TempDir::new().unwrap();
    let client = reqwest::Client::new();
    let (event_tx, _event_rx) = broadcast::channel(64);
    let hrefs = vec![
        "a.bz2".to_string(),
        "b.bz2".to_string(),
        "c.bz2".to_string(),
    ];

    let report = download_all(&client, &hrefs, &server.uri(), dir.path(), 3, &event_tx).await;

    // Task 2 failed; siblings completed and their files are intact
    assert_eq!(report.total(), 3);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "b.bz2");
    match &report.failures[0].error {
        Error::Download(DownloadError::HttpStatus { href, status }) => {
            assert_eq!(href, "b.bz2");
            assert_eq!(*status, 404);
        }
        other => panic!("expected HttpStatus, got {:?}", other),
    }
    assert_eq!(std::fs::read(dir.path().join("a.bz2")).unwrap(), b"aaa");
    assert_eq!(std::fs::read(dir.path().join("c.bz2")).unwrap(), b"ccc");
    assert!(!dir.path().join("b.bz2").exists());
}

#[tokio::test]
async fn test_download_all_emits_progress_events() {
    let server = MockServer::start().await;
    serve_bytes(&server, "/only.bz2", b"0123456789").await;

    let dir = TempDir::new().unwrap();
    let client = reqwest::Client::new();
    let (event_tx, mut event_rx) = broadcast::channel(64);
    let hrefs = vec!["only.bz2".to_string()];

    let report = download_all(&client, &hrefs, &server.uri(), dir.path(), 1, &event_tx).await;
    assert!(report.is_success());

    let mut saw_started = false;
    let mut last_received = 0;
    let mut saw_complete = false;
    while let Ok(event) = event_rx.try_recv() {
        match event {
            Event::DownloadStarted { href, total_bytes } => {
                assert_eq!(href, "only.bz2");
                assert_eq!(total_bytes, Some(10));
                saw_started = true;
            }
            Event::DownloadProgress { bytes_received, .. } => {
                // Counters only ever grow
                assert!(bytes_received >= last_received);
                last_received = bytes_received;
            }
            Event::DownloadComplete {
                href,
                bytes_received,
            } => {
                assert_eq!(href, "only.bz2");
                assert_eq!(bytes_received, 10);
                saw_complete = true;
            }
            _ => {}
        }
    }
    assert!(saw_started);
    assert!(saw_complete);
    assert_eq!(last_received, 10);
}

#[tokio::test]
async fn test_download_pipeline_end_to_end() {
    let server = MockServer::start().await;

    let index_body = r#"<html><body>
        <a href="enwiki-latest-pages-articles1.xml-p1p2.bz2">1</a>
        <a href="enwiki-latest-pages-articles2.xml-p3p4.bz2">2</a>
        <a href="enwiki-latest-md5sums.txt">sums</a>
        </body></html>"#;
    Mock::given(method("GET"))
        .and(path("/enwiki/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_body))
        .mount(&server)
        .await;
    serve_bytes(
        &server,
        "/enwiki/latest/enwiki-latest-pages-articles1.xml-p1p2.bz2",
        b"shard one",
    )
    .await;
    serve_bytes(
        &server,
        "/enwiki/latest/enwiki-latest-pages-articles2.xml-p3p4.bz2",
        b"shard two",
    )
    .await;

    let dir = TempDir::new().unwrap();
    let downloader = WikiDownloader::new(test_config(&server, &dir)).unwrap();

    let report = downloader.download("en", "latest").await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.total(), 2);
    assert_eq!(
        std::fs::read(dir.path().join("enwiki-latest-pages-articles1.xml-p1p2.bz2")).unwrap(),
        b"shard one"
    );
    assert_eq!(
        std::fs::read(dir.path().join("enwiki-latest-pages-articles2.xml-p3p4.bz2")).unwrap(),
        b"shard two"
    );
    // The checksum file matched no pattern and was not downloaded
    assert!(!dir.path().join("enwiki-latest-md5sums.txt").exists());
}

#[tokio::test]
async fn test_download_no_matching_archives_is_a_no_op() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/enwiki/latest"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><a href=\"../\">up</a></body></html>"),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let downloader = WikiDownloader::new(test_config(&server, &dir)).unwrap();

    let report = downloader.download("en", "latest").await.unwrap();
    assert!(report.is_success());
    assert_eq!(report.total(), 0);
}

#[tokio::test]
async fn test_download_index_fetch_failure_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/enwiki/20990101"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let downloader = WikiDownloader::new(test_config(&server, &dir)).unwrap();

    let err = downloader.download("en", "20990101").await.unwrap_err();
    assert!(matches!(err, Error::IndexFetch { .. }));
    // No file tasks were dispatched
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_new_rejects_invalid_base_url() {
    let config = Config {
        dump_base_url: "not a url".to_string(),
        ..Config::default()
    };
    let err = WikiDownloader::new(config).unwrap_err();
    match err {
        Error::Config { key, .. } => assert_eq!(key.as_deref(), Some("dump_base_url")),
        other => panic!("expected Config error, got {:?}", other),
    }
}
