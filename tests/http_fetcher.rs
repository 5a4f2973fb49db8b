mod common;

use std::time::Duration;

use iptv_catalog::errors::FetchError;
use iptv_catalog::models::SourceUrl;
use iptv_catalog::sources::{HttpFetcher, PlaylistFetcher};

use common::{NEWS_PLAYLIST, closed_port, spawn_playlist_server};

#[tokio::test]
async fn test_ok_response_returns_body_verbatim() {
    let addr = spawn_playlist_server().await;
    let fetcher = HttpFetcher::with_timeout(Duration::from_secs(5)).unwrap();

    let body = fetcher
        .fetch(&SourceUrl::new(format!("http://{addr}/news.m3u")))
        .await
        .unwrap();

    assert_eq!(body, NEWS_PLAYLIST);
}

#[tokio::test]
async fn test_not_found_is_a_status_failure() {
    let addr = spawn_playlist_server().await;
    let fetcher = HttpFetcher::with_timeout(Duration::from_secs(5)).unwrap();
    let url = format!("http://{addr}/missing.m3u");

    let err = fetcher.fetch(&SourceUrl::new(url.clone())).await.unwrap_err();

    assert_eq!(err, FetchError::Status { url, status: 404 });
}

#[tokio::test]
async fn test_other_success_codes_are_failures() {
    let addr = spawn_playlist_server().await;
    let fetcher = HttpFetcher::with_timeout(Duration::from_secs(5)).unwrap();

    let err = fetcher
        .fetch(&SourceUrl::new(format!("http://{addr}/accepted.m3u")))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 202, .. }));
}

#[tokio::test]
async fn test_redirect_to_playlist_is_followed() {
    let addr = spawn_playlist_server().await;
    let fetcher = HttpFetcher::with_timeout(Duration::from_secs(5)).unwrap();

    let body = fetcher
        .fetch(&SourceUrl::new(format!("http://{addr}/redirect.m3u")))
        .await
        .unwrap();

    assert_eq!(body, NEWS_PLAYLIST);
}

#[tokio::test]
async fn test_refused_connection_is_unreachable() {
    let addr = closed_port().await;
    let fetcher = HttpFetcher::with_timeout(Duration::from_secs(5)).unwrap();
    let url = format!("http://{addr}/news.m3u");

    let err = fetcher.fetch(&SourceUrl::new(url.clone())).await.unwrap_err();

    assert!(matches!(err, FetchError::Unreachable { .. }));
    assert_eq!(err.url(), url);
}

#[tokio::test]
async fn test_slow_source_times_out() {
    let addr = spawn_playlist_server().await;
    let fetcher = HttpFetcher::with_timeout(Duration::from_millis(200)).unwrap();

    let err = fetcher
        .fetch(&SourceUrl::new(format!("http://{addr}/slow.m3u")))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Unreachable { .. }));
}

#[tokio::test]
async fn test_malformed_url_is_unreachable() {
    let fetcher = HttpFetcher::with_timeout(Duration::from_secs(1)).unwrap();

    let err = fetcher.fetch(&SourceUrl::from("not a url")).await.unwrap_err();

    assert!(matches!(err, FetchError::Unreachable { .. }));
}
