#![allow(dead_code)]

use axum::{Router, http::StatusCode, routing::get};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

pub const NEWS_PLAYLIST: &str = "#EXTM3U\n#EXTGRP:News\n#EXTINF:-1,BBC One\nhttp://stream/1\n#EXTINF:-1,CNN\nhttp://stream/2\n";

/// Local playlist server. `/news.m3u` serves a playlist, `/missing.m3u`
/// answers 404, `/empty.m3u` answers 200 with no body, `/accepted.m3u`
/// answers 202 with a body, `/redirect.m3u` points at the news playlist and
/// `/slow.m3u` stalls.
pub async fn spawn_playlist_server() -> SocketAddr {
    let app = Router::new()
        .route("/news.m3u", get(|| async { NEWS_PLAYLIST }))
        .route("/missing.m3u", get(|| async { StatusCode::NOT_FOUND }))
        .route("/empty.m3u", get(|| async { "" }))
        .route(
            "/redirect.m3u",
            get(|| async { (StatusCode::FOUND, [("location", "/news.m3u")]) }),
        )
        .route("/accepted.m3u", get(|| async { (StatusCode::ACCEPTED, NEWS_PLAYLIST) }))
        .route(
            "/slow.m3u",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                NEWS_PLAYLIST
            }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// An address nothing listens on
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
