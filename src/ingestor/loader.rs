//! Concurrent catalog population
//!
//! Fetches run as a bounded fan-out (`buffer_unordered`) inside the calling
//! task. Results are drained by a single loop that parses the body, installs
//! the entry and then bumps the completion counter, so progress events are
//! strictly increasing whichever source finishes first.

use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::LoadReport;
use crate::catalog::Catalog;
use crate::config::IngestionConfig;
use crate::errors::{FetchResult, LoadError, LoadResult};
use crate::models::{Channel, ChannelList, Progress, SourceUrl, is_failure};
use crate::sources::{PlaylistFetcher, parse_playlist};
use crate::utils::UrlUtils;

/// Receiving end is optional; a dropped receiver just stops the reporting
pub type ProgressSender = mpsc::UnboundedSender<Progress>;

pub struct CatalogLoader<F> {
    fetcher: F,
    max_concurrent: usize,
    failure_label: String,
}

impl<F: PlaylistFetcher> CatalogLoader<F> {
    pub fn new(fetcher: F, config: &IngestionConfig) -> Self {
        Self {
            fetcher,
            max_concurrent: config.max_concurrent_fetches.max(1),
            failure_label: config.failure_label.clone(),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Load every source into a fresh catalog.
    pub async fn load(
        &self,
        urls: &[SourceUrl],
        progress: Option<&ProgressSender>,
    ) -> LoadResult<(Catalog, LoadReport)> {
        let mut catalog = Catalog::new();
        let report = self
            .load_into(&mut catalog, urls, progress, &CancellationToken::new())
            .await?;
        Ok((catalog, report))
    }

    /// Clear `catalog` and populate it from `urls`.
    ///
    /// An empty `urls` fails with [`LoadError::NoSources`] before anything is
    /// fetched and before `catalog` is touched. Duplicate URLs are fetched
    /// once. A failed fetch becomes a placeholder entry and never stops the
    /// other sources. When `cancel` fires, in-flight fetches are dropped,
    /// entries installed so far stay as they are and no further progress is
    /// sent.
    pub async fn load_into(
        &self,
        catalog: &mut Catalog,
        urls: &[SourceUrl],
        progress: Option<&ProgressSender>,
        cancel: &CancellationToken,
    ) -> LoadResult<LoadReport> {
        if urls.is_empty() {
            return Err(LoadError::NoSources);
        }

        let sources = unique_in_order(urls);
        let total = sources.len();
        if total < urls.len() {
            debug!("Ignoring {} duplicate source URLs", urls.len() - total);
        }

        let started_at = Utc::now();
        let timer = Instant::now();
        catalog.begin_load(sources.iter().cloned());

        info!(
            "Loading {} playlist sources with up to {} concurrent fetches",
            total, self.max_concurrent
        );

        let mut fetches = stream::iter(sources)
            .map(|url| async move {
                let outcome = self.fetcher.fetch(&url).await;
                (url, outcome)
            })
            .buffer_unordered(self.max_concurrent);

        let mut completed = 0;
        let mut failed = 0;

        loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    warn!("Load cancelled after {} of {} sources", completed, total);
                    return Err(LoadError::Cancelled { completed, total });
                }
                next = fetches.next() => next,
            };

            let Some((url, outcome)) = next else {
                break;
            };

            let entry = self.entry_for(&url, outcome);
            if is_failure(&entry) {
                failed += 1;
            }
            catalog.install(url, entry);

            completed += 1;
            if let Some(tx) = progress {
                let _ = tx.send(Progress { completed, total });
            }
        }

        catalog.mark_loaded();

        let report = LoadReport {
            total,
            succeeded: total - failed,
            failed,
            started_at,
            elapsed: timer.elapsed(),
        };
        info!(
            "Loaded {} sources in {:.2}s: {} succeeded, {} failed",
            report.total,
            report.elapsed.as_secs_f64(),
            report.succeeded,
            report.failed
        );
        Ok(report)
    }

    /// Parsed channel list on success, failure placeholder otherwise
    fn entry_for(&self, url: &SourceUrl, outcome: FetchResult<String>) -> ChannelList {
        let display_url = UrlUtils::obfuscate_credentials(url.as_str());
        match outcome {
            Ok(content) => {
                let channels = parse_playlist(&content);
                info!("Source {} loaded with {} channels", display_url, channels.len());
                channels
            }
            Err(e) => {
                warn!(
                    "Source {} failed: {}",
                    display_url,
                    UrlUtils::obfuscate_credentials(&e.to_string())
                );
                vec![Channel::placeholder(self.failure_label.clone())]
            }
        }
    }
}

fn unique_in_order(urls: &[SourceUrl]) -> Vec<SourceUrl> {
    let mut seen = HashSet::new();
    urls.iter()
        .filter(|url| seen.insert(*url))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FetchError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use rstest::rstest;
    use tracing_test::traced_test;

    /// Serves canned bodies; unknown URLs fail. Optional per-URL delay.
    #[derive(Default)]
    struct StubFetcher {
        bodies: HashMap<String, String>,
        delays: HashMap<String, Duration>,
        calls: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        fn serve(mut self, url: &str, body: &str) -> Self {
            self.bodies.insert(url.to_string(), body.to_string());
            self
        }

        fn delay(mut self, url: &str, delay: Duration) -> Self {
            self.delays.insert(url.to_string(), delay);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PlaylistFetcher for StubFetcher {
        async fn fetch(&self, url: &SourceUrl) -> FetchResult<String> {
            self.calls.lock().unwrap().push(url.to_string());
            if let Some(delay) = self.delays.get(url.as_str()) {
                tokio::time::sleep(*delay).await;
            }
            self.bodies
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| FetchError::unreachable(url.as_str(), "connection refused"))
        }
    }

    /// Records how many fetches overlap. Every fetch sleeps, then succeeds.
    #[derive(Default)]
    struct PeakFetcher {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl PlaylistFetcher for PeakFetcher {
        async fn fetch(&self, _url: &SourceUrl) -> FetchResult<String> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(100)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok("#EXTINF:-1,X".to_string())
        }
    }

    fn loader(fetcher: StubFetcher) -> CatalogLoader<StubFetcher> {
        CatalogLoader::new(fetcher, &IngestionConfig::default())
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<Progress>) -> Vec<Progress> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_partial_failure_is_not_failure() {
        let loader = loader(StubFetcher::default().serve("b", "#EXTGRP:News\n#EXTINF:-1,BBC"));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let (catalog, report) = loader
            .load(&["a".into(), "b".into()], Some(&tx))
            .await
            .unwrap();

        assert_eq!(catalog.len(), 2);
        let a = catalog.get(&"a".into()).unwrap();
        assert_eq!(a.len(), 1);
        assert!(!a[0].available);
        assert_eq!(a[0].group, crate::config::defaults::DEFAULT_FAILURE_LABEL);
        assert_eq!(catalog.get(&"b".into()).unwrap(), &[Channel::new("News", "BBC")]);

        let events = drain(&mut rx);
        assert_eq!(
            events,
            vec![
                Progress { completed: 1, total: 2 },
                Progress { completed: 2, total: 2 },
            ]
        );
        assert_eq!((report.succeeded, report.failed), (1, 1));
    }

    #[tokio::test]
    async fn test_empty_input_is_rejected_before_anything_happens() {
        let loader = loader(StubFetcher::default());
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut catalog = Catalog::new();
        catalog.begin_load(vec![SourceUrl::from("kept")]);
        catalog.install("kept".into(), vec![]);

        let result = loader
            .load_into(&mut catalog, &[], Some(&tx), &CancellationToken::new())
            .await;

        assert_eq!(result.unwrap_err(), LoadError::NoSources);
        assert!(drain(&mut rx).is_empty());
        assert!(loader.fetcher().calls().is_empty());
        assert_eq!(catalog.len(), 1);
    }

    #[tokio::test]
    async fn test_fresh_catalog_stays_empty_on_no_sources() {
        let loader = loader(StubFetcher::default());
        assert_eq!(loader.load(&[], None).await.unwrap_err(), LoadError::NoSources);
    }

    #[tokio::test]
    async fn test_duplicates_are_fetched_once() {
        let loader = loader(StubFetcher::default().serve("a", "#EXTINF:-1,One"));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let (catalog, report) = loader
            .load(&["a".into(), "a".into()], Some(&tx))
            .await
            .unwrap();

        assert_eq!(loader.fetcher().calls(), vec!["a".to_string()]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(report.total, 1);
        assert_eq!(drain(&mut rx).last(), Some(&Progress { completed: 1, total: 1 }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_source_order_survives_out_of_order_completion() {
        let fetcher = StubFetcher::default()
            .serve("slow", "#EXTINF:-1,S")
            .serve("fast", "#EXTINF:-1,F")
            .delay("slow", Duration::from_secs(5));
        let loader = loader(fetcher);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let (catalog, _) = loader
            .load(&["slow".into(), "fast".into()], Some(&tx))
            .await
            .unwrap();

        let order: Vec<&str> = catalog.sources().map(SourceUrl::as_str).collect();
        assert_eq!(order, vec!["slow", "fast"]);

        let completed: Vec<usize> = drain(&mut rx).iter().map(|p| p.completed).collect();
        assert_eq!(completed, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_reload_replaces_previous_catalog() {
        let loader = loader(StubFetcher::default().serve("a", "#EXTINF:-1,A").serve("b", ""));
        let mut catalog = Catalog::new();
        let cancel = CancellationToken::new();

        loader.load_into(&mut catalog, &["a".into()], None, &cancel).await.unwrap();
        loader.load_into(&mut catalog, &["b".into()], None, &cancel).await.unwrap();

        assert!(catalog.get(&"a".into()).is_none());
        assert_eq!(catalog.get(&"b".into()).unwrap(), &[] as &[Channel]);
        assert!(catalog.loaded_at().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_progress_and_keeps_finished_entries() {
        let fetcher = StubFetcher::default()
            .serve("fast", "#EXTINF:-1,F")
            .serve("stuck", "#EXTINF:-1,S")
            .delay("stuck", Duration::from_secs(3600));
        let loader = loader(fetcher);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let mut catalog = Catalog::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            canceller.cancel();
        });

        let result = loader
            .load_into(&mut catalog, &["fast".into(), "stuck".into()], Some(&tx), &cancel)
            .await;

        assert_eq!(result.unwrap_err(), LoadError::Cancelled { completed: 1, total: 2 });
        assert_eq!(drain(&mut rx), vec![Progress { completed: 1, total: 2 }]);
        assert_eq!(catalog.get(&"fast".into()).unwrap(), &[Channel::new(crate::models::DEFAULT_GROUP, "F")]);
        assert!(catalog.get(&"stuck".into()).is_none());
        assert!(!catalog.is_complete());
    }

    #[tokio::test]
    async fn test_custom_failure_label() {
        let config = IngestionConfig {
            max_concurrent_fetches: 1,
            failure_label: "Błąd: nie można pobrać danych".to_string(),
        };
        let loader = CatalogLoader::new(StubFetcher::default(), &config);

        let (catalog, _) = loader.load(&["x".into()], None).await.unwrap();
        assert_eq!(
            catalog.get(&"x".into()).unwrap()[0].group,
            "Błąd: nie można pobrać danych"
        );
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(4)]
    #[tokio::test(start_paused = true)]
    async fn test_fetches_overlap_up_to_the_limit(#[case] limit: usize) {
        let config = IngestionConfig {
            max_concurrent_fetches: limit,
            ..IngestionConfig::default()
        };
        let loader = CatalogLoader::new(PeakFetcher::default(), &config);
        let urls: Vec<SourceUrl> = (0..10).map(|i| SourceUrl::new(format!("http://host/{i}"))).collect();

        let (catalog, report) = loader.load(&urls, None).await.unwrap();

        assert_eq!(loader.fetcher().peak.load(Ordering::SeqCst), limit);
        assert_eq!(loader.fetcher().in_flight.load(Ordering::SeqCst), 0);
        assert_eq!(report.succeeded, 10);
        assert!(catalog.is_complete());
    }

    #[tokio::test(start_paused = true)]
    async fn test_limit_above_source_count_fetches_everything_at_once() {
        let config = IngestionConfig {
            max_concurrent_fetches: 16,
            ..IngestionConfig::default()
        };
        let loader = CatalogLoader::new(PeakFetcher::default(), &config);
        let urls: Vec<SourceUrl> = (0..5).map(|i| SourceUrl::new(format!("http://host/{i}"))).collect();

        let started = tokio::time::Instant::now();
        loader.load(&urls, None).await.unwrap();

        assert_eq!(loader.fetcher().peak.load(Ordering::SeqCst), 5);
        assert!(started.elapsed() < Duration::from_millis(200));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_failure_logs_hide_credentials() {
        let loader = loader(StubFetcher::default());
        let url = SourceUrl::from("http://host/get.php?username=bob&password=hunter2");

        loader.load(&[url], None).await.unwrap();

        assert!(logs_contain("password=****"));
        assert!(!logs_contain("hunter2"));
    }

    #[test]
    fn test_unique_in_order() {
        let urls: Vec<SourceUrl> = ["c", "a", "c", "b", "a"].into_iter().map(SourceUrl::from).collect();
        let unique: Vec<String> = unique_in_order(&urls).iter().map(|u| u.to_string()).collect();
        assert_eq!(unique, vec!["c", "a", "b"]);
    }
}
