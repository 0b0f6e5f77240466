//! TTL-bound snapshot cache with single-flight refresh and fallback policy.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::config::{DirectoryConfig, FallbackMode};
use crate::model::{FacilityRecord, Snapshot};
use crate::ports::{FacilitySource, SourceError};

#[derive(thiserror::Error, Debug)]
/// Why a refresh cycle did not produce an installable snapshot.
pub enum RefreshError {
    /// The upstream extraction itself failed.
    #[error(transparent)]
    Source(#[from] SourceError),
    /// Extraction succeeded but yielded implausibly few records.
    #[error("extraction produced {got} records, below the plausibility floor of {floor}")]
    Implausible {
        /// Number of records the cycle produced.
        got: usize,
        /// Configured minimum plausible count.
        floor: usize,
    },
}

#[derive(thiserror::Error, Debug)]
#[error("facility directory unavailable: {source}")]
/// Surfaced to callers in strict mode when no snapshot can be served.
pub struct ServiceUnavailable {
    /// The refresh failure that made the directory unavailable.
    #[from]
    pub source: RefreshError,
}

/// Owns the single live [`Snapshot`] and decides when to re-extract.
///
/// State machine: empty → fresh → stale → (refresh) → fresh, or
/// (refresh fails) → degraded per [`FallbackMode`]. The snapshot is
/// replaced atomically under a write lock; readers clone an `Arc` and
/// never observe a partial update. The refresh gate guarantees at most
/// one extraction cycle is in flight regardless of caller count, and a
/// refresh abandoned mid-flight leaves the previous snapshot untouched.
pub struct SnapshotCache {
    source: Arc<dyn FacilitySource>,
    fallback: Arc<[FacilityRecord]>,
    ttl: std::time::Duration,
    min_records: usize,
    mode: FallbackMode,
    current: RwLock<Option<Snapshot>>,
    refresh_gate: Mutex<()>,
}

impl SnapshotCache {
    /// Create an empty cache bound to an extraction source and a static
    /// fallback dataset.
    #[must_use]
    pub fn new(
        source: Arc<dyn FacilitySource>,
        fallback: Vec<FacilityRecord>,
        config: &DirectoryConfig,
    ) -> Self {
        Self {
            source,
            fallback: fallback.into(),
            ttl: config.ttl,
            min_records: config.min_records,
            mode: config.fallback_mode,
            current: RwLock::new(None),
            refresh_gate: Mutex::new(()),
        }
    }

    /// Return the current record set, refreshing it first when stale.
    ///
    /// Calls arriving while another refresh is in flight wait on it and
    /// reuse its result instead of re-scraping the upstream site.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceUnavailable`] only in [`FallbackMode::Strict`]
    /// when the refresh fails; in silent mode callers always get data.
    pub async fn records(&self) -> Result<Arc<[FacilityRecord]>, ServiceUnavailable> {
        if let Some(records) = self.fresh().await {
            return Ok(records);
        }

        let _refresh = self.refresh_gate.lock().await;

        // A caller that held the gate may have refreshed while we waited.
        if let Some(records) = self.fresh().await {
            return Ok(records);
        }

        match self.refresh().await {
            Ok(snapshot) => {
                let records = Arc::clone(&snapshot.records);
                *self.current.write().await = Some(snapshot);
                Ok(records)
            }
            Err(reason) => self.degrade(reason).await,
        }
    }

    async fn fresh(&self) -> Option<Arc<[FacilityRecord]>> {
        let guard = self.current.read().await;
        guard
            .as_ref()
            .filter(|snapshot| snapshot.age().to_std().is_ok_and(|age| age < self.ttl))
            .map(|snapshot| Arc::clone(&snapshot.records))
    }

    async fn refresh(&self) -> Result<Snapshot, RefreshError> {
        let records = self.source.fetch_all().await?;
        if records.len() < self.min_records {
            return Err(RefreshError::Implausible {
                got: records.len(),
                floor: self.min_records,
            });
        }
        tracing::info!(
            source = %self.source.source().id,
            records = records.len(),
            "installed fresh facility snapshot"
        );
        Ok(Snapshot::new(records))
    }

    /// Refresh failed. The stored timestamp is deliberately not advanced,
    /// so the next call retries extraction instead of waiting out the TTL.
    async fn degrade(
        &self,
        reason: RefreshError,
    ) -> Result<Arc<[FacilityRecord]>, ServiceUnavailable> {
        match self.mode {
            FallbackMode::Strict => Err(ServiceUnavailable::from(reason)),
            FallbackMode::Silent => {
                let guard = self.current.read().await;
                match guard.as_ref() {
                    Some(snapshot) => {
                        tracing::warn!(error = %reason, "refresh failed, serving stale snapshot");
                        Ok(Arc::clone(&snapshot.records))
                    }
                    None => {
                        tracing::warn!(error = %reason, "refresh failed, serving static fallback");
                        Ok(Arc::clone(&self.fallback))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::model::{Category, SourceMeta};

    struct CountingSource {
        calls: AtomicUsize,
        records: Vec<FacilityRecord>,
        fail: bool,
        delay: Duration,
    }

    impl CountingSource {
        fn returning(records: Vec<FacilityRecord>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                records,
                fail: false,
                delay: Duration::ZERO,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                records: Vec::new(),
                fail: true,
                delay: Duration::ZERO,
            }
        }

        fn slow(records: Vec<FacilityRecord>, delay: Duration) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                records,
                fail: false,
                delay,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FacilitySource for CountingSource {
        fn source(&self) -> &SourceMeta {
            static META: std::sync::LazyLock<SourceMeta> = std::sync::LazyLock::new(|| SourceMeta {
                id: "test".to_owned(),
                name: "Test".to_owned(),
            });
            &META
        }

        async fn fetch_all(&self) -> Result<Vec<FacilityRecord>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail {
                return Err(SourceError::Internal("listing fetch timed out".to_owned()));
            }
            Ok(self.records.clone())
        }
    }

    fn record(id: u32, name: &str) -> FacilityRecord {
        FacilityRecord {
            id,
            name: name.to_owned(),
            category: Category::Ubs,
            address: None,
            neighborhood: None,
            hours: None,
            phone: None,
            email: None,
            source_url: format!("https://example.invalid/unidadesaude.php?id={id}"),
        }
    }

    fn records(count: u32) -> Vec<FacilityRecord> {
        (1..=count).map(|id| record(id, &format!("UBS {id}"))).collect()
    }

    fn config(mode: FallbackMode) -> DirectoryConfig {
        DirectoryConfig {
            fallback_mode: mode,
            ..DirectoryConfig::default()
        }
    }

    #[tokio::test]
    async fn fresh_snapshot_is_served_without_refetching() {
        let source = Arc::new(CountingSource::returning(records(12)));
        let cache = SnapshotCache::new(
            Arc::clone(&source) as Arc<dyn FacilitySource>,
            Vec::new(),
            &config(FallbackMode::Silent),
        );

        let first = cache.records().await.unwrap();
        let second = cache.records().await.unwrap();

        assert_eq!(source.calls(), 1);
        let ids = |list: &Arc<[FacilityRecord]>| {
            list.iter().map(|facility| facility.id).collect::<Vec<_>>()
        };
        assert_eq!(ids(&first), ids(&second));
    }

    #[tokio::test]
    async fn stale_snapshot_triggers_a_refresh() {
        let source = Arc::new(CountingSource::returning(records(12)));
        let cache = SnapshotCache::new(
            Arc::clone(&source) as Arc<dyn FacilitySource>,
            Vec::new(),
            &config(FallbackMode::Silent),
        );

        *cache.current.write().await = Some(Snapshot {
            records: records(11).into(),
            captured_at: Utc::now() - chrono::TimeDelta::hours(7),
        });

        let served = cache.records().await.unwrap();
        assert_eq!(source.calls(), 1);
        assert_eq!(served.len(), 12);
    }

    #[tokio::test]
    async fn implausible_refresh_is_never_installed() {
        let source = Arc::new(CountingSource::returning(records(3)));
        let cache = SnapshotCache::new(
            Arc::clone(&source) as Arc<dyn FacilitySource>,
            records(10),
            &config(FallbackMode::Silent),
        );

        let served = cache.records().await.unwrap();
        assert_eq!(served.len(), 10, "static fallback expected");
        assert!(cache.current.read().await.is_none());

        // Timestamp was not advanced, so the next call retries right away.
        cache.records().await.unwrap();
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn silent_mode_prefers_the_previous_snapshot_over_the_static_set() {
        let source = Arc::new(CountingSource::returning(records(3)));
        let cache = SnapshotCache::new(
            Arc::clone(&source) as Arc<dyn FacilitySource>,
            records(10),
            &config(FallbackMode::Silent),
        );

        *cache.current.write().await = Some(Snapshot {
            records: records(15).into(),
            captured_at: Utc::now() - chrono::TimeDelta::hours(7),
        });

        let served = cache.records().await.unwrap();
        assert_eq!(served.len(), 15, "stale snapshot expected");
    }

    #[tokio::test]
    async fn transport_failure_in_silent_mode_serves_the_static_set_and_retries() {
        let source = Arc::new(CountingSource::failing());
        let cache = SnapshotCache::new(
            Arc::clone(&source) as Arc<dyn FacilitySource>,
            records(10),
            &config(FallbackMode::Silent),
        );

        let served = cache.records().await.unwrap();
        assert_eq!(served.len(), 10);

        // Not cached: a call moments later goes upstream again.
        cache.records().await.unwrap();
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn strict_mode_surfaces_a_transport_failure() {
        let source = Arc::new(CountingSource::failing());
        let cache = SnapshotCache::new(
            source,
            records(10),
            &config(FallbackMode::Strict),
        );

        let err = cache.records().await.unwrap_err();
        assert!(matches!(err.source, RefreshError::Source(_)));
    }

    #[tokio::test]
    async fn strict_mode_surfaces_the_refresh_failure() {
        let source = Arc::new(CountingSource::returning(records(3)));
        let cache = SnapshotCache::new(
            Arc::clone(&source) as Arc<dyn FacilitySource>,
            records(10),
            &config(FallbackMode::Strict),
        );

        let err = cache.records().await.unwrap_err();
        assert!(matches!(
            err.source,
            RefreshError::Implausible { got: 3, floor: 10 }
        ));
    }

    #[tokio::test]
    async fn concurrent_stale_callers_trigger_exactly_one_fetch() {
        let source = Arc::new(CountingSource::slow(records(12), Duration::from_millis(50)));
        let cache = Arc::new(SnapshotCache::new(
            Arc::clone(&source) as Arc<dyn FacilitySource>,
            Vec::new(),
            &config(FallbackMode::Silent),
        ));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move { cache.records().await }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap().len(), 12);
        }

        assert_eq!(source.calls(), 1);
    }
}
