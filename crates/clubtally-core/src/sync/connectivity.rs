//! Connectivity gate: cached reachability checks.
//!
//! One sync pass touches several dozen per-table operations; probing the
//! network before each of them would be wasteful. The gate probes at most
//! once per freshness window and serves the cached answer in between.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::remote::RemoteStore;

/// Caches the result of the remote reachability probe.
pub struct ConnectivityGate {
    ttl: Duration,
    cached: Mutex<Option<(Instant, bool)>>,
}

impl ConnectivityGate {
    /// Create a gate with the given probe freshness window.
    pub const fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            cached: Mutex::new(None),
        }
    }

    /// Whether the remote store is reachable, probing only when the cached
    /// answer has gone stale.
    pub async fn is_online<R: RemoteStore + ?Sized>(&self, remote: &R) -> bool {
        if let Ok(cache) = self.cached.lock() {
            if let Some((probed_at, online)) = *cache {
                if probed_at.elapsed() < self.ttl {
                    return online;
                }
            }
        }

        let online = remote.ping().await.is_ok();
        tracing::debug!(online, "connectivity probe");
        if let Ok(mut cache) = self.cached.lock() {
            *cache = Some((Instant::now(), online));
        }
        online
    }

    /// Seed the cache with a known state (manual override, tests).
    pub fn force(&self, online: bool) {
        if let Ok(mut cache) = self.cached.lock() {
            *cache = Some((Instant::now(), online));
        }
    }

    /// Drop the cached state so the next check probes again.
    pub fn invalidate(&self) {
        if let Ok(mut cache) = self.cached.lock() {
            *cache = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::sync::rows::RowData;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingRemote {
        pings: AtomicUsize,
        reachable: AtomicBool,
    }

    #[async_trait]
    impl RemoteStore for CountingRemote {
        async fn ping(&self) -> Result<()> {
            self.pings.fetch_add(1, Ordering::SeqCst);
            if self.reachable.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(Error::Remote("unreachable".to_string()))
            }
        }

        async fn fetch_since(&self, _table: &str, _watermark: Option<&str>) -> Result<Vec<RowData>> {
            Ok(Vec::new())
        }

        async fn upsert(&self, _table: &str, _row: &RowData) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn caches_probe_within_ttl() {
        let remote = CountingRemote::default();
        remote.reachable.store(true, Ordering::SeqCst);
        let gate = ConnectivityGate::new(Duration::from_secs(60));

        assert!(gate.is_online(&remote).await);
        assert!(gate.is_online(&remote).await);
        assert!(gate.is_online(&remote).await);
        assert_eq!(remote.pings.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn reprobes_after_ttl_expiry() {
        let remote = CountingRemote::default();
        remote.reachable.store(true, Ordering::SeqCst);
        let gate = ConnectivityGate::new(Duration::ZERO);

        assert!(gate.is_online(&remote).await);
        assert!(gate.is_online(&remote).await);
        assert_eq!(remote.pings.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn force_and_invalidate_control_the_cache() {
        let remote = CountingRemote::default();
        let gate = ConnectivityGate::new(Duration::from_secs(60));

        gate.force(false);
        assert!(!gate.is_online(&remote).await);
        assert_eq!(remote.pings.load(Ordering::SeqCst), 0);

        remote.reachable.store(true, Ordering::SeqCst);
        gate.invalidate();
        assert!(gate.is_online(&remote).await);
        assert_eq!(remote.pings.load(Ordering::SeqCst), 1);
    }
}
