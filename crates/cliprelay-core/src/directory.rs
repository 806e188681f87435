//! Channel-to-location resolution against the device roster.

use std::sync::Arc;
use std::time::{Duration, Instant};

use cliprelay_types::{ConsoleResolution, Device, DeviceRole};
use tokio::sync::Mutex;
use tracing::debug;

use crate::roster::{ChannelFilter, RosterApi};
use crate::{RelayError, Result};

/// How often the roster may be refetched.
///
/// `AlwaysFresh` pays one roster fetch per clipboard action so membership
/// changes on the management service take effect immediately. `CacheWithTtl`
/// reuses a snapshot for the given duration, trading staleness for latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStrategy {
    AlwaysFresh,
    CacheWithTtl(Duration),
}

impl Default for ResolutionStrategy {
    fn default() -> Self {
        ResolutionStrategy::AlwaysFresh
    }
}

struct CachedRoster {
    fetched_at: Instant,
    devices: Vec<Device>,
}

/// Resolves a transmitting channel name to its console location and the
/// receiver channels sharing it.
pub struct DeviceDirectory {
    roster: Arc<dyn RosterApi>,
    strategy: ResolutionStrategy,
    cache: Mutex<Option<CachedRoster>>,
}

impl DeviceDirectory {
    pub fn new(roster: Arc<dyn RosterApi>, strategy: ResolutionStrategy) -> Self {
        Self {
            roster,
            strategy,
            cache: Mutex::new(None),
        }
    }

    /// Resolve `channel` to its console location and receiver member set.
    ///
    /// The roster snapshot is fetched once and reused for both the
    /// transmitter lookup and the receiver filter, so a single call always
    /// sees a consistent roster. An unknown channel yields
    /// [`RelayError::ChannelNotFound`]; callers log and drop the action.
    pub async fn resolve_location(
        &self,
        channel: &str,
        token: Option<&str>,
    ) -> Result<ConsoleResolution> {
        let token = token.ok_or(RelayError::MissingToken)?;
        let devices = self.roster_snapshot(token).await?;

        let tx = devices
            .iter()
            .find(|d| d.role == DeviceRole::Tx && d.name == channel)
            .ok_or_else(|| RelayError::ChannelNotFound(channel.to_string()))?;

        let channels: Vec<String> = devices
            .iter()
            .filter(|d| d.role == DeviceRole::Rx && d.location == tx.location)
            .map(|d| d.name.clone())
            .collect();

        debug!(
            target: "cliprelay::roster",
            "Resolved channel {} to location {} ({} receivers)",
            channel,
            tx.location,
            channels.len()
        );

        Ok(ConsoleResolution {
            location: tx.location.clone(),
            channels,
        })
    }

    /// Resolve a computer description to its transmitting channel name.
    pub async fn channel_for_computer(
        &self,
        comp: &str,
        token: Option<&str>,
    ) -> Result<Option<String>> {
        let token = token.ok_or(RelayError::MissingToken)?;
        self.roster
            .list_channels(&ChannelFilter::for_computer(comp), token)
            .await
    }

    async fn roster_snapshot(&self, token: &str) -> Result<Vec<Device>> {
        let ttl = match self.strategy {
            ResolutionStrategy::AlwaysFresh => return self.roster.list_devices(token).await,
            ResolutionStrategy::CacheWithTtl(ttl) => ttl,
        };

        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref() {
            if cached.fetched_at.elapsed() < ttl {
                return Ok(cached.devices.clone());
            }
        }

        let devices = self.roster.list_devices(token).await?;
        *cache = Some(CachedRoster {
            fetched_at: Instant::now(),
            devices: devices.clone(),
        });
        Ok(devices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::roster::Credentials;

    struct FixedRoster {
        devices: Vec<Device>,
        fetches: AtomicUsize,
    }

    impl FixedRoster {
        fn new(devices: Vec<Device>) -> Self {
            Self {
                devices,
                fetches: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RosterApi for FixedRoster {
        async fn authenticate(&self, _credentials: &Credentials) -> Result<String> {
            Ok("test-token".to_string())
        }

        async fn list_devices(&self, _token: &str) -> Result<Vec<Device>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.devices.clone())
        }

        async fn list_channels(
            &self,
            _filter: &ChannelFilter,
            _token: &str,
        ) -> Result<Option<String>> {
            Ok(None)
        }
    }

    fn console_roster() -> Vec<Device> {
        vec![
            Device::new("TX1", "loc1", DeviceRole::Tx),
            Device::new("RX1", "loc1", DeviceRole::Rx),
            Device::new("RX2", "loc1", DeviceRole::Rx),
            Device::new("TX9", "loc9", DeviceRole::Tx),
            Device::new("RX9", "loc9", DeviceRole::Rx),
        ]
    }

    #[tokio::test]
    async fn test_resolve_returns_location_and_receivers() {
        let directory = DeviceDirectory::new(
            Arc::new(FixedRoster::new(console_roster())),
            ResolutionStrategy::AlwaysFresh,
        );

        let resolution = directory.resolve_location("TX1", Some("t")).await.unwrap();
        assert_eq!(resolution.location, "loc1");
        assert_eq!(resolution.channels, vec!["RX1", "RX2"]);
    }

    #[tokio::test]
    async fn test_resolve_is_deterministic_for_fixed_roster() {
        let directory = DeviceDirectory::new(
            Arc::new(FixedRoster::new(console_roster())),
            ResolutionStrategy::AlwaysFresh,
        );

        let first = directory.resolve_location("TX1", Some("t")).await.unwrap();
        let second = directory.resolve_location("TX1", Some("t")).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unknown_channel_is_not_found() {
        let directory = DeviceDirectory::new(
            Arc::new(FixedRoster::new(console_roster())),
            ResolutionStrategy::AlwaysFresh,
        );

        let err = directory
            .resolve_location("ZZZ", Some("t"))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::ChannelNotFound(c) if c == "ZZZ"));
    }

    #[tokio::test]
    async fn test_receiver_name_is_not_a_channel() {
        // Only transmitters are addressable; an RX name must not resolve.
        let directory = DeviceDirectory::new(
            Arc::new(FixedRoster::new(console_roster())),
            ResolutionStrategy::AlwaysFresh,
        );

        let err = directory
            .resolve_location("RX1", Some("t"))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::ChannelNotFound(_)));
    }

    #[tokio::test]
    async fn test_missing_token_fails_before_fetching() {
        let roster = Arc::new(FixedRoster::new(console_roster()));
        let directory = DeviceDirectory::new(roster.clone(), ResolutionStrategy::AlwaysFresh);

        let err = directory.resolve_location("TX1", None).await.unwrap_err();
        assert!(matches!(err, RelayError::MissingToken));
        assert_eq!(roster.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_always_fresh_refetches_per_call() {
        let roster = Arc::new(FixedRoster::new(console_roster()));
        let directory = DeviceDirectory::new(roster.clone(), ResolutionStrategy::AlwaysFresh);

        directory.resolve_location("TX1", Some("t")).await.unwrap();
        directory.resolve_location("TX1", Some("t")).await.unwrap();
        assert_eq!(roster.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cache_with_ttl_reuses_snapshot() {
        let roster = Arc::new(FixedRoster::new(console_roster()));
        let directory = DeviceDirectory::new(
            roster.clone(),
            ResolutionStrategy::CacheWithTtl(Duration::from_secs(60)),
        );

        directory.resolve_location("TX1", Some("t")).await.unwrap();
        directory.resolve_location("TX9", Some("t")).await.unwrap();
        assert_eq!(roster.fetches.load(Ordering::SeqCst), 1);
    }
}
