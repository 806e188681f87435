//! Broadcast framing for clipboard actions.

use cliprelay_types::{ClipboardEntry, ClipboardKind};
use tracing::info;

use crate::{ClipboardHistoryStore, DeviceDirectory, Result};

/// One fan-out message: who copied, which receiver channels share the
/// console, and the console's updated history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastMessage {
    pub originator: String,
    pub channels: Vec<String>,
    pub clipboard_history: Vec<ClipboardEntry>,
}

/// Turns a clipboard action into a broadcast: resolve the origin channel's
/// console, record the entry, frame the result. Delivery is the transport
/// layer's job.
pub struct BroadcastRouter {
    directory: DeviceDirectory,
    history: ClipboardHistoryStore,
}

impl BroadcastRouter {
    pub fn new(directory: DeviceDirectory, history: ClipboardHistoryStore) -> Self {
        Self { directory, history }
    }

    pub fn directory(&self) -> &DeviceDirectory {
        &self.directory
    }

    pub fn history(&self) -> &ClipboardHistoryStore {
        &self.history
    }

    /// Handle a copy event from `origin`.
    ///
    /// The channel is re-resolved on every action; rosters change between
    /// events and a session never caches its location. Resolution failure
    /// drops the action (the caller logs it), nothing is recorded or
    /// broadcast.
    pub async fn handle_copy(
        &self,
        origin: &str,
        kind: ClipboardKind,
        content: String,
        token: Option<&str>,
    ) -> Result<BroadcastMessage> {
        let resolution = self.directory.resolve_location(origin, token).await?;
        let entry = ClipboardEntry { kind, content };
        let clipboard_history = self.history.record(&resolution.location, entry);

        info!(
            target: "cliprelay::router",
            "Recorded {:?} entry from {} for location {} ({} entries)",
            kind,
            origin,
            resolution.location,
            clipboard_history.len()
        );

        Ok(BroadcastMessage {
            originator: origin.to_string(),
            channels: resolution.channels,
            clipboard_history,
        })
    }

    /// The connect-time view for `channel`: its console's current history,
    /// or an empty one when the channel does not resolve.
    pub async fn snapshot_for_channel(
        &self,
        channel: &str,
        token: Option<&str>,
    ) -> Result<Vec<ClipboardEntry>> {
        let resolution = self.directory.resolve_location(channel, token).await?;
        Ok(self.history.snapshot(&resolution.location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{ChannelFilter, Credentials, RosterApi};
    use crate::{RelayError, ResolutionStrategy};
    use async_trait::async_trait;
    use cliprelay_types::{Device, DeviceRole};
    use std::sync::Arc;

    struct FixedRoster(Vec<Device>);

    #[async_trait]
    impl RosterApi for FixedRoster {
        async fn authenticate(&self, _credentials: &Credentials) -> Result<String> {
            Ok("test-token".to_string())
        }

        async fn list_devices(&self, _token: &str) -> Result<Vec<Device>> {
            Ok(self.0.clone())
        }

        async fn list_channels(
            &self,
            _filter: &ChannelFilter,
            _token: &str,
        ) -> Result<Option<String>> {
            Ok(None)
        }
    }

    fn router() -> BroadcastRouter {
        let roster = Arc::new(FixedRoster(vec![
            Device::new("TX1", "loc1", DeviceRole::Tx),
            Device::new("RX1", "loc1", DeviceRole::Rx),
            Device::new("RX2", "loc1", DeviceRole::Rx),
        ]));
        BroadcastRouter::new(
            DeviceDirectory::new(roster, ResolutionStrategy::AlwaysFresh),
            ClipboardHistoryStore::new(),
        )
    }

    #[tokio::test]
    async fn test_copy_broadcasts_receivers_and_history() {
        let router = router();
        let msg = router
            .handle_copy("TX1", ClipboardKind::Text, "hello".into(), Some("t"))
            .await
            .unwrap();

        assert_eq!(msg.originator, "TX1");
        assert_eq!(msg.channels, vec!["RX1", "RX2"]);
        assert_eq!(msg.clipboard_history, vec![ClipboardEntry::text("hello")]);
    }

    #[tokio::test]
    async fn test_broadcast_history_matches_store_state() {
        let router = router();
        router
            .handle_copy("TX1", ClipboardKind::Text, "one".into(), Some("t"))
            .await
            .unwrap();
        let msg = router
            .handle_copy("TX1", ClipboardKind::Image, "two".into(), Some("t"))
            .await
            .unwrap();

        assert_eq!(msg.clipboard_history, router.history().snapshot("loc1"));
        assert_eq!(msg.clipboard_history.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_origin_records_nothing() {
        let router = router();
        let err = router
            .handle_copy("ZZZ", ClipboardKind::Text, "hello".into(), Some("t"))
            .await
            .unwrap_err();

        assert!(matches!(err, RelayError::ChannelNotFound(_)));
        assert!(router.history().snapshot("loc1").is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_for_channel_sees_recorded_entries() {
        let router = router();
        router
            .handle_copy("TX1", ClipboardKind::Text, "hello".into(), Some("t"))
            .await
            .unwrap();

        let snapshot = router.snapshot_for_channel("TX1", Some("t")).await.unwrap();
        assert_eq!(snapshot, vec![ClipboardEntry::text("hello")]);
    }
}
