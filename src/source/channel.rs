//! Channel-based snapshot source.
//!
//! Receives snapshots pushed by another task through a tokio watch channel.
//! This is the integration point for collectors that already poll the
//! cluster some other way: they publish, the dashboard fetches the latest.

use async_trait::async_trait;
use healthpie_types::HealthSnapshot;
use tokio::sync::watch;

use super::{MetricsSource, SourceError};

/// Producer side of a [`ChannelSource`].
///
/// Dropping the publisher closes the source.
#[derive(Debug)]
pub struct SnapshotPublisher {
    sender: watch::Sender<Option<HealthSnapshot>>,
}

impl SnapshotPublisher {
    /// Replace the latest snapshot.
    ///
    /// Returns `false` if every receiving source has been dropped.
    pub fn publish(&self, snapshot: HealthSnapshot) -> bool {
        self.sender.send(Some(snapshot)).is_ok()
    }

    /// Check if any source is still attached.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// A source that returns whatever was last published on its channel.
///
/// # Example
///
/// ```
/// use healthpie::ChannelSource;
/// use healthpie_types::HealthSnapshot;
///
/// let (publisher, source) = ChannelSource::create("collector");
/// publisher.publish(HealthSnapshot::default());
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<Option<HealthSnapshot>>,
    description: String,
}

impl ChannelSource {
    /// Create a new channel source from the receiving end of a watch channel.
    ///
    /// `source_description` names where snapshots come from, e.g.
    /// `"collector"` or `"mgr://10.0.0.1"`.
    pub fn new(receiver: watch::Receiver<Option<HealthSnapshot>>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
        }
    }

    /// Create a publisher/source pair with nothing published yet.
    pub fn create(source_description: &str) -> (SnapshotPublisher, Self) {
        let (sender, receiver) = watch::channel(None);
        let source = Self::new(receiver, source_description);
        (SnapshotPublisher { sender }, source)
    }
}

#[async_trait]
impl MetricsSource for ChannelSource {
    async fn fetch(&self) -> Result<HealthSnapshot, SourceError> {
        // Err here means the sender is gone.
        if self.receiver.has_changed().is_err() {
            return Err(SourceError::Closed);
        }
        self.receiver.borrow().clone().ok_or(SourceError::Empty)
    }

    fn description(&self) -> &str {
        &self.description
    }
}
