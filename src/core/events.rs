//! Change notifications
//!
//! Every successful write in the store publishes a `DataChanged` message.
//! Views subscribe and re-read the collections they render; nothing in the
//! derivation core depends on this channel.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Agents,
    Schedules,
    Tasks,
    Incidents,
    Messages,
    CalendarEvents,
    Buildings,
    Settings,
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Agents => "agents",
            Self::Schedules => "schedules",
            Self::Tasks => "tasks",
            Self::Incidents => "incidents",
            Self::Messages => "messages",
            Self::CalendarEvents => "calendar_events",
            Self::Buildings => "buildings",
            Self::Settings => "settings",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataChanged {
    pub collection: Collection,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    sender: broadcast::Sender<DataChanged>,
}

impl ChangeNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DataChanged> {
        self.sender.subscribe()
    }

    /// Returns how many subscribers saw the message. Zero subscribers is fine.
    pub fn publish(&self, collection: Collection) -> usize {
        let event = DataChanged {
            collection,
            at: Utc::now(),
        };
        match self.sender.send(event) {
            Ok(n) => n,
            Err(_) => {
                debug!("No subscribers for {collection} change");
                0
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(64)
    }
}

/// Feeds every change to `on_change` until all senders are dropped.
///
/// A listener that falls behind the channel capacity skips the overwritten
/// messages and keeps going.
pub async fn drain_changes<F>(mut changes: broadcast::Receiver<DataChanged>, mut on_change: F)
where
    F: FnMut(DataChanged),
{
    loop {
        match changes.recv().await {
            Ok(change) => on_change(change),
            Err(RecvError::Lagged(skipped)) => {
                warn!("Change listener fell behind, {skipped} notification(s) skipped");
            }
            Err(RecvError::Closed) => {
                debug!("Change channel closed");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_change() {
        let notifier = ChangeNotifier::new(8);
        let mut rx = notifier.subscribe();

        assert_eq!(notifier.publish(Collection::Tasks), 1);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.collection, Collection::Tasks);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let notifier = ChangeNotifier::default();
        assert_eq!(notifier.subscriber_count(), 0);
        assert_eq!(notifier.publish(Collection::Agents), 0);
    }

    #[tokio::test]
    async fn test_drain_survives_lag_and_stops_on_close() {
        let notifier = ChangeNotifier::new(2);
        let rx = notifier.subscribe();
        for collection in [
            Collection::Agents,
            Collection::Schedules,
            Collection::Tasks,
            Collection::Incidents,
            Collection::Messages,
        ] {
            notifier.publish(collection);
        }
        drop(notifier);

        let mut seen = Vec::new();
        drain_changes(rx, |change| seen.push(change.collection)).await;
        assert_eq!(seen, vec![Collection::Incidents, Collection::Messages]);
    }

    #[test]
    fn test_collection_display() {
        assert_eq!(Collection::CalendarEvents.to_string(), "calendar_events");
    }
}
