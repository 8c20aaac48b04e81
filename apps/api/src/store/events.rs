use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, Stream};
use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};
use uuid::Uuid;

const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Rfps,
    Contractors,
    Proposals,
    EvaluationChecklists,
    Clarifications,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// One committed write, pushed to live subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub collection: Collection,
    pub document_id: String,
    /// Owning RFP, for documents that live under one (or the RFP itself).
    pub rfp_id: Option<Uuid>,
    pub kind: ChangeKind,
    pub at: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(
        collection: Collection,
        document_id: impl ToString,
        rfp_id: Option<Uuid>,
        kind: ChangeKind,
    ) -> Self {
        ChangeEvent {
            collection,
            document_id: document_id.to_string(),
            rfp_id,
            kind,
            at: Utc::now(),
        }
    }
}

/// Fan-out of change events from the store to any number of subscribers.
#[derive(Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
    active: Arc<AtomicUsize>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Publishing with no subscribers is not an error.
    pub fn publish(&self, event: ChangeEvent) {
        debug!(
            collection = ?event.collection,
            document_id = %event.document_id,
            kind = ?event.kind,
            "Publishing change event"
        );
        let _ = self.sender.send(event);
    }

    /// Subscribes to events, optionally only those belonging to one RFP.
    /// The subscription is released when the returned handle is dropped.
    pub fn subscribe(&self, rfp_id: Option<Uuid>) -> Subscription {
        self.active.fetch_add(1, Ordering::SeqCst);
        Subscription {
            receiver: self.sender.subscribe(),
            rfp_id,
            _guard: SubscriberGuard {
                active: self.active.clone(),
            },
        }
    }

    pub fn active_subscribers(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

struct SubscriberGuard {
    active: Arc<AtomicUsize>,
}

impl Drop for SubscriberGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Scoped live feed. Dropping it unsubscribes.
pub struct Subscription {
    receiver: broadcast::Receiver<ChangeEvent>,
    rfp_id: Option<Uuid>,
    _guard: SubscriberGuard,
}

impl Subscription {
    /// Waits for the next matching event. Returns `None` once the feed is closed.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.matches(&event) => return Some(event),
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Change subscriber lagged; events dropped");
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    fn matches(&self, event: &ChangeEvent) -> bool {
        match self.rfp_id {
            Some(rfp_id) => event.rfp_id == Some(rfp_id),
            None => true,
        }
    }

    pub fn into_stream(self) -> impl Stream<Item = ChangeEvent> + Send + 'static {
        stream::unfold(self, |mut subscription| async move {
            subscription
                .next()
                .await
                .map(|event| (event, subscription))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_subscription_filters_by_rfp() {
        let feed = ChangeFeed::default();
        let watched = Uuid::new_v4();
        let mut subscription = feed.subscribe(Some(watched));

        feed.publish(ChangeEvent::new(
            Collection::Rfps,
            Uuid::new_v4(),
            Some(Uuid::new_v4()),
            ChangeKind::Updated,
        ));
        feed.publish(ChangeEvent::new(
            Collection::Proposals,
            "p-1",
            Some(watched),
            ChangeKind::Created,
        ));

        let event = subscription.next().await.unwrap();
        assert_eq!(event.document_id, "p-1");
        assert_eq!(event.collection, Collection::Proposals);
    }

    #[tokio::test]
    async fn test_dropping_subscription_unsubscribes() {
        let feed = ChangeFeed::default();
        {
            let _first = feed.subscribe(None);
            let _second = feed.subscribe(None);
            assert_eq!(feed.active_subscribers(), 2);
        }
        assert_eq!(feed.active_subscribers(), 0);
    }

    #[tokio::test]
    async fn test_stream_yields_events_in_order() {
        let feed = ChangeFeed::default();
        let stream = feed.subscribe(None).into_stream();
        for id in ["a", "b"] {
            feed.publish(ChangeEvent::new(
                Collection::Contractors,
                id,
                None,
                ChangeKind::Created,
            ));
        }
        let events: Vec<_> = stream.take(2).collect().await;
        assert_eq!(events[0].document_id, "a");
        assert_eq!(events[1].document_id, "b");
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let feed = ChangeFeed::new(4);
        feed.publish(ChangeEvent::new(
            Collection::Rfps,
            "x",
            None,
            ChangeKind::Deleted,
        ));
        assert_eq!(feed.active_subscribers(), 0);
    }
}
