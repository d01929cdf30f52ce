//! Server push events
//!
//! The marketplace pushes small JSON messages such as
//! `{"event": "order:created", "data": {...}}`. They are used only to mark
//! cached reads stale; payloads are not interpreted.

use haat::ids::OrderId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::cache::QueryCache;

/// Event names published by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServerEvent {
    /// A new order was placed.
    #[serde(rename = "order:created")]
    OrderCreated,

    /// An order's status changed.
    #[serde(rename = "order:updated")]
    OrderUpdated,

    /// A gateway payment was settled.
    #[serde(rename = "payment:completed")]
    PaymentCompleted,

    /// A product was listed.
    #[serde(rename = "product:created")]
    ProductCreated,

    /// A product's details, price or stock changed.
    #[serde(rename = "product:updated")]
    ProductUpdated,

    /// A product was delisted.
    #[serde(rename = "product:deleted")]
    ProductDeleted,

    /// A notification arrived.
    #[serde(rename = "notification:new")]
    NotificationNew,
}

/// Families of cached data an event can invalidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Order lists and details.
    Orders,
    /// Product listings.
    Products,
    /// Payment history.
    Payments,
    /// Notification feed and unread counts.
    Notifications,
}

impl Topic {
    /// Query operation prefix for this topic.
    pub fn query_prefix(self) -> &'static str {
        match self {
            Self::Orders => "orders",
            Self::Products => "products",
            Self::Payments => "payments",
            Self::Notifications => "notifications",
        }
    }
}

impl ServerEvent {
    /// Topics made stale by this event.
    pub fn topics(self) -> SmallVec<[Topic; 2]> {
        match self {
            Self::OrderCreated | Self::OrderUpdated => {
                smallvec![Topic::Orders, Topic::Notifications]
            }
            Self::PaymentCompleted => smallvec![Topic::Payments, Topic::Orders],
            Self::ProductCreated | Self::ProductUpdated | Self::ProductDeleted => {
                smallvec![Topic::Products]
            }
            Self::NotificationNew => smallvec![Topic::Notifications],
        }
    }
}

/// A decoded push message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventMessage {
    /// Event name.
    pub event: ServerEvent,

    /// Event payload, left uninterpreted.
    #[serde(default)]
    pub data: serde_json::Value,
}

impl EventMessage {
    /// Decode a raw push message.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed JSON or unknown event names.
    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// The order the event refers to, when its payload names one.
    pub fn order_id(&self) -> Option<OrderId> {
        ["orderId", "_id", "id"]
            .iter()
            .find_map(|field| self.data.get(field)?.as_str())
            .map(OrderId::new)
    }
}

/// Routes topics to the query prefixes they invalidate.
#[derive(Debug, Clone)]
pub struct Invalidator {
    routes: FxHashMap<Topic, SmallVec<[String; 2]>>,
}

impl Default for Invalidator {
    fn default() -> Self {
        let routes = [
            Topic::Orders,
            Topic::Products,
            Topic::Payments,
            Topic::Notifications,
        ]
        .into_iter()
        .map(|topic| (topic, smallvec![topic.query_prefix().to_string()]))
        .collect();

        Self { routes }
    }
}

impl Invalidator {
    /// Also invalidate queries under `prefix` whenever `topic` fires.
    #[must_use]
    pub fn route(mut self, topic: Topic, prefix: impl Into<String>) -> Self {
        self.routes.entry(topic).or_default().push(prefix.into());
        self
    }

    /// Query prefixes invalidated by `topic`.
    pub fn prefixes(&self, topic: Topic) -> &[String] {
        self.routes
            .get(&topic)
            .map(|prefixes| prefixes.as_slice())
            .unwrap_or_default()
    }

    /// Mark every cached query the event touches stale. Returns how many
    /// entries were affected.
    pub async fn apply<V: Clone>(&self, event: ServerEvent, cache: &QueryCache<V>) -> usize {
        let mut affected = 0;

        for topic in event.topics() {
            for prefix in self.prefixes(topic) {
                affected += cache.invalidate_prefix(prefix).await;
            }
        }

        affected
    }

    /// Drain a push subscription until it closes, invalidating as events
    /// arrive. Malformed messages are logged and skipped. Returns the number of
    /// events applied.
    pub async fn listen<V: Clone>(
        &self,
        mut receiver: mpsc::Receiver<String>,
        cache: &QueryCache<V>,
    ) -> usize {
        let mut applied = 0;

        while let Some(raw) = receiver.recv().await {
            match EventMessage::decode(&raw) {
                Ok(message) => {
                    let affected = self.apply(message.event, cache).await;

                    debug!(event = ?message.event, affected, "applied push event");
                    applied += 1;
                }
                Err(error) => warn!(%error, "ignoring malformed push event"),
            }
        }

        applied
    }
}

/// [`Invalidator::listen`] with the default routes.
pub async fn listen<V: Clone>(receiver: mpsc::Receiver<String>, cache: &QueryCache<V>) -> usize {
    Invalidator::default().listen(receiver, cache).await
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use testresult::TestResult;

    use super::*;
    use crate::cache::QueryKey;

    const HOUR: SignedDuration = SignedDuration::from_secs(3_600);

    async fn warm_cache() -> QueryCache<&'static str> {
        let cache = QueryCache::new();

        for operation in [
            "orders.list",
            "products.list",
            "payments.history",
            "notifications.unread",
            "dashboard.stats",
        ] {
            cache.insert(QueryKey::new(operation), operation, HOUR).await;
        }

        cache
    }

    #[test]
    fn events_decode_from_wire_names() -> TestResult {
        let message =
            EventMessage::decode(r#"{"event":"order:created","data":{"orderId":"o9"}}"#)?;

        assert_eq!(message.event, ServerEvent::OrderCreated);
        assert_eq!(message.order_id(), Some(OrderId::new("o9")));
        assert!(EventMessage::decode(r#"{"event":"order:exploded"}"#).is_err());

        Ok(())
    }

    #[test]
    fn payload_is_optional() -> TestResult {
        let message = EventMessage::decode(r#"{"event":"notification:new"}"#)?;

        assert_eq!(message.data, serde_json::Value::Null);
        assert_eq!(message.order_id(), None);

        Ok(())
    }

    #[tokio::test]
    async fn product_events_only_touch_products() {
        let cache = warm_cache().await;

        let affected = Invalidator::default()
            .apply(ServerEvent::ProductUpdated, &cache)
            .await;

        assert_eq!(affected, 1);
        assert_eq!(cache.get(&QueryKey::new("products.list")).await, None);
        assert!(cache.get(&QueryKey::new("orders.list")).await.is_some());
    }

    #[tokio::test]
    async fn extra_routes_extend_a_topic() {
        let cache = warm_cache().await;
        let invalidator = Invalidator::default().route(Topic::Orders, "dashboard");

        let affected = invalidator.apply(ServerEvent::OrderUpdated, &cache).await;

        // orders.list, notifications.unread and dashboard.stats.
        assert_eq!(affected, 3);
        assert!(cache.get(&QueryKey::new("payments.history")).await.is_some());
    }

    #[tokio::test]
    async fn listen_drains_until_the_channel_closes() -> TestResult {
        let cache = warm_cache().await;
        let (sender, receiver) = mpsc::channel(8);

        sender
            .send(r#"{"event":"payment:completed"}"#.to_string())
            .await?;
        sender.send("not json".to_string()).await?;
        drop(sender);

        let applied = listen(receiver, &cache).await;

        assert_eq!(applied, 1);
        assert_eq!(cache.get(&QueryKey::new("payments.history")).await, None);
        assert_eq!(cache.get(&QueryKey::new("orders.list")).await, None);
        assert_eq!(
            cache.get(&QueryKey::new("products.list")).await,
            Some("products.list")
        );

        Ok(())
    }
}
