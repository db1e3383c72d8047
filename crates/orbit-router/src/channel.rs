//! In-process lifecycle event channel
//!
//! The router announces view lifecycle transitions on a named channel:
//! `<id>.joined` when a view model joins the federation, `<id>.bound` when
//! its template is bound (re-announced on every render), and `<id>.docked`
//! when it is revealed, carrying the current payload.
//!
//! Subscribers register an exact topic or a `<id>.*` suffix pattern and are
//! invoked synchronously on publish.

use dashmap::DashMap;
use orbit_core::Payload;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Subscriber callback type
pub type Subscriber = Arc<dyn Fn(&str, Option<&Payload>) + Send + Sync>;

/// Topic filter: exact topic, `prefix.*`, or the catch-all `*`
#[derive(Debug, Clone, PartialEq, Eq)]
enum TopicFilter {
    Exact(String),
    Suffix(String),
    All,
}

impl TopicFilter {
    fn parse(pattern: &str) -> Self {
        if pattern == "*" {
            return Self::All;
        }
        match pattern.strip_suffix(".*") {
            Some(base) => Self::Suffix(format!("{}.", base)),
            None => Self::Exact(pattern.to_string()),
        }
    }

    fn matches(&self, topic: &str) -> bool {
        match self {
            Self::Exact(t) => t == topic,
            Self::Suffix(prefix) => topic.starts_with(prefix.as_str()),
            Self::All => true,
        }
    }
}

/// A named publish/subscribe channel for lifecycle notifications
pub struct Channel {
    name: String,
    next_id: AtomicU32,
    subscribers: DashMap<u32, (TopicFilter, Subscriber)>,
}

impl Channel {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            next_id: AtomicU32::new(1),
            subscribers: DashMap::new(),
        }
    }

    /// Channel namespace
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Subscribe to a topic or a `<id>.*` pattern. Returns a token for
    /// [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe<F>(&self, pattern: &str, callback: F) -> u32
    where
        F: Fn(&str, Option<&Payload>) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.subscribers
            .insert(id, (TopicFilter::parse(pattern), Arc::new(callback) as Subscriber));
        id
    }

    /// Drop a subscription
    pub fn unsubscribe(&self, token: u32) -> bool {
        self.subscribers.remove(&token).is_some()
    }

    /// Publish a topic to every matching subscriber, synchronously.
    ///
    /// Matching callbacks are collected before any of them runs, so a
    /// subscriber may subscribe or unsubscribe from inside its callback.
    pub fn publish(&self, topic: &str, payload: Option<&Payload>) {
        let matching: Vec<Subscriber> = self
            .subscribers
            .iter()
            .filter(|entry| entry.value().0.matches(topic))
            .map(|entry| Arc::clone(&entry.value().1))
            .collect();

        for callback in matching {
            callback(topic, payload);
        }
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_exact_topic() {
        let channel = Channel::new("test");
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = seen.clone();
        channel.subscribe("user.docked", move |topic, _| {
            seen_clone.lock().push(topic.to_string());
        });

        channel.publish("user.docked", None);
        channel.publish("user.bound", None);

        assert_eq!(seen.lock().as_slice(), &["user.docked".to_string()]);
    }

    #[test]
    fn test_suffix_pattern() {
        let channel = Channel::new("test");
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = seen.clone();
        channel.subscribe("user.*", move |topic, _| {
            seen_clone.lock().push(topic.to_string());
        });

        channel.publish("user.joined", None);
        channel.publish("user.docked", None);
        channel.publish("home.docked", None);

        assert_eq!(seen.lock().len(), 2);
    }

    #[test]
    fn test_payload_delivery() {
        let channel = Channel::new("test");
        let seen = Arc::new(Mutex::new(None));

        let seen_clone = seen.clone();
        channel.subscribe("user.docked", move |_, payload| {
            *seen_clone.lock() = payload.cloned();
        });

        let payload = Payload::from_iter([("id", "42")]);
        channel.publish("user.docked", Some(&payload));

        assert_eq!(seen.lock().as_ref().unwrap().get("id"), Some("42"));
    }

    #[test]
    fn test_unsubscribe_from_inside_callback() {
        let channel = Arc::new(Channel::new("test"));
        let token_cell: Arc<Mutex<Option<u32>>> = Arc::new(Mutex::new(None));
        let hits = Arc::new(Mutex::new(0u32));

        let channel_clone = channel.clone();
        let cell_clone = token_cell.clone();
        let hits_clone = hits.clone();
        let token = channel.subscribe("once", move |_, _| {
            *hits_clone.lock() += 1;
            if let Some(token) = cell_clone.lock().take() {
                channel_clone.unsubscribe(token);
            }
        });
        *token_cell.lock() = Some(token);

        channel.publish("once", None);
        channel.publish("once", None);

        assert_eq!(*hits.lock(), 1);
        assert_eq!(channel.subscriber_count(), 0);
    }

    #[test]
    fn test_unsubscribe() {
        let channel = Channel::new("test");
        let token = channel.subscribe("a", |_, _| {});

        assert_eq!(channel.subscriber_count(), 1);
        assert!(channel.unsubscribe(token));
        assert_eq!(channel.subscriber_count(), 0);
        assert!(!channel.unsubscribe(token));
    }
}
