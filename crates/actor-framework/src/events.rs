//! # Event Bus
//!
//! In-process topics standing in for a message broker. Services publish
//! [`DomainEvent`]s; every subscription registered for the topic receives its own copy
//! on an unbounded channel, the way each consumer group reads a partition.
//!
//! [`EventConsumer`] drives one [`EventHandler`]: a delivery is acknowledged after the
//! handler succeeds; a failing delivery is retried with exponential backoff and, once
//! the policy is exhausted, recorded on the topic's dead-letter list (`<topic>.DLT`).
//!
//! ```text
//! publish ──▶ [order-events] ──▶ notification consumer ──ok──▶ ack
//!                      │                      └─err x3──▶ order-events.DLT
//!                      └────────▶ delivery consumer
//! ```
//!
//! [`EventBus::settle`] waits until every delivery (including events published by the
//! handlers themselves) has been acknowledged or dead-lettered.

use crate::retry::RetryPolicy;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, Notify};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    #[serde(rename = "order-events")]
    OrderEvents,
    #[serde(rename = "user-events")]
    UserEvents,
    #[serde(rename = "delivery-events")]
    DeliveryEvents,
    #[serde(rename = "payment-events")]
    PaymentEvents,
    #[serde(rename = "notification-events")]
    NotificationEvents,
}

impl Topic {
    pub fn name(&self) -> &'static str {
        match self {
            Topic::OrderEvents => "order-events",
            Topic::UserEvents => "user-events",
            Topic::DeliveryEvents => "delivery-events",
            Topic::PaymentEvents => "payment-events",
            Topic::NotificationEvents => "notification-events",
        }
    }

    pub fn dead_letter_name(&self) -> String {
        format!("{}.DLT", self.name())
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One message on a topic. `payload` is a JSON object whose fields depend on
/// `event_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEvent {
    pub event_id: Uuid,
    pub topic: Topic,
    pub event_type: String,
    /// Partition key, usually the aggregate id.
    pub key: String,
    pub payload: serde_json::Value,
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent {
    pub fn new(
        topic: Topic,
        event_type: impl Into<String>,
        key: impl ToString,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            topic,
            event_type: event_type.into(),
            key: key.to_string(),
            payload,
            occurred_at: Utc::now(),
        }
    }

    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.payload.get(field).and_then(|v| v.as_str())
    }

    pub fn u64_field(&self, field: &str) -> Option<u64> {
        self.payload.get(field).and_then(|v| v.as_u64())
    }
}

/// A delivery that exhausted its retries.
#[derive(Debug, Clone)]
pub struct DeadLetter {
    /// `<topic>.DLT`
    pub topic: String,
    pub consumer: String,
    pub event: DomainEvent,
    pub error: String,
    pub attempts: u32,
}

struct Subscriber {
    consumer: String,
    sender: mpsc::UnboundedSender<DomainEvent>,
}

/// Published events kept for [`EventBus::history`] by [`EventBus::new`].
pub const DEFAULT_HISTORY_LIMIT: usize = 1_000;

#[derive(Default)]
struct BusInner {
    subscribers: Mutex<HashMap<Topic, Vec<Subscriber>>>,
    history: Mutex<VecDeque<DomainEvent>>,
    history_limit: usize,
    dead_letters: Mutex<Vec<DeadLetter>>,
    in_flight: AtomicUsize,
    idle: Notify,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl BusInner {
    fn ack(&self) {
        if self.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.idle.notify_waiters();
        }
    }
}

#[derive(Clone)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps at most `limit` published events across all topics; the oldest go first.
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            inner: Arc::new(BusInner {
                history_limit: limit,
                ..BusInner::default()
            }),
        }
    }

    /// Registers a consumer for `topics`. Events published before this call are not
    /// replayed.
    pub fn subscribe(&self, consumer: impl Into<String>, topics: &[Topic]) -> Subscription {
        let consumer = consumer.into();
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut subscribers = lock(&self.inner.subscribers);
        for topic in topics {
            subscribers.entry(*topic).or_default().push(Subscriber {
                consumer: consumer.clone(),
                sender: sender.clone(),
            });
        }
        debug!(%consumer, ?topics, "Subscribed");
        Subscription {
            consumer,
            receiver,
            bus: self.inner.clone(),
        }
    }

    pub fn publish(&self, event: DomainEvent) {
        let mut delivered = 0;
        {
            let mut subscribers = lock(&self.inner.subscribers);
            if let Some(list) = subscribers.get_mut(&event.topic) {
                list.retain(|sub| {
                    self.inner.in_flight.fetch_add(1, Ordering::AcqRel);
                    if sub.sender.send(event.clone()).is_ok() {
                        delivered += 1;
                        true
                    } else {
                        self.inner.ack();
                        debug!(consumer = %sub.consumer, "Dropping closed subscriber");
                        false
                    }
                });
            }
        }
        info!(
            topic = %event.topic,
            event_type = %event.event_type,
            key = %event.key,
            delivered,
            "Published"
        );
        let mut history = lock(&self.inner.history);
        history.push_back(event);
        while history.len() > self.inner.history_limit {
            history.pop_front();
        }
    }

    /// Retained events published on `topic`, oldest first.
    pub fn history(&self, topic: Topic) -> Vec<DomainEvent> {
        lock(&self.inner.history)
            .iter()
            .filter(|e| e.topic == topic)
            .cloned()
            .collect()
    }

    pub fn dead_letters(&self) -> Vec<DeadLetter> {
        lock(&self.inner.dead_letters).clone()
    }

    fn dead_letter(&self, letter: DeadLetter) {
        error!(
            dlt = %letter.topic,
            consumer = %letter.consumer,
            event_id = %letter.event.event_id,
            event_type = %letter.event.event_type,
            attempts = letter.attempts,
            error = %letter.error,
            "Dead-lettered"
        );
        lock(&self.inner.dead_letters).push(letter);
    }

    /// Waits until no delivery is outstanding.
    pub async fn settle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            if self.inner.in_flight.load(Ordering::Acquire) == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Drops every subscriber. Consumers finish what is queued and then stop.
    pub fn close(&self) {
        let mut subscribers = lock(&self.inner.subscribers);
        let count: usize = subscribers.values().map(Vec::len).sum();
        subscribers.clear();
        info!(count, "Event bus closed");
    }
}

/// The receiving half of a subscription.
pub struct Subscription {
    consumer: String,
    receiver: mpsc::UnboundedReceiver<DomainEvent>,
    bus: Arc<BusInner>,
}

impl Subscription {
    pub fn consumer(&self) -> &str {
        &self.consumer
    }

    /// Next event, or `None` once the bus is closed and the queue drained.
    pub async fn recv(&mut self) -> Option<Delivery> {
        let event = self.receiver.recv().await?;
        Some(Delivery {
            event,
            bus: self.bus.clone(),
        })
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.receiver.close();
        while self.receiver.try_recv().is_ok() {
            self.bus.ack();
        }
    }
}

/// A received event. Dropping it acknowledges the delivery.
pub struct Delivery {
    event: DomainEvent,
    bus: Arc<BusInner>,
}

impl Deref for Delivery {
    type Target = DomainEvent;

    fn deref(&self) -> &DomainEvent {
        &self.event
    }
}

impl Drop for Delivery {
    fn drop(&mut self) {
        self.bus.ack();
    }
}

pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// A listener bound to one or more topics.
#[async_trait]
pub trait EventHandler: Send + Sync + 'static {
    /// Consumer group name, used in logs and dead letters.
    fn name(&self) -> &str;

    async fn handle(&self, event: &DomainEvent) -> Result<(), HandlerError>;
}

/// Runs a handler over a subscription until the bus closes.
pub struct EventConsumer<H: EventHandler> {
    handler: H,
    subscription: Subscription,
    bus: EventBus,
    policy: RetryPolicy,
}

impl<H: EventHandler> EventConsumer<H> {
    pub fn new(bus: &EventBus, topics: &[Topic], handler: H, policy: RetryPolicy) -> Self {
        let subscription = bus.subscribe(handler.name(), topics);
        Self {
            handler,
            subscription,
            bus: bus.clone(),
            policy,
        }
    }

    async fn process(&self, event: &DomainEvent) {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.handler.handle(event).await {
                Ok(()) => {
                    debug!(
                        consumer = self.handler.name(),
                        event_type = %event.event_type,
                        attempt,
                        "Acked"
                    );
                    return;
                }
                Err(e) if attempt < max_attempts => {
                    let delay = self.policy.backoff_for(attempt);
                    warn!(
                        consumer = self.handler.name(),
                        event_type = %event.event_type,
                        attempt,
                        ?delay,
                        error = %e,
                        "Handler failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    self.bus.dead_letter(DeadLetter {
                        topic: event.topic.dead_letter_name(),
                        consumer: self.handler.name().to_string(),
                        event: event.clone(),
                        error: e.to_string(),
                        attempts: attempt,
                    });
                    return;
                }
            }
        }
    }

    pub async fn run(mut self) {
        info!(consumer = self.handler.name(), "Consumer started");
        while let Some(delivery) = self.subscription.recv().await {
            self.process(&delivery).await;
        }
        info!(consumer = self.handler.name(), "Consumer stopped");
    }
}
