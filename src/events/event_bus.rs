use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tracing::{trace, warn};

use super::types::{EventType, PlayerEvent};

/// Event subscriber handle
pub struct EventSubscriber {
    receiver: broadcast::Receiver<PlayerEvent>,
    types: Option<Vec<EventType>>,
}

impl EventSubscriber {
    fn new(receiver: broadcast::Receiver<PlayerEvent>, types: Option<Vec<EventType>>) -> Self {
        Self { receiver, types }
    }

    fn wants(&self, event: &PlayerEvent) -> bool {
        self.types
            .as_ref()
            .is_none_or(|types| types.contains(&event.event_type))
    }

    /// Next matching event, or `None` once the bus is gone.
    /// Events missed by a slow subscriber are skipped.
    pub async fn recv(&mut self) -> Option<PlayerEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.wants(&event) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!("Event subscriber lagged, skipped {} events", missed);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Try to receive without blocking
    pub fn try_recv(&mut self) -> Option<PlayerEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.wants(&event) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventBusStats {
    pub total_events: u64,
    pub events_by_type: HashMap<&'static str, u64>,
    pub subscriber_count: usize,
    pub dropped_events: u64,
}

/// Broadcasts player events to any number of subscribers
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<PlayerEvent>,
    stats: Arc<RwLock<EventBusStats>>,
    event_history: Arc<RwLock<Vec<PlayerEvent>>>,
    max_history_size: usize,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));

        Self {
            sender,
            stats: Arc::new(RwLock::new(EventBusStats::default())),
            event_history: Arc::new(RwLock::new(Vec::new())),
            max_history_size: 100,
        }
    }

    pub async fn publish(&self, event: PlayerEvent) {
        trace!("Publishing {}", event.event_type.as_str());

        {
            let mut stats = self.stats.write().await;
            stats.total_events += 1;
            *stats
                .events_by_type
                .entry(event.event_type.as_str())
                .or_insert(0) += 1;
        }

        {
            let mut history = self.event_history.write().await;
            history.push(event.clone());
            if history.len() > self.max_history_size {
                let excess = history.len() - self.max_history_size;
                history.drain(0..excess);
            }
        }

        // No subscribers is normal
        if self.sender.send(event).is_err() {
            self.stats.write().await.dropped_events += 1;
        }
    }

    pub fn subscribe(&self) -> EventSubscriber {
        EventSubscriber::new(self.sender.subscribe(), None)
    }

    pub fn subscribe_to_types(&self, types: Vec<EventType>) -> EventSubscriber {
        EventSubscriber::new(self.sender.subscribe(), Some(types))
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub async fn get_stats(&self) -> EventBusStats {
        let mut stats = self.stats.read().await.clone();
        stats.subscriber_count = self.subscriber_count();
        stats
    }

    pub async fn get_history(&self) -> Vec<PlayerEvent> {
        self.event_history.read().await.clone()
    }
}
