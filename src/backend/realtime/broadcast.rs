/**
 * Real-time Event Broadcasting
 *
 * This module provides the fan-out channel every connection subscribes to,
 * and the helper used to publish server events on it.
 *
 * # Broadcasting
 *
 * Events are broadcast using `tokio::sync::broadcast`, which provides
 * a multi-producer, multi-consumer channel. Every live connection receives
 * a copy of each event, including the connection whose intent caused it.
 * Events are delivered to each subscriber in the order they were sent.
 */
use crate::shared::ServerEvent;
use tokio::sync::broadcast;

/// Default number of events a slow subscriber may fall behind by
pub const DEFAULT_BROADCAST_CAPACITY: usize = 1000;

/// Broadcast channel for server events
///
/// This type can be cloned and shared across handlers to allow
/// broadcasting events from anywhere in the server.
///
/// # Usage
///
/// ```rust
/// use corkboard::backend::realtime::RealtimeEventBroadcast;
/// use corkboard::shared::ServerEvent;
/// use tokio::sync::broadcast;
///
/// let (tx, _) = broadcast::channel::<ServerEvent>(1000);
/// let broadcast: RealtimeEventBroadcast = tx;
/// ```
pub type RealtimeEventBroadcast = broadcast::Sender<ServerEvent>;

/// Broadcast a server event to all connections
///
/// # Returns
///
/// Number of active subscribers that received the event (0 if no subscribers)
pub fn broadcast_event(broadcast_tx: &RealtimeEventBroadcast, event: ServerEvent) -> usize {
    let name = event.name();
    match broadcast_tx.send(event) {
        Ok(subscriber_count) => {
            tracing::debug!(
                "[Realtime] {} broadcast to {} subscribers",
                name,
                subscriber_count
            );
            subscriber_count
        }
        Err(_) => {
            // No subscribers, that's okay
            tracing::debug!("[Realtime] No subscribers to receive {}", name);
            0
        }
    }
}
