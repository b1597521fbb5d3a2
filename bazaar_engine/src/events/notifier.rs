use log::*;

use crate::events::{EventProducer, Notification};

/// The reconciler's outbound sink. Notifications are serialized to JSON and handed over as opaque payloads.
#[derive(Clone)]
pub struct Notifier {
    producer: EventProducer<Vec<u8>>,
}

impl Notifier {
    pub fn new(producer: EventProducer<Vec<u8>>) -> Self {
        Self { producer }
    }

    /// Publishes the notification, waiting for room on the channel.
    pub async fn notify(&self, notification: &Notification) -> bool {
        match notification.to_payload() {
            Ok(payload) => self.producer.publish_event(payload).await,
            Err(e) => {
                error!("📣️ Could not serialize notification {notification:?}. {e}");
                false
            },
        }
    }

    /// Publishes the notification if the channel has room. Otherwise it is dropped.
    pub fn notify_best_effort(&self, notification: &Notification) -> bool {
        match notification.to_payload() {
            Ok(payload) => self.producer.try_publish_event(payload),
            Err(e) => {
                error!("📣️ Could not serialize notification {notification:?}. {e}");
                false
            },
        }
    }
}
