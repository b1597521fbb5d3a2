use log::*;
use tokio::sync::mpsc;

use crate::events::{EventProducer, Notification, Notifier};

pub fn prepare_test_env() {
    let _ = env_logger::try_init();
    trace!("🚀️ Logging initialised");
}

/// A notifier whose payloads can be inspected with [`drain_notifications`].
pub fn notification_channel(buffer_size: usize) -> (Notifier, mpsc::Receiver<Vec<u8>>) {
    let (tx, rx) = mpsc::channel(buffer_size);
    (Notifier::new(EventProducer::new(tx)), rx)
}

/// Everything currently waiting on the channel, decoded. Payloads that do not decode are skipped with an error log.
pub fn drain_notifications(rx: &mut mpsc::Receiver<Vec<u8>>) -> Vec<Notification> {
    let mut result = Vec::new();
    while let Ok(payload) = rx.try_recv() {
        match Notification::from_payload(&payload) {
            Ok(n) => result.push(n),
            Err(e) => error!("🚀️ Undecodable notification payload. {e}"),
        }
    }
    result
}
