use std::{future::Future, pin::Pin, sync::Arc};

use log::*;
use tokio::sync::mpsc;

use crate::events::{EventHandler, EventProducer, Handler, Notifier};

enum Sink {
    Hook(EventHandler<Vec<u8>>),
    // No hook installed. Payloads are drained and discarded so that producers never see a closed channel.
    Drain(mpsc::Sender<Vec<u8>>, mpsc::Receiver<Vec<u8>>),
}

/// Owns the outbound notification channel and whatever handler has been hooked up to it.
pub struct EventHandlers {
    sink: Sink,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let sink = match hooks.on_notification {
            Some(f) => Sink::Hook(EventHandler::new(buffer_size, f)),
            None => {
                let (tx, rx) = mpsc::channel(buffer_size);
                Sink::Drain(tx, rx)
            },
        };
        Self { sink }
    }

    pub fn notifier(&self) -> Notifier {
        let producer = match &self.sink {
            Sink::Hook(handler) => handler.subscribe(),
            Sink::Drain(tx, _) => EventProducer::new(tx.clone()),
        };
        Notifier::new(producer)
    }

    pub async fn start_handlers(self) {
        match self.sink {
            Sink::Hook(handler) => {
                tokio::spawn(async move {
                    handler.start_handler().await;
                });
            },
            Sink::Drain(tx, mut rx) => {
                drop(tx);
                tokio::spawn(async move {
                    while let Some(payload) = rx.recv().await {
                        trace!("📣️ Discarding {} byte notification. No hook is installed.", payload.len());
                    }
                });
            },
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_notification: Option<Handler<Vec<u8>>>,
}

impl EventHooks {
    pub fn on_notification<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(Vec<u8>) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_notification = Some(Arc::new(f));
        self
    }
}
