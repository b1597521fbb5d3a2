use std::{future::Future, pin::Pin, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, web::ServiceConfig, App, HttpServer};
use bazaar_engine::{
    events::{EventHandlers, EventHooks, Notification},
    helpers::StandardScriptExtractor,
    traits::{AddressExtractor, InventoryStore, OrderStore},
    MemoryDatabase,
    PaymentReconciler,
};
use log::*;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    routes::{health, order_by_address, set_inventory, track_purchase, track_sale, WalletOutputsRoute},
};

pub type Reconciler = PaymentReconciler<MemoryDatabase, MemoryDatabase, StandardScriptExtractor>;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = MemoryDatabase::new();
    let handlers = EventHandlers::new(config.notification_buffer, notification_hooks(&config));
    let extractor = StandardScriptExtractor::new(config.network);
    let reconciler = PaymentReconciler::new(db.clone(), db.clone(), extractor, handlers.notifier());
    handlers.start_handlers().await;
    info!("🚀️ Reading {} addresses from payment outputs", config.network);
    let srv = create_server_instance(config, db, reconciler)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

/// Builds the HTTP server. Every worker shares the one reconciler, and therefore its lock.
pub fn create_server_instance(
    config: ServerConfig,
    db: MemoryDatabase,
    reconciler: Reconciler,
) -> Result<Server, ServerError> {
    let db = web::Data::new(db);
    let reconciler = web::Data::new(reconciler);
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("bzr::access_log"))
            .app_data(db.clone())
            .app_data(reconciler.clone())
            .configure(configure::<MemoryDatabase, MemoryDatabase, StandardScriptExtractor>)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Registers every route. The wallet route expects a `PaymentReconciler<B, I, A>` in the app data, and the order and
/// inventory routes a [`MemoryDatabase`].
pub fn configure<B, I, A>(cfg: &mut ServiceConfig)
where
    B: OrderStore + 'static,
    I: InventoryStore + 'static,
    A: AddressExtractor + 'static,
{
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        debug!("💻️ Rejecting request body. {err}");
        ServerError::InvalidRequestBody(err.to_string()).into()
    }))
    .service(health)
        .service(WalletOutputsRoute::<B, I, A>::new())
        .service(track_sale)
        .service(track_purchase)
        .service(order_by_address)
        .service(set_inventory);
}

pub fn notification_hooks(config: &ServerConfig) -> EventHooks {
    let mut hooks = EventHooks::default();
    if config.log_notifications {
        hooks.on_notification(|payload| {
            Box::pin(async move { log_notification(&payload) }) as Pin<Box<dyn Future<Output = ()> + Send>>
        });
    }
    hooks
}

fn log_notification(payload: &[u8]) {
    match Notification::from_payload(payload) {
        Ok(Notification::OrderFunded(ev)) => {
            info!("📣️ Order {} for \"{}\" from {} is funded", ev.order_id, ev.title, ev.buyer_guid)
        },
        Ok(Notification::PaymentReceived(ev)) => info!("📣️ Purchase {} has been paid", ev.order_id),
        Ok(Notification::InventoryWarning(ev)) => warn!("📣️ {}", ev.message),
        Err(e) => warn!("📣️ Received a notification that could not be read. {e}"),
    }
}
