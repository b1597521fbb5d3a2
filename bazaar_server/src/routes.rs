//! Request handler definitions
//!
//! Define each route and its handler here. Handlers that are more than a line or two MUST go into a separate module.
//!
//! Handlers run on actix worker threads, which process their requests sequentially. Anything that waits (store calls,
//! the reconciler lock, a full notification channel) must be awaited, never blocked on.
//!
//! Two groups of routes are exposed:
//! * `/wallet/outputs` is called by the wallet-sync process for every transaction paying one of our addresses. It is
//!   generic over the order store, inventory store and address extractor the reconciler was built with.
//! * The order and inventory routes maintain the in-memory reference store, so that contracts can be tracked and stock
//!   levels set before payments arrive.
use actix_web::{get, post, put, web, HttpResponse, Responder};
use bazaar_engine::{
    traits::{AddressExtractor, InventoryStore, OrderStore},
    MemoryDatabase,
    PaymentReconciler,
};
use log::*;

use crate::{
    data_objects::{InventoryLevel, NewTrackedOrder, OrderIdResponse, OrderResult, WalletOutputs},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Wallet  ----------------------------------------------------
route!(wallet_outputs => Post "/wallet/outputs" impl OrderStore, InventoryStore, AddressExtractor);
/// Route handler for the wallet callback
///
/// The wallet posts the id of a transaction and the outputs it considers relevant. Outputs with hex-encoded scripts
/// are matched to tracked orders by their destination address. Redelivering a transaction is harmless.
///
/// The response is the reconciliation report for the batch. Problems with individual outputs are counted in the
/// report rather than failing the request, so the wallet never needs to retry on a 200. A batch carrying a negative
/// value is malformed and is rejected as a whole.
pub async fn wallet_outputs<B, I, A>(
    body: web::Json<WalletOutputs>,
    api: web::Data<PaymentReconciler<B, I, A>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderStore,
    I: InventoryStore,
    A: AddressExtractor,
{
    let WalletOutputs { txid, outputs } = body.into_inner();
    debug!("💻️ POST wallet outputs for {txid} ({} outputs)", outputs.len());
    if let Some(output) = outputs.iter().find(|o| o.value.is_negative()) {
        warn!("💻️ Rejecting outputs for {txid}. Output {} has a negative value", output.index);
        return Err(ServerError::InvalidRequestBody(format!("Output {} has a negative value", output.index)));
    }
    let report = api.on_payments_observed(&txid, &outputs).await;
    Ok(HttpResponse::Ok().json(report))
}

//----------------------------------------------   Orders  ----------------------------------------------------
/// Route handler for tracking a sale
///
/// The contract's payment terms name the address the buyer pays into. The response carries the order id derived from
/// the contract.
#[post("/orders/sale")]
pub async fn track_sale(
    body: web::Json<NewTrackedOrder>,
    db: web::Data<MemoryDatabase>,
) -> Result<HttpResponse, ServerError> {
    let NewTrackedOrder { contract, state } = body.into_inner();
    let order_id = db.insert_sale(contract, state).map_err(|e| {
        debug!("💻️ Could not track sale. {e}");
        ServerError::from(e)
    })?;
    info!("💻️ Tracking sale {order_id} ({state})");
    Ok(HttpResponse::Ok().json(OrderIdResponse { order_id }))
}

/// Route handler for tracking a purchase. See [`track_sale`].
#[post("/orders/purchase")]
pub async fn track_purchase(
    body: web::Json<NewTrackedOrder>,
    db: web::Data<MemoryDatabase>,
) -> Result<HttpResponse, ServerError> {
    let NewTrackedOrder { contract, state } = body.into_inner();
    let order_id = db.insert_purchase(contract, state).map_err(|e| {
        debug!("💻️ Could not track purchase. {e}");
        ServerError::from(e)
    })?;
    info!("💻️ Tracking purchase {order_id} ({state})");
    Ok(HttpResponse::Ok().json(OrderIdResponse { order_id }))
}

/// Route handler for fetching the order that pays into `address`. Sales take precedence over purchases.
#[get("/order/{address}")]
pub async fn order_by_address(
    path: web::Path<String>,
    db: web::Data<MemoryDatabase>,
) -> Result<HttpResponse, ServerError> {
    let address = path.into_inner();
    debug!("💻️ GET order for {address}");
    let (kind, order) = db
        .fetch_by_address(&address)?
        .ok_or_else(|| ServerError::NoRecordFound(format!("No order pays into {address}")))?;
    // Only hashable contracts are ever stored
    let order_id = order.contract.order_id().map_err(|e| ServerError::BackendError(e.to_string()))?;
    Ok(HttpResponse::Ok().json(OrderResult { kind, order_id, order }))
}

//----------------------------------------------   Inventory  ----------------------------------------------------
#[put("/inventory")]
pub async fn set_inventory(
    body: web::Json<InventoryLevel>,
    db: web::Data<MemoryDatabase>,
) -> Result<HttpResponse, ServerError> {
    let level = body.into_inner();
    db.set_quantity(&level.path, level.quantity).await?;
    info!("💻️ Inventory for {} set to {}", level.path, level.quantity);
    Ok(HttpResponse::Ok().json(level))
}
