use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use bazaar_engine::{
    helpers::{Network, StandardScriptExtractor},
    test_utils::prepare_env::notification_channel,
    AddressExtractor,
    MemoryDatabase,
    PaymentReconciler,
};
use log::debug;
use tokio::sync::mpsc;

use crate::server::{configure, Reconciler};

/// The routes of the real server, wired to an in-memory store and a notification channel the test can read.
pub struct TestServer {
    pub db: MemoryDatabase,
    pub reconciler: web::Data<Reconciler>,
    pub notifications: mpsc::Receiver<Vec<u8>>,
}

impl TestServer {
    pub fn new() -> Self {
        let _ = env_logger::try_init();
        let db = MemoryDatabase::new();
        let (notifier, notifications) = notification_channel(16);
        let extractor = StandardScriptExtractor::new(Network::Mainnet);
        let reconciler = PaymentReconciler::new(db.clone(), db.clone(), extractor, notifier);
        Self { db, reconciler: web::Data::new(reconciler), notifications }
    }

    pub async fn call(&self, req: TestRequest) -> (StatusCode, String) {
        let app = App::new()
            .app_data(web::Data::new(self.db.clone()))
            .app_data(self.reconciler.clone())
            .configure(configure::<MemoryDatabase, MemoryDatabase, StandardScriptExtractor>);
        let service = test::init_service(app).await;
        debug!("Making request");
        let res = test::call_service(&service, req.to_request()).await;
        let status = res.status();
        let body = test::read_body(res).await;
        (status, String::from_utf8_lossy(&body).into_owned())
    }
}

/// A mainnet P2PKH script paying to a hash filled with `fill`, as hex, along with its address.
pub fn p2pkh(fill: u8) -> (String, String) {
    let mut script = vec![0x76, 0xa9, 0x14];
    script.extend_from_slice(&[fill; 20]);
    script.extend_from_slice(&[0x88, 0xac]);
    let address = StandardScriptExtractor::new(Network::Mainnet).first_address(&script).expect("Not a P2PKH script");
    (address, hex::encode(script))
}
