use bazaar_engine::{
    db_types::{Contract, OrderId, OrderState, TrackedOrder},
    test_utils::{
        fixtures::PlainTextAddresses,
        prepare_env::{notification_channel, prepare_test_env},
    },
    InventoryStore,
    MemoryDatabase,
    PaymentReconciler,
};
use tokio::sync::mpsc;

pub type TestReconciler = PaymentReconciler<MemoryDatabase, MemoryDatabase, PlainTextAddresses>;

pub struct TestSystem {
    pub db: MemoryDatabase,
    pub reconciler: TestReconciler,
    pub notifications: mpsc::Receiver<Vec<u8>>,
}

pub async fn setup(inventory: &[(&str, i64)]) -> TestSystem {
    prepare_test_env();
    let db = MemoryDatabase::new();
    for (path, qty) in inventory {
        db.set_quantity(path, *qty).await.expect("Could not stock inventory");
    }
    let (notifier, notifications) = notification_channel(64);
    let reconciler = PaymentReconciler::new(db.clone(), db.clone(), PlainTextAddresses, notifier);
    TestSystem { db, reconciler, notifications }
}

impl TestSystem {
    pub fn sale(&self, contract: Contract, state: OrderState) -> OrderId {
        self.db.insert_sale(contract, state).expect("Could not insert sale")
    }

    pub fn purchase(&self, contract: Contract, state: OrderState) -> OrderId {
        self.db.insert_purchase(contract, state).expect("Could not insert purchase")
    }

    pub fn fetch_sale(&self, id: &OrderId) -> TrackedOrder {
        self.db.fetch_sale(id).expect("Database error").expect("Sale does not exist")
    }

    pub fn fetch_purchase(&self, id: &OrderId) -> TrackedOrder {
        self.db.fetch_purchase(id).expect("Database error").expect("Purchase does not exist")
    }
}
