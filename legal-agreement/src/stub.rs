//! Mock host stub for driving the contract in tests and tools.

use uuid::Uuid;

use crate::context::Transaction;
use crate::contract::LegalAgreementContract;
use crate::response::Response;
use crate::store::MemoryStore;

/// A host stand-in that owns an in-memory store and opens one transaction
/// per call, each with a fresh transaction id.
#[derive(Default)]
pub struct MockStub {
    store: MemoryStore,
}

impl MockStub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing store, e.g. one seeded with raw entries.
    pub fn with_store(store: MemoryStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Raw value at `key`, as the host would see it.
    pub fn get_state(&self, key: &str) -> Option<Vec<u8>> {
        self.store.raw(key)
    }

    pub fn mock_init(&self, contract: &LegalAgreementContract) -> Response {
        let tx_id = new_tx_id();
        contract.init(&Transaction::new(&self.store, tx_id))
    }

    /// Invoke `function` in a new transaction.
    pub fn mock_invoke(
        &self,
        contract: &LegalAgreementContract,
        function: &str,
        args: &[&str],
    ) -> Response {
        self.mock_invoke_with_tx(contract, &new_tx_id(), function, args)
    }

    /// Invoke `function` in a transaction with a caller-chosen id.
    pub fn mock_invoke_with_tx(
        &self,
        contract: &LegalAgreementContract,
        tx_id: &str,
        function: &str,
        args: &[&str],
    ) -> Response {
        let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
        contract.invoke(&Transaction::new(&self.store, tx_id), function, &args)
    }
}

fn new_tx_id() -> String {
    Uuid::new_v4().to_string()
}
