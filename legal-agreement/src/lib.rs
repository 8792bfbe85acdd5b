//! Legal Agreement - ledger contract for agreements, signings and identities
//!
//! Provides:
//! - Immutable, globally versioned legal agreements with a content hash
//! - Signings that bind a user to the exact text of one agreement
//! - User identities referencing a signing transaction
//! - Latest-version and latest-signing-by-user queries over the whole store
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        LegalAgreementContract           │
//! │   (command routing, status mapping)     │
//! └────────────────┬────────────────────────┘
//!                  │
//!      ┌───────────┼───────────────┐
//!      ▼           ▼               ▼
//! ┌──────────┐ ┌──────────┐ ┌─────────────┐
//! │ Ledgers  │ │ Scanners │ │ EventSink   │
//! │ (create/ │ │ (latest  │ │ (tracing,   │
//! │  read)   │ │  queries)│ │  audit)     │
//! └────┬─────┘ └────┬─────┘ └─────────────┘
//!      └─────┬──────┘
//!            ▼
//!   ┌──────────────────┐
//!   │ KeyedRecordStore │
//!   └──────────────────┘
//! ```

pub mod agreement;
pub mod audit;
pub mod config;
pub mod context;
pub mod contract;
pub mod error;
pub mod identity;
pub mod response;
pub mod scan;
pub mod signing;
pub mod sink;
pub mod store;
pub mod stub;

// Re-export main types for convenience
pub use audit::{AuditEntry, AuditLog, AuditStats};
pub use config::{ContractConfig, MalformedPolicy};
pub use context::{Fetched, LedgerContext, Transaction};
pub use contract::{Command, LegalAgreementContract};
pub use error::ContractError;
pub use response::{Response, ResponseEnvelope, Status};
pub use sink::{EventSink, FanoutSink, LedgerEvent, TracingSink};
pub use store::{KeyedRecordStore, MemoryStore, StoreError};
pub use stub::MockStub;
