//! Record kinds for the legal agreement ledger.
//!
//! Three kinds of record share one flat, unprefixed key space:
//!
//! - **Legal agreement**: versioned document, keyed by `ID`, carrying a
//!   server-computed content hash
//! - **Legal agreement signing**: acceptance of one agreement version, keyed
//!   by `ID`, linked to the agreement through its content hash
//! - **User identity**: keyed by `userID`, referencing a signing transaction
//!
//! Because nothing in the key tells the kinds apart, every stored value is
//! classified by the [`discriminator`] before it is trusted.
//!
//! # Example
//!
//! ```ignore
//! use ledger_records::{classify, Classification, LegalAgreement};
//!
//! match classify::<LegalAgreement>(&raw) {
//!     Classification::Match(agreement) => println!("v{}", agreement.version),
//!     Classification::NotThisKind(_) => {}
//!     Classification::Malformed(failure) => return Err(failure.into()),
//! }
//! ```

pub mod discriminator;
pub mod hashing;
pub mod types;

pub use discriminator::{classify, Classification, DecodeFailure, StoredRecord};
pub use hashing::{compute_hash, content_hash};
pub use types::*;
