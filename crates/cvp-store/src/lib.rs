//! Storage collaborator for the contract pipeline.
//!
//! The pipeline assumes an ACID-capable store exposed through narrow
//! query/write primitives; [`Store`] is that contract and [`MemoryStore`]
//! the mutex-guarded reference implementation. The uniqueness of the
//! (user, contract, kind) notification triple lives here, at the storage
//! layer, so concurrent reminder sweeps cannot race a check-then-insert.

#![deny(unsafe_code)]

mod error;
mod memory;
mod store;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use store::Store;
