//! Pixvault Document Store Library
//!
//! Point read/create/update/delete of image metadata records by content
//! hash. The trait contract encodes the two clauses the orchestration layer
//! depends on: `create` is atomic (on conflict the caller re-reads), and
//! the transition out of `processing` happens at most once.

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod traits;

pub use memory::MemoryDocumentStore;
#[cfg(feature = "postgres")]
pub use postgres::PgDocumentStore;
pub use traits::{CreateOutcome, DocResult, DocStoreError, DocumentStore, ExtractionUpdate};
