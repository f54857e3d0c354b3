//! Fact store for akili
//!
//! The engine reads one document's facts per query through `FactStore`.
//! Facts are written once at ingestion and never mutated afterwards.
//!
//! # Guarantees
//!
//! - `get_facts` fails with `NotFound` only for an unknown document
//! - A known document with no facts yields an empty `FactSet`
//! - Each fact sequence is ordered by page, stable within a page
//! - Checksums are verified on every read; corruption is never served

mod checksum;
mod errors;
mod file;
mod memory;
mod record;

pub use checksum::{compute_checksum, facts_checksum, verify_checksum};
pub use errors::{StoreError, StoreResult};
pub use file::FileFactStore;
pub use memory::MemoryFactStore;
pub use record::{generate_doc_id, validate_doc_id, DocumentRecord, DocumentSummary, NewDocument};

use crate::canonical::FactSet;

/// Read/write access to stored documents
pub trait FactStore: Send + Sync {
    /// All facts of one document
    fn get_facts(&self, doc_id: &str) -> StoreResult<FactSet>;

    /// Stores a document, replacing any record with the same id
    fn put_document(&self, doc: NewDocument) -> StoreResult<DocumentSummary>;

    /// Summaries of all documents, sorted by doc id
    fn list_documents(&self) -> StoreResult<Vec<DocumentSummary>>;

    fn delete_document(&self, doc_id: &str) -> StoreResult<()>;
}
