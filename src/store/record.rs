//! Stored document records
//!
//! A record is sealed once at ingestion: facts are ordered by page and the
//! checksum is computed over the ordered set. Records are never updated in
//! place; re-ingesting a document id replaces the whole record.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::canonical::FactSet;

use super::checksum::facts_checksum;
use super::errors::{StoreError, StoreResult};

fn doc_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("doc id pattern is a valid regex"))
}

/// Rejects ids that could escape the store directory
pub fn validate_doc_id(doc_id: &str) -> StoreResult<()> {
    if doc_id_pattern().is_match(doc_id) {
        Ok(())
    } else {
        Err(StoreError::InvalidDocId(doc_id.to_string()))
    }
}

/// Fresh random document id
pub fn generate_doc_id() -> String {
    Uuid::new_v4().to_string()
}

/// Document to be stored
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub doc_id: String,
    pub filename: Option<String>,
    pub page_count: u32,
    pub facts: FactSet,
}

impl NewDocument {
    pub fn new(doc_id: impl Into<String>, facts: FactSet) -> Self {
        Self {
            doc_id: doc_id.into(),
            filename: None,
            page_count: 0,
            facts,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_page_count(mut self, page_count: u32) -> Self {
        self.page_count = page_count;
        self
    }
}

/// Persisted form of one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub doc_id: String,
    #[serde(default)]
    pub filename: Option<String>,
    pub page_count: u32,
    pub created_at: DateTime<Utc>,
    /// CRC32 of the serialized facts
    pub checksum: u32,
    pub facts: FactSet,
}

impl DocumentRecord {
    /// Validates the id, orders facts by page and computes the checksum
    pub fn seal(doc: NewDocument, created_at: DateTime<Utc>) -> StoreResult<Self> {
        validate_doc_id(&doc.doc_id)?;
        let mut facts = doc.facts;
        facts.sort_by_page();
        let checksum = facts_checksum(&facts)?;
        Ok(Self {
            doc_id: doc.doc_id,
            filename: doc.filename,
            page_count: doc.page_count,
            created_at,
            checksum,
            facts,
        })
    }

    /// Recomputes the checksum; a mismatch is corruption
    pub fn verify(&self) -> StoreResult<()> {
        let actual = facts_checksum(&self.facts)?;
        if actual != self.checksum {
            return Err(StoreError::Corrupted(format!(
                "{}: checksum mismatch (stored {:08x}, computed {:08x})",
                self.doc_id, self.checksum, actual
            )));
        }
        Ok(())
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            doc_id: self.doc_id.clone(),
            filename: self.filename.clone(),
            page_count: self.page_count,
            created_at: self.created_at,
            units: self.facts.units.len(),
            bijections: self.facts.bijections.len(),
            grids: self.facts.grids.len(),
        }
    }
}

/// Listing entry for a stored document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub doc_id: String,
    pub filename: Option<String>,
    pub page_count: u32,
    pub created_at: DateTime<Utc>,
    pub units: usize,
    pub bijections: usize,
    pub grids: usize,
}

impl DocumentSummary {
    pub fn fact_count(&self) -> usize {
        self.units + self.bijections + self.grids
    }
}
