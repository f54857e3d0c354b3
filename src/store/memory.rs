//! In-memory fact store

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::Utc;

use crate::canonical::FactSet;

use super::errors::{StoreError, StoreResult};
use super::record::{validate_doc_id, DocumentRecord, DocumentSummary, NewDocument};
use super::FactStore;

/// Fact store held in process memory. Keyed by doc id, so listing is sorted.
#[derive(Debug, Default)]
pub struct MemoryFactStore {
    documents: RwLock<BTreeMap<String, DocumentRecord>>,
}

fn poisoned() -> StoreError {
    StoreError::Io("store lock poisoned".to_string())
}

impl MemoryFactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FactStore for MemoryFactStore {
    fn get_facts(&self, doc_id: &str) -> StoreResult<FactSet> {
        validate_doc_id(doc_id)?;
        let documents = self.documents.read().map_err(|_| poisoned())?;
        let record = documents
            .get(doc_id)
            .ok_or_else(|| StoreError::NotFound(doc_id.to_string()))?;
        record.verify()?;
        Ok(record.facts.clone())
    }

    fn put_document(&self, doc: NewDocument) -> StoreResult<DocumentSummary> {
        let record = DocumentRecord::seal(doc, Utc::now())?;
        let summary = record.summary();
        let mut documents = self.documents.write().map_err(|_| poisoned())?;
        documents.insert(record.doc_id.clone(), record);
        Ok(summary)
    }

    fn list_documents(&self) -> StoreResult<Vec<DocumentSummary>> {
        let documents = self.documents.read().map_err(|_| poisoned())?;
        Ok(documents.values().map(DocumentRecord::summary).collect())
    }

    fn delete_document(&self, doc_id: &str) -> StoreResult<()> {
        validate_doc_id(doc_id)?;
        let mut documents = self.documents.write().map_err(|_| poisoned())?;
        documents
            .remove(doc_id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(doc_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::{Point, Unit};

    fn facts(doc_id: &str) -> FactSet {
        FactSet::new(
            vec![
                Unit::new("b", 2.0, Point::new(0.0, 0.0), doc_id, 2),
                Unit::new("a", 1.0, Point::new(0.0, 0.0), doc_id, 1),
            ],
            vec![],
            vec![],
        )
    }

    #[test]
    fn test_unknown_document_is_not_found() {
        let store = MemoryFactStore::new();
        assert_eq!(store.get_facts("missing"), Err(StoreError::NotFound("missing".into())));
    }

    #[test]
    fn test_known_document_without_facts_is_empty() {
        let store = MemoryFactStore::new();
        store.put_document(NewDocument::new("empty", FactSet::default())).unwrap();
        assert!(store.get_facts("empty").unwrap().is_empty());
    }

    #[test]
    fn test_facts_ordered_by_page() {
        let store = MemoryFactStore::new();
        store.put_document(NewDocument::new("doc1", facts("doc1"))).unwrap();
        let ids: Vec<String> = store.get_facts("doc1").unwrap().units.into_iter().map(|u| u.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_list_and_delete() {
        let store = MemoryFactStore::new();
        store.put_document(NewDocument::new("zeta", facts("zeta"))).unwrap();
        store.put_document(NewDocument::new("alpha", FactSet::default())).unwrap();

        let listed: Vec<String> = store.list_documents().unwrap().into_iter().map(|s| s.doc_id).collect();
        assert_eq!(listed, vec!["alpha", "zeta"]);

        store.delete_document("zeta").unwrap();
        assert!(store.get_facts("zeta").unwrap_err().is_not_found());
        assert!(store.delete_document("zeta").unwrap_err().is_not_found());
    }

    #[test]
    fn test_invalid_doc_id_rejected() {
        let store = MemoryFactStore::new();
        assert!(matches!(store.get_facts("../x"), Err(StoreError::InvalidDocId(_))));
    }
}
