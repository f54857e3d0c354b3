//! JSON-file fact store
//!
//! Layout: `<data_dir>/documents/<doc_id>.json`, one sealed record per file.
//! Writes go to `<doc_id>.json.tmp`, are fsynced, then renamed into place,
//! so a reader never sees a half-written record. Every read re-verifies the
//! record checksum.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::canonical::FactSet;

use super::errors::{StoreError, StoreResult};
use super::record::{validate_doc_id, DocumentRecord, DocumentSummary, NewDocument};
use super::FactStore;

const DOCUMENTS_DIR: &str = "documents";
const RECORD_EXT: &str = "json";

/// Fact store persisted under a data directory
#[derive(Debug, Clone)]
pub struct FileFactStore {
    documents_dir: PathBuf,
}

impl FileFactStore {
    /// Opens the store, creating `<data_dir>/documents` if missing
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        let documents_dir = data_dir.join(DOCUMENTS_DIR);
        fs::create_dir_all(&documents_dir).map_err(|e| {
            StoreError::Io(format!(
                "failed to create documents directory {}: {}",
                documents_dir.display(),
                e
            ))
        })?;
        Ok(Self { documents_dir })
    }

    pub fn documents_dir(&self) -> &Path {
        &self.documents_dir
    }

    fn record_path(&self, doc_id: &str) -> PathBuf {
        self.documents_dir.join(format!("{}.{}", doc_id, RECORD_EXT))
    }

    fn read_record(&self, doc_id: &str) -> StoreResult<DocumentRecord> {
        let path = self.record_path(doc_id);
        let bytes = fs::read(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound(doc_id.to_string())
            } else {
                StoreError::Io(format!("failed to read {}: {}", path.display(), e))
            }
        })?;

        let record: DocumentRecord = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::Corrupted(format!("{}: unreadable record: {}", doc_id, e)))?;

        if record.doc_id != doc_id {
            return Err(StoreError::Corrupted(format!(
                "{}: record belongs to {}",
                doc_id, record.doc_id
            )));
        }
        record.verify()?;
        Ok(record)
    }

    fn write_record(&self, record: &DocumentRecord) -> StoreResult<()> {
        let path = self.record_path(&record.doc_id);
        let tmp_path = path.with_extension(format!("{}.tmp", RECORD_EXT));
        let bytes = serde_json::to_vec_pretty(record)?;

        let mut file = File::create(&tmp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Doc ids with a record file, sorted
    fn stored_ids(&self) -> StoreResult<Vec<String>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.documents_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if validate_doc_id(stem).is_ok() {
                    ids.push(stem.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}

impl FactStore for FileFactStore {
    fn get_facts(&self, doc_id: &str) -> StoreResult<FactSet> {
        validate_doc_id(doc_id)?;
        Ok(self.read_record(doc_id)?.facts)
    }

    fn put_document(&self, doc: NewDocument) -> StoreResult<DocumentSummary> {
        let record = DocumentRecord::seal(doc, Utc::now())?;
        self.write_record(&record)?;
        Ok(record.summary())
    }

    fn list_documents(&self) -> StoreResult<Vec<DocumentSummary>> {
        self.stored_ids()?
            .iter()
            .map(|id| self.read_record(id).map(|r| r.summary()))
            .collect()
    }

    fn delete_document(&self, doc_id: &str) -> StoreResult<()> {
        validate_doc_id(doc_id)?;
        let path = self.record_path(doc_id);
        fs::remove_file(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound(doc_id.to_string())
            } else {
                StoreError::Io(format!("failed to delete {}: {}", path.display(), e))
            }
        })
    }
}
