//! File-backed flat vector index.
//!
//! The index is a brute-force structure: one vector per chunk, stored in
//! chunk-ordinal order next to the chunk_id it was computed from. It is
//! built once offline and loaded read-only at query time; there is no
//! incremental update path, a rebuild always replaces both artifacts.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use trag_core::corpus::CorpusStore;
use trag_core::error::AppError;

use crate::embeddings::Embedder;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStatus {
    pub ready: bool,
    /// Embedding model the vectors were produced with. Queries must embed
    /// with the same model; this is the only record of it.
    pub model: Option<String>,
    pub dims: Option<u32>,
    pub chunk_count: u32,
    pub updated_at: Option<String>,
}

impl IndexStatus {
    fn not_ready() -> Self {
        Self {
            ready: false,
            model: None,
            dims: None,
            chunk_count: 0,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexBuildInput {
    pub model: String,
    pub updated_at: String,
}

/// One indexed vector, at the same position as its chunk in the corpus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexEntry {
    pub chunk_id: String,
    pub ordinal: u32,
    pub vector: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct IndexStore {
    root: PathBuf,
}

impl IndexStore {
    pub fn open(root: PathBuf) -> Self {
        Self { root }
    }

    fn index_dir(&self) -> PathBuf {
        self.root.join("index")
    }

    fn status_path(&self) -> PathBuf {
        self.index_dir().join("status.json")
    }

    fn vectors_path(&self) -> PathBuf {
        self.index_dir().join("vectors.json")
    }

    fn ensure_dirs(&self) -> Result<(), AppError> {
        fs::create_dir_all(self.index_dir()).map_err(|e| {
            AppError::new("INDEX_BUILD_FAILED", "Failed to create index directory")
                .with_details(format!("path={}; err={}", self.index_dir().display(), e))
        })
    }

    pub fn status(&self) -> Result<IndexStatus, AppError> {
        let path = self.status_path();
        if !path.exists() {
            return Ok(IndexStatus::not_ready());
        }
        let bytes = fs::read(&path).map_err(|e| {
            AppError::new("INDEX_BUILD_FAILED", "Failed to read index status")
                .with_details(format!("path={}; err={}", path.display(), e))
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            AppError::new("INDEX_BUILD_FAILED", "Failed to decode index status")
                .with_details(format!("path={}; err={}", path.display(), e))
        })
    }

    fn write_status(&self, st: &IndexStatus) -> Result<(), AppError> {
        self.ensure_dirs()?;
        let path = self.status_path();
        let tmp = path.with_extension("tmp");
        let json = serde_json::to_string_pretty(st).map_err(|e| {
            AppError::new("INDEX_BUILD_FAILED", "Failed to encode index status")
                .with_details(e.to_string())
        })?;
        fs::write(&tmp, json.as_bytes()).map_err(|e| {
            AppError::new("INDEX_BUILD_FAILED", "Failed to write index status")
                .with_details(format!("path={}; err={}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &path).map_err(|e| {
            AppError::new("INDEX_BUILD_FAILED", "Failed to finalize index status write")
                .with_details(format!(
                    "tmp={}; dest={}; err={}",
                    tmp.display(),
                    path.display(),
                    e
                ))
        })?;
        Ok(())
    }

    fn write_entries(&self, entries: &[IndexEntry]) -> Result<(), AppError> {
        self.ensure_dirs()?;
        let path = self.vectors_path();
        let tmp = path.with_extension("tmp");
        let json = serde_json::to_string_pretty(entries).map_err(|e| {
            AppError::new("INDEX_BUILD_FAILED", "Failed to encode index vectors")
                .with_details(e.to_string())
        })?;
        fs::write(&tmp, json.as_bytes()).map_err(|e| {
            AppError::new("INDEX_BUILD_FAILED", "Failed to write index vectors")
                .with_details(format!("path={}; err={}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &path).map_err(|e| {
            AppError::new("INDEX_BUILD_FAILED", "Failed to finalize index vectors write")
                .with_details(format!(
                    "tmp={}; dest={}; err={}",
                    tmp.display(),
                    path.display(),
                    e
                ))
        })?;
        Ok(())
    }

    /// Read the persisted vectors in chunk-ordinal order.
    pub fn read_entries(&self) -> Result<Vec<IndexEntry>, AppError> {
        let path = self.vectors_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let bytes = fs::read(&path).map_err(|e| {
            AppError::new("INDEX_BUILD_FAILED", "Failed to read index vectors")
                .with_details(format!("path={}; err={}", path.display(), e))
        })?;
        let mut entries: Vec<IndexEntry> = serde_json::from_slice(&bytes).map_err(|e| {
            AppError::new("INDEX_BUILD_FAILED", "Failed to decode index vectors")
                .with_details(format!("path={}; err={}", path.display(), e))
        })?;
        entries.sort_by_key(|e| e.ordinal);
        Ok(entries)
    }

    /// Embed every corpus chunk in ordinal order and persist the flat index.
    ///
    /// Dimensionality must be constant across all vectors; a mismatch aborts
    /// the build. Vectors and status are only written after every embedding
    /// call has succeeded, each via tmp+rename.
    pub fn build_with_embedder(
        &self,
        corpus: &CorpusStore,
        embedder: &dyn Embedder,
        input: IndexBuildInput,
    ) -> Result<IndexStatus, AppError> {
        self.ensure_dirs()?;

        let records = corpus.read_chunks()?;
        if records.is_empty() {
            return Err(AppError::new(
                "INDEX_EMPTY_CORPUS",
                "Corpus has no chunks; chunk the text before building the index",
            ));
        }

        let mut dims: Option<u32> = None;
        let mut entries: Vec<IndexEntry> = Vec::with_capacity(records.len());

        for rec in records.iter() {
            let v = embedder.embed(&input.model, &rec.text).map_err(|e| {
                AppError::new("EMBEDDINGS_FAILED", "Failed to compute chunk embedding")
                    .with_details(format!("chunk_id={}; err={}", rec.chunk_id, e))
                    .with_retryable(e.retryable)
            })?;
            let this_dims = v.len() as u32;
            match dims {
                Some(d) if d != this_dims => {
                    return Err(AppError::new(
                        "INDEX_BUILD_FAILED",
                        "Embedding dimension mismatch across chunks",
                    )
                    .with_details(format!(
                        "expected={}; got={}; chunk_id={}",
                        d, this_dims, rec.chunk_id
                    )));
                }
                Some(_) => {}
                None => dims = Some(this_dims),
            }
            entries.push(IndexEntry {
                chunk_id: rec.chunk_id.clone(),
                ordinal: rec.ordinal,
                vector: v,
            });
        }

        self.write_entries(&entries)?;

        let status = IndexStatus {
            ready: true,
            model: Some(input.model),
            dims,
            chunk_count: entries.len() as u32,
            updated_at: Some(input.updated_at),
        };
        self.write_status(&status)?;
        Ok(status)
    }
}
