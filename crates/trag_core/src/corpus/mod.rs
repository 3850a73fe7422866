//! Persisted chunk corpus.
//!
//! The ordered chunk list is the build-phase artifact the retriever maps
//! index positions back onto, so ordinal order here must match vector order
//! in the index one-to-one. Each record also carries an explicit stable
//! `chunk_id` so a corpus/index mismatch can be detected instead of
//! silently corrupting retrieval.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkRecord {
    pub chunk_id: String,
    pub ordinal: u32,
    pub text: String,
    pub text_sha256: String,
}

#[derive(Debug, Clone)]
pub struct CorpusStore {
    root: PathBuf,
}

impl CorpusStore {
    pub fn open(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    fn chunks_path(&self) -> PathBuf {
        self.root.join("chunks.json")
    }

    fn ensure_dirs(&self) -> Result<(), AppError> {
        fs::create_dir_all(self.root.as_path()).map_err(|e| {
            AppError::new("CORPUS_STORE_FAILED", "Failed to create corpus directory")
                .with_details(format!("path={}; err={}", self.root.display(), e))
        })
    }

    /// Persist the ordered chunk list, replacing any previous corpus.
    ///
    /// Ordinals are assigned from input position. There is no incremental
    /// update path; re-chunking always rewrites the whole corpus (and
    /// requires rebuilding the index).
    pub fn write_chunks(&self, chunks: &[String]) -> Result<Vec<ChunkRecord>, AppError> {
        self.ensure_dirs()?;

        let records: Vec<ChunkRecord> = chunks
            .iter()
            .enumerate()
            .map(|(i, text)| chunk_record(i as u32, text))
            .collect();

        let path = self.chunks_path();
        let tmp = path.with_extension("tmp");
        let json = serde_json::to_string_pretty(&records).map_err(|e| {
            AppError::new("CORPUS_STORE_FAILED", "Failed to encode chunk list")
                .with_details(e.to_string())
        })?;
        fs::write(&tmp, json.as_bytes()).map_err(|e| {
            AppError::new("CORPUS_STORE_FAILED", "Failed to write chunk list")
                .with_details(format!("path={}; err={}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &path).map_err(|e| {
            AppError::new("CORPUS_STORE_FAILED", "Failed to finalize chunk list write")
                .with_details(format!(
                    "tmp={}; dest={}; err={}",
                    tmp.display(),
                    path.display(),
                    e
                ))
        })?;

        Ok(records)
    }

    /// Read the persisted chunk list in ordinal order.
    pub fn read_chunks(&self) -> Result<Vec<ChunkRecord>, AppError> {
        let path = self.chunks_path();
        if !path.exists() {
            return Err(AppError::new(
                "CORPUS_NOT_FOUND",
                "Chunk corpus not found; run the chunk stage first",
            )
            .with_details(format!("path={}", path.display())));
        }
        let bytes = fs::read(&path).map_err(|e| {
            AppError::new("CORPUS_STORE_FAILED", "Failed to read chunk list")
                .with_details(format!("path={}; err={}", path.display(), e))
        })?;
        let mut records: Vec<ChunkRecord> = serde_json::from_slice(&bytes).map_err(|e| {
            AppError::new("CORPUS_STORE_FAILED", "Failed to decode chunk list")
                .with_details(format!("path={}; err={}", path.display(), e))
        })?;
        records.sort_by_key(|r| r.ordinal);
        Ok(records)
    }
}

fn chunk_record(ordinal: u32, text: &str) -> ChunkRecord {
    let text_sha256 = sha256_hex(text.as_bytes());
    let id_input = format!("v1|{ordinal}|{text_sha256}");
    ChunkRecord {
        chunk_id: sha256_hex(id_input.as_bytes()),
        ordinal,
        text: text.to_string(),
        text_sha256,
    }
}

pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    hex::encode(digest)
}
