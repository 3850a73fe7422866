//! Query-time retrieval: embed the question, brute-force scan the flat
//! index by squared Euclidean distance, map the nearest vectors back onto
//! their chunks.

use serde::{Deserialize, Serialize};
use trag_core::corpus::CorpusStore;
use trag_core::error::AppError;

use crate::embeddings::Embedder;
use crate::index::IndexStore;

mod similarity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub chunk_id: String,
    pub ordinal: u32,
    pub distance: f32,
    pub text: String,
}

/// Retrieve up to `min(top_k, corpus_size)` chunks ranked nearest-first.
///
/// The question is embedded with the model recorded in the index status,
/// which is how build-time and query-time vectorization stay aligned. Ties
/// in distance break by ordinal ascending so results are deterministic.
pub fn retrieve(
    corpus: &CorpusStore,
    index: &IndexStore,
    embedder: &dyn Embedder,
    question: &str,
    top_k: u32,
) -> Result<Vec<RetrievedChunk>, AppError> {
    let q = question.trim();
    if q.is_empty() {
        return Err(AppError::new(
            "RETRIEVAL_FAILED",
            "Question must not be empty",
        ));
    }
    let top_k = top_k.max(1);

    let st = index.status()?;
    if !st.ready {
        return Err(AppError::new(
            "INDEX_NOT_READY",
            "Index not ready; build the index before querying",
        ));
    }
    let model = st
        .model
        .clone()
        .ok_or_else(|| AppError::new("INDEX_NOT_READY", "Index status missing model"))?;
    let dims = st
        .dims
        .ok_or_else(|| AppError::new("INDEX_NOT_READY", "Index status missing dims"))?;

    let qv = embedder.embed(&model, q)?;
    if qv.len() as u32 != dims {
        return Err(AppError::new(
            "RETRIEVAL_FAILED",
            "Query embedding dims do not match index dims",
        )
        .with_details(format!("index_dims={dims}; query_dims={}", qv.len())));
    }

    let entries = index.read_entries()?;
    if entries.is_empty() {
        return Err(AppError::new(
            "INDEX_NOT_READY",
            "Index vectors missing; rebuild the index",
        ));
    }

    let records = corpus.read_chunks()?;

    let mut ranked: Vec<(usize, f32)> = Vec::with_capacity(entries.len());
    for (pos, entry) in entries.iter().enumerate() {
        if entry.vector.len() as u32 != dims {
            return Err(AppError::new("RETRIEVAL_FAILED", "Index vector dims mismatch")
                .with_details(format!(
                    "chunk_id={}; expected={}; got={}",
                    entry.chunk_id,
                    dims,
                    entry.vector.len()
                )));
        }
        ranked.push((pos, similarity::squared_l2(&qv, &entry.vector)));
    }

    ranked.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(entries[a.0].ordinal.cmp(&entries[b.0].ordinal))
    });
    ranked.truncate(top_k as usize);

    let mut out: Vec<RetrievedChunk> = Vec::with_capacity(ranked.len());
    for (pos, distance) in ranked {
        let entry = &entries[pos];
        let rec = records
            .get(entry.ordinal as usize)
            .filter(|r| r.chunk_id == entry.chunk_id)
            .ok_or_else(|| {
                AppError::new(
                    "RETRIEVAL_FAILED",
                    "Corpus and index are out of sync; rebuild the index",
                )
                .with_details(format!(
                    "ordinal={}; chunk_id={}",
                    entry.ordinal, entry.chunk_id
                ))
            })?;
        out.push(RetrievedChunk {
            chunk_id: rec.chunk_id.clone(),
            ordinal: rec.ordinal,
            distance,
            text: rec.text.clone(),
        });
    }

    Ok(out)
}
