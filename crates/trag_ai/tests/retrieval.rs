use trag_ai::embeddings::Embedder;
use trag_ai::index::{IndexBuildInput, IndexStore};
use trag_ai::retrieve::retrieve;
use trag_core::corpus::CorpusStore;
use trag_core::error::AppError;

// Embeds text as [count('a'), count('b')] so distances are easy to reason
// about by hand.
struct CountABEmbedder;

impl Embedder for CountABEmbedder {
    fn embed(&self, _model: &str, input: &str) -> Result<Vec<f32>, AppError> {
        let mut a = 0u32;
        let mut b = 0u32;
        for ch in input.chars() {
            if ch == 'a' {
                a += 1;
            } else if ch == 'b' {
                b += 1;
            }
        }
        Ok(vec![a as f32, b as f32])
    }
}

struct ConstantEmbedder;

impl Embedder for ConstantEmbedder {
    fn embed(&self, _model: &str, _input: &str) -> Result<Vec<f32>, AppError> {
        Ok(vec![1.0, 1.0])
    }
}

fn build_input() -> IndexBuildInput {
    IndexBuildInput {
        model: "mock".to_string(),
        updated_at: "2026-08-30T00:00:00Z".to_string(),
    }
}

fn seeded_stores(chunks: &[&str]) -> (tempfile::TempDir, CorpusStore, IndexStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let corpus = CorpusStore::open(dir.path().to_path_buf());
    corpus
        .write_chunks(&chunks.iter().map(|s| s.to_string()).collect::<Vec<_>>())
        .expect("write_chunks");
    let index = IndexStore::open(dir.path().to_path_buf());
    index
        .build_with_embedder(&corpus, &CountABEmbedder, build_input())
        .expect("build_index");
    (dir, corpus, index)
}

#[test]
fn ranks_by_ascending_distance() {
    let (_dir, corpus, index) = seeded_stores(&["aaaa", "bbbb", "aabb"]);

    let hits = retrieve(&corpus, &index, &CountABEmbedder, "aaaa", 3).expect("retrieve");
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].text, "aaaa");
    assert_eq!(hits[0].distance, 0.0);
    for pair in hits.windows(2) {
        assert!(pair[0].distance <= pair[1].distance);
    }
}

#[test]
fn query_identical_to_a_chunk_returns_it_first() {
    let (_dir, corpus, index) = seeded_stores(&["aaab", "abbb", "aabb"]);

    let hits = retrieve(&corpus, &index, &CountABEmbedder, "aaab", 3).expect("retrieve");
    assert_eq!(hits[0].ordinal, 0);
    assert_eq!(hits[0].distance, 0.0);
}

#[test]
fn top_k_larger_than_corpus_returns_everything() {
    let (_dir, corpus, index) = seeded_stores(&["aaaa", "bbbb", "aabb"]);

    let hits = retrieve(&corpus, &index, &CountABEmbedder, "ab", 10).expect("retrieve");
    assert_eq!(hits.len(), 3);
}

#[test]
fn top_k_caps_the_result_count() {
    let (_dir, corpus, index) = seeded_stores(&["aaaa", "bbbb", "aabb"]);

    let hits = retrieve(&corpus, &index, &CountABEmbedder, "aaaa", 1).expect("retrieve");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].text, "aaaa");
}

#[test]
fn equal_distances_tie_break_by_ordinal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let corpus = CorpusStore::open(dir.path().to_path_buf());
    corpus
        .write_chunks(&["x".to_string(), "y".to_string(), "z".to_string()])
        .expect("write_chunks");
    let index = IndexStore::open(dir.path().to_path_buf());
    index
        .build_with_embedder(&corpus, &ConstantEmbedder, build_input())
        .expect("build_index");

    let hits = retrieve(&corpus, &index, &ConstantEmbedder, "anything", 3).expect("retrieve");
    let ordinals: Vec<u32> = hits.iter().map(|h| h.ordinal).collect();
    assert_eq!(ordinals, vec![0, 1, 2]);
}

#[test]
fn retrieval_is_deterministic() {
    let (_dir, corpus, index) = seeded_stores(&["aaaa", "bbbb", "aabb"]);

    let a = retrieve(&corpus, &index, &CountABEmbedder, "aab", 3).expect("retrieve a");
    let b = retrieve(&corpus, &index, &CountABEmbedder, "aab", 3).expect("retrieve b");
    let ids_a: Vec<&str> = a.iter().map(|h| h.chunk_id.as_str()).collect();
    let ids_b: Vec<&str> = b.iter().map(|h| h.chunk_id.as_str()).collect();
    assert_eq!(ids_a, ids_b);
}

#[test]
fn empty_question_is_rejected() {
    let (_dir, corpus, index) = seeded_stores(&["aaaa"]);

    let err = retrieve(&corpus, &index, &CountABEmbedder, "   ", 3).expect_err("must fail");
    assert_eq!(err.code, "RETRIEVAL_FAILED");
}

#[test]
fn unbuilt_index_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let corpus = CorpusStore::open(dir.path().to_path_buf());
    corpus
        .write_chunks(&["aaaa".to_string()])
        .expect("write_chunks");
    let index = IndexStore::open(dir.path().to_path_buf());

    let err = retrieve(&corpus, &index, &CountABEmbedder, "aaaa", 3).expect_err("must fail");
    assert_eq!(err.code, "INDEX_NOT_READY");
}

#[test]
fn stale_index_against_rechunked_corpus_is_detected() {
    let (_dir, corpus, index) = seeded_stores(&["aaaa", "bbbb"]);

    // Re-chunk without rebuilding: the explicit chunk_id check must refuse
    // to serve results from the stale index.
    corpus
        .write_chunks(&["bbbb".to_string(), "aaaa".to_string()])
        .expect("rewrite corpus");

    let err = retrieve(&corpus, &index, &CountABEmbedder, "aaaa", 2).expect_err("must fail");
    assert_eq!(err.code, "RETRIEVAL_FAILED");
}
