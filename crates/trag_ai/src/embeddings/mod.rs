use trag_core::error::AppError;

/// Vectorization capability. The same `Embedder` (and model) must be used
/// to build the index and to embed queries; tests substitute deterministic
/// fakes.
pub trait Embedder {
    fn embed(&self, model: &str, input: &str) -> Result<Vec<f32>, AppError>;
}

pub mod ollama_embed;
