use trag_core::error::AppError;

/// Text-generation capability. The hosted service is an unreliable remote
/// dependency; everything up to the ranked chunk list is testable without
/// it by substituting a fake.
pub trait Llm {
    fn generate(&self, prompt: &str) -> Result<String, AppError>;
}

pub mod gemini;
