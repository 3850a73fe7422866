//! Answer synthesis: format the question and the retrieved context into the
//! tutor prompt and hand it to the generation service.

use trag_core::error::AppError;

use crate::llm::Llm;

mod prompts;

/// Join ranked context chunks and submit the tutor prompt.
///
/// `context` is the ordered chunk text list from retrieval, nearest first.
/// Everything beyond prompt assembly is delegated to the `Llm`.
pub fn synthesize_answer(
    llm: &dyn Llm,
    question: &str,
    context: &[String],
) -> Result<String, AppError> {
    let q = question.trim();
    if q.is_empty() {
        return Err(AppError::new(
            "ANSWER_FAILED",
            "Question must not be empty",
        ));
    }
    if context.is_empty() {
        return Err(AppError::new(
            "ANSWER_FAILED",
            "No context chunks were retrieved for the question",
        ));
    }

    let context_block = context.join("\n\n");
    let prompt = prompts::tutor_prompt(q, &context_block);
    llm.generate(&prompt)
}
