pub fn tutor_prompt(question: &str, context: &str) -> String {
    // Keep the contract explicit:
    // - Answer ONLY from the retrieved context.
    // - Admit when the context is insufficient.
    format!(
        r#"You are a helpful tutor for a data structures and algorithms textbook.

Rules (non-negotiable):
1) Use ONLY the context below to answer the question. Do not invent facts.
2) Be clear and concise.
3) If the context is insufficient to answer, say so explicitly.

Context:
{context}

Question:
{question}
"#
    )
}
