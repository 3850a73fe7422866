pub mod answer;
pub mod embeddings;
pub mod index;
pub mod llm;
pub mod ollama;
pub mod retrieve;

#[cfg(test)]
mod tests {
    use super::llm::gemini::GeminiClient;
    use super::ollama::OllamaClient;

    #[test]
    fn enforces_localhost_only_base_url() {
        assert!(OllamaClient::new("http://127.0.0.1:11434").is_ok());
        assert!(OllamaClient::new("http://127.0.0.1").is_ok());
        assert!(OllamaClient::new("http://127.0.0.1:11434/").is_ok()); // trailing slash is trimmed

        assert!(OllamaClient::new("http://localhost:11434").is_err());
        assert!(OllamaClient::new("http://0.0.0.0:11434").is_err());
        assert!(OllamaClient::new("https://example.com").is_err());

        // Harden against prefix-based bypasses.
        assert!(OllamaClient::new("http://127.0.0.1.evil.com:11434").is_err());
        assert!(OllamaClient::new("http://127.0.0.1@evil.com:11434").is_err());
        assert!(OllamaClient::new("http://127.0.0.1:").is_err());
        assert!(OllamaClient::new("http://127.0.0.1:0").is_err());
        assert!(OllamaClient::new("http://127.0.0.1:99999").is_err());
        assert!(OllamaClient::new("http://127.0.0.1:11434/api").is_err());
    }

    #[test]
    fn gemini_client_requires_a_credential() {
        let err = GeminiClient::new("", "gemini-pro").expect_err("must fail");
        assert_eq!(err.code, "ANSWER_CREDENTIAL_MISSING");

        let err = GeminiClient::new("   ", "gemini-pro").expect_err("must fail");
        assert_eq!(err.code, "ANSWER_CREDENTIAL_MISSING");

        assert!(GeminiClient::new("key-123", "gemini-pro").is_ok());
    }

    #[test]
    fn gemini_client_requires_a_model_name() {
        let err = GeminiClient::new("key-123", " ").expect_err("must fail");
        assert_eq!(err.code, "ANSWER_FAILED");
    }
}
