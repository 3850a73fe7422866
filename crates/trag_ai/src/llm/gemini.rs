use serde::Deserialize;
use trag_core::error::AppError;

use super::Llm;

/// Environment variable holding the Gemini API credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default generation model.
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-pro";

const BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Client for the hosted Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str) -> Result<Self, AppError> {
        if api_key.trim().is_empty() {
            return Err(AppError::new(
                "ANSWER_CREDENTIAL_MISSING",
                "Gemini API key is empty",
            ));
        }
        if model.trim().is_empty() {
            return Err(AppError::new(
                "ANSWER_FAILED",
                "Gemini model name is empty",
            ));
        }
        Ok(Self {
            api_key: api_key.trim().to_string(),
            model: model.trim().to_string(),
        })
    }

    /// Build a client from `GEMINI_API_KEY`. A missing credential is fatal
    /// here, before any retrieval or generation is attempted.
    pub fn from_env(model: &str) -> Result<Self, AppError> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            AppError::new(
                "ANSWER_CREDENTIAL_MISSING",
                "Gemini API key not set in the environment",
            )
            .with_details(format!("env={API_KEY_ENV}"))
        })?;
        Self::new(&api_key, model)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Clone, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

impl Llm for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, AppError> {
        let url = format!(
            "{BASE_URL}/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let resp = ureq::post(&url)
            .timeout(std::time::Duration::from_secs(30))
            .send_json(body);

        match resp {
            Ok(r) if r.status() == 200 => {
                let v: GenerateContentResponse = r.into_json().map_err(|e| {
                    AppError::new("ANSWER_FAILED", "Failed to decode generation response")
                        .with_details(e.to_string())
                })?;
                let text = v
                    .candidates
                    .first()
                    .and_then(|c| c.content.as_ref())
                    .map(|c| {
                        c.parts
                            .iter()
                            .map(|p| p.text.as_str())
                            .collect::<Vec<_>>()
                            .join("")
                    })
                    .unwrap_or_default();
                if text.trim().is_empty() {
                    return Err(AppError::new(
                        "ANSWER_FAILED",
                        "Generation response was empty",
                    ));
                }
                Ok(text)
            }
            Ok(r) => Err(AppError::new("ANSWER_FAILED", "Generation request failed")
                .with_details(format!("status={}", r.status()))),
            Err(e) => Err(
                AppError::new("ANSWER_FAILED", "Failed to call generation endpoint")
                    .with_details(e.to_string())
                    .with_retryable(true),
            ),
        }
    }
}
