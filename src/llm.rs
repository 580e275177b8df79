use crate::config::AdvisorConfig;
use crate::error::GenerationError;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    Mock,
}

impl Provider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Some(Provider::Gemini),
            "mock" => Some(Provider::Mock),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::Mock => "mock",
        }
    }

    pub fn requires_api_key(self) -> bool {
        matches!(self, Provider::Gemini)
    }
}

/// Narrow text-generation capability: one prompt in, one text out.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

pub struct GeminiGenerator {
    http: Client,
    api_base: String,
    model: String,
    api_key: String,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiGenerator {
    pub fn new(api_base: &str, model: &str, api_key: &str) -> Result<Self, GenerationError> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

#[async_trait::async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = GenerateContentRequest {
            contents: [Content { parts: [Part { text: prompt }] }],
        };
        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "sending generateContent");
        let res = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;
        let status = res.status();
        tracing::debug!(status = status.as_u16(), "generateContent responded");
        if status != StatusCode::OK {
            let text = res.text().await.unwrap_or_default();
            return Err(GenerationError::Api { status: status.as_u16(), body: text });
        }
        let text = res.text().await?;
        extract_text(&text)
    }
}

/// Pulls the first candidate's text out of a generateContent body.
fn extract_text(body: &str) -> Result<String, GenerationError> {
    let parsed: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::Malformed { message: e.to_string() })?;
    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::Empty);
    }
    Ok(trimmed.to_string())
}

/// Deterministic offline generator for tests and demos.
pub struct MockGenerator;

#[async_trait::async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let facts = prompt
            .lines()
            .filter(|l| l.starts_with("- "))
            .count();
        Ok(format!("[stub answer] {} facts received; 3 tips would go here.", facts))
    }
}

pub fn build_generator(cfg: &AdvisorConfig) -> Result<Box<dyn TextGenerator>, GenerationError> {
    match cfg.provider {
        Provider::Gemini => Ok(Box::new(GeminiGenerator::new(
            &cfg.api_base,
            &cfg.model,
            cfg.api_key.as_deref().unwrap_or_default(),
        )?)),
        Provider::Mock => Ok(Box::new(MockGenerator)),
    }
}
