use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;
use tracing::{debug, info};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const OPENAI_TEMPERATURE: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Google,
    Ollama,
    Disabled,
}

impl Provider {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "openai" => Self::OpenAi,
            "google" => Self::Google,
            "ollama" => Self::Ollama,
            _ => Self::Disabled,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Google => "google",
            Self::Ollama => "ollama",
            Self::Disabled => "disabled",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub provider: Provider,
    pub model: String,
    pub openai_api_key: String,
    pub google_api_key: String,
    pub ollama_host: String,
    pub openai_base_url: String,
    pub google_base_url: String,
    pub timeout: Duration,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: Provider::OpenAi,
            model: "gpt-4o-mini".into(),
            openai_api_key: String::new(),
            google_api_key: String::new(),
            ollama_host: "http://localhost:11434".into(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.into(),
            google_base_url: DEFAULT_GOOGLE_BASE_URL.into(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Text generation backend used for review comments.
///
/// An empty string means "no opinion"; callers fall back to the heuristic
/// review in that case.
#[async_trait]
pub trait ReviewModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

pub struct LlmClient {
    settings: LlmSettings,
    http: Client,
}

impl LlmClient {
    pub fn new(settings: LlmSettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .context("failed to build LLM http client")?;
        Ok(Self { settings, http })
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        payload: &serde_json::Value,
        bearer: Option<&str>,
    ) -> Result<T> {
        let mut request = self.http.post(url).json(payload);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .with_context(|| format!("LLM request to {url} failed"))?
            .error_for_status()?
            .json()
            .await
            .context("LLM response was not the expected JSON")?;
        Ok(response)
    }

    async fn openai(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/chat/completions",
            self.settings.openai_base_url.trim_end_matches('/')
        );
        let payload = json!({
            "model": self.settings.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": OPENAI_TEMPERATURE,
        });
        let response: OpenAiResponse = self
            .post_json(&url, &payload, Some(&self.settings.openai_api_key))
            .await?;
        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("openai response had no choices"))
    }

    async fn google(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.settings.google_base_url.trim_end_matches('/'),
            self.settings.model,
            self.settings.google_api_key
        );
        let payload = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });
        let response: GoogleResponse = self.post_json(&url, &payload, None).await?;
        response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| anyhow!("google response had no candidate text"))
    }

    async fn ollama(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/api/generate",
            self.settings.ollama_host.trim_end_matches('/')
        );
        let payload = json!({
            "model": self.settings.model,
            "prompt": prompt,
            "stream": false,
        });
        let response: OllamaResponse = self.post_json(&url, &payload, None).await?;
        Ok(response.response)
    }
}

#[async_trait]
impl ReviewModel for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let provider = self.settings.provider;
        let output = match provider {
            Provider::OpenAi if !self.settings.openai_api_key.is_empty() => {
                self.openai(prompt).await?
            }
            Provider::Google if !self.settings.google_api_key.is_empty() => {
                self.google(prompt).await?
            }
            Provider::Ollama => self.ollama(prompt).await?,
            _ => {
                debug!(
                    provider = provider.as_str(),
                    "llm provider not configured; skipping"
                );
                return Ok(String::new());
            }
        };
        info!(
            provider = provider.as_str(),
            model = %self.settings.model,
            chars = output.len(),
            "llm review generated"
        );
        Ok(output)
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    candidates: Vec<GoogleCandidate>,
}

#[derive(Debug, Deserialize)]
struct GoogleCandidate {
    content: GoogleContent,
}

#[derive(Debug, Deserialize)]
struct GoogleContent {
    parts: Vec<GooglePart>,
}

#[derive(Debug, Deserialize)]
struct GooglePart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
}

#[cfg(test)]
#[path = "tests/llm_tests.rs"]
mod tests;
