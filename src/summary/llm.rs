use super::Summarizer;
use crate::error::{HighlightError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Longest input sent to the model, in characters
const MAX_INPUT_CHARS: usize = 1024;

const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_MODELS: &str = "https://api.openai.com/v1/models";

const SYSTEM_PROMPT: &str = "You summarize excerpts of video transcripts for highlight cards. \
Reply with one or two plain sentences, no preamble, no quotes.";

/// LLM provider types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LLMProvider {
    /// Local OpenAI-compatible server (LM Studio, llama.cpp, Ollama)
    LMStudio,
    OpenAI,
}

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMConfig {
    pub provider: LLMProvider,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::LMStudio,
            endpoint: Some("http://localhost:1234/v1/chat/completions".to_string()),
            api_key: None,
            model: "local-model".to_string(),
            max_tokens: 120,
            temperature: 0.2,
            timeout_seconds: 60,
        }
    }
}

/// Chat message for LLM communication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

/// Summarizer backed by an OpenAI-compatible chat completion endpoint
pub struct LlmSummarizer {
    config: LLMConfig,
    client: reqwest::Client,
}

impl LlmSummarizer {
    pub fn new(config: LLMConfig) -> Result<Self> {
        if config.provider == LLMProvider::OpenAI && config.api_key.is_none() {
            return Err(HighlightError::Config("OpenAI API key required".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn provider(&self) -> LLMProvider {
        self.config.provider
    }

    fn endpoint(&self) -> Result<&str> {
        match (&self.config.endpoint, self.config.provider) {
            (Some(endpoint), _) => Ok(endpoint.as_str()),
            (None, LLMProvider::OpenAI) => Ok(OPENAI_ENDPOINT),
            (None, LLMProvider::LMStudio) => Err(HighlightError::Config(
                "LMStudio endpoint not configured".to_string(),
            )),
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// Send a chat completion request and return the first choice
    pub async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let endpoint = self.endpoint()?;
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!("Sending request to {:?} at {}", self.config.provider, endpoint);

        let response = self
            .authorize(self.client.post(endpoint))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(HighlightError::Summarizer(format!(
                "{:?} API error {}: {}",
                self.config.provider, status, text
            )));
        }

        let chat_response: ChatResponse = response.json().await?;
        if let Some(usage) = &chat_response.usage {
            debug!("LLM request used {} tokens", usage.total_tokens);
        }

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                HighlightError::Summarizer(format!("No response from {:?}", self.config.provider))
            })
    }

    /// Probe the provider once; any failure counts as unavailable
    pub async fn is_available(&self) -> bool {
        let probe = match self.config.provider {
            LLMProvider::OpenAI => OPENAI_MODELS.to_string(),
            LLMProvider::LMStudio => match &self.config.endpoint {
                Some(endpoint) => endpoint.replace("/chat/completions", "/models"),
                None => return false,
            },
        };

        match self.authorize(self.client.get(&probe)).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("LLM probe {} failed: {}", probe, e);
                false
            }
        }
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, text: &str) -> Result<String> {
        let excerpt: String = text.chars().take(MAX_INPUT_CHARS).collect();
        let messages = vec![
            ChatMessage {
                role: "system".to_string(),
                content: SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: excerpt,
            },
        ];

        let reply = self.chat(messages).await?;
        let summary = polish_summary(&reply);
        if summary.is_empty() {
            return Err(HighlightError::Summarizer("Empty summary".to_string()));
        }
        Ok(summary)
    }

    fn name(&self) -> &'static str {
        "llm"
    }
}

/// Capitalize, terminate with punctuation and drop immediately repeated words
pub fn polish_summary(summary: &str) -> String {
    let mut words: Vec<&str> = Vec::new();
    for word in summary.split_whitespace() {
        let repeated = words
            .last()
            .is_some_and(|prev| prev.to_lowercase() == word.to_lowercase());
        if !repeated {
            words.push(word);
        }
    }

    let mut polished = words.join(" ");
    if let Some(first) = polished.chars().next() {
        if first.is_lowercase() {
            polished = first.to_uppercase().chain(polished.chars().skip(1)).collect();
        }
    }
    if !polished.is_empty() && !polished.ends_with(['.', '!', '?']) {
        polished.push('.');
    }
    polished
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polish_summary() {
        assert_eq!(polish_summary("the the parser is fast"), "The parser is fast.");
        assert_eq!(polish_summary("  Done already!  "), "Done already!");
        assert_eq!(polish_summary("Really Really works?"), "Really works?");
        assert_eq!(polish_summary("   "), "");
    }

    #[test]
    fn test_openai_requires_api_key() {
        let config = LLMConfig {
            provider: LLMProvider::OpenAI,
            endpoint: None,
            ..LLMConfig::default()
        };
        assert!(LlmSummarizer::new(config).is_err());
    }

    #[test]
    fn test_endpoint_resolution() {
        let config = LLMConfig {
            provider: LLMProvider::OpenAI,
            endpoint: None,
            api_key: Some("sk-test".to_string()),
            ..LLMConfig::default()
        };
        let summarizer = LlmSummarizer::new(config).unwrap();
        assert_eq!(summarizer.endpoint().unwrap(), OPENAI_ENDPOINT);

        let config = LLMConfig {
            endpoint: None,
            ..LLMConfig::default()
        };
        let summarizer = LlmSummarizer::new(config).unwrap();
        assert!(summarizer.endpoint().is_err());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_unavailable() {
        let config = LLMConfig {
            endpoint: Some("http://127.0.0.1:9/v1/chat/completions".to_string()),
            timeout_seconds: 2,
            ..LLMConfig::default()
        };
        let summarizer = LlmSummarizer::new(config).unwrap();
        assert!(!summarizer.is_available().await);
        assert!(summarizer.summarize("some transcript text").await.is_err());
    }
}
