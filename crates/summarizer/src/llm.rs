use async_trait::async_trait;
use index_md_indexer::{ContentSummarizer, IndexSummarizer, SummarizeError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{file_heading, truncate_chars};

const FILE_PROMPT: &str = "You write entries for a directory index. Describe what the given \
source file is for and what it provides, in at most three sentences of plain prose. \
Do not use headings, lists or blank lines.";

const INDEX_PROMPT: &str = "You write entries for a directory index. The input is the index of \
one folder: entries for its files and summaries of its subfolders. Summarize the folder's \
purpose and contents in one paragraph of plain prose. Do not use headings, lists or blank lines.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API; `/chat/completions` is appended.
    pub endpoint: String,
    pub model: String,
    /// Environment variable holding the bearer token. Unset means no auth header.
    pub api_key_env: String,
    pub timeout_secs: u64,
    /// Input longer than this many characters is cut before sending.
    pub max_input_chars: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 60,
            max_input_chars: 24_000,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Summarizer backed by a chat completions API.
pub struct LlmSummarizer {
    client: reqwest::Client,
    config: LlmConfig,
    api_key: Option<String>,
}

impl LlmSummarizer {
    /// Build a client from `config`, reading the API key from `config.api_key_env`.
    pub fn new(config: LlmConfig) -> Result<Self, SummarizeError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            log::warn!(
                "{} is not set; sending summarization requests without authorization",
                config.api_key_env
            );
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| SummarizeError::Http(err.to_string()))?;
        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        )
    }

    fn build_request(&self, system: &str, user: &str) -> ChatRequest<'_> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Some(system.to_string()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Some(truncate_chars(user, self.config.max_input_chars)),
                },
            ],
            temperature: 0.0,
        }
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, SummarizeError> {
        let request = self.build_request(system, user);
        let mut builder = self.client.post(self.completions_url()).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| SummarizeError::Http(err.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| SummarizeError::Http(err.to_string()))?;
        if !status.is_success() {
            return Err(SummarizeError::Status {
                status: status.as_u16(),
                body: truncate_chars(&body, 500),
            });
        }
        parse_completion(&body)
    }
}

/// Extract the first choice's content, flattened so it never contains a blank line.
fn parse_completion(body: &str) -> Result<String, SummarizeError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|err| SummarizeError::InvalidResponse(err.to_string()))?;
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default();

    let flattened = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    if flattened.is_empty() {
        return Err(SummarizeError::EmptyResponse);
    }
    Ok(flattened)
}

#[async_trait]
impl ContentSummarizer for LlmSummarizer {
    async fn summarize_file(
        &self,
        file_name: &str,
        raw_text: &str,
    ) -> Result<String, SummarizeError> {
        let heading = file_heading(file_name);
        if raw_text.trim().is_empty() {
            return Ok(format!("{heading}\n(empty file)"));
        }
        log::debug!("Requesting summary for {file_name}");
        let user = format!("File: {file_name}\n\n{raw_text}");
        let summary = self.complete(FILE_PROMPT, &user).await?;
        Ok(format!("{heading}\n{summary}"))
    }
}

#[async_trait]
impl IndexSummarizer for LlmSummarizer {
    async fn summarize_index(&self, document_text: &str) -> Result<String, SummarizeError> {
        if document_text.trim().is_empty() {
            return Ok("(empty folder)".to_string());
        }
        self.complete(INDEX_PROMPT, document_text).await
    }
}
