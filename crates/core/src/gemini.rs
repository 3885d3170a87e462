//! Gemini File API and `generateContent` client.

use std::{path::Path, sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::fs;

use crate::{
    agent::{AgentConfig, AgentResponse, ReasoningAgent, Tool},
    config::Settings,
    error::{Result, VidlensError},
    media::MediaHandle,
    processor::MediaProcessor,
    prompt::build_system_instruction,
};

const METADATA_TIMEOUT: Duration = Duration::from_secs(60);
const TRANSFER_TIMEOUT: Duration = Duration::from_secs(600);

pub struct GeminiClient {
    http: Client,
    api_key: String,
    base_url: String,
    config: Arc<AgentConfig>,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        config: Arc<AgentConfig>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            config,
        }
    }

    pub fn from_settings(settings: &Settings, config: Arc<AgentConfig>) -> Self {
        Self::new(&settings.api_key, &settings.base_url, config)
    }

    fn generate_body(&self, prompt: &str, media: &[MediaHandle]) -> Value {
        let mut parts: Vec<Value> = media
            .iter()
            .map(|m| {
                json!({
                    "file_data": {
                        "mime_type": m.mime_type,
                        "file_uri": m.uri,
                    }
                })
            })
            .collect();
        parts.push(json!({ "text": prompt }));

        let mut body = json!({
            "system_instruction": {
                "parts": [{ "text": build_system_instruction(&self.config.name, self.config.markdown) }]
            },
            "contents": [{ "role": "user", "parts": parts }],
        });

        if self.config.has_tool(Tool::WebSearch) {
            body["tools"] = json!([{ "google_search": {} }]);
        }

        body
    }
}

#[derive(Debug, Deserialize)]
struct FileEnvelope {
    file: MediaHandle,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> std::result::Result<String, String> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(format!("prompt blocked: {reason}"));
        }

        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err("response has no candidates".to_string());
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(format!(
                "response has no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            ));
        }

        Ok(text)
    }
}

/// Turn a non-2xx response into a readable reason.
async fn ensure_success(response: Response) -> std::result::Result<Response, String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(format!("{status} - {body}"))
}

fn upload_failed(reason: impl ToString) -> VidlensError {
    VidlensError::UploadFailed {
        reason: reason.to_string(),
    }
}

fn analysis_failed(reason: impl ToString) -> VidlensError {
    VidlensError::AnalysisFailed {
        reason: reason.to_string(),
    }
}

#[async_trait]
impl MediaProcessor for GeminiClient {
    async fn upload(
        &self,
        path: &Path,
        display_name: &str,
        mime_type: &str,
    ) -> Result<MediaHandle> {
        let bytes = fs::read(path).await?;

        let start = self
            .http
            .post(format!("{}/upload/v1beta/files", self.base_url))
            .header("x-goog-api-key", &self.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", bytes.len())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&json!({ "file": { "display_name": display_name } }))
            .timeout(METADATA_TIMEOUT)
            .send()
            .await
            .map_err(upload_failed)?;
        let start = ensure_success(start).await.map_err(upload_failed)?;

        let session_url = start
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| upload_failed("response is missing the upload session URL"))?;

        tracing::debug!(file = %display_name, bytes = bytes.len(), "Upload session opened");

        let response = self
            .http
            .post(&session_url)
            .header("X-Goog-Upload-Offset", 0)
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(bytes)
            .timeout(TRANSFER_TIMEOUT)
            .send()
            .await
            .map_err(upload_failed)?;
        let response = ensure_success(response).await.map_err(upload_failed)?;

        let envelope: FileEnvelope = response.json().await.map_err(upload_failed)?;
        Ok(envelope.file)
    }

    async fn get(&self, name: &str) -> Result<MediaHandle> {
        let refresh_failed =
            |reason: String| upload_failed(format!("refresh of {name} failed: {reason}"));

        let response = self
            .http
            .get(format!("{}/v1beta/{}", self.base_url, name))
            .header("x-goog-api-key", &self.api_key)
            .timeout(METADATA_TIMEOUT)
            .send()
            .await
            .map_err(|e| refresh_failed(e.to_string()))?;
        let response = ensure_success(response).await.map_err(refresh_failed)?;

        response
            .json::<MediaHandle>()
            .await
            .map_err(|e| refresh_failed(e.to_string()))
    }
}

#[async_trait]
impl ReasoningAgent for GeminiClient {
    fn config(&self) -> &AgentConfig {
        &self.config
    }

    async fn run(&self, prompt: &str, media: &[MediaHandle]) -> Result<AgentResponse> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.config.model
        );

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.generate_body(prompt, media))
            .timeout(TRANSFER_TIMEOUT)
            .send()
            .await
            .map_err(analysis_failed)?;
        let response = ensure_success(response).await.map_err(analysis_failed)?;

        let parsed: GenerateResponse = response.json().await.map_err(analysis_failed)?;
        let content = parsed.into_text().map_err(analysis_failed)?;

        Ok(AgentResponse { content })
    }
}
