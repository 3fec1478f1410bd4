use tracing::{debug, warn};

use crate::error::{Result, ZritelError};
use crate::types::{GenerationRequest, StreamChunk};

/// Decode a newline-delimited generation response into the final text.
///
/// Each non-blank line is one JSON object. A line that fails to parse is
/// skipped with a warning; the stream may contain transient malformed
/// fragments. A `done` marker stops consumption even if more lines follow.
/// An in-band `error` aborts the decode and discards any text accumulated so
/// far. An empty result with no completion marker is a legitimate empty
/// answer, not an error.
pub fn decode_stream(body: &str) -> Result<String> {
    let mut full_response = String::new();

    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let chunk: StreamChunk = match serde_json::from_str(line) {
            Ok(chunk) => chunk,
            Err(e) => {
                warn!(error = %e, line, "skipping unparseable response line");
                continue;
            }
        };

        if let Some(fragment) = chunk.response {
            full_response.push_str(&fragment);
        }

        if chunk.done {
            break;
        }

        if let Some(message) = chunk.error {
            return Err(ZritelError::GenerationFailed { message });
        }
    }

    Ok(full_response)
}

/// The seam between the pipeline and the generation endpoint. Production
/// code wires [`OllamaClient`]; tests substitute a scripted fake.
pub trait TextGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

/// HTTP client for a local Ollama-compatible generation endpoint. Issues
/// exactly one request per call; no retry, no caching, no timeout.
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl TextGenerator for OllamaClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        debug!(model = %request.model, %url, "dispatching generation request");

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ZritelError::HttpFailed { status });
        }

        let body = response.text().await?;
        decode_stream(&body)
    }
}
