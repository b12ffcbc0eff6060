//! Thin reqwest client over the three Ollama endpoints the chat needs.

use futures::{Stream, StreamExt};
use tokio_util::codec::{FramedRead, LinesCodec};
use tokio_util::io::StreamReader;

use crate::config::OllamaConfig;
use crate::error::ChatError;
use crate::ollama::types::{ChatChunk, ChatRequest, TagsResponse};

/// Client for a local Ollama server.
///
/// ```no_run
/// use ochat::config::OllamaConfig;
/// use ochat::ollama::OllamaClient;
///
/// let client = OllamaClient::new(OllamaConfig::default().base_url("http://localhost:11434"));
/// ```
#[derive(Clone, Debug)]
pub struct OllamaClient {
    config: OllamaConfig,
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    /// Any HTTP answer from the server root counts as alive; only a failed
    /// connection counts as dead.
    pub async fn probe(&self) -> bool {
        match self.client.get(self.config.root_url()).send().await {
            Ok(response) => {
                log::debug!("ollama answered probe with {}", response.status());
                true
            }
            Err(e) => {
                log::info!("ollama probe at {} failed: {e}", self.config.base_url);
                false
            }
        }
    }

    /// Names of the installed models, in the order the server lists them.
    pub async fn list_models(&self) -> Result<Vec<String>, ChatError> {
        let response = self.client.get(self.config.tags_url()).send().await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("ollama /api/tags returned {status}");
            return Err(ChatError::ModelList {
                status: status.as_u16(),
            });
        }

        let tags: TagsResponse = response.json().await?;
        Ok(tags.names())
    }

    /// Start a streamed chat completion.
    ///
    /// The body is split on newlines before decoding, so a JSON object
    /// delivered across several reads, or several objects in one read,
    /// decode the same as one object per read. The stream ends after the
    /// chunk marked `done`, or on the first transport error.
    pub async fn chat_stream(
        &self,
        request: &ChatRequest,
    ) -> Result<impl Stream<Item = Result<ChatChunk, ChatError>> + Send + 'static, ChatError> {
        log::debug!(
            "chat request to {} ({} messages)",
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(self.config.chat_url())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Status {
                status: status.as_u16(),
                body: error_text(&body),
            });
        }

        let body_with_io_error = response
            .bytes_stream()
            .map(|res| res.map_err(std::io::Error::other));
        let reader = StreamReader::new(body_with_io_error);
        let mut lines = FramedRead::new(reader, LinesCodec::new());

        Ok(async_stream::stream! {
            while let Some(line) = lines.next().await {
                match line {
                    Ok(line) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        match serde_json::from_str::<ChatChunk>(line) {
                            Ok(chunk) => {
                                let done = chunk.done;
                                yield Ok(chunk);
                                if done {
                                    break;
                                }
                            }
                            Err(e) => {
                                log::warn!("skipping undecodable chat line: {e}");
                                yield Err(ChatError::from(e));
                            }
                        }
                    }
                    Err(e) => {
                        yield Err(ChatError::Stream(e.to_string()));
                        break;
                    }
                }
            }
        })
    }
}

// Ollama reports failures as `{"error": "..."}`.
fn error_text(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_text_prefers_error_field() {
        assert_eq!(error_text(r#"{"error":"model \"x\" not found"}"#), r#"model "x" not found"#);
        assert_eq!(error_text("  bad gateway \n"), "bad gateway");
    }
}
