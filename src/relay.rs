//! `POST /api/chat`: forwards a conversation to Ollama and relays the reply
//! to the browser as [`StreamFrame`] lines.

use std::convert::Infallible;

use axum::body::Body;
use axum::extract::{FromRef, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use futures::{Stream, StreamExt};
use leptos::prelude::LeptosOptions;
use serde::Deserialize;

use crate::error::ChatError;
use crate::ollama::{ChatMessage, ChatRequest, OllamaClient};
use crate::stream::StreamFrame;

/// Shared state of the hosting process. Holds no conversation data.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub leptos_options: LeptosOptions,
    pub ollama: OllamaClient,
}

#[derive(Deserialize, Debug)]
pub struct RelayRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

pub async fn chat_relay(
    State(client): State<OllamaClient>,
    Json(payload): Json<RelayRequest>,
) -> impl IntoResponse {
    let frames = relay_frames(client, payload).map(|frame| Ok::<_, Infallible>(frame.to_line()));
    (
        [(header::CONTENT_TYPE, "application/x-ndjson")],
        Body::from_stream(frames),
    )
}

/// Every frame sequence ends with exactly one [`StreamFrame::Done`].
pub fn relay_frames(client: OllamaClient, payload: RelayRequest) -> impl Stream<Item = StreamFrame> + Send {
    async_stream::stream! {
        if payload.model.trim().is_empty() {
            yield StreamFrame::Error { message: ChatError::NoModelSelected.to_string() };
            yield StreamFrame::Done;
            return;
        }

        let request = ChatRequest::streaming(payload.model, payload.messages);
        match client.chat_stream(&request).await {
            Ok(chunks) => {
                let mut chunks = std::pin::pin!(chunks);
                while let Some(chunk) = chunks.next().await {
                    match chunk {
                        Ok(chunk) => {
                            if let Some(message) = &chunk.error {
                                log::warn!("ollama reported an error mid-stream: {message}");
                                yield StreamFrame::Error { message: message.clone() };
                                break;
                            }
                            if !chunk.content().is_empty() {
                                yield StreamFrame::Delta { content: chunk.content().to_string() };
                            }
                            if chunk.done {
                                break;
                            }
                        }
                        // one bad line doesn't sink the reply
                        Err(ChatError::Decode(_)) => continue,
                        Err(e) => {
                            log::error!("chat stream from {} broke off: {e}", request.model);
                            yield StreamFrame::Error { message: e.to_string() };
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                log::error!("chat request to {} failed: {e}", request.model);
                yield StreamFrame::Error { message: e.to_string() };
            }
        }
        yield StreamFrame::Done;
    }
}
