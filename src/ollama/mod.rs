pub mod types;

#[cfg(feature = "ssr")]
mod client;

#[cfg(feature = "ssr")]
pub use client::OllamaClient;
pub use types::{ChatChunk, ChatMessage, ChatRequest, ModelTag, Role, TagsResponse};
