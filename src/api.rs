use leptos::prelude::*;

use crate::status::ServerStatus;

#[cfg(feature = "ssr")]
fn ollama_client() -> crate::ollama::OllamaClient {
    use_context::<crate::ollama::OllamaClient>().unwrap_or_else(|| {
        crate::ollama::OllamaClient::new(crate::config::OllamaConfig::from_env())
    })
}

/// Wait out the splash delay, then see whether Ollama answers at all.
#[server]
pub async fn check_ollama_status() -> Result<ServerStatus, ServerFnError> {
    let client = ollama_client();
    tokio::time::sleep(client.config().status_delay).await;
    Ok(ServerStatus::from_probe(client.probe().await))
}

#[server]
pub async fn list_ollama_models() -> Result<Vec<String>, ServerFnError> {
    ollama_client().list_models().await.map_err(|e| {
        log::error!("Error fetching Ollama models: {e}");
        ServerFnError::new(e)
    })
}

/// Message to show the user for a failed server function.
pub fn describe_error(err: &ServerFnError) -> String {
    match err {
        ServerFnError::ServerError(message) => message.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_show_their_message() {
        let err: ServerFnError = ServerFnError::new("Failed to fetch models: 500");
        assert_eq!(describe_error(&err), "Failed to fetch models: 500");
    }
}
