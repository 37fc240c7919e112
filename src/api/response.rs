use crate::error::{AgentError, Result};
use serde_json::Value;

const MAX_RAW_ERROR_CHARS: usize = 500;

/// Pull a readable message out of an error body.
///
/// Handles `{"error": {"message": ...}}`, `{"error": "..."}` and
/// `{"message": ...}`; anything else is returned raw, truncated.
pub fn extract_error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        let message = json
            .get("error")
            .and_then(|e| e.get("message").or(Some(e)))
            .and_then(|m| m.as_str())
            .or_else(|| json.get("message").and_then(|m| m.as_str()));
        if let Some(message) = message {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    trimmed.chars().take(MAX_RAW_ERROR_CHARS).collect()
}

/// Turn a non-success response into [`AgentError::Api`].
pub async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(AgentError::Api {
        status: status.as_u16(),
        message: extract_error_message(&body),
    })
}
