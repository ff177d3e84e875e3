//! Turning user input into a request and a reply into chat text.

use crate::backend::ChatReply;
use crate::error::ClientError;

/// Shown for every transport-level failure; the detail goes to the log.
pub const CONNECTION_ERROR_TEXT: &str = "Erreur de connexion";

const APP_ERROR_PREFIX: &str = "Erreur: ";

/// `None` when there is nothing to send (empty or whitespace only).
pub fn prepare_message(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Bot-side text for a settled request.
pub fn reply_text(outcome: &Result<ChatReply, ClientError>) -> String {
    match outcome {
        Ok(ChatReply::Error(e)) => format!("{APP_ERROR_PREFIX}{e}"),
        Ok(ChatReply::Response(r)) => r.clone(),
        Err(_) => CONNECTION_ERROR_TEXT.to_string(),
    }
}
