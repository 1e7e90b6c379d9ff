//! Failure modes of a completion call.
//!
//! None of these reach the conversation: the gateway folds each one into a
//! fixed, user-facing reply via [`GatewayError::fallback_message`].

pub const MISSING_CREDENTIAL_REPLY: &str = "API Key is missing. Please configure the environment.";
pub const SERVICE_UNAVAILABLE_REPLY: &str =
    "I'm having trouble connecting to the AI service right now.";
pub const EMPTY_COMPLETION_REPLY: &str = "I couldn't generate a response.";

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("No API key configured")]
    MissingCredential,

    #[error("Completion request failed: {0}")]
    Transport(#[from] anyhow::Error),

    #[error("Completion response contained no text")]
    EmptyCompletion,
}

impl GatewayError {
    pub fn fallback_message(&self) -> &'static str {
        match self {
            GatewayError::MissingCredential => MISSING_CREDENTIAL_REPLY,
            GatewayError::Transport(_) => SERVICE_UNAVAILABLE_REPLY,
            GatewayError::EmptyCompletion => EMPTY_COMPLETION_REPLY,
        }
    }
}
