//! Completion gateway: one remote call per request, never an error.
//!
//! The gateway assembles the system instruction and flattened transcript,
//! hands them to a [`CompletionTransport`], and folds every failure into a
//! fixed reply so callers always receive text they can show the user.

use crate::gemini::GeminiClient;
use crate::transcript;
use anyhow::Result;
use async_trait::async_trait;
use shared::agent_api::{CompletionRequest, Turn};
use shared::error::GatewayError;
use shared::settings::GeminiSettings;
use std::sync::Arc;

/// Context label used when the caller does not supply one
pub const DEFAULT_CONTEXT: &str = "General Workspace";

const PERSONA: &str = "You are SyncSpace AI, a helpful, intelligent assistant integrated into a collaborative workspace platform.\n\
You help users with writing docs, analyzing spreadsheet data, brainstorming on canvas, and building workflows.\n\
Keep answers concise, professional, and helpful.";

/// Wire-level access to a text generation endpoint.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    /// Perform exactly one request and return the raw completion text.
    async fn generate(&self, credential: &str, request: &CompletionRequest) -> Result<String>;
}

/// Anything that can answer a conversation turn with plain text.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, history: &[Turn], prompt: &str, context: Option<&str>) -> String;
}

/// Build the instruction block for a request originating from `context`.
pub fn system_instruction(context: Option<&str>) -> String {
    let context = context
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CONTEXT);
    format!("{}\nCurrent Context: {}", PERSONA, context)
}

pub struct CompletionGateway {
    transport: Arc<dyn CompletionTransport>,
    credential: Option<String>,
    model: String,
}

impl CompletionGateway {
    pub fn new(settings: &GeminiSettings, transport: Arc<dyn CompletionTransport>) -> Self {
        Self {
            transport,
            credential: settings.auth.credential().map(str::to_string),
            model: settings.model.clone(),
        }
    }

    /// Gateway backed by the Gemini REST API.
    pub fn gemini(settings: &GeminiSettings) -> Result<Self> {
        let client = GeminiClient::new(&settings.endpoint)?;
        Ok(Self::new(settings, Arc::new(client)))
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn build_request(
        &self,
        history: &[Turn],
        prompt: &str,
        context: Option<&str>,
    ) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            system_instruction: system_instruction(context),
            prompt: transcript::flatten(history, prompt),
        }
    }

    /// Like [`Completion::complete`] but keeps the failure kind.
    pub async fn try_complete(
        &self,
        history: &[Turn],
        prompt: &str,
        context: Option<&str>,
    ) -> Result<String, GatewayError> {
        let credential = self
            .credential
            .as_deref()
            .ok_or(GatewayError::MissingCredential)?;

        let request = self.build_request(history, prompt, context);
        tracing::debug!(
            model = %request.model,
            turns = history.len(),
            "sending completion request"
        );

        let text = self.transport.generate(credential, &request).await?;
        if text.trim().is_empty() {
            return Err(GatewayError::EmptyCompletion);
        }
        Ok(text)
    }
}

#[async_trait]
impl Completion for CompletionGateway {
    async fn complete(&self, history: &[Turn], prompt: &str, context: Option<&str>) -> String {
        match self.try_complete(history, prompt, context).await {
            Ok(text) => text,
            Err(err) => {
                match &err {
                    GatewayError::MissingCredential => {
                        tracing::warn!("completion skipped: no API key configured")
                    }
                    GatewayError::Transport(cause) => {
                        tracing::error!("completion request failed: {:#}", cause)
                    }
                    GatewayError::EmptyCompletion => {
                        tracing::warn!("completion returned no text")
                    }
                }
                err.fallback_message().to_string()
            }
        }
    }
}
