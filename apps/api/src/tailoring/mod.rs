// Prompt orchestration: job analysis, résumé tailoring, section split,
// section revision, and reconstruction from sections.
// All LLM calls go through llm_client; nothing here talks to Anthropic directly.
//
// Every task validates its inputs before the oracle is called and writes to
// the session store only after the response has been accepted.

pub mod analyzer;
pub mod handlers;
pub mod prompts;
pub mod sections;
pub mod tailor;
pub mod tone;

use crate::errors::AppError;
use crate::llm_client::{CompletionOracle, CompletionRequest};
use crate::session::registry::OracleSettings;

/// An oracle bound to one session's credential and model choice.
pub struct OracleCall<'a> {
    oracle: &'a dyn CompletionOracle,
    settings: &'a OracleSettings,
}

impl<'a> OracleCall<'a> {
    pub fn new(oracle: &'a dyn CompletionOracle, settings: &'a OracleSettings) -> Self {
        Self { oracle, settings }
    }

    /// One completion call with the session's model and credential.
    pub async fn complete(
        &self,
        prompt: String,
        temperature: f32,
        system: Option<&str>,
    ) -> Result<String, AppError> {
        let mut request = CompletionRequest::new(prompt, self.settings.model, temperature);
        if let Some(system) = system {
            request = request.with_system(system);
        }
        Ok(self
            .oracle
            .complete(self.settings.api_key(), &request)
            .await?)
    }

    /// Like `complete`, but a blank completion is rejected as a parse failure.
    pub async fn complete_text(
        &self,
        prompt: String,
        temperature: f32,
        system: Option<&str>,
    ) -> Result<String, AppError> {
        let text = self.complete(prompt, temperature, system).await?;
        if text.trim().is_empty() {
            return Err(AppError::Parse("The model returned an empty response".to_string()));
        }
        Ok(text)
    }
}

/// Rejects an empty or whitespace-only required input.
pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}
