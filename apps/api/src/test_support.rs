//! Shared test doubles.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{CompletionOracle, CompletionRequest, LlmError};

/// A recorded oracle invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub api_key: Option<String>,
    pub request: CompletionRequest,
}

/// Oracle that replays queued responses and records every call it receives.
/// Once the queue is empty it answers with `fallback`.
pub struct StubOracle {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<RecordedCall>>,
    fallback: String,
}

impl StubOracle {
    pub fn replying(text: &str) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            fallback: text.to_string(),
        }
    }

    pub fn with_responses(responses: Vec<Result<String, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
            fallback: String::new(),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionOracle for StubOracle {
    async fn complete(
        &self,
        api_key: Option<&str>,
        request: &CompletionRequest,
    ) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            api_key: api_key.map(str::to_string),
            request: request.clone(),
        });
        if api_key.is_none() {
            return Err(LlmError::MissingCredential);
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}
