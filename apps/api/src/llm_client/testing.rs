//! In-memory `ChatModel` for pipeline and router tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{ChatMessage, ChatModel, LlmError};

type Responder = dyn Fn(&[ChatMessage]) -> Result<String, LlmError> + Send + Sync;

/// Answers every call through a closure and records the messages it was sent.
pub struct ScriptedModel {
    respond: Box<Responder>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedModel {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&[ChatMessage]) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        Self {
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with `text`.
    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Ok(text.clone()))
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn invoke(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        (self.respond)(messages)
    }
}
