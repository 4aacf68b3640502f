pub mod envelope;
pub mod openai;

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use crate::agent::message::ChatMessage;

#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
}

/// One blocking request/response exchange with a chat-completion provider.
///
/// Implementations return the raw response envelope; decoding the reply text
/// is left to the caller.
pub trait ChatTransport {
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<Value>;
}

impl<T: ChatTransport + ?Sized> ChatTransport for &T {
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<Value> {
        (**self).complete(request)
    }
}
