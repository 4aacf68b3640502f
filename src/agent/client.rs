use anyhow::{Context, Result};
use serde_json::{Value, json};
use tracing::{debug, error, info, warn};

use crate::agent::config::AgentConfig;
use crate::agent::message::ChatMessage;
use crate::agent::prompts::{build_ask_messages, build_repair_messages};
use crate::agent::status::{FIXING_JSON_LABEL, StatusSpinner, THINKING_LABEL};
use crate::agent::tokens::{TokenCounter, check_budget, counter_for};
use crate::error::AgentError;
use crate::provider::envelope::decode_reply;
use crate::provider::openai::OpenAiTransport;
use crate::provider::{ChatTransport, CompletionRequest};
use crate::repair::{self, ParseOutcome};

/// Number of repair round trips a structured request may spend. Fixed.
pub const REPAIR_DEPTH: usize = 1;

pub struct Agent<T: ChatTransport> {
    config: AgentConfig,
    transport: T,
    counter: Box<dyn TokenCounter>,
}

impl Agent<OpenAiTransport> {
    pub fn from_config(config: AgentConfig) -> Result<Self> {
        let transport = OpenAiTransport::from_config(&config)?;
        Ok(Self::new(config, transport))
    }
}

impl<T: ChatTransport> Agent<T> {
    pub fn new(config: AgentConfig, transport: T) -> Self {
        let counter = counter_for(&config.encoding);
        Self {
            config,
            transport,
            counter,
        }
    }

    pub fn with_counter(mut self, counter: Box<dyn TokenCounter>) -> Self {
        self.counter = counter;
        self
    }

    /// Send one conversation and decode the reply text.
    ///
    /// Over-budget conversations are rejected before the transport is touched.
    pub fn try_call(&self, messages: &[ChatMessage], status_label: &str) -> Result<String, AgentError> {
        check_budget(self.counter.as_ref(), messages)?;

        let request = CompletionRequest {
            model: &self.config.model,
            messages,
        };
        info!(model = %self.config.model, messages = messages.len(), "calling provider");
        let envelope = {
            let _spinner = StatusSpinner::start(status_label, self.config.show_status);
            self.transport.complete(&request)
        }
        .map_err(|err| AgentError::Transport(format!("{err:#}")))?;

        Ok(decode_reply(&envelope)?)
    }

    pub fn call(&self, messages: &[ChatMessage], status_label: &str) -> Option<String> {
        match self.try_call(messages, status_label) {
            Ok(text) => Some(text),
            Err(err) => {
                error!(code = err.code().as_str(), error = %err, "provider call failed");
                None
            }
        }
    }

    /// Escalation: ask the model to rewrite `dirty_text` as schema-compliant
    /// JSON, then run the reply through the repair pipeline once more.
    pub fn try_auto_fix_json(
        &self,
        dirty_text: &str,
        schema: &str,
        prior_error: &str,
    ) -> Result<Value, AgentError> {
        info!(prior_error, "escalating to json repair call");
        let messages = build_repair_messages(dirty_text, schema, prior_error);
        let reply = self
            .try_call(&messages, FIXING_JSON_LABEL)
            .map_err(|err| AgentError::RepairFailed(err.to_string()))?;

        match repair::parse(&reply) {
            ParseOutcome::Parsed(value) => Ok(value),
            ParseOutcome::Failed(err) => {
                debug!(reply = %reply, "repair reply still unparsable");
                Err(AgentError::RepairFailed(err.to_string()))
            }
        }
    }

    pub fn auto_fix_json(&self, dirty_text: &str, schema: &str, prior_error: &str) -> Option<Value> {
        match self.try_auto_fix_json(dirty_text, schema, prior_error) {
            Ok(value) => Some(value),
            Err(err) => {
                error!(code = err.code().as_str(), error = %err, "json fix failed");
                None
            }
        }
    }

    /// Ask for a structured reply. At most two transport calls: the request
    /// itself and, when its reply does not parse, one repair call.
    pub fn try_ask_structured(
        &self,
        role_description: &str,
        instruction: &str,
        expected_schema: &str,
        code: &str,
    ) -> Result<Value, AgentError> {
        let messages = build_ask_messages(role_description, instruction, expected_schema, code);
        let raw = self.try_call(&messages, THINKING_LABEL).inspect_err(|err| {
            error!(code = err.code().as_str(), error = %err, "generation failed");
        })?;

        match repair::parse(&raw) {
            ParseOutcome::Parsed(value) => {
                info!("generation completed");
                Ok(value)
            }
            ParseOutcome::Failed(err) => {
                warn!(error = %err, "reply is not valid json; trying to fix");
                self.try_auto_fix_json(&raw, expected_schema, &err.to_string())
            }
        }
    }

    pub fn ask_structured(
        &self,
        role_description: &str,
        instruction: &str,
        expected_schema: &str,
        code: &str,
    ) -> Option<Value> {
        match self.try_ask_structured(role_description, instruction, expected_schema, code) {
            Ok(value) => Some(value),
            Err(err) => {
                error!(code = err.code().as_str(), error = %err, "structured request failed");
                None
            }
        }
    }

    /// Decode a JSON array of chat messages, send it, and wrap the reply as
    /// `{"response": <text or null>}`.
    pub fn process_message(&self, input_json: &str) -> Result<String> {
        let messages: Vec<ChatMessage> =
            serde_json::from_str(input_json).context("input is not a JSON array of chat messages")?;
        let reply = self.call(&messages, THINKING_LABEL);
        Ok(serde_json::to_string(&json!({ "response": reply }))?)
    }
}
