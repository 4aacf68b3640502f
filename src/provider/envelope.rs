use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("response envelope is not a JSON object")]
    NotAnObject,
    #[error("response envelope fields have unexpected types")]
    InvalidShape,
    #[error("response envelope has no `choices` field")]
    MissingChoices,
    #[error("response envelope has an empty `choices` list")]
    EmptyChoices,
    #[error("first choice has no `message` field")]
    MissingMessage,
    #[error("first choice message has no `content` field")]
    MissingContent,
    #[error("first choice message content is neither text nor text parts")]
    UnsupportedContent,
}

#[derive(Debug, Deserialize)]
struct CompletionEnvelope {
    choices: Option<Vec<Choice>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<Value>,
}

fn join_text_parts(parts: &[Value]) -> Option<String> {
    let chunks = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect::<Vec<_>>();
    if chunks.is_empty() {
        None
    } else {
        Some(chunks.join("\n"))
    }
}

/// Pull the reply text out of a chat-completions response.
///
/// A bare JSON string is taken as the reply itself. Otherwise the text lives at
/// `choices[0].message.content`, either as a string or as an array of
/// `{"text": ...}` parts joined by newlines.
pub fn decode_reply(envelope: &Value) -> Result<String, EnvelopeError> {
    if let Value::String(text) = envelope {
        return Ok(text.clone());
    }
    if !envelope.is_object() {
        return Err(EnvelopeError::NotAnObject);
    }

    let decoded = CompletionEnvelope::deserialize(envelope)
        .map_err(|_| EnvelopeError::InvalidShape)?;
    let choices = decoded.choices.ok_or(EnvelopeError::MissingChoices)?;
    let first = choices.into_iter().next().ok_or(EnvelopeError::EmptyChoices)?;
    let message = first.message.ok_or(EnvelopeError::MissingMessage)?;
    match message.content.ok_or(EnvelopeError::MissingContent)? {
        Value::String(text) => Ok(text),
        Value::Array(parts) => join_text_parts(&parts).ok_or(EnvelopeError::UnsupportedContent),
        Value::Null => Err(EnvelopeError::MissingContent),
        _ => Err(EnvelopeError::UnsupportedContent),
    }
}

#[cfg(test)]
mod tests {
    use super::{EnvelopeError, decode_reply};
    use serde_json::json;

    #[test]
    fn reads_chat_completions_shape() {
        let payload = json!({
            "id": "chatcmpl-1",
            "choices": [
                {
                    "index": 0,
                    "message": {"role": "assistant", "content": "{\"ok\": true}"}
                }
            ]
        });
        assert_eq!(decode_reply(&payload).as_deref(), Ok("{\"ok\": true}"));
    }

    #[test]
    fn joins_text_parts() {
        let payload = json!({
            "choices": [
                {"message": {"content": [{"type": "text", "text": "one"}, {"text": "two"}]}}
            ]
        });
        assert_eq!(decode_reply(&payload).as_deref(), Ok("one\ntwo"));
    }

    #[test]
    fn bare_string_is_the_reply() {
        assert_eq!(decode_reply(&json!("raw")).as_deref(), Ok("raw"));
    }

    #[test]
    fn each_missing_level_has_its_own_error() {
        assert_eq!(decode_reply(&json!(null)), Err(EnvelopeError::NotAnObject));
        assert_eq!(decode_reply(&json!([1])), Err(EnvelopeError::NotAnObject));
        assert_eq!(decode_reply(&json!({})), Err(EnvelopeError::MissingChoices));
        assert_eq!(
            decode_reply(&json!({"choices": []})),
            Err(EnvelopeError::EmptyChoices)
        );
        assert_eq!(
            decode_reply(&json!({"choices": [{}]})),
            Err(EnvelopeError::MissingMessage)
        );
        assert_eq!(
            decode_reply(&json!({"choices": [{"message": {}}]})),
            Err(EnvelopeError::MissingContent)
        );
        assert_eq!(
            decode_reply(&json!({"choices": [{"message": {"content": null}}]})),
            Err(EnvelopeError::MissingContent)
        );
        assert_eq!(
            decode_reply(&json!({"choices": [{"message": {"content": 7}}]})),
            Err(EnvelopeError::UnsupportedContent)
        );
    }

    #[test]
    fn wrong_field_types_do_not_panic() {
        assert_eq!(
            decode_reply(&json!({"choices": "nope"})),
            Err(EnvelopeError::InvalidShape)
        );
    }
}
