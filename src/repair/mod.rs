pub mod braces;
pub mod literal;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub use braces::fix_mismatched_braces;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStage {
    Permissive,
    Strict,
}

impl ParseStage {
    pub fn label(self) -> &'static str {
        match self {
            ParseStage::Permissive => "permissive",
            ParseStage::Strict => "strict",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} parse failed: {message}", .stage.label())]
pub struct ParseError {
    pub stage: ParseStage,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Parsed(Value),
    Failed(ParseError),
}

/// Accepts JSON plus native literal syntax: single quotes, `True`/`False`/`None`,
/// trailing commas and unquoted keys.
fn parse_permissive(text: &str) -> Result<Value, ParseError> {
    let normalized = literal::normalize_native_literals(text);
    json5::from_str::<Value>(&normalized).map_err(|err| ParseError {
        stage: ParseStage::Permissive,
        message: err.to_string(),
    })
}

fn parse_strict(text: &str) -> Result<Value, ParseError> {
    serde_json::from_str::<Value>(text).map_err(|err| ParseError {
        stage: ParseStage::Strict,
        message: err.to_string(),
    })
}

/// Best-effort conversion of almost-JSON model output into a value.
///
/// Braces are balanced first, then a permissive literal parse runs. A
/// mapping or sequence from that parse is returned as is; a scalar sends the
/// corrected text through strict JSON parsing instead. Text the permissive
/// parser rejects still gets a strict attempt, and the permissive error is
/// reported when both fail.
pub fn parse(text: &str) -> ParseOutcome {
    let fixed = fix_mismatched_braces(text);

    let permissive = match parse_permissive(&fixed) {
        Ok(value) => value,
        Err(err) => {
            // json5 stops at i64; strict JSON still takes u64 and floats.
            if let Ok(value) = parse_strict(&fixed) {
                debug!(error = %err, "dirty json parsed as strict json");
                return ParseOutcome::Parsed(value);
            }
            warn!(error = %err, "dirty json rejected");
            return ParseOutcome::Failed(err);
        }
    };

    if matches!(permissive, Value::Object(_) | Value::Array(_)) {
        debug!("dirty json parsed");
        return ParseOutcome::Parsed(permissive);
    }

    match parse_strict(&fixed) {
        Ok(value) => {
            debug!("dirty json parsed as strict scalar");
            ParseOutcome::Parsed(value)
        }
        Err(err) => {
            warn!(error = %err, "dirty json scalar rejected");
            ParseOutcome::Failed(err)
        }
    }
}
