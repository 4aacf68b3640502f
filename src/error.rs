use thiserror::Error;

use crate::provider::envelope::EnvelopeError;
use crate::repair::ParseError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    #[error("token budget exceeded: {tokens} > {limit}")]
    BudgetExceeded { tokens: usize, limit: usize },
    #[error("provider call failed: {0}")]
    Transport(String),
    #[error("malformed provider response: {0}")]
    MalformedResponse(#[from] EnvelopeError),
    #[error("unparsable json: {0}")]
    UnparsableJson(#[from] ParseError),
    #[error("json repair failed: {0}")]
    RepairFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentErrorCode {
    E001BudgetExceeded,
    E002Transport,
    E003MalformedResponse,
    E004UnparsableJson,
    E005RepairFailed,
}

impl AgentErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::E001BudgetExceeded => "E001_BUDGET_EXCEEDED",
            Self::E002Transport => "E002_TRANSPORT",
            Self::E003MalformedResponse => "E003_MALFORMED_RESPONSE",
            Self::E004UnparsableJson => "E004_UNPARSABLE_JSON",
            Self::E005RepairFailed => "E005_REPAIR_FAILED",
        }
    }
}

impl AgentError {
    pub fn code(&self) -> AgentErrorCode {
        match self {
            AgentError::BudgetExceeded { .. } => AgentErrorCode::E001BudgetExceeded,
            AgentError::Transport(_) => AgentErrorCode::E002Transport,
            AgentError::MalformedResponse(_) => AgentErrorCode::E003MalformedResponse,
            AgentError::UnparsableJson(_) => AgentErrorCode::E004UnparsableJson,
            AgentError::RepairFailed(_) => AgentErrorCode::E005RepairFailed,
        }
    }
}
