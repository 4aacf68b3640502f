use anyhow::Result;
use serde_json::Value;

use crate::agent::Agent;
use crate::agent::config::load_config;
use crate::commands::{CommandReport, read_input};

#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    pub file: Option<String>,
}

pub fn run(opts: &ChatOptions) -> Result<CommandReport> {
    let cfg = load_config()?;
    let input = read_input(opts.file.as_deref())?;
    let mut report = CommandReport::new("chat");

    if let Err(err) = cfg.require_api_key() {
        report.issue(format!("{err}"));
        return Ok(report);
    }

    let agent = Agent::from_config(cfg)?;
    let out = agent.process_message(&input)?;
    let wrapped: Value = serde_json::from_str(&out)?;
    if wrapped.get("response").is_none_or(Value::is_null) {
        report.issue("provider returned no response");
    }
    report.payload = Some(wrapped);

    Ok(report)
}
