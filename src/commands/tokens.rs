use anyhow::Result;

use crate::agent::config::load_config;
use crate::agent::message::ChatMessage;
use crate::agent::tokens::{MAX_PROMPT_TOKENS, check_budget, count_message_tokens, counter_for};
use crate::commands::{CommandReport, read_input};

#[derive(Debug, Clone, Default)]
pub struct TokensOptions {
    pub file: Option<String>,
}

pub fn run(opts: &TokensOptions) -> Result<CommandReport> {
    let cfg = load_config()?;
    let raw = read_input(opts.file.as_deref())?;
    let mut report = CommandReport::new("tokens");

    let counter = counter_for(&cfg.encoding);
    let messages = [ChatMessage::user(raw)];
    report.detail(format!("encoding={}", counter.encoding()));
    report.detail(format!("tokens={}", count_message_tokens(counter.as_ref(), &messages)));
    report.detail(format!("limit={MAX_PROMPT_TOKENS}"));

    if let Err(err) = check_budget(counter.as_ref(), &messages) {
        report.issue(format!("{}: {err}", err.code().as_str()));
    }

    Ok(report)
}
