use anyhow::Result;

use crate::agent::client::REPAIR_DEPTH;
use crate::agent::config::{known_env_vars_set, load_config};
use crate::agent::tokens::MAX_PROMPT_TOKENS;
use crate::commands::CommandReport;
use crate::provider::openai::chat_completions_url;

pub fn run() -> Result<CommandReport> {
    let cfg = load_config()?;
    let mut report = CommandReport::new("status");

    report.detail(format!("build_id={}", env!("DJA_BUILD_ID")));
    report.detail(format!("model={}", cfg.model));
    report.detail(format!("endpoint={}", chat_completions_url(&cfg.base_url)));
    report.detail(format!("request_timeout_secs={}", cfg.request_timeout_secs));
    report.detail(format!("encoding={}", cfg.encoding));
    report.detail(format!("show_status={}", cfg.show_status));
    report.detail(format!("api_key={}", cfg.masked_api_key()));
    report.detail(format!("max_prompt_tokens={MAX_PROMPT_TOKENS}"));
    report.detail(format!("repair_depth={REPAIR_DEPTH}"));

    let env_set = known_env_vars_set();
    if !env_set.is_empty() {
        report.detail(format!("env_overrides={}", env_set.join(",")));
    }

    if cfg.require_api_key().is_err() {
        report.issue("missing provider api key (DJA_API_KEY or OPENAI_API_KEY)");
    }

    Ok(report)
}
