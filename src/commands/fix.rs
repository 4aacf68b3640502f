use anyhow::Result;

use crate::agent::Agent;
use crate::agent::config::load_config;
use crate::commands::{CommandReport, read_input};

#[derive(Debug, Clone)]
pub struct FixOptions {
    pub schema: String,
    pub error: String,
    pub file: Option<String>,
}

pub fn run(opts: &FixOptions) -> Result<CommandReport> {
    let cfg = load_config()?;
    let dirty = read_input(opts.file.as_deref())?;
    let mut report = CommandReport::new("fix");

    if let Err(err) = cfg.require_api_key() {
        report.issue(format!("{err}"));
        return Ok(report);
    }

    let agent = Agent::from_config(cfg)?;
    match agent.try_auto_fix_json(&dirty, &opts.schema, &opts.error) {
        Ok(value) => {
            report.detail("fix=ok");
            report.payload = Some(value);
        }
        Err(err) => report.issue(format!("{}: {err}", err.code().as_str())),
    }

    Ok(report)
}
