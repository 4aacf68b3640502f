use anyhow::Result;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::agent::Agent;
use crate::agent::config::load_config;
use crate::agent::persist::{save_indexed_files, save_json};
use crate::agent::text::compress_text;
use crate::commands::CommandReport;

#[derive(Debug, Clone)]
pub struct AskOptions {
    pub role: String,
    pub instruction: String,
    pub schema: String,
    pub code: String,
    pub compress: Option<usize>,
    pub save: Option<String>,
    pub slides_dir: Option<String>,
}

/// Items of a top-level array as file contents: strings verbatim, anything
/// else pretty-printed.
fn array_items_as_text(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .map(|item| match item {
                Value::String(text) => text.clone(),
                other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
            })
            .collect(),
    )
}

fn persist_outputs(opts: &AskOptions, value: &Value, report: &mut CommandReport) -> Result<()> {
    if let Some(name) = opts.save.as_deref() {
        let path = PathBuf::from(format!("{name}.json"));
        save_json(value, &path)?;
        report.detail(format!("saved_json={}", path.display()));
    }

    if let Some(dir) = opts.slides_dir.as_deref() {
        match array_items_as_text(value) {
            Some(blobs) => {
                let written = save_indexed_files(Path::new("."), dir, &blobs)?;
                report.detail(format!("saved_slides={} dir={dir}", written.len()));
            }
            None => report.issue("--slides-dir requires the structured reply to be a JSON array"),
        }
    }
    Ok(())
}

pub fn run(opts: &AskOptions) -> Result<CommandReport> {
    let cfg = load_config()?;
    let mut report = CommandReport::new("ask");

    if let Err(err) = cfg.require_api_key() {
        report.issue(format!("{err}"));
        return Ok(report);
    }
    report.detail(format!("model={}", cfg.model));

    let code = match opts.compress {
        Some(max_tokens) => {
            report.detail(format!("code_compressed_to={max_tokens}"));
            compress_text(&opts.code, max_tokens)
        }
        None => opts.code.clone(),
    };

    let agent = Agent::from_config(cfg)?;
    match agent.try_ask_structured(&opts.role, &opts.instruction, &opts.schema, &code) {
        Ok(value) => {
            persist_outputs(opts, &value, &mut report)?;
            report.payload = Some(value);
        }
        Err(err) => report.issue(format!("{}: {err}", err.code().as_str())),
    }

    Ok(report)
}
