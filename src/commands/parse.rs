use anyhow::Result;

use crate::commands::{CommandReport, read_input};
use crate::repair::{self, ParseOutcome, fix_mismatched_braces};

#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub file: Option<String>,
}

pub fn run(opts: &ParseOptions) -> Result<CommandReport> {
    let raw = read_input(opts.file.as_deref())?;
    let mut report = CommandReport::new("parse");

    let corrected = fix_mismatched_braces(&raw) != raw;
    report.detail(format!("braces_corrected={corrected}"));

    match repair::parse(&raw) {
        ParseOutcome::Parsed(value) => {
            report.detail("parse=ok");
            report.payload = Some(value);
        }
        ParseOutcome::Failed(err) => {
            report.issue(format!("unparsable json: {err}"));
        }
    }

    Ok(report)
}
