use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::commands::{self, CommandReport, inline_or_file};
use crate::logging;

#[derive(Debug, Parser)]
#[command(
    name = "dirty-json-agent",
    version,
    about = "Ask a chat-completion model for structured JSON and repair almost-JSON replies"
)]
struct Cli {
    /// Print the command report as JSON.
    #[arg(long, global = true)]
    json: bool,
    /// Log at debug level to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Send a structured request and repair the reply into JSON.
    Ask(AskArgs),
    /// Run the local repair pipeline over text from a file or stdin.
    Parse(InputArgs),
    /// Ask the model to repair dirty JSON against a schema.
    Fix(FixArgs),
    /// Count tokens for text from a file or stdin and check the budget.
    Tokens(InputArgs),
    /// Send a JSON array of chat messages and print `{"response": ...}`.
    Chat(InputArgs),
    /// Show the resolved configuration.
    Status,
}

#[derive(Debug, Args)]
struct InputArgs {
    /// Read input from this file instead of stdin.
    #[arg(long)]
    file: Option<String>,
}

#[derive(Debug, Args)]
struct SchemaArgs {
    /// Expected response schema, inline.
    #[arg(long, conflicts_with = "schema_file")]
    schema: Option<String>,
    /// Expected response schema, read from a file.
    #[arg(long)]
    schema_file: Option<String>,
}

#[derive(Debug, Args)]
struct AskArgs {
    /// Role description sent as the first message.
    #[arg(long)]
    role: String,
    #[arg(long)]
    instruction: String,
    #[command(flatten)]
    schema: SchemaArgs,
    #[arg(long, conflicts_with = "code_file")]
    code: Option<String>,
    #[arg(long)]
    code_file: Option<String>,
    /// Keep only the first N word tokens of the code.
    #[arg(long)]
    compress: Option<usize>,
    /// Save the structured reply as `<NAME>.json`.
    #[arg(long, value_name = "NAME")]
    save: Option<String>,
    /// Write each item of an array reply to `<NAME>/slide_<n>.html`.
    #[arg(long, value_name = "NAME")]
    slides_dir: Option<String>,
}

#[derive(Debug, Args)]
struct FixArgs {
    #[command(flatten)]
    schema: SchemaArgs,
    /// Parse error observed for the dirty JSON.
    #[arg(long)]
    error: String,
    #[arg(long)]
    file: Option<String>,
}

fn render_text(report: &CommandReport) -> String {
    let mut out = format!(
        "{}: {}\n",
        report.command,
        if report.ok { "ok" } else { "failed" }
    );
    for detail in &report.details {
        out.push_str(&format!("  - {detail}\n"));
    }
    for issue in &report.issues {
        out.push_str(&format!("  ! {issue}\n"));
    }
    if let Some(payload) = &report.payload {
        let pretty = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
        out.push_str(&pretty);
        out.push('\n');
    }
    out
}

fn dispatch(command: Command) -> Result<CommandReport> {
    match command {
        Command::Ask(args) => {
            let schema = inline_or_file(
                args.schema.schema.as_deref(),
                args.schema.schema_file.as_deref(),
                "schema",
            )?;
            let code = inline_or_file(args.code.as_deref(), args.code_file.as_deref(), "code")?;
            commands::ask::run(&commands::ask::AskOptions {
                role: args.role,
                instruction: args.instruction,
                schema,
                code,
                compress: args.compress,
                save: args.save,
                slides_dir: args.slides_dir,
            })
        }
        Command::Parse(args) => commands::parse::run(&commands::parse::ParseOptions { file: args.file }),
        Command::Fix(args) => {
            let schema = inline_or_file(
                args.schema.schema.as_deref(),
                args.schema.schema_file.as_deref(),
                "schema",
            )?;
            commands::fix::run(&commands::fix::FixOptions {
                schema,
                error: args.error,
                file: args.file,
            })
        }
        Command::Tokens(args) => {
            commands::tokens::run(&commands::tokens::TokensOptions { file: args.file })
        }
        Command::Chat(args) => commands::chat::run(&commands::chat::ChatOptions { file: args.file }),
        Command::Status => commands::status::run(),
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let report = dispatch(cli.command)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
    }

    if !report.ok {
        anyhow::bail!("{} reported {} issue(s)", report.command, report.issues.len());
    }
    Ok(())
}
