//! Historical Console - Entry Point

use clap::Parser;
use historical_console::backend::TracingBackend;
use historical_console::logging::LogTarget;
use historical_console::{Console, Session};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::info;

/// Replay a script of console calls and print the recorded history
#[derive(Parser, Debug)]
#[command(name = "hcon")]
#[command(version)]
#[command(about = "Replay JSONL console call scripts and print their recorded history")]
pub struct Args {
    /// Path to JSONL call script (reads from stdin if not provided)
    pub script: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Do not append caller labels to records
    #[arg(long)]
    pub no_caller: bool,

    /// Characters of source text used to label unnamed callers (must be positive)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub snippet_length: Option<u32>,

    /// Pretty-print the history
    #[arg(long)]
    pub pretty: bool,

    /// Where tracing output goes; `-` for stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = historical_console::config::load_config_with_precedence(args.config.clone())?;
        let merged = historical_console::config::merge_config(config_file);
        let with_env = historical_console::config::apply_env_overrides(merged);

        let caller_override = if args.no_caller { Some(false) } else { None };
        let length_override = args.snippet_length.map(|n| n as usize);

        historical_console::config::apply_cli_overrides(
            with_env,
            caller_override,
            length_override,
            args.log_file.clone(),
        )
    };

    historical_console::logging::init(&LogTarget::from_path(&config.log_file_path))?;

    info!(config = ?config, "Configuration loaded and resolved");

    let calls = historical_console::source::read_script(args.script.clone())?;

    let console = Console::builder()
        .backend(Rc::new(TracingBackend))
        .config(&config)
        .build();
    let history = historical_console::replay::replay(calls, Session::from_console(console))?;

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&history)?
    } else {
        serde_json::to_string(&history)?
    };
    println!("{rendered}");

    info!(records = history.len(), "Replay finished");
    Ok(())
}
