//! # gridwise-cli
//!
//! Command-line interface for gridwise: one-shot instructions, an
//! interactive session and data profiles over CSV files.

mod load;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use gridwise_assistant::{Assistant, AssistantConfig};
use gridwise_core::{Grid, OperationError, OperationResult};
use gridwise_interpreter::Session;
use gridwise_profiler::Suggestions;
use render::OutputFormat;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Rows shown by `:show`.
const SHOW_ROWS: usize = 20;

/// gridwise - plain-language spreadsheet commands
#[derive(Parser)]
#[command(name = "gridwise")]
#[command(author, version, about = "Plain-language spreadsheet commands and data profiling", long_about = None)]
struct Cli {
    /// CSV or TSV file to load
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Run one instruction against FILE
    #[arg(short = 'e', long = "execute", value_name = "PROMPT")]
    execute: Option<String>,

    /// Start an interactive session
    #[arg(short = 'i', long = "interactive")]
    interactive: bool,

    /// Profile FILE and print suggestions
    #[arg(long)]
    profile: bool,

    /// Output format (json, table)
    #[arg(short = 'f', long = "format", default_value = "table")]
    format: OutputFormat,

    /// Assistant configuration (YAML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    let config = match &cli.config {
        Some(path) => AssistantConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => AssistantConfig::default(),
    };
    let assistant = Assistant::from_config(config).context("Failed to set up the AI assistant")?;

    let grid = match &cli.file {
        Some(path) => load::read_grid(path)?,
        None => Grid::default(),
    };

    if cli.interactive {
        run_repl(&assistant, Session::new(grid), cli.format).await
    } else if let Some(prompt) = cli.execute {
        anyhow::ensure!(cli.file.is_some(), "--execute needs a FILE to run against");
        let mut session = Session::new(grid);
        let result = assistant.run(&mut session, &prompt).await;
        print_result(&result, cli.format)?;
        if !result.is_success() {
            std::process::exit(1);
        }
        Ok(())
    } else if cli.profile {
        anyhow::ensure!(cli.file.is_some(), "--profile needs a FILE to analyze");
        print_profile(&grid, cli.format)
    } else {
        // No arguments - show help
        Cli::parse_from(["gridwise", "--help"]);
        Ok(())
    }
}

fn print_profile(grid: &Grid, format: OutputFormat) -> Result<()> {
    let structure = gridwise_profiler::profile(grid)?;
    let suggestions = Suggestions::from_structure(&structure);
    println!("{}", render::profile(&structure, &suggestions, format)?);
    Ok(())
}

/// Message line coloured by outcome, then any details.
fn print_result(result: &OperationResult, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Table {
        let message = match &result.error {
            None => result.message.green(),
            Some(OperationError::Unhandled) => result.message.yellow(),
            Some(_) => result.message.red(),
        };
        println!("{message}");
    }
    if let Some(details) = render::result_details(result, format)? {
        println!("{details}");
    }
    Ok(())
}

/// Run the REPL.
async fn run_repl(assistant: &Assistant, mut session: Session, format: OutputFormat) -> Result<()> {
    println!(
        "{} {} - Interactive Mode",
        "gridwise".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "Type {} for help, {} to exit\n",
        ":help".yellow(),
        ":quit".yellow()
    );

    let mut rl = DefaultEditor::new()?;
    let history_path = dirs_history_path();

    // Load history if available
    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    loop {
        let prompt = "gridwise> ".green().bold().to_string();

        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if line.starts_with(':') {
                    match repl_command(&mut session, line, format) {
                        Ok(true) => break,
                        Ok(false) => {}
                        Err(e) => println!("{} {e:#}", "Error:".red().bold()),
                    }
                    continue;
                }

                if session.grid.is_empty() {
                    println!("{} load a file first with {}", "No data:".yellow(), ":load FILE".yellow());
                    continue;
                }

                let result = assistant.run(&mut session, line).await;
                if let Err(e) = print_result(&result, format) {
                    println!("{} {e}", "Error:".red().bold());
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => {
                println!("{} {e}", "Error:".red().bold());
                break;
            }
        }
    }

    // Save history
    if let Some(ref path) = history_path {
        let _ = rl.save_history(path);
    }

    Ok(())
}

/// Handle a `:command`. Returns `true` when the REPL should exit.
fn repl_command(session: &mut Session, line: &str, format: OutputFormat) -> Result<bool> {
    let (command, arg) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(c, a)| (c, a.trim()));

    match command {
        ":quit" | ":q" | ":exit" => return Ok(true),
        ":help" | ":h" | ":?" => print_help(),
        ":show" => println!("{}", render::grid(&session.grid, SHOW_ROWS)),
        ":profile" => print_profile(&session.grid, format)?,
        ":load" => {
            anyhow::ensure!(!arg.is_empty(), "usage: :load FILE");
            *session = Session::new(load::read_grid(Path::new(arg))?);
            println!("Loaded {} rows", session.grid.row_count());
        }
        ":save" => {
            anyhow::ensure!(!arg.is_empty(), "usage: :save FILE");
            load::write_grid(&session.grid, Path::new(arg))?;
            println!("Saved {} rows to {arg}", session.grid.row_count());
        }
        ":clear" => print!("\x1B[2J\x1B[1;1H"),
        _ => anyhow::bail!("Unknown command: {line}"),
    }
    Ok(false)
}

/// Get the history file path.
fn dirs_history_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|mut p| {
        p.push("gridwise");
        let _ = std::fs::create_dir_all(&p);
        p.push("history.txt");
        p
    })
}

/// Print REPL help.
fn print_help() {
    println!("{}", "gridwise REPL Commands:".cyan().bold());
    println!("  {}    Show this help", ":help, :h, :?".yellow());
    println!("  {}  Exit the REPL", ":quit, :q, :exit".yellow());
    println!("  {}          Print the first rows", ":show".yellow());
    println!("  {}       Profile the data", ":profile".yellow());
    println!("  {}     Load a CSV or TSV file", ":load FILE".yellow());
    println!("  {}     Save the current grid", ":save FILE".yellow());
    println!("  {}         Clear screen", ":clear".yellow());
    println!();
    println!("{}", "Examples:".cyan().bold());
    println!("  sum of column B");
    println!("  A1/B1");
    println!("  remove duplicates");
    println!("  highlight top 5 in green");
    println!("  sum of sales by region");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(Grid::from_data(vec![vec!["Name", "Qty"], vec!["pen", "3"]]))
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from(["gridwise", "data.csv", "-e", "sum of column B", "-f", "json", "-v"]);
        assert_eq!(cli.file, Some(PathBuf::from("data.csv")));
        assert_eq!(cli.execute.as_deref(), Some("sum of column B"));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.verbose && !cli.interactive && !cli.profile);
    }

    #[test]
    fn test_cli_profile_and_config() {
        let cli = Cli::parse_from(["gridwise", "--profile", "--config", "gw.yaml", "data.csv"]);
        assert!(cli.profile);
        assert_eq!(cli.config, Some(PathBuf::from("gw.yaml")));
        assert_eq!(cli.format, OutputFormat::Table);
    }

    #[test]
    fn test_repl_quit() {
        let mut session = session();
        assert!(repl_command(&mut session, ":q", OutputFormat::Table).unwrap());
        assert!(!repl_command(&mut session, ":show", OutputFormat::Table).unwrap());
    }

    #[test]
    fn test_repl_unknown_command() {
        let err = repl_command(&mut session(), ":frobnicate", OutputFormat::Table).unwrap_err();
        assert_eq!(err.to_string(), "Unknown command: :frobnicate");
    }

    #[test]
    fn test_repl_load_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        std::fs::write(&input, "City\nOslo\nRome\n").unwrap();

        let mut session = session();
        session.overlay.apply(
            gridwise_core::CellRef::new(0, 0),
            &gridwise_core::CellFormat::bold(),
        );
        repl_command(&mut session, &format!(":load {}", input.display()), OutputFormat::Table).unwrap();
        assert_eq!(session.grid.row_count(), 3);
        assert!(session.overlay.is_empty());

        let output = dir.path().join("out.csv");
        repl_command(&mut session, &format!(":save {}", output.display()), OutputFormat::Table).unwrap();
        assert_eq!(std::fs::read_to_string(output).unwrap(), "City\nOslo\nRome\n");
    }

    #[test]
    fn test_repl_load_needs_argument() {
        assert!(repl_command(&mut session(), ":load", OutputFormat::Table).is_err());
    }
}
