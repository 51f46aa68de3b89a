use clap::{Parser, Subcommand};
use std::path::Path;
use txrx_parser::Document;

#[derive(Parser)]
#[command(name = "txrx")]
#[command(about = "TXRX — inspect begin_<...> / end_<...> section files")]
#[command(version)]
struct Cli {
    /// Log parser progress at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check a .txrx file for syntax errors
    Check {
        /// Input .txrx file
        path: String,
    },

    /// Print a .txrx file as JSON
    Dump {
        /// Input .txrx file
        path: String,

        /// Only print this top-level section
        #[arg(short, long)]
        section: Option<String>,

        /// Single-line output instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// List the top-level sections of a .txrx file
    Sections {
        /// Input .txrx file
        path: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Check { path } => cmd_check(&path),
        Command::Dump {
            path,
            section,
            compact,
        } => cmd_dump(&path, section.as_deref(), compact),
        Command::Sections { path } => cmd_sections(&path),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn read_document(path: &str) -> Document {
    if !Path::new(path).exists() {
        eprintln!("Error: file not found: {path}");
        std::process::exit(1);
    }
    match txrx_parser::parse_file(path) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::debug!(kind = ?e.kind(), "parse failed");
            eprintln!("{path}: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_check(path: &str) {
    let doc = read_document(path);
    tracing::info!(sections = doc.len(), "checked {path}");
    eprintln!("OK: {path}");
}

fn cmd_dump(path: &str, section: Option<&str>, compact: bool) {
    let doc = read_document(path);

    let json = match section {
        Some(name) => match doc.get(name) {
            Some(node) => to_json(node, compact),
            None => {
                eprintln!("Error: no section named '{name}' in {path}");
                std::process::exit(1);
            }
        },
        None => to_json(&doc, compact),
    };

    match json {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Error serializing {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_sections(path: &str) {
    let doc = read_document(path);
    for (name, node) in &doc {
        match &node.name {
            Some(label) => println!("{name}\t{label}"),
            None => println!("{name}"),
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> serde_json::Result<String> {
    if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
}
