mod commands;
mod config;
mod renderers;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use commands::{export, open, views, watch, ExportArgs, OpenArgs, ViewsArgs, WatchArgs};
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// DMN CLI - inspect, render and export DMN decision models
#[derive(Parser, Debug)]
#[command(name = "dmn")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ./dmn.config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the views of a DMN file
    Views(ViewsArgs),

    /// Render one view of a DMN file
    Open(OpenArgs),

    /// Re-serialize a DMN file
    Export(ExportArgs),

    /// Re-render a DMN file whenever it changes
    Watch(WatchArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("Cannot get current directory")?;
    let config = Config::load(&cwd, cli.config.as_deref())?;
    if !config.cli.color {
        colored::control::set_override(false);
    }

    match cli.command {
        Command::Views(args) => views(args, &config).await,
        Command::Open(args) => open(args, &config).await,
        Command::Export(args) => export(args, &config).await,
        Command::Watch(args) => watch(args, &config).await,
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "error",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}
