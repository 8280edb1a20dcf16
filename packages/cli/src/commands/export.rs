use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use dmn_manager::ImportOptions;
use dmn_model::SerializeOptions;
use std::fs;
use std::path::PathBuf;

use super::{print_warnings, read_document, Session};
use crate::config::Config;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// DMN file to load
    pub file: PathBuf,

    /// Pretty-print the output
    #[arg(long)]
    pub format: bool,

    /// Include the XML declaration
    #[arg(long)]
    pub preamble: bool,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn export(args: ExportArgs, config: &Config) -> Result<()> {
    let text = read_document(&args.file)?;
    let mut session = Session::new(config);
    let warnings = session.import(&text, ImportOptions::install_only()).await?;

    let xml = session
        .manager
        .export_document(SerializeOptions {
            format: args.format,
            preamble: args.preamble,
        })
        .await?;

    match &args.output {
        Some(path) => {
            fs::write(path, &xml).with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("{} {}", "✓".green(), path.display());
        }
        None => println!("{xml}"),
    }
    print_warnings(&warnings);

    Ok(())
}
