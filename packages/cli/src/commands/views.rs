use anyhow::Result;
use clap::Args;
use colored::Colorize;
use dmn_manager::{ImportOptions, Manager};
use std::path::PathBuf;

use super::{print_warnings, read_document, Session};
use crate::config::Config;

#[derive(Debug, Args)]
pub struct ViewsArgs {
    /// DMN file to inspect
    pub file: PathBuf,
}

pub async fn views(args: ViewsArgs, config: &Config) -> Result<()> {
    let text = read_document(&args.file)?;
    let mut session = Session::new(config);
    let warnings = session.import(&text, ImportOptions::default()).await?;

    println!("{} {}", "Views in".bright_blue().bold(), args.file.display());
    for line in describe_views(&session.manager) {
        println!("{line}");
    }
    print_warnings(&warnings);

    Ok(())
}

/// One line per view: active marker, element id, provider, label
pub fn describe_views(manager: &Manager) -> Vec<String> {
    manager
        .views()
        .iter()
        .map(|view| {
            let marker = if manager.active_view() == Some(view) { "*" } else { " " };
            format!(
                "{marker} {:<20} {:<18} {}",
                view.element_id().unwrap_or("-"),
                view.provider_id(),
                view.element.label()
            )
        })
        .collect()
}
