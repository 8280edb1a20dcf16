use anyhow::Result;
use clap::Args;
use colored::Colorize;
use dmn_manager::ImportOptions;
use std::path::PathBuf;

use super::{print_warnings, read_document, Session};
use crate::config::Config;

#[derive(Debug, Args)]
pub struct OpenArgs {
    /// DMN file to load
    pub file: PathBuf,

    /// Id of the element whose view to display
    pub element_id: String,
}

pub async fn open(args: OpenArgs, config: &Config) -> Result<()> {
    let text = read_document(&args.file)?;
    let mut session = Session::new(config);
    let mut warnings = session.import(&text, ImportOptions::install_only()).await?;

    let result = session.manager.open_by_id(&args.element_id).await;
    session.print_output();

    match result {
        Ok(render_warnings) => {
            warnings.extend(render_warnings);
            print_warnings(&warnings);
            Ok(())
        }
        Err(err) => {
            print_warnings(&warnings);
            let known: Vec<_> = session
                .manager
                .views()
                .iter()
                .filter_map(|v| v.element_id())
                .collect();
            if !known.is_empty() {
                eprintln!("{} {}", "Views:".dimmed(), known.join(", "));
            }
            Err(err.into())
        }
    }
}
