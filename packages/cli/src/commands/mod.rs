pub mod export;
pub mod open;
pub mod views;
pub mod watch;

pub use export::{export, ExportArgs};
pub use open::{open, OpenArgs};
pub use views::{views, ViewsArgs};
pub use watch::{watch, WatchArgs};

use anyhow::{Context, Result};
use colored::Colorize;
use dmn_manager::{ImportOptions, Manager};
use dmn_model::{Warning, XmlGateway};
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::renderers::{self, Transcript};

/// A manager wired to the text renderers
pub(crate) struct Session {
    pub manager: Manager,
    transcript: Transcript,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        let transcript = Transcript::new();
        let manager = Manager::new(
            Arc::new(XmlGateway::new()),
            renderers::registry(&transcript),
            config.manager.clone(),
        );
        Self { manager, transcript }
    }

    /// Import `text`, printing warnings whether or not the import succeeds
    pub async fn import(&mut self, text: &str, options: ImportOptions) -> Result<Vec<Warning>> {
        match self.manager.import_document(text, options).await {
            Ok(warnings) => Ok(warnings),
            Err(err) => {
                self.print_output();
                print_warnings(&err.warnings);
                Err(err.into())
            }
        }
    }

    /// Print and forget whatever the renderers displayed
    pub fn print_output(&self) {
        for line in self.transcript.take() {
            println!("{line}");
        }
    }
}

pub(crate) fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub(crate) fn print_warnings(warnings: &[Warning]) {
    if warnings.is_empty() {
        return;
    }

    eprintln!();
    eprintln!("{} {} warning(s)", "⚠".yellow(), warnings.len());
    for warning in warnings {
        eprintln!("  {} {}", "-".yellow(), warning);
    }
}
