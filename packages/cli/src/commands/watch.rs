use anyhow::Result;
use clap::Args;
use colored::Colorize;
use dmn_manager::{Event, EventName, ImportOptions};
use notify::{Config as WatcherConfig, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::{print_warnings, read_document, Session};
use crate::config::Config;

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// DMN file to watch
    pub file: PathBuf,
}

pub async fn watch(args: WatchArgs, config: &Config) -> Result<()> {
    let mut session = Session::new(config);
    session.manager.on(EventName::ViewsChanged, |event| {
        if let Event::ViewsChanged { views, active_view } = event {
            println!(
                "{} {} view(s), active: {}",
                "↻".cyan(),
                views.len(),
                active_view
                    .and_then(|v| v.element_id())
                    .unwrap_or("none")
            );
        }
        None
    });

    reload(&mut session, &args.file).await;

    let (tx, mut rx) = mpsc::channel(16);
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<notify::Event>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        },
        WatcherConfig::default(),
    )?;
    watcher.watch(&args.file, RecursiveMode::NonRecursive)?;

    println!("{} {}", "👀 Watching".bright_blue(), args.file.display());

    loop {
        tokio::select! {
            Some(event) = rx.recv() => {
                if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    debug!(?event.kind, "File changed");
                    reload(&mut session, &args.file).await;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info!("Stopping watch");
    session.manager.destroy();
    Ok(())
}

/// Re-import the file; the active view is kept when it still exists
async fn reload(session: &mut Session, path: &Path) {
    let text = match read_document(path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("{} {:#}", "✗".red(), err);
            return;
        }
    };

    match session.import(&text, ImportOptions::default()).await {
        Ok(warnings) => {
            session.print_output();
            print_warnings(&warnings);
        }
        Err(err) => eprintln!("{} {}", "✗".red(), err),
    }

    for result in session.manager.run_deferred().await {
        match result {
            Ok(warnings) => print_warnings(&warnings),
            Err(err) => eprintln!("{} {}", "✗".red(), err),
        }
    }
    session.print_output();
}
