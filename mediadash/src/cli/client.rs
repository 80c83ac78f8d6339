use std::path::{Path, PathBuf};

use anyhow::Context;
use client::notice::{Notice, Notify};
use client::{render, AssumeYes, Dashboard, DeleteOutcome, FileHandle, HttpStorage};
use kernel::FileId;
use tokio::io::AsyncWriteExt;

use super::prompt::{self, TerminalConfirm};

/// Outcome notices go to stdout, failures to stderr.
pub struct ConsoleNotifier;

impl Notify for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        if notice.is_failure() {
            eprintln!("{notice}");
        } else {
            println!("{notice}");
        }
    }
}

pub async fn list(
    dashboard: &Dashboard<HttpStorage>,
    category: &str,
    search: Option<&str>,
) -> anyhow::Result<()> {
    dashboard.select_category_named(category).await?;
    if let Some(text) = search {
        dashboard.search(text).await;
    }
    let visible = dashboard.visible_files().await;
    if visible.is_empty() {
        println!("No files");
        return Ok(());
    }
    println!("{}", render::files_table(&visible));
    Ok(())
}

pub async fn stats(dashboard: &Dashboard<HttpStorage>) -> anyhow::Result<()> {
    dashboard.refresh_stats().await?;
    match dashboard.stats().await {
        Some(stats) => println!("{}", render::stats_table(&stats)),
        None => println!("No statistics available"),
    }
    Ok(())
}

pub async fn storage_path(dashboard: &Dashboard<HttpStorage>) -> anyhow::Result<()> {
    println!("{}", dashboard.storage_path().await?);
    Ok(())
}

pub async fn upload(dashboard: &Dashboard<HttpStorage>, files: Vec<PathBuf>) -> anyhow::Result<()> {
    dashboard.upload_from_picker(files).await?;
    Ok(())
}

pub async fn drop_files(dashboard: &Dashboard<HttpStorage>) -> anyhow::Result<()> {
    eprintln!("Drag files into the terminal, then press Ctrl-D");
    let paths = prompt::read_dropped()
        .await
        .context("cannot read dropped files")?;
    if paths.is_empty() {
        tracing::debug!("nothing dropped");
        return Ok(());
    }
    let handles = paths.into_iter().map(FileHandle::Path).collect();
    dashboard.upload_from_drop(handles).await?;
    Ok(())
}

pub async fn set_permanent(
    dashboard: &Dashboard<HttpStorage>,
    id: &FileId,
    permanent: bool,
) -> anyhow::Result<()> {
    dashboard.set_permanent(id, permanent).await?;
    Ok(())
}

pub async fn delete(dashboard: &Dashboard<HttpStorage>, id: &FileId, yes: bool) -> anyhow::Result<()> {
    // The listing lets the prompt show the file name.
    if let Err(e) = dashboard.refresh().await {
        tracing::debug!("cannot load files before deletion: {e}");
    }
    let outcome = if yes {
        dashboard.delete_file(id, &AssumeYes).await?
    } else {
        dashboard.delete_file(id, &TerminalConfirm).await?
    };
    if outcome == DeleteOutcome::Cancelled {
        println!("Cancelled");
    }
    Ok(())
}

pub async fn process(dashboard: &Dashboard<HttpStorage>, id: &FileId) -> anyhow::Result<()> {
    dashboard.request_knowledge_processing(id).await?;
    Ok(())
}

pub async fn content(
    dashboard: &Dashboard<HttpStorage>,
    id: &FileId,
    output: &Path,
) -> anyhow::Result<()> {
    let mut file = tokio::fs::File::create(output)
        .await
        .with_context(|| format!("cannot create {}", output.display()))?;
    let written = dashboard.download(id, &mut file).await?;
    file.flush().await?;
    println!("{written} bytes written to {}", output.display());
    Ok(())
}
