use anyhow::{Context, Result};
use colored::Colorize;
use oatrack_infrastructure::write_export;
use std::path::PathBuf;

use super::Session;

pub async fn run(session: &Session, out: Option<PathBuf>) -> Result<()> {
    let dir = match out {
        Some(dir) => dir,
        None => session
            .paths
            .export_dir()
            .context("Failed to resolve the export directory")?,
    };

    let records = session.controller.working_set().await;
    let path = write_export(&dir, &records).await?;

    println!(
        "{} {} answers to {}",
        "Exported".green(),
        records.len(),
        path.display()
    );
    Ok(())
}
