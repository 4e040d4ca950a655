use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{self, BufRead, Write};

use super::Session;

pub async fn run(session: &Session, id: &str, yes: bool) -> Result<()> {
    if !yes && !confirm("Are you sure you want to delete this answer?")? {
        println!("Cancelled.");
        return Ok(());
    }

    session
        .mutate(session.controller.delete(id))
        .await
        .map_err(|e| anyhow::anyhow!("Error deleting answer: {}", e))?;

    println!("{}", "Answer deleted successfully".green());
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read confirmation")?;

    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}
