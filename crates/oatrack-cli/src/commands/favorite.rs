use anyhow::Result;
use colored::Colorize;
use oatrack_core::view::{FAVORITE_GLYPH, NOT_FAVORITE_GLYPH};

use super::Session;

pub async fn run(session: &Session, id: &str) -> Result<()> {
    let favorite = session
        .mutate(session.controller.toggle_favorite(id))
        .await
        .map_err(|e| anyhow::anyhow!("Error updating favorite: {}", e))?;

    if favorite {
        println!("{} {}", FAVORITE_GLYPH.yellow(), id);
    } else {
        println!("{} {}", NOT_FAVORITE_GLYPH.dimmed(), id);
    }
    Ok(())
}
