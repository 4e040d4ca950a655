use anyhow::Result;
use colored::Colorize;
use oatrack_core::OatrackError;
use oatrack_core::record::NewRecord;

use super::Session;

pub async fn run(
    session: &Session,
    company: String,
    date: String,
    question: String,
    answer: String,
    favorite: bool,
) -> Result<()> {
    let draft = NewRecord::new(company, date, question, answer).with_favorite(favorite);

    match session.mutate(session.controller.add(draft)).await {
        Ok(id) => {
            println!("{} {}", "Answer added successfully! 🎉".green(), id.dimmed());
            Ok(())
        }
        Err(e @ OatrackError::Validation { .. }) => {
            tracing::debug!("[CLI] Rejected draft: {}", e);
            anyhow::bail!("{} ({})", e.user_message(), e)
        }
        Err(e) => anyhow::bail!("Error adding answer: {}", e),
    }
}
