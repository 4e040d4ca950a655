use anyhow::Result;
use colored::Colorize;
use oatrack_application::TrackerView;
use oatrack_core::filter::RecordFilter;
use oatrack_core::view::{CardView, RowView};

use super::Session;

pub struct ListArgs {
    pub search: Option<String>,
    pub company: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub page: usize,
    pub cards: bool,
}

impl ListArgs {
    fn filter(&self) -> RecordFilter {
        RecordFilter::new()
            .with_text(self.search.clone().unwrap_or_default())
            .with_company(self.company.clone().unwrap_or_default())
            .with_date_range(
                self.from.clone().unwrap_or_default(),
                self.to.clone().unwrap_or_default(),
            )
    }
}

pub async fn run(session: &Session, args: ListArgs) -> Result<()> {
    session.controller.set_filter(args.filter()).await?;
    let view = session.controller.set_page(args.page).await?;

    if let Some(message) = &view.table.empty_message {
        println!("{}", message.dimmed());
        return Ok(());
    }

    if args.cards {
        view.cards.iter().for_each(print_card);
    } else {
        view.table.rows.iter().for_each(print_row);
    }

    print_footer(&view);
    Ok(())
}

fn star(glyph: &str, favorite: bool) -> String {
    if favorite {
        glyph.yellow().to_string()
    } else {
        glyph.dimmed().to_string()
    }
}

fn print_row(row: &RowView) {
    println!(
        "{} {}  {}  {}  {}",
        star(row.favorite_glyph, row.favorite),
        row.id.dimmed(),
        row.company.bold(),
        row.date,
        row.question
    );
    println!("    {}", row.answer);
}

fn print_card(card: &CardView) {
    let favorite = card.favorite_glyph == oatrack_core::view::FAVORITE_GLYPH;
    println!("{} {}", star(card.favorite_glyph, favorite), card.header.bold());
    println!("  {} {}", "Q:".cyan(), card.question);
    println!("  {} {}", "A:".green(), card.answer);
    println!("  {}", card.id.dimmed());
    println!();
}

fn print_footer(view: &TrackerView) {
    if let Some(pagination) = &view.table.pagination {
        let prev = if pagination.has_prev { "← Previous" } else { "" };
        let next = if pagination.has_next { "Next →" } else { "" };
        println!("\n{}  {}  {}", prev, pagination.label, next);
    }
}
