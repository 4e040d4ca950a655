//! Page → display primitives. No filtering or paging decisions happen here.

use super::model::{
    CardView, EMPTY_MESSAGE, FAVORITE_GLYPH, NOT_FAVORITE_GLYPH, PaginationView, RowView,
    TableView,
};
use crate::filter::CompanySelector;
use crate::pagination::Page;
use crate::record::Record;

fn favorite_glyph(favorite: bool) -> &'static str {
    if favorite {
        FAVORITE_GLYPH
    } else {
        NOT_FAVORITE_GLYPH
    }
}

/// Caption shown between the prev/next controls.
pub fn page_label(page: usize, page_count: usize, total: usize) -> String {
    format!("Page {} of {} ({} total answers)", page, page_count, total)
}

pub fn project_row(record: &Record) -> RowView {
    RowView {
        id: record.id.clone(),
        company: record.company.clone(),
        date: record.date.clone(),
        question: record.question.clone(),
        answer: record.answer.clone(),
        favorite: record.favorite,
        favorite_glyph: favorite_glyph(record.favorite),
    }
}

/// Projects a page into the table layout.
pub fn project_table(page: &Page<Record>, companies: &CompanySelector) -> TableView {
    let rows: Vec<RowView> = page.items.iter().map(project_row).collect();

    let pagination = page.shows_controls().then(|| PaginationView {
        page: page.page,
        page_count: page.page_count,
        total: page.total,
        has_prev: page.has_prev(),
        has_next: page.has_next(),
        label: page_label(page.page, page.page_count, page.total),
    });

    let empty_message = rows.is_empty().then(|| EMPTY_MESSAGE.to_string());

    TableView {
        rows,
        pagination,
        empty_message,
        companies: companies.clone(),
    }
}

/// Projects a page into the card layout.
pub fn project_cards(page: &Page<Record>) -> Vec<CardView> {
    page.items
        .iter()
        .map(|record| CardView {
            id: record.id.clone(),
            header: format!("{} · {}", record.company, record.date),
            question: record.question.clone(),
            answer: record.answer.clone(),
            favorite_glyph: favorite_glyph(record.favorite),
        })
        .collect()
}
