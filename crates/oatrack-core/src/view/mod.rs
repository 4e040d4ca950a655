//! View projection: turns a page of records into renderable rows, cards and
//! pagination controls.

mod model;
pub mod projector;

pub use model::{
    CardView, EMPTY_MESSAGE, FAVORITE_GLYPH, NOT_FAVORITE_GLYPH, PaginationView, RowView,
    TableView,
};
pub use projector::{page_label, project_cards, project_row, project_table};
