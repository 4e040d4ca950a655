//! Record domain module.
//!
//! # Module Structure
//!
//! - `model`: `Record`, the `NewRecord` draft and the favorite-only `RecordPatch`

mod model;

pub use model::{NewRecord, RECORD_DATE_FORMAT, Record, RecordPatch};
