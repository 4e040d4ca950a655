//! Record domain model.
//!
//! A record is one tracked question/answer entry: which company asked it,
//! on which date, and what the accepted answer was.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{OatrackError, Result};

/// Date format every record date is stored in.
///
/// Range filtering compares dates as strings, so this must stay the
/// zero-padded ISO form.
pub const RECORD_DATE_FORMAT: &str = "%Y-%m-%d";

/// A persisted question/answer entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Opaque identity assigned by the store adapter. Empty until persisted.
    #[serde(default)]
    pub id: String,
    /// Company the question came from.
    pub company: String,
    /// ISO calendar date (`YYYY-MM-DD`).
    pub date: String,
    /// Question text. May span multiple lines or contain code.
    pub question: String,
    /// Accepted answer text.
    pub answer: String,
    /// Whether the entry is starred.
    #[serde(default)]
    pub favorite: bool,
    /// RFC 3339 timestamp assigned by the store when the entry was persisted.
    #[serde(default)]
    pub created_at: String,
}

impl Record {
    /// Builds a persisted record from a validated draft.
    pub fn from_draft(draft: NewRecord, id: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            company: draft.company,
            date: draft.date,
            question: draft.question,
            answer: draft.answer,
            favorite: draft.favorite,
            created_at: created_at.into(),
        }
    }

    /// Case-insensitive substring match over the searchable fields.
    ///
    /// `needle` must already be lowercased.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.company.to_lowercase().contains(needle)
            || self.question.to_lowercase().contains(needle)
            || self.answer.to_lowercase().contains(needle)
    }
}

/// A record as entered by the user, before the store assigns identity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    pub company: String,
    pub date: String,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub favorite: bool,
}

impl NewRecord {
    /// Creates a draft, trimming the free-text fields the way the entry form does.
    pub fn new(
        company: impl AsRef<str>,
        date: impl AsRef<str>,
        question: impl AsRef<str>,
        answer: impl AsRef<str>,
    ) -> Self {
        Self {
            company: company.as_ref().trim().to_string(),
            date: date.as_ref().trim().to_string(),
            question: question.as_ref().trim().to_string(),
            answer: answer.as_ref().trim().to_string(),
            favorite: false,
        }
    }

    /// Marks the draft as a favorite before it is stored.
    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite = favorite;
        self
    }

    /// Checks the required fields.
    ///
    /// # Errors
    ///
    /// Returns `OatrackError::Validation` naming the first offending field when
    /// `company`, `date`, `question` or `answer` is empty, or when `date` is not
    /// a `YYYY-MM-DD` calendar date.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("company", &self.company),
            ("date", &self.date),
            ("question", &self.question),
            ("answer", &self.answer),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(OatrackError::validation(
                    field,
                    format!("{} is required", field),
                ));
            }
        }

        let parsed = NaiveDate::parse_from_str(&self.date, RECORD_DATE_FORMAT).map_err(|e| {
            OatrackError::validation(
                "date",
                format!("'{}' is not a YYYY-MM-DD date: {}", self.date, e),
            )
        })?;

        // Range filtering compares dates as strings, so only the padded form is accepted.
        if parsed.format(RECORD_DATE_FORMAT).to_string() != self.date {
            return Err(OatrackError::validation(
                "date",
                format!("'{}' must be written as {}", self.date, parsed.format(RECORD_DATE_FORMAT)),
            ));
        }

        Ok(())
    }
}

/// Partial update of a stored record.
///
/// Only the favorite flag is mutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
}

impl RecordPatch {
    pub fn favorite(favorite: bool) -> Self {
        Self {
            favorite: Some(favorite),
        }
    }

    /// Applies the set fields to `record`.
    pub fn apply_to(&self, record: &mut Record) {
        if let Some(favorite) = self.favorite {
            record.favorite = favorite;
        }
    }
}
