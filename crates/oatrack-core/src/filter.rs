//! Filter engine.
//!
//! Pure functions deriving the filtered view and the company selector from
//! the working set. Nothing here touches storage.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::record::Record;

/// Inputs of the filtered view. An empty field means "no constraint".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFilter {
    /// Case-insensitive substring searched in company, question and answer.
    #[serde(default)]
    pub text: String,
    /// Exact company name.
    #[serde(default)]
    pub company: String,
    /// Inclusive lower bound, ISO date.
    #[serde(default)]
    pub date_from: String,
    /// Inclusive upper bound, ISO date.
    #[serde(default)]
    pub date_to: String,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    pub fn with_date_range(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.date_from = from.into();
        self.date_to = to.into();
        self
    }

    /// True when every input is empty, i.e. the filter is the identity.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
            && self.company.is_empty()
            && self.date_from.is_empty()
            && self.date_to.is_empty()
    }

    /// Tests a single record against all four predicates.
    pub fn matches(&self, record: &Record) -> bool {
        let needle = self.text.trim().to_lowercase();
        self.matches_with_needle(record, &needle)
    }

    fn matches_with_needle(&self, record: &Record, needle: &str) -> bool {
        let text_ok = needle.is_empty() || record.contains_text(needle);
        let company_ok = self.company.is_empty() || record.company == self.company;
        let from_ok = self.date_from.is_empty() || record.date.as_str() >= self.date_from.as_str();
        let to_ok = self.date_to.is_empty() || record.date.as_str() <= self.date_to.as_str();

        text_ok && company_ok && from_ok && to_ok
    }
}

/// Returns the records passing `filter`, in working-set order.
pub fn filter_records(records: &[Record], filter: &RecordFilter) -> Vec<Record> {
    if filter.is_empty() {
        return records.to_vec();
    }

    let needle = filter.text.trim().to_lowercase();
    records
        .iter()
        .filter(|record| filter.matches_with_needle(record, &needle))
        .cloned()
        .collect()
}

/// Choices offered by the company dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompanySelector {
    /// Sorted distinct company names.
    pub options: Vec<String>,
    /// Current selection; empty means "all companies".
    pub selected: String,
}

impl CompanySelector {
    pub fn is_all(&self) -> bool {
        self.selected.is_empty()
    }
}

/// Recomputes the company dropdown from the full working set.
///
/// `current` survives only if some record still carries that company;
/// otherwise the selection falls back to "all".
pub fn company_options(records: &[Record], current: &str) -> CompanySelector {
    let options: Vec<String> = records
        .iter()
        .map(|record| record.company.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let selected = if options.iter().any(|company| company == current) {
        current.to_string()
    } else {
        String::new()
    };

    CompanySelector { options, selected }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, company: &str, date: &str, question: &str, answer: &str) -> Record {
        Record {
            id: id.to_string(),
            company: company.to_string(),
            date: date.to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
            favorite: false,
            created_at: String::new(),
        }
    }

    fn sample() -> Vec<Record> {
        vec![
            record("1", "Acme", "2024-01-15", "Reverse a linked list", "Iterate with three pointers"),
            record("2", "Globex", "2023-12-31", "Explain Kubernetes pods", "Smallest deployable unit"),
            record("3", "Acme", "2024-02-01", "SQL joins", "INNER, LEFT, RIGHT, FULL"),
            record("4", "Initech", "2024-01-20", "Two sum", "Use a hash map\nfn two_sum() {}"),
        ]
    }

    fn ids(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_is_identity() {
        let records = sample();
        assert_eq!(filter_records(&records, &RecordFilter::default()), records);
    }

    #[test]
    fn test_text_is_case_insensitive_across_fields() {
        let records = sample();

        let by_company = filter_records(&records, &RecordFilter::new().with_text("ACME"));
        assert_eq!(ids(&by_company), vec!["1", "3"]);

        let by_question = filter_records(&records, &RecordFilter::new().with_text("kubernetes"));
        assert_eq!(ids(&by_question), vec!["2"]);

        let by_answer = filter_records(&records, &RecordFilter::new().with_text("hash MAP"));
        assert_eq!(ids(&by_answer), vec!["4"]);
    }

    #[test]
    fn test_text_without_match_leaves_company_options_alone() {
        let records = sample();
        let before = company_options(&records, "");

        let filtered = filter_records(&records, &RecordFilter::new().with_text("docker"));
        assert!(filtered.is_empty());

        let after = company_options(&records, "");
        assert_eq!(before, after);
        assert_eq!(after.options, vec!["Acme", "Globex", "Initech"]);
    }

    #[test]
    fn test_company_matches_exactly() {
        let records = sample();
        let filtered = filter_records(&records, &RecordFilter::new().with_company("acme"));
        assert!(filtered.is_empty());

        let filtered = filter_records(&records, &RecordFilter::new().with_company("Acme"));
        assert_eq!(ids(&filtered), vec!["1", "3"]);
    }

    #[test]
    fn test_date_range_is_inclusive_and_lexical() {
        let records = sample();
        let filter = RecordFilter::new().with_date_range("2024-01-01", "2024-01-31");
        let filtered = filter_records(&records, &filter);

        assert_eq!(ids(&filtered), vec!["1", "4"]);
        assert!(!filtered.iter().any(|r| r.date == "2023-12-31"));

        let edge = RecordFilter::new().with_date_range("2024-01-15", "2024-01-15");
        assert_eq!(ids(&filter_records(&records, &edge)), vec!["1"]);
    }

    #[test]
    fn test_open_ended_date_bounds() {
        let records = sample();

        let from_only = RecordFilter {
            date_from: "2024-01-16".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&filter_records(&records, &from_only)), vec!["3", "4"]);

        let to_only = RecordFilter {
            date_to: "2023-12-31".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&filter_records(&records, &to_only)), vec!["2"]);
    }

    #[test]
    fn test_predicates_are_anded() {
        let records = sample();
        let filter = RecordFilter::new()
            .with_company("Acme")
            .with_text("sql")
            .with_date_range("2024-01-01", "");
        assert_eq!(ids(&filter_records(&records, &filter)), vec!["3"]);
    }

    #[test]
    fn test_result_is_ordered_subsequence() {
        let records = sample();
        let filters = [
            RecordFilter::new().with_text("a"),
            RecordFilter::new().with_company("Acme"),
            RecordFilter::new().with_date_range("2024-01-01", ""),
            RecordFilter::new().with_text("zzz"),
        ];

        for filter in filters {
            let filtered = filter_records(&records, &filter);
            let mut cursor = records.iter();
            for kept in &filtered {
                assert!(
                    cursor.any(|r| r == kept),
                    "{:?} broke working-set order",
                    filter
                );
            }
        }
    }

    #[test]
    fn test_company_options_sorted_and_distinct() {
        let selector = company_options(&sample(), "Globex");
        assert_eq!(selector.options, vec!["Acme", "Globex", "Initech"]);
        assert_eq!(selector.selected, "Globex");
    }

    #[test]
    fn test_company_options_drops_stale_selection() {
        let selector = company_options(&sample(), "Hooli");
        assert!(selector.is_all());
    }

    #[test]
    fn test_whitespace_text_is_identity() {
        let records = sample();
        let filter = RecordFilter::new().with_text("   ");
        assert!(filter.is_empty());
        assert_eq!(filter_records(&records, &filter).len(), records.len());
    }
}
