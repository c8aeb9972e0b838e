//! Month bucketing and tag vocabulary derivation.
//!
//! The only module allowed to interpret the comma-separated `tags` field.
//! A future normalized tag table replaces the split/trim/dedupe here and
//! touches nothing else.

use std::collections::BTreeMap;
use std::collections::HashSet;

use crate::models::entry::EntryRow;

/// Buckets an already-filtered, already-ordered row-set by the calendar
/// year-month of the entry's `date` field. Row order inside each bucket is
/// preserved (most recent date first, creation time as tiebreaker — the
/// store's ORDER BY).
pub fn group_by_month(entries: Vec<EntryRow>) -> BTreeMap<String, Vec<EntryRow>> {
    let mut grouped: BTreeMap<String, Vec<EntryRow>> = BTreeMap::new();
    for entry in entries {
        let month = entry.date.format("%Y-%m").to_string();
        grouped.entry(month).or_default().push(entry);
    }
    grouped
}

/// Derives the distinct tag vocabulary from raw `tags` fields: split on
/// comma, trim, drop empties, dedupe. First-seen order, exact-string
/// equality after trim.
pub fn distinct_tags<I, S>(fields: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    for field in fields {
        for token in field.as_ref().split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            if seen.insert(token.to_string()) {
                tags.push(token.to_string());
            }
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::EntrySource;
    use chrono::NaiveDate;

    fn make_entry(id: i64, date: &str) -> EntryRow {
        EntryRow {
            id,
            owner_id: "42".to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            title: None,
            summary: None,
            transcript: None,
            content: None,
            tags: None,
            raw_analysis: None,
            source: EntrySource::Manual,
            created_at: NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            updated_at: NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn entry_lands_only_under_its_own_month() {
        let grouped = group_by_month(vec![make_entry(1, "2024-03-15")]);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped["2024-03"].len(), 1);
        assert!(!grouped.contains_key("2024-04"));
    }

    #[test]
    fn months_are_bucketed_separately() {
        let grouped = group_by_month(vec![
            make_entry(1, "2024-03-15"),
            make_entry(2, "2024-03-01"),
            make_entry(3, "2023-12-31"),
        ]);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["2024-03"].len(), 2);
        assert_eq!(grouped["2023-12"].len(), 1);
    }

    #[test]
    fn row_order_is_preserved_inside_buckets() {
        let grouped = group_by_month(vec![
            make_entry(1, "2024-03-15"),
            make_entry(2, "2024-03-01"),
        ]);
        let ids: Vec<i64> = grouped["2024-03"].iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn tags_are_trimmed_and_deduplicated() {
        let tags = distinct_tags(["a, b ,a", "b,c"]);
        let set: HashSet<_> = tags.iter().map(String::as_str).collect();
        assert_eq!(set, HashSet::from(["a", "b", "c"]));
        assert_eq!(tags.len(), 3);
    }

    #[test]
    fn empty_tokens_are_dropped() {
        let tags = distinct_tags(["a,,  ,b", ""]);
        assert_eq!(tags, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn tag_equality_is_exact_after_trim() {
        // "Art" and "art" are distinct tags.
        let tags = distinct_tags(["Art, art"]);
        assert_eq!(tags.len(), 2);
    }
}
