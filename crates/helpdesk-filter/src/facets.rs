use serde::Serialize;
use std::collections::HashSet;

use helpdesk_core::record::Record;

/// Distinct tags across `records`, in first-seen order.
pub fn all_tags<R: Record>(records: &[R]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .flat_map(|r| r.tags().iter())
        .filter(|t| seen.insert(t.as_str()))
        .cloned()
        .collect()
}

/// "Showing N of M" footer of a filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSummary {
    pub shown: usize,
    pub total: usize,
    pub is_filtered: bool,
}

impl FilterSummary {
    pub fn new(shown: usize, total: usize, is_filtered: bool) -> Self {
        Self { shown, total, is_filtered }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tagged(Vec<String>);

    impl Record for Tagged {
        fn id(&self) -> &str {
            ""
        }
        fn search_fields(&self) -> Vec<&str> {
            Vec::new()
        }
        fn tags(&self) -> &[String] {
            &self.0
        }
    }

    fn tagged(tags: &[&str]) -> Tagged {
        Tagged(tags.iter().map(|t| t.to_string()).collect())
    }

    #[test]
    fn tags_are_deduplicated_in_first_seen_order() {
        let records = vec![tagged(&["VIP", "Tech"]), tagged(&[]), tagged(&["Design", "VIP"])];
        assert_eq!(all_tags(&records), vec!["VIP", "Tech", "Design"]);
    }

    #[test]
    fn no_records_no_tags() {
        assert!(all_tags::<Tagged>(&[]).is_empty());
    }
}
