use crate::extraction::PageContent;
use crate::model::CanonicalHeader;
use crate::options::LocatorPolicy;

/// Find the first page that looks like the start of the schedule.
///
/// Pages are checked in document order and the scan stops at the first
/// match. Returns the 1-based page number.
pub fn find_start_page(pages: &[PageContent], policy: LocatorPolicy) -> Option<usize> {
    pages
        .iter()
        .find(|page| page_matches(&page.lowercase_text(), policy))
        .map(|page| page.page_number)
}

fn page_matches(text: &str, policy: LocatorPolicy) -> bool {
    match policy {
        LocatorPolicy::Loose => text.contains("bar") && text.contains("mark"),
        LocatorPolicy::Strict => CanonicalHeader::KEYS
            .iter()
            .all(|key| text.contains(&key.label().to_lowercase())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{BBox, Word};

    fn page(number: usize, text: &str) -> PageContent {
        PageContent {
            page_number: number,
            words: text
                .split_whitespace()
                .map(|w| Word {
                    text: w.to_string(),
                    bbox: BBox {
                        x_min: 0.0,
                        y_min: 0.0,
                        x_max: 0.0,
                        y_max: 0.0,
                    },
                })
                .collect(),
        }
    }

    #[test]
    fn test_first_matching_page_wins() {
        let pages = vec![
            page(1, "General arrangement"),
            page(2, "BAR MARK TYPE SIZE"),
            page(3, "Bar Mark again"),
        ];
        assert_eq!(find_start_page(&pages, LocatorPolicy::Loose), Some(2));
    }

    #[test]
    fn test_loose_matches_scattered_words() {
        // "bar" and "mark" need not be adjacent
        let pages = vec![page(1, "Crowbar benchmark")];
        assert_eq!(find_start_page(&pages, LocatorPolicy::Loose), Some(1));
    }

    #[test]
    fn test_strict_requires_all_key_columns() {
        let pages = vec![
            page(1, "Bar Mark Type Size"),
            page(2, "Bar Mark Type Size Total No. Shape No. a b c"),
        ];
        assert_eq!(find_start_page(&pages, LocatorPolicy::Strict), Some(2));
        assert_eq!(find_start_page(&pages, LocatorPolicy::Loose), Some(1));
    }

    #[test]
    fn test_no_marker_returns_none() {
        let pages = vec![page(1, "Cover sheet"), page(2, "Drawing register")];
        assert_eq!(find_start_page(&pages, LocatorPolicy::Loose), None);
        assert_eq!(find_start_page(&[], LocatorPolicy::Loose), None);
    }
}
