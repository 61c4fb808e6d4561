use serde::{Deserialize, Serialize};

/// One page of a list endpoint's response.
///
/// Every Freightline list endpoint answers in this envelope: the ordered
/// items of the requested page, a `next` link that is present iff another
/// page exists, and the total item count across all pages of the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub next: Option<String>,
    pub count: u64,
}

impl<T> Page<T> {
    /// Whether the server reported another page after this one.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_with_next_link() {
        let page: Page<String> = serde_json::from_str(
            r#"{"results": ["a", "b"], "next": "trips/?page=2", "count": 5}"#,
        )
        .unwrap();

        assert_eq!(page.results, vec!["a", "b"]);
        assert!(page.has_next());
        assert_eq!(page.count, 5);
    }

    #[test]
    fn test_last_page_has_no_next() {
        let page: Page<String> =
            serde_json::from_str(r#"{"results": ["e"], "next": null, "count": 5}"#).unwrap();

        assert!(!page.has_next());
        assert_eq!(page.results.len(), 1);
    }
}
