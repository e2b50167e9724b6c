use crate::matcher::catalog::Catalog;

/// Tag labels found in `text`, in catalog order.
pub fn extract(catalog: &Catalog, text: &str) -> Vec<String> {
    catalog
        .tags()
        .filter(|entry| entry.is_match(text))
        .map(|entry| entry.label.to_string())
        .collect()
}

/// Open instrumentation: every instrument may submit.
pub fn is_open_instrumentation(catalog: &Catalog, text: &str) -> bool {
    catalog.open_instrumentation().is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::catalog::{Category, PatternEntry};

    #[test]
    fn beginner_friendly_needs_bold_markup() {
        let catalog = Catalog::rso().unwrap();
        assert_eq!(
            extract(&catalog, "This project is **Beginner-Friendly**!"),
            vec!["beginner-friendly"]
        );
        assert!(extract(&catalog, "beginner-friendly").is_empty());
    }

    #[test]
    fn tags_follow_catalog_order() {
        let mut catalog = Catalog::rso().unwrap();
        catalog
            .push(PatternEntry::new(Category::Tag, "film-score", r"\bfilm score\b").unwrap())
            .unwrap();
        let text = "A film score arrangement. **beginner-friendly**";
        assert_eq!(extract(&catalog, text), vec!["beginner-friendly", "film-score"]);
    }

    #[test]
    fn open_instrumentation_phrase() {
        let catalog = Catalog::rso().unwrap();
        assert!(is_open_instrumentation(&catalog, "This piece has Open Instrumentation."));
        assert!(!is_open_instrumentation(&catalog, "open to all instrumentation"));
        assert!(!is_open_instrumentation(&catalog, "reopen instrumentations"));
    }
}
