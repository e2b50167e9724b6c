use regex::Regex;
use serde::{Deserialize, Serialize};

/// Instrument family, declared in the display order used everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Register {
    Woodwinds,
    Brass,
    Strings,
    Percussion,
    Other,
}

impl Register {
    pub const CANONICAL: [Register; 5] = [
        Register::Woodwinds,
        Register::Brass,
        Register::Strings,
        Register::Percussion,
        Register::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Register::Woodwinds => "Woodwinds",
            Register::Brass => "Brass",
            Register::Strings => "Strings",
            Register::Percussion => "Percussion",
            Register::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Instrument(Register),
    Tag,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate catalog label: {0}")]
    DuplicateLabel(String),
    #[error("invalid pattern for {label}: {source}")]
    InvalidPattern {
        label: String,
        #[source]
        source: regex::Error,
    },
}

/// One catalog row: a label and the case-insensitive pattern that detects it.
///
/// `unless_after` vetoes an occurrence whose preceding text matches it, so
/// "bass clarinet" does not also count as a plain clarinet.
#[derive(Debug, Clone)]
pub struct PatternEntry {
    pub category: Category,
    pub label: &'static str,
    pattern: Regex,
    unless_after: Option<Regex>,
}

impl PatternEntry {
    pub fn new(category: Category, label: &'static str, pattern: &str) -> Result<Self, CatalogError> {
        Ok(PatternEntry {
            category,
            label,
            pattern: compile(label, pattern)?,
            unless_after: None,
        })
    }

    /// Ignore occurrences immediately preceded by `prefix` (matched against the
    /// text before the occurrence, anchored at its end).
    pub fn unless_after(mut self, prefix: &str) -> Result<Self, CatalogError> {
        self.unless_after = Some(compile(self.label, &format!(r"(?:{})$", prefix))?);
        Ok(self)
    }

    pub fn register(&self) -> Option<Register> {
        match self.category {
            Category::Instrument(r) => Some(r),
            Category::Tag => None,
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        match &self.unless_after {
            None => self.pattern.is_match(text),
            Some(veto) => self
                .pattern
                .find_iter(text)
                .any(|m| !veto.is_match(&text[..m.start()])),
        }
    }
}

fn compile(label: &str, pattern: &str) -> Result<Regex, CatalogError> {
    Regex::new(&format!("(?i){}", pattern)).map_err(|source| CatalogError::InvalidPattern {
        label: label.to_string(),
        source,
    })
}

/// Ordered instrument and tag catalogs plus the open-instrumentation phrase.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<PatternEntry>,
    open_instrumentation: Regex,
}

// (register, label, pattern, exclusion prefix). An exclusion prefix is
// exactly the head of the more specific entry it defers to.
const RSO_INSTRUMENTS: &[(Register, &str, &str, Option<&str>)] = &[
    (Register::Woodwinds, "Flute", "flute", None),
    (Register::Woodwinds, "Piccolo", "piccolo", None),
    (Register::Woodwinds, "Recorder", "recorder", None),
    (Register::Woodwinds, "Oboe", r"oboe\b", None),
    (Register::Woodwinds, "English Horn", "english horn", None),
    (Register::Woodwinds, "Bassoon", "bassoon", None),
    (Register::Woodwinds, "Clarinet", "clarinet", Some("(?:bass|e(?:b|-flat)) ")),
    (Register::Woodwinds, "Eb Clarinet", "e(b|-flat) clarinet", None),
    (Register::Woodwinds, "Bass Clarinet", "bass clarinet", None),
    (Register::Woodwinds, "Soprano Saxophone", "soprano sax", None),
    (Register::Woodwinds, "Alto Saxophone", "alto sax", None),
    (Register::Woodwinds, "Tenor Saxophone", "tenor sax", None),
    (Register::Woodwinds, "Baritone Saxophone", "bari(tone)? sax", None),
    (Register::Brass, "Cornet", "cornet", None),
    (Register::Brass, "Trumpet", "trumpet", None),
    (Register::Brass, "Horn", "horn in", Some("english ")),
    (Register::Brass, "Trombone", "trombone", None),
    (Register::Brass, "Tuba", "tuba", None),
    (Register::Brass, "Euphonium", "euphonium", None),
    (Register::Strings, "Violin", "violin", None),
    (Register::Strings, "Viola", "viola", None),
    (Register::Strings, "Cello", "cello", None),
    (Register::Strings, "Double Bass", "double bass", None),
    (Register::Other, "Harp", "harp", None),
    (Register::Other, "Keyboard", "(?im)(keyboard|piano$)", None),
    (Register::Percussion, "Percussion", "(percussion|drum|triangle|cymbal)", None),
    (Register::Percussion, "Timpani", "timpani", None),
];

const RSO_TAGS: &[(&str, &str)] = &[("beginner-friendly", r"\*\*beginner-friendly\*\*")];

const OPEN_INSTRUMENTATION: &str = r"\bopen instrumentation\b";

impl Catalog {
    pub fn new(open_instrumentation: &str) -> Result<Self, CatalogError> {
        Ok(Catalog {
            entries: Vec::new(),
            open_instrumentation: compile("open instrumentation", open_instrumentation)?,
        })
    }

    /// The r/TheRedditSymphony instrument and tag catalogs.
    pub fn rso() -> Result<Self, CatalogError> {
        let mut catalog = Catalog::new(OPEN_INSTRUMENTATION)?;
        for &(register, label, pattern, veto) in RSO_INSTRUMENTS {
            let mut entry = PatternEntry::new(Category::Instrument(register), label, pattern)?;
            if let Some(prefix) = veto {
                entry = entry.unless_after(prefix)?;
            }
            catalog.push(entry)?;
        }
        for &(label, pattern) in RSO_TAGS {
            catalog.push(PatternEntry::new(Category::Tag, label, pattern)?)?;
        }
        Ok(catalog)
    }

    /// Append an entry. Labels are unique per category, which also keeps an
    /// instrument from landing in two registers.
    pub fn push(&mut self, entry: PatternEntry) -> Result<(), CatalogError> {
        let same_kind = |e: &&PatternEntry| {
            matches!(
                (e.category, entry.category),
                (Category::Instrument(_), Category::Instrument(_)) | (Category::Tag, Category::Tag)
            )
        };
        if self.entries.iter().filter(same_kind).any(|e| e.label == entry.label) {
            return Err(CatalogError::DuplicateLabel(entry.label.to_string()));
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn instruments(&self) -> impl Iterator<Item = (Register, &PatternEntry)> {
        self.entries
            .iter()
            .filter_map(|e| e.register().map(|r| (r, e)))
    }

    pub fn tags(&self) -> impl Iterator<Item = &PatternEntry> {
        self.entries
            .iter()
            .filter(|e| e.category == Category::Tag)
    }

    pub fn open_instrumentation(&self) -> &Regex {
        &self.open_instrumentation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rso_catalog_builds() {
        let c = Catalog::rso().unwrap();
        assert_eq!(c.instruments().count(), RSO_INSTRUMENTS.len());
        assert_eq!(c.tags().count(), 1);
        assert_eq!(c.instruments().next().map(|(_, e)| e.label), Some("Flute"));
    }

    #[test]
    fn duplicate_label_rejected() {
        let mut c = Catalog::rso().unwrap();
        let dup = PatternEntry::new(Category::Instrument(Register::Brass), "Flute", "flute").unwrap();
        assert!(matches!(c.push(dup), Err(CatalogError::DuplicateLabel(_))));
        // Same label under the tag category is a different namespace
        let tag = PatternEntry::new(Category::Tag, "Flute", "flute").unwrap();
        assert!(c.push(tag).is_ok());
    }

    #[test]
    fn invalid_pattern_reported() {
        let err = PatternEntry::new(Category::Tag, "broken", "(unclosed").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidPattern { .. }));
    }

    #[test]
    fn patterns_are_case_insensitive() {
        let e = PatternEntry::new(Category::Instrument(Register::Brass), "Tuba", "tuba").unwrap();
        assert!(e.is_match("TUBA part"));
    }

    #[test]
    fn veto_only_blocks_prefixed_occurrence() {
        let e = PatternEntry::new(Category::Instrument(Register::Woodwinds), "Clarinet", "clarinet")
            .unwrap()
            .unless_after(r"\bbass\s+")
            .unwrap();
        assert!(!e.is_match("Bass Clarinet only"));
        assert!(e.is_match("bass clarinet and clarinet in Bb"));
        assert!(e.is_match("Clarinet"));
    }

    #[test]
    fn veto_needs_the_exact_specific_prefix() {
        let c = Catalog::rso().unwrap();
        let hits = |text: &str| -> Vec<&'static str> {
            c.instruments()
                .filter(|(_, e)| e.is_match(text))
                .map(|(_, e)| e.label)
                .collect()
        };
        assert_eq!(hits("We need a bass  clarinet"), vec!["Clarinet"]);
        assert_eq!(hits("Eb\tclarinet"), vec!["Clarinet"]);
        assert_eq!(hits("English  horn in F"), vec!["Horn"]);
        assert_eq!(hits("bass\nclarinet"), vec!["Clarinet"]);
        assert_eq!(hits("Eb clarinet"), vec!["Eb Clarinet"]);
    }

    #[test]
    fn register_order_is_canonical() {
        let mut sorted = Register::CANONICAL;
        sorted.sort();
        assert_eq!(sorted, Register::CANONICAL);
    }
}
