pub mod deadline;
pub mod instruments;
pub mod tags;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::{Catalog, Register};
pub use instruments::Instrument;

/// Everything the catalogs can tell about one post body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedProject {
    pub instruments: Vec<Instrument>,
    pub registers_present: Vec<Register>,
    pub deadline: Option<NaiveDate>,
    pub is_open_instrumentation: bool,
    pub tags: Vec<String>,
}

pub fn extract_all(catalog: &Catalog, body: &str, created: DateTime<Utc>) -> ExtractedProject {
    let instruments = instruments::extract(catalog, body);
    let registers_present = instruments::registers_present(&instruments);

    ExtractedProject {
        registers_present,
        instruments,
        deadline: deadline::extract(body, created),
        is_open_instrumentation: tags::is_open_instrumentation(catalog, body),
        tags: tags::extract(catalog, body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn labels_in(p: &ExtractedProject, register: Register) -> Vec<&str> {
        p.instruments
            .iter()
            .filter(|i| i.register == register)
            .map(|i| i.label.as_str())
            .collect()
    }

    const BODY: &str = "\
Welcome to our new project: Spring Symphony No. 4!

**beginner-friendly**

Parts available:
* Flute
* Horn in F
* Violin I / II
* Timpani

The final date to submit is November 24th.";

    #[test]
    fn full_post() {
        let catalog = Catalog::rso().unwrap();
        let created = Utc.with_ymd_and_hms(2020, 10, 3, 9, 30, 0).unwrap();
        let p = extract_all(&catalog, BODY, created);

        assert_eq!(labels_in(&p, Register::Woodwinds), vec!["Flute"]);
        assert_eq!(labels_in(&p, Register::Brass), vec!["Horn"]);
        assert_eq!(labels_in(&p, Register::Strings), vec!["Violin"]);
        assert_eq!(labels_in(&p, Register::Percussion), vec!["Timpani"]);
        assert!(labels_in(&p, Register::Other).is_empty());
        assert_eq!(
            p.registers_present,
            vec![Register::Woodwinds, Register::Brass, Register::Strings, Register::Percussion]
        );
        assert_eq!(p.deadline, NaiveDate::from_ymd_opt(2020, 11, 24));
        assert!(!p.is_open_instrumentation);
        assert_eq!(p.tags, vec!["beginner-friendly"]);
    }

    #[test]
    fn empty_body() {
        let catalog = Catalog::rso().unwrap();
        let created = Utc.with_ymd_and_hms(2020, 10, 3, 9, 30, 0).unwrap();
        let p = extract_all(&catalog, "", created);
        assert!(p.instruments.is_empty());
        assert!(p.registers_present.is_empty());
        assert!(p.deadline.is_none());
        assert!(p.tags.is_empty());
    }
}
