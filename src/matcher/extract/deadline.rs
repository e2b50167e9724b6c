use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use regex::Regex;

// Example: The final date to submit is November 24th.
static DEADLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^.*(?:final date|due date|due on|last day).*?(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:tember)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\s+([0-9]+)",
    )
    .unwrap()
});

/// Deadline announced in `text`, resolved to the first occurrence of that
/// month/day on or after the creation month. Only the first matching line
/// counts; within it the last deadline phrase wins.
pub fn extract(text: &str, created: DateTime<Utc>) -> Option<NaiveDate> {
    let caps = text.lines().find_map(|line| DEADLINE_RE.captures(line))?;
    let month = month_number(&caps[1])?;
    let day = caps[2].parse::<u32>().ok()?;

    let mut year = created.year();
    if month < created.month() {
        year += 1;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn month_number(token: &str) -> Option<u32> {
    let prefix: String = token.chars().take(3).collect::<String>().to_lowercase();
    let n = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(n)
}
