use std::sync::LazyLock;

use regex::Regex;

static BOILERPLATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(/?r/)?theredditsymphony|rso|community|project|performed by|composition|symphonic movement|orchestra",
    )
    .unwrap()
});

/// Strip community branding and generic vocabulary from a title. The result
/// is only a matching key, never shown to users.
pub fn normalize_title(title: &str) -> String {
    BOILERPLATE_RE.replace_all(title, "").into_owned()
}

/// Longest common substring of `s1` and `s2`, taken from `s1`.
///
/// Run-length DP over characters. The best run only moves on a strictly
/// longer length, so the earliest of equally long runs wins.
pub fn lcs<'a>(s1: &'a str, s2: &str) -> &'a str {
    let a: Vec<(usize, char)> = s1.char_indices().collect();
    let b: Vec<char> = s2.chars().collect();

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    let mut longest = 0;
    let mut end = 0; // index into `a`, one past the last char of the best run

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            curr[j] = if a[i - 1].1 == b[j - 1] {
                prev[j - 1] + 1
            } else {
                0
            };
            if curr[j] > longest {
                longest = curr[j];
                end = i;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    if longest == 0 {
        return "";
    }
    let start = a[end - longest].0;
    let stop = a.get(end).map(|&(idx, _)| idx).unwrap_or(s1.len());
    &s1[start..stop]
}
