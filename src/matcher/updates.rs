use chrono::{DateTime, Utc};

use super::MatchResult;
use crate::records::{CommentRecord, PostRecord};

/// First comment, in the given order, written by the post's author and
/// mentioning the post id. Callers wanting "latest" must sort first.
pub fn find_update_comment<'a>(
    post: &PostRecord,
    comments: &'a [CommentRecord],
) -> MatchResult<&'a CommentRecord> {
    let found = comments
        .iter()
        .find(|c| c.author == post.author && c.body.contains(&post.id));
    match found {
        Some(c) => MatchResult::found(c, 1),
        None => MatchResult::none(),
    }
}

/// "today", "yesterday" or "N days ago", measured from the last edit.
pub fn update_age_label(comment: &CommentRecord, now: DateTime<Utc>) -> String {
    let days = (now - comment.last_touched()).num_seconds() as f64 / 86_400.0;
    if days < 1.0 {
        "today".to_string()
    } else if days < 2.0 {
        "yesterday".to_string()
    } else {
        format!("{} days ago", days as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn post(id: &str, author: &str) -> PostRecord {
        PostRecord {
            id: id.into(),
            author: author.into(),
            title: "Project".into(),
            body: String::new(),
            created_at: Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
            permalink: String::new(),
            url: String::new(),
            flair: "Approved Project".into(),
            num_comments: 0,
        }
    }

    fn comment(author: &str, body: &str, day: u32) -> CommentRecord {
        CommentRecord {
            author: author.into(),
            body: body.into(),
            created_at: Utc.with_ymd_and_hms(2021, 2, day, 0, 0, 0).unwrap(),
            edited_at: None,
            permalink: format!("/c/{}", day),
        }
    }

    #[test]
    fn first_match_not_latest() {
        let p = post("k3x9z", "maestro");
        let comments = vec![
            comment("maestro", "Update on https://redd.it/k3x9z: going well", 1),
            comment("maestro", "k3x9z: deadline extended", 20),
        ];
        let m = find_update_comment(&p, &comments);
        assert_eq!(m.score, 1);
        assert_eq!(m.matched.map(|c| c.permalink.as_str()), Some("/c/1"));
    }

    #[test]
    fn author_must_match() {
        let p = post("k3x9z", "maestro");
        let comments = vec![
            comment("someone", "k3x9z looks great", 1),
            comment("maestro", "k3x9z status", 2),
        ];
        let m = find_update_comment(&p, &comments);
        assert_eq!(m.matched.map(|c| c.author.as_str()), Some("maestro"));
    }

    #[test]
    fn id_must_be_contained() {
        let p = post("k3x9z", "maestro");
        let comments = vec![comment("maestro", "no link here", 1)];
        let m = find_update_comment(&p, &comments);
        assert!(m.matched.is_none());
        assert_eq!(m.score, 0);
        assert!(find_update_comment(&p, &[]).matched.is_none());
    }

    #[test]
    fn empty_id_matches_any_comment_by_the_author() {
        let p = post("", "maestro");
        let comments = vec![
            comment("someone", "anything", 1),
            comment("maestro", "anything", 2),
        ];
        let m = find_update_comment(&p, &comments);
        assert_eq!(m.matched.map(|c| c.permalink.as_str()), Some("/c/2"));
    }

    #[test]
    fn age_labels() {
        let mut c = comment("maestro", "k3x9z", 1);
        let base = c.created_at;
        assert_eq!(update_age_label(&c, base + Duration::hours(5)), "today");
        assert_eq!(update_age_label(&c, base + Duration::hours(30)), "yesterday");
        assert_eq!(update_age_label(&c, base + Duration::hours(24 * 5 + 3)), "5 days ago");

        c.edited_at = Some(base + Duration::days(4));
        assert_eq!(update_age_label(&c, base + Duration::days(5)), "yesterday");
    }
}
