use chrono::NaiveDate;

use crate::records::{PostRecord, VideoRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct NewsItem {
    pub title: String,
    pub author: String,
    pub date: NaiveDate,
    pub url: String,
    pub permalink: String,
    pub num_comments: i64,
}

/// Up to `limit` official announcements, in input order.
pub fn collect(posts: &[PostRecord], limit: usize) -> Vec<NewsItem> {
    posts
        .iter()
        .filter(|p| p.is_news())
        .take(limit)
        .map(|p| NewsItem {
            title: p.title.clone(),
            author: p.author.clone(),
            date: p.created_at.date_naive(),
            url: p.url.clone(),
            permalink: p.permalink.clone(),
            num_comments: p.num_comments,
        })
        .collect()
}

/// Most recently published video, regardless of input order.
pub fn latest_video(videos: &[VideoRecord]) -> Option<&VideoRecord> {
    videos.iter().max_by_key(|v| v.published_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn post(title: &str, flair: &str, author: &str) -> PostRecord {
        PostRecord {
            id: title.to_lowercase(),
            author: author.into(),
            title: title.into(),
            body: String::new(),
            created_at: Utc.with_ymd_and_hms(2021, 4, 2, 0, 0, 0).unwrap(),
            permalink: format!("/r/TheRedditSymphony/{}", title),
            url: String::new(),
            flair: flair.into(),
            num_comments: 3,
        }
    }

    #[test]
    fn only_official_non_automod() {
        let posts = vec![
            post("Weekly Project Update Thread", "Official", "AutoModerator"),
            post("New moderators", "Official", "mod1"),
            post("Spring Symphony", "Official Project", "mod1"),
            post("Discord event", "Official", "mod2"),
        ];
        let items = collect(&posts, 5);
        let titles: Vec<&str> = items.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["New moderators", "Discord event"]);
        assert_eq!(items[0].date, NaiveDate::from_ymd_opt(2021, 4, 2).unwrap());
    }

    #[test]
    fn limit_applies() {
        let posts: Vec<_> = (0..8).map(|i| post(&format!("News {}", i), "Official", "mod")).collect();
        assert_eq!(collect(&posts, 5).len(), 5);
        assert!(collect(&[], 5).is_empty());
    }

    #[test]
    fn latest_video_by_publish_time() {
        let v = |id: &str, m: u32| VideoRecord {
            title: id.into(),
            video_id: id.into(),
            published_at: Utc.with_ymd_and_hms(2021, m, 1, 0, 0, 0).unwrap(),
        };
        let videos = vec![v("b", 5), v("c", 9), v("a", 1)];
        assert_eq!(latest_video(&videos).map(|v| v.video_id.as_str()), Some("c"));
        assert!(latest_video(&[]).is_none());
    }
}
