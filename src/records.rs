use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const PROJECT_FLAIRS: &[&str] = &["Approved Project", "Official Project"];

/// A subreddit submission as handed over by the fetch layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: String,
    pub author: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub flair: String,
    #[serde(default)]
    pub num_comments: i64,
}

impl PostRecord {
    pub fn is_project(&self) -> bool {
        PROJECT_FLAIRS.contains(&self.flair.as_str())
    }

    pub fn is_official_project(&self) -> bool {
        self.flair == "Official Project"
    }

    /// Official announcements, minus the AutoModerator weekly threads.
    pub fn is_news(&self) -> bool {
        self.flair == "Official" && self.author != "AutoModerator"
    }
}

/// A top-level comment from a weekly project update thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub edited_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub permalink: String,
}

impl CommentRecord {
    /// Edit time wins over creation time when the comment was edited.
    pub fn last_touched(&self) -> DateTime<Utc> {
        self.edited_at.unwrap_or(self.created_at)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub title: String,
    pub video_id: String,
    pub published_at: DateTime<Utc>,
}
