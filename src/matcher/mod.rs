pub mod catalog;
pub mod extract;
pub mod news;
pub mod similarity;
pub mod updates;
pub mod videos;

use chrono::{DateTime, NaiveDate, Utc};

use crate::records::{CommentRecord, PostRecord, VideoRecord};
use catalog::Catalog;
use extract::ExtractedProject;

/// Outcome of a matcher. `matched` is `None` when nothing qualified; the
/// score still reports how close the best candidate came.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult<T> {
    pub matched: Option<T>,
    pub score: usize,
}

impl<T> MatchResult<T> {
    pub fn found(matched: T, score: usize) -> Self {
        MatchResult {
            matched: Some(matched),
            score,
        }
    }

    pub fn none() -> Self {
        Self::below(0)
    }

    pub fn below(score: usize) -> Self {
        MatchResult {
            matched: None,
            score,
        }
    }
}

impl<T: Clone> MatchResult<&T> {
    pub fn cloned(self) -> MatchResult<T> {
        MatchResult {
            matched: self.matched.cloned(),
            score: self.score,
        }
    }
}

/// One project post with everything the engine could attach to it.
#[derive(Debug, Clone)]
pub struct ProjectReport {
    pub post_id: String,
    pub title: String,
    pub organizer: String,
    pub url: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_official: bool,
    pub extracted: ExtractedProject,
    pub update: MatchResult<CommentRecord>,
    pub last_update: Option<String>,
    pub video: MatchResult<VideoRecord>,
}

impl ProjectReport {
    /// Still accepting submissions on `today`.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        today <= self.end_date
    }
}

/// Run every extractor and matcher over one post. Posts that are not
/// projects, or that announce no deadline, yield `None`.
pub fn assemble(
    catalog: &Catalog,
    post: &PostRecord,
    comments: &[CommentRecord],
    videos: &[VideoRecord],
    now: DateTime<Utc>,
) -> Option<ProjectReport> {
    if !post.is_project() {
        return None;
    }
    let extracted = extract::extract_all(catalog, &post.body, post.created_at);
    let end_date = extracted.deadline?;

    let update = updates::find_update_comment(post, comments).cloned();
    let last_update = update
        .matched
        .as_ref()
        .map(|c| updates::update_age_label(c, now));
    let video = videos::find_matching_video(post, videos).cloned();

    Some(ProjectReport {
        post_id: post.id.clone(),
        title: post.title.clone(),
        organizer: post.author.clone(),
        url: post.url.clone(),
        start_date: post.created_at.date_naive(),
        end_date,
        is_official: post.is_official_project(),
        extracted,
        update,
        last_update,
        video,
    })
}
