use chrono::{DateTime, Duration, Months, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::records::{PostRecord, VideoRecord};

/// Minimum gap between two throwback posts.
pub const MIN_REPOST_GAP_DAYS: i64 = 6;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ThrowbackError {
    #[error("previous throwback post too young ({})", .last_posted.to_rfc3339())]
    TooSoon { last_posted: DateTime<Utc> },
    #[error("no videos to choose from")]
    EmptyPool,
    #[error("none of the {pool} videos is eligible for a throwback")]
    NoEligibleVideo { pool: usize },
}

/// Link post handed to whoever publishes the throwback.
#[derive(Debug, Clone, PartialEq)]
pub struct ThrowbackPost {
    pub title: String,
    pub url: String,
}

/// Refuse to schedule while the newest prior throwback is under
/// [`MIN_REPOST_GAP_DAYS`] old. `prior` is most recent first.
pub fn check_schedule(prior: &[PostRecord], now: DateTime<Utc>) -> Result<(), ThrowbackError> {
    match prior.first() {
        Some(last) if last.created_at + Duration::days(MIN_REPOST_GAP_DAYS) > now => {
            Err(ThrowbackError::TooSoon {
                last_posted: last.created_at,
            })
        }
        _ => Ok(()),
    }
}

/// Published over a calendar month ago and not linked by a prior throwback.
pub fn is_eligible(video: &VideoRecord, prior: &[PostRecord], now: DateTime<Utc>) -> bool {
    let cutoff = now
        .checked_sub_months(Months::new(1))
        .unwrap_or(now - Duration::days(31));
    if video.published_at > cutoff {
        return false;
    }
    !prior.iter().any(|p| p.url.contains(&video.video_id))
}

/// Pick a throwback video uniformly among the eligible ones.
pub fn choose<'a, R: Rng + ?Sized>(
    videos: &'a [VideoRecord],
    prior: &[PostRecord],
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<&'a VideoRecord, ThrowbackError> {
    check_schedule(prior, now)?;
    if videos.is_empty() {
        return Err(ThrowbackError::EmptyPool);
    }

    let eligible: Vec<&VideoRecord> = videos
        .iter()
        .filter(|v| !v.video_id.is_empty() && is_eligible(v, prior, now))
        .collect();
    debug!(pool = videos.len(), eligible = eligible.len(), "throwback candidates");

    let video = eligible
        .choose(rng)
        .copied()
        .ok_or(ThrowbackError::NoEligibleVideo { pool: videos.len() })?;
    info!(video = %video.video_id, title = %video.title, "chose throwback video");
    Ok(video)
}

pub fn compose_post(video: &VideoRecord, now: DateTime<Utc>) -> ThrowbackPost {
    ThrowbackPost {
        title: format!("Throwback {}! {}", now.format("%A"), video.title),
        url: format!("https://youtu.be/{}", video.video_id),
    }
}
