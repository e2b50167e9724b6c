use tracing::debug;

use super::similarity::{lcs, normalize_title};
use super::MatchResult;
use crate::records::{PostRecord, VideoRecord};

/// A shorter shared run is not evidence the video is the project's release.
pub const MIN_OVERLAP: usize = 10;

/// Release video for a post: the video whose normalized title shares the
/// longest run with the normalized post title, if that run is longer than
/// [`MIN_OVERLAP`] characters. The score is the best run length either way.
pub fn find_matching_video<'a>(
    post: &PostRecord,
    videos: &'a [VideoRecord],
) -> MatchResult<&'a VideoRecord> {
    let post_title = normalize_title(&post.title);
    let mut best: Option<&VideoRecord> = None;
    let mut best_len = 0;

    for video in videos {
        let video_title = normalize_title(&video.title);
        let len = lcs(&video_title, &post_title).chars().count();
        if len > best_len {
            best = Some(video);
            best_len = len;
        }
    }

    match best {
        Some(video) if best_len > MIN_OVERLAP => {
            debug!(post = %post.id, video = %video.video_id, overlap = best_len, "matched release video");
            MatchResult::found(video, best_len)
        }
        _ => MatchResult::below(best_len),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn post(title: &str) -> PostRecord {
        PostRecord {
            id: "p1".into(),
            author: "maestro".into(),
            title: title.into(),
            body: String::new(),
            created_at: Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
            permalink: String::new(),
            url: String::new(),
            flair: "Official Project".into(),
            num_comments: 0,
        }
    }

    fn video(title: &str, id: &str) -> VideoRecord {
        VideoRecord {
            title: title.into(),
            video_id: id.into(),
            published_at: Utc.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn finds_release_video() {
        let p = post("RSO Project: Spring Symphony No. 4");
        let videos = vec![
            video("Nimrod | r/TheRedditSymphony Orchestra", "aaa"),
            video("Spring Symphony No. 4 | The Reddit Symphony Orchestra", "bbb"),
            video("Winter Overture (RSO Community Project)", "ccc"),
        ];
        let m = find_matching_video(&p, &videos);
        assert_eq!(m.matched.map(|v| v.video_id.as_str()), Some("bbb"));
        assert!(m.score > MIN_OVERLAP);
    }

    #[test]
    fn below_threshold_is_no_match() {
        let p = post("RSO Project: Spring Symphony No. 4");
        let videos = vec![video("Autumn Symphony", "aaa"), video("Nimrod", "bbb")];
        let m = find_matching_video(&p, &videos);
        assert!(m.matched.is_none());
        // " Symphony" is the best shared run
        assert_eq!(m.score, 9);
    }

    #[test]
    fn ties_keep_first_video() {
        let p = post("Hall of the Mountain King");
        let videos = vec![
            video("In the Hall of the Mountain King (2020)", "first"),
            video("In the Hall of the Mountain King (2021)", "second"),
        ];
        let m = find_matching_video(&p, &videos);
        assert_eq!(m.matched.map(|v| v.video_id.as_str()), Some("first"));
    }

    #[test]
    fn boilerplate_alone_does_not_match() {
        let p = post("RSO Community Project performed by the orchestra");
        let videos = vec![video("Community Project performed by RSO orchestra", "aaa")];
        assert!(find_matching_video(&p, &videos).matched.is_none());
    }

    #[test]
    fn empty_pool() {
        let m = find_matching_video(&post("Anything at all here"), &[]);
        assert!(m.matched.is_none());
        assert_eq!(m.score, 0);
    }
}
