use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::records::{CommentRecord, PostRecord, VideoRecord};

pub const POSTS_FILE: &str = "posts.json";
pub const UPDATES_FILE: &str = "weekly_updates.json";
pub const VIDEOS_FILE: &str = "videos.json";
pub const THROWBACKS_FILE: &str = "throwbacks.json";

/// Collections dropped into the data directory by the fetch layer.
#[derive(Debug, Default)]
pub struct Snapshot {
    pub posts: Vec<PostRecord>,
    pub updates: Vec<CommentRecord>,
    pub videos: Vec<VideoRecord>,
    pub throwbacks: Vec<PostRecord>,
}

impl Snapshot {
    pub fn load(dir: &Path) -> Result<Self> {
        let snapshot = Snapshot {
            posts: read_json(&dir.join(POSTS_FILE))?,
            updates: read_json(&dir.join(UPDATES_FILE))?,
            videos: read_json(&dir.join(VIDEOS_FILE))?,
            throwbacks: read_optional(&dir.join(THROWBACKS_FILE))?,
        };
        info!(
            "Loaded snapshot: {} posts, {} update comments, {} videos, {} throwbacks",
            snapshot.posts.len(),
            snapshot.updates.len(),
            snapshot.videos.len(),
            snapshot.throwbacks.len()
        );
        Ok(snapshot)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("couldn't load {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("couldn't decode {}", path.display()))
}

fn read_optional<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        warn!("{} not found, assuming no prior throwbacks", path.display());
        return Ok(Vec::new());
    }
    read_json(path)
}
