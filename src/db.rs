use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, Row};

use crate::matcher::extract::Instrument;
use crate::matcher::ProjectReport;
use crate::records::{CommentRecord, PostRecord, VideoRecord};
use crate::snapshot::Snapshot;

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("couldn't create {}", dir.display()))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("couldn't open {}", path.display()))?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS posts (
            id           TEXT PRIMARY KEY,
            author       TEXT NOT NULL,
            title        TEXT NOT NULL,
            body         TEXT NOT NULL,
            created_at   TEXT NOT NULL,
            permalink    TEXT NOT NULL,
            url          TEXT NOT NULL,
            flair        TEXT NOT NULL,
            num_comments INTEGER NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_posts_flair ON posts(flair);

        -- Top-level comments of the weekly update threads, in fetch order
        CREATE TABLE IF NOT EXISTS update_comments (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            author     TEXT NOT NULL,
            body       TEXT NOT NULL,
            created_at TEXT NOT NULL,
            edited_at  TEXT,
            permalink  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_updates_author ON update_comments(author);

        CREATE TABLE IF NOT EXISTS videos (
            video_id     TEXT PRIMARY KEY,
            title        TEXT NOT NULL,
            published_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS throwback_posts (
            id           TEXT PRIMARY KEY,
            author       TEXT NOT NULL,
            title        TEXT NOT NULL,
            body         TEXT NOT NULL,
            created_at   TEXT NOT NULL,
            permalink    TEXT NOT NULL,
            url          TEXT NOT NULL,
            flair        TEXT NOT NULL,
            num_comments INTEGER NOT NULL DEFAULT 0
        );

        -- Extracted project data
        CREATE TABLE IF NOT EXISTS projects (
            post_id            TEXT PRIMARY KEY REFERENCES posts(id),
            title              TEXT NOT NULL,
            organizer          TEXT NOT NULL,
            url                TEXT NOT NULL,
            start_date         TEXT NOT NULL,
            end_date           TEXT NOT NULL,
            is_official        BOOLEAN NOT NULL DEFAULT 0,
            registers          TEXT NOT NULL,
            instruments        TEXT NOT NULL,
            open_instrumentation BOOLEAN NOT NULL DEFAULT 0,
            tags               TEXT NOT NULL,
            update_permalink   TEXT,
            last_update        TEXT,
            video_id           TEXT,
            video_title        TEXT,
            video_score        INTEGER NOT NULL DEFAULT 0,
            processed_at       TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_projects_end ON projects(end_date);
        ",
    )?;
    Ok(())
}

// ── Snapshot import ──

pub struct ImportCounts {
    pub posts: usize,
    pub updates: usize,
    pub videos: usize,
    pub throwbacks: usize,
}

/// Replace the stored collections with `snapshot`.
pub fn import_snapshot(conn: &Connection, snapshot: &Snapshot) -> Result<ImportCounts> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "DELETE FROM projects;
         DELETE FROM posts;
         DELETE FROM update_comments;
         DELETE FROM videos;
         DELETE FROM throwback_posts;",
    )?;

    let posts = insert_posts(&tx, "posts", &snapshot.posts)?;
    let throwbacks = insert_posts(&tx, "throwback_posts", &snapshot.throwbacks)?;

    let mut updates = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO update_comments (author, body, created_at, edited_at, permalink)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for c in &snapshot.updates {
            updates += stmt.execute(rusqlite::params![
                c.author, c.body, c.created_at, c.edited_at, c.permalink,
            ])?;
        }
    }

    let mut videos = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO videos (video_id, title, published_at) VALUES (?1, ?2, ?3)",
        )?;
        for v in &snapshot.videos {
            videos += stmt.execute(rusqlite::params![v.video_id, v.title, v.published_at])?;
        }
    }

    tx.commit()?;
    Ok(ImportCounts {
        posts,
        updates,
        videos,
        throwbacks,
    })
}

fn insert_posts(conn: &Connection, table: &str, posts: &[PostRecord]) -> Result<usize> {
    let mut stmt = conn.prepare(&format!(
        "INSERT OR REPLACE INTO {}
         (id, author, title, body, created_at, permalink, url, flair, num_comments)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        table
    ))?;
    let mut count = 0;
    for p in posts {
        count += stmt.execute(rusqlite::params![
            p.id, p.author, p.title, p.body, p.created_at, p.permalink, p.url, p.flair,
            p.num_comments,
        ])?;
    }
    Ok(count)
}

// ── Processing inputs ──

const POST_COLUMNS: &str = "id, author, title, body, created_at, permalink, url, flair, num_comments";

fn post_from_row(row: &Row) -> rusqlite::Result<PostRecord> {
    Ok(PostRecord {
        id: row.get(0)?,
        author: row.get(1)?,
        title: row.get(2)?,
        body: row.get(3)?,
        created_at: row.get(4)?,
        permalink: row.get(5)?,
        url: row.get(6)?,
        flair: row.get(7)?,
        num_comments: row.get(8)?,
    })
}

/// Posts, newest first.
pub fn fetch_posts(conn: &Connection, limit: Option<usize>) -> Result<Vec<PostRecord>> {
    let sql = format!(
        "SELECT {} FROM posts ORDER BY created_at DESC{}",
        POST_COLUMNS,
        match limit {
            Some(n) => format!(" LIMIT {}", n),
            None => String::new(),
        }
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], post_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Prior throwback posts, most recent first.
pub fn fetch_throwbacks(conn: &Connection) -> Result<Vec<PostRecord>> {
    let sql = format!(
        "SELECT {} FROM throwback_posts ORDER BY created_at DESC",
        POST_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], post_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Update comments in the order they were fetched.
pub fn fetch_updates(conn: &Connection) -> Result<Vec<CommentRecord>> {
    let mut stmt = conn.prepare(
        "SELECT author, body, created_at, edited_at, permalink FROM update_comments ORDER BY id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(CommentRecord {
                author: row.get(0)?,
                body: row.get(1)?,
                created_at: row.get(2)?,
                edited_at: row.get(3)?,
                permalink: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn fetch_videos(conn: &Connection) -> Result<Vec<VideoRecord>> {
    let mut stmt =
        conn.prepare("SELECT video_id, title, published_at FROM videos ORDER BY published_at")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(VideoRecord {
                video_id: row.get(0)?,
                title: row.get(1)?,
                published_at: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Extracted projects ──

pub fn save_projects(conn: &Connection, reports: &[ProjectReport]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO projects
             (post_id, title, organizer, url, start_date, end_date, is_official, registers,
              instruments, open_instrumentation, tags, update_permalink, last_update,
              video_id, video_title, video_score)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16)",
        )?;
        for r in reports {
            let registers = r
                .extracted
                .registers_present
                .iter()
                .map(|reg| reg.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            let instruments = serde_json::to_string(&r.extracted.instruments)?;
            let video = r.video.matched.as_ref();
            count += stmt.execute(rusqlite::params![
                r.post_id,
                r.title,
                r.organizer,
                r.url,
                r.start_date,
                r.end_date,
                r.is_official,
                registers,
                instruments,
                r.extracted.is_open_instrumentation,
                r.extracted.tags.join(", "),
                r.update.matched.as_ref().map(|c| c.permalink.as_str()),
                r.last_update,
                video.map(|v| v.video_id.as_str()),
                video.map(|v| v.title.as_str()),
                r.video.score as i64,
            ])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

// ── Overview ──

pub struct OverviewRow {
    pub title: String,
    pub organizer: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_official: bool,
    pub registers: String,
    pub instruments: Vec<Instrument>,
    pub open_instrumentation: bool,
    pub tags: String,
    pub last_update: Option<String>,
    pub video_id: Option<String>,
}

/// Projects by deadline. With `active_on`, only those still open that day.
pub fn fetch_overview(
    conn: &Connection,
    active_on: Option<NaiveDate>,
    limit: usize,
) -> Result<Vec<OverviewRow>> {
    let where_clause = if active_on.is_some() {
        " WHERE end_date >= ?1"
    } else {
        ""
    };
    let sql = format!(
        "SELECT title, organizer, start_date, end_date, is_official, registers, instruments,
                open_instrumentation, tags, last_update, video_id
         FROM projects{}
         ORDER BY end_date, title
         LIMIT {}",
        where_clause, limit
    );

    let mut stmt = conn.prepare(&sql)?;
    let map_row = |row: &Row| -> rusqlite::Result<(OverviewRow, String)> {
        Ok((
            OverviewRow {
                title: row.get(0)?,
                organizer: row.get(1)?,
                start_date: row.get(2)?,
                end_date: row.get(3)?,
                is_official: row.get(4)?,
                registers: row.get(5)?,
                instruments: Vec::new(),
                open_instrumentation: row.get(7)?,
                tags: row.get(8)?,
                last_update: row.get(9)?,
                video_id: row.get(10)?,
            },
            row.get(6)?,
        ))
    };
    let raw = match active_on {
        Some(day) => stmt.query_map([day], map_row)?.collect::<Result<Vec<_>, _>>()?,
        None => stmt.query_map([], map_row)?.collect::<Result<Vec<_>, _>>()?,
    };

    raw.into_iter()
        .map(|(mut row, instruments)| {
            row.instruments = serde_json::from_str(&instruments)
                .with_context(|| format!("bad instruments column for {}", row.title))?;
            Ok(row)
        })
        .collect()
}

pub struct GanttRow {
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

pub fn fetch_gantt(conn: &Connection) -> Result<Vec<GanttRow>> {
    let mut stmt =
        conn.prepare("SELECT title, start_date, end_date FROM projects ORDER BY start_date")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(GanttRow {
                title: row.get(0)?,
                start_date: row.get(1)?,
                end_date: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub posts: usize,
    pub updates: usize,
    pub videos: usize,
    pub throwbacks: usize,
    pub projects: usize,
    pub active: usize,
    pub with_video: usize,
    pub last_throwback: Option<DateTime<Utc>>,
}

pub fn get_stats(conn: &Connection, today: NaiveDate) -> Result<Stats> {
    let count = |sql: &str| -> Result<usize> { Ok(conn.query_row(sql, [], |r| r.get(0))?) };
    let active: usize = conn.query_row(
        "SELECT COUNT(*) FROM projects WHERE end_date >= ?1",
        [today],
        |r| r.get(0),
    )?;
    let last_throwback: Option<DateTime<Utc>> =
        conn.query_row("SELECT MAX(created_at) FROM throwback_posts", [], |r| r.get(0))?;
    Ok(Stats {
        posts: count("SELECT COUNT(*) FROM posts")?,
        updates: count("SELECT COUNT(*) FROM update_comments")?,
        videos: count("SELECT COUNT(*) FROM videos")?,
        throwbacks: count("SELECT COUNT(*) FROM throwback_posts")?,
        projects: count("SELECT COUNT(*) FROM projects")?,
        active,
        with_video: count("SELECT COUNT(*) FROM projects WHERE video_id IS NOT NULL")?,
        last_throwback,
    })
}
