mod db;
mod matcher;
mod records;
mod settings;
mod snapshot;
mod throwback;

use std::time::Instant;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::info;

use matcher::catalog::{Catalog, Register};
use matcher::extract::Instrument;
use matcher::extract::instruments::by_register;
use records::{CommentRecord, PostRecord, VideoRecord};
use settings::Settings;

#[derive(Parser)]
#[command(name = "rso_tracker", about = "r/TheRedditSymphony project tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the JSON snapshots from the data directory into the database
    Import,
    /// Extract project metadata and match update comments and videos
    Process {
        /// Max posts to process, newest first (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Projects table, sorted by deadline
    Overview {
        /// Include projects whose deadline has passed
        #[arg(short, long)]
        all: bool,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Tab-separated title, start and deadline of every project
    Gantt,
    /// Latest official news and the latest video
    News {
        /// Max news items (default: from settings)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Pick a video for the next throwback post
    Throwback {
        /// Seed the random pick for a reproducible choice
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show database statistics
    Stats,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    info!(settings = ?settings, "Starting rso_tracker");

    let conn = db::connect(&settings.db_path)?;
    db::init_schema(&conn)?;

    match cli.command {
        Commands::Import => {
            let snap = snapshot::Snapshot::load(&settings.data_dir)?;
            let c = db::import_snapshot(&conn, &snap)?;
            println!(
                "Imported {} posts, {} update comments, {} videos, {} throwback posts.",
                c.posts, c.updates, c.videos, c.throwbacks
            );
        }
        Commands::Process { limit } => {
            let posts = db::fetch_posts(&conn, limit)?;
            if posts.is_empty() {
                println!("No posts. Run 'import' first.");
                return Ok(());
            }
            let updates = db::fetch_updates(&conn)?;
            let videos = db::fetch_videos(&conn)?;
            let catalog = Catalog::rso()?;
            println!("Processing {} posts...", posts.len());
            let counts = process_posts(&conn, &catalog, &posts, &updates, &videos)?;
            counts.print();
        }
        Commands::Overview { all, limit } => {
            let today = Utc::now().date_naive();
            let rows = db::fetch_overview(&conn, (!all).then_some(today), limit)?;
            if rows.is_empty() {
                println!("No projects found. Run 'process' first.");
                return Ok(());
            }
            print_overview(&rows);
        }
        Commands::Gantt => {
            for row in db::fetch_gantt(&conn)? {
                println!("{}\t{}\t{}", row.title, row.start_date, row.end_date);
            }
        }
        Commands::News { limit } => {
            let posts = db::fetch_posts(&conn, None)?;
            let videos = db::fetch_videos(&conn)?;
            let items = matcher::news::collect(&posts, limit.unwrap_or(settings.news_limit));
            if items.is_empty() {
                println!("No official news.");
            }
            for n in &items {
                println!(
                    "{}  {} (u/{}, {} comments)\n            https://www.reddit.com{}",
                    n.date, n.title, n.author, n.num_comments, n.permalink
                );
                if !n.url.is_empty() && !n.url.contains(&n.permalink) {
                    println!("            link: {}", n.url);
                }
            }
            if let Some(v) = matcher::news::latest_video(&videos) {
                println!(
                    "\nLatest video ({} total): {} <https://youtu.be/{}> {}",
                    videos.len(),
                    v.title,
                    v.video_id,
                    v.published_at.date_naive()
                );
            }
        }
        Commands::Throwback { seed } => {
            let videos = db::fetch_videos(&conn)?;
            let prior = db::fetch_throwbacks(&conn)?;
            let mut rng: Box<dyn RngCore> = match seed {
                Some(s) => Box::new(StdRng::seed_from_u64(s)),
                None => Box::new(rand::thread_rng()),
            };
            let now = Utc::now();
            let video = throwback::choose(&videos, &prior, now, rng.as_mut())?;
            let post = throwback::compose_post(video, now);
            println!("{} <{}>", post.title, post.url);
        }
        Commands::Stats => {
            let s = db::get_stats(&conn, Utc::now().date_naive())?;
            println!("Posts:          {}", s.posts);
            println!("Update comments:{:>4}", s.updates);
            println!("Videos:         {}", s.videos);
            println!("Throwbacks:     {}", s.throwbacks);
            println!("Projects:       {}", s.projects);
            println!("  active:       {}", s.active);
            println!("  with video:   {}", s.with_video);
            match s.last_throwback {
                Some(t) => println!("Last throwback: {}", t.format("%Y-%m-%d %H:%M")),
                None => println!("Last throwback: never"),
            }
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }
    Ok(())
}

struct ProcessCounts {
    posts: usize,
    projects: usize,
    active: usize,
    with_update: usize,
    with_video: usize,
}

impl ProcessCounts {
    fn print(&self) {
        println!(
            "Saved {} projects from {} posts ({} active, {} with update comment, {} with video).",
            self.projects, self.posts, self.active, self.with_update, self.with_video,
        );
    }
}

fn process_posts(
    conn: &rusqlite::Connection,
    catalog: &Catalog,
    posts: &[PostRecord],
    updates: &[CommentRecord],
    videos: &[VideoRecord],
) -> Result<ProcessCounts> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(posts.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let now = Utc::now();
    let mut counts = ProcessCounts {
        posts: posts.len(),
        projects: 0,
        active: 0,
        with_update: 0,
        with_video: 0,
    };

    for chunk in posts.chunks(500) {
        let reports: Vec<_> = chunk
            .par_iter()
            .filter_map(|post| matcher::assemble(catalog, post, updates, videos, now))
            .collect();

        counts.active += reports.iter().filter(|r| r.is_active(now.date_naive())).count();
        counts.with_update += reports.iter().filter(|r| r.update.matched.is_some()).count();
        counts.with_video += reports.iter().filter(|r| r.video.matched.is_some()).count();
        counts.projects += db::save_projects(conn, &reports)?;
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    info!(
        "Processed {} posts into {} projects",
        counts.posts, counts.projects
    );
    Ok(counts)
}

fn print_overview(rows: &[db::OverviewRow]) {
    println!(
        "{:>3} | {:<32} | {:<16} | {:<10} | {:<10} | {:<24} | {:<12} | {:<5}",
        "#", "Project", "Organizer", "Start", "Deadline", "Registers", "Updated", "Video"
    );
    println!("{}", "-".repeat(133));

    for (i, r) in rows.iter().enumerate() {
        let mut title = truncate(&r.title, 30);
        if r.is_official {
            title = format!("{} *", title);
        }
        println!(
            "{:>3} | {:<32} | {:<16} | {:<10} | {:<10} | {:<24} | {:<12} | {:<5}",
            i + 1,
            title,
            truncate(&r.organizer, 16),
            r.start_date,
            r.end_date,
            truncate(&r.registers, 21),
            r.last_update.as_deref().unwrap_or("-"),
            if r.video_id.is_some() { "yes" } else { "-" },
        );
    }

    println!("\n--- Instrumentation ---");
    for r in rows {
        let mut line = if r.open_instrumentation {
            "open instrumentation".to_string()
        } else {
            instruments_line(&r.instruments)
        };
        if !r.tags.is_empty() {
            line = format!("{} [{}]", line, r.tags);
        }
        println!("  {}: {}", truncate(&r.title, 32), line);
    }

    println!("\n{} projects | * official", rows.len());
}

fn instruments_line(instruments: &[Instrument]) -> String {
    if instruments.is_empty() {
        return "-".to_string();
    }
    let groups = by_register(instruments);
    Register::CANONICAL
        .iter()
        .filter_map(|reg| {
            let labels: Vec<&str> = groups.get(reg)?.iter().map(|i| i.label.as_str()).collect();
            Some(format!("{}: {}", reg.as_str(), labels.join(", ")))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
