//! Polls a subreddit or redditor for new items and appends them to a JSON Lines file.

use crate::{
    export::{Layout, Section},
    reddit::{existence, ObjectKind, RedditApi},
    Result,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    collections::{HashSet, VecDeque},
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    thread::sleep,
    time::{Duration, Instant},
};
use tracing::{debug, info};

const POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Ids remembered for de-duplication; a poll never returns more than a few dozen.
const SEEN_CAPACITY: usize = 1_000;
const REDDITOR_BATCH: u32 = 25;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "name")]
pub enum LiveTarget {
    Subreddit(String),
    Redditor(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiveItems {
    Comments,
    Submissions,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveSettings {
    pub target: LiveTarget,
    pub items: LiveItems,
    pub started_at: String,
}

#[derive(Serialize)]
struct Header<'a> {
    scrape_settings: &'a LiveSettings,
}

/// Bounded memory of ids already written.
#[derive(Debug, Default)]
struct SeenIds {
    set: HashSet<String>,
    order: VecDeque<String>,
}

impl SeenIds {
    /// Records `id`, returning whether it was new.
    fn insert(&mut self, id: &str) -> bool {
        if self.set.contains(id) {
            return false;
        }
        if self.order.len() == SEEN_CAPACITY {
            if let Some(oldest) = self.order.pop_front() {
                self.set.remove(&oldest);
            }
        }
        self.set.insert(id.to_string());
        self.order.push_back(id.to_string());
        true
    }
}

pub struct Livestream<'a, C> {
    client: &'a C,
    target: LiveTarget,
    items: LiveItems,
    poll_interval: Duration,
    seen: SeenIds,
}

impl<'a, C: RedditApi> Livestream<'a, C> {
    pub fn new(client: &'a C, target: LiveTarget, items: LiveItems) -> Self {
        Self {
            client,
            target,
            items,
            poll_interval: POLL_INTERVAL,
            seen: SeenIds::default(),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Items not seen before, oldest first, as `(id, json)` pairs.
    fn fetch(&self) -> Result<Vec<(String, Value)>> {
        let pairs = match (&self.target, self.items) {
            (LiveTarget::Subreddit(name), LiveItems::Comments) => self
                .client
                .latest_subreddit_comments(name)?
                .into_iter()
                .map(|comment| Ok((comment.id.clone(), serde_json::to_value(comment)?)))
                .collect::<Result<Vec<_>>>()?,
            (LiveTarget::Subreddit(name), LiveItems::Submissions) => self
                .client
                .latest_subreddit_submissions(name)?
                .into_iter()
                .map(|post| Ok((post.id.clone(), serde_json::to_value(post)?)))
                .collect::<Result<Vec<_>>>()?,
            (LiveTarget::Redditor(name), LiveItems::Comments) => self
                .client
                .redditor_comments(name, REDDITOR_BATCH)?
                .into_iter()
                .map(|comment| Ok((comment.id.clone(), serde_json::to_value(comment)?)))
                .collect::<Result<Vec<_>>>()?,
            (LiveTarget::Redditor(name), LiveItems::Submissions) => self
                .client
                .redditor_submissions(name, REDDITOR_BATCH)?
                .into_iter()
                .map(|post| Ok((post.id.clone(), serde_json::to_value(post)?)))
                .collect::<Result<Vec<_>>>()?,
        };
        Ok(pairs)
    }

    /// One poll: new items, oldest first.
    pub fn poll(&mut self) -> Result<Vec<Value>> {
        let mut fresh: Vec<Value> = self
            .fetch()?
            .into_iter()
            .filter(|(id, _)| self.seen.insert(id))
            .map(|(_, value)| value)
            .collect();
        // listings come newest first
        fresh.reverse();
        Ok(fresh)
    }

    /// Polls until `deadline` (forever when `None`), appending to `output`. Returns the item count.
    pub fn run(&mut self, output: &Path, settings: &LiveSettings, deadline: Option<Instant>) -> Result<usize> {
        let mut writer = BufWriter::new(File::create(output)?);
        serde_json::to_writer(&mut writer, &Header { scrape_settings: settings })?;
        writeln!(writer)?;
        writer.flush()?;

        let mut written = 0;
        loop {
            let fresh = self.poll()?;
            debug!(count = fresh.len(), "polled");
            for item in &fresh {
                serde_json::to_writer(&mut writer, item)?;
                writeln!(writer)?;
            }
            writer.flush()?;
            if !fresh.is_empty() {
                written += fresh.len();
                info!("{written} {} streamed so far.", describe(self.items));
            }

            let now = Instant::now();
            let wait = match deadline {
                Some(deadline) if now >= deadline => break,
                Some(deadline) => self.poll_interval.min(deadline - now),
                None => self.poll_interval,
            };
            sleep(wait);
        }
        Ok(written)
    }
}

fn describe(items: LiveItems) -> &'static str {
    match items {
        LiveItems::Comments => "comments",
        LiveItems::Submissions => "submissions",
    }
}

/// Validates the target and streams it into the livestream section of the date tree.
pub fn stream(
    client: &impl RedditApi,
    layout: &Layout,
    target: LiveTarget,
    items: LiveItems,
    duration: Option<Duration>,
) -> Result<PathBuf> {
    let (name, kind, section) = match &target {
        LiveTarget::Subreddit(name) => (name.clone(), ObjectKind::Subreddit, Section::LiveSubreddits),
        LiveTarget::Redditor(name) => (name.clone(), ObjectKind::Redditor, Section::LiveRedditors),
    };
    existence(client, [name.as_str()], kind)?;

    let started = Local::now();
    let output = layout.unique_path(
        section,
        &format!("{name}-{}-{}", describe(items), started.format("%H%M%S")),
        "jsonl",
    )?;
    let settings = LiveSettings {
        target: target.clone(),
        items,
        started_at: started.to_rfc3339(),
    };

    match duration {
        Some(duration) => info!("Streaming {} for {}s into {}.", describe(items), duration.as_secs(), output.display()),
        None => info!("Streaming {} into {}. Press Ctrl+C to stop.", describe(items), output.display()),
    }
    let deadline = duration.map(|duration| Instant::now() + duration);
    let written = Livestream::new(client, target, items).run(&output, &settings, deadline)?;
    info!("Livestream finished with {written} {}.", describe(items));
    Ok(output)
}
