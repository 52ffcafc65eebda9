//! Where scrape results land on disk.
//!
//! Everything is written below `<scrapes_dir>/<YYYY-MM-DD>/`, one sub-directory
//! per scraper, and existing files are never overwritten.

use crate::{reddit::Data, Result};
use chrono::Local;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{
    fs::create_dir_all,
    path::{Path, PathBuf},
};
use tracing::info;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

lazy_static! {
    static ref UNSAFE_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_-]+").expect("static regex");
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Subreddits,
    Redditors,
    Comments,
    LiveSubreddits,
    LiveRedditors,
    Frequencies,
    Wordcloud,
}

impl Section {
    fn relative(self) -> &'static str {
        match self {
            Self::Subreddits => "subreddits",
            Self::Redditors => "redditors",
            Self::Comments => "comments",
            Self::LiveSubreddits => "livestream/subreddits",
            Self::LiveRedditors => "livestream/redditors",
            Self::Frequencies => "analytics/frequencies",
            Self::Wordcloud => "analytics/wordcloud",
        }
    }
}

/// The dated output tree for one run.
#[derive(Clone, Debug)]
pub struct Layout {
    date_dir: PathBuf,
}

impl Layout {
    pub fn today(scrapes_dir: &Path) -> Self {
        Self::for_date(scrapes_dir, &Local::now().format(DATE_FORMAT).to_string())
    }

    pub fn for_date(scrapes_dir: &Path, date: &str) -> Self {
        Self {
            date_dir: scrapes_dir.join(date),
        }
    }

    pub fn date_dir(&self) -> &Path {
        &self.date_dir
    }

    /// Creates the section directory if needed.
    pub fn section_dir(&self, section: Section) -> Result<PathBuf> {
        let dir = self.date_dir.join(section.relative());
        create_dir_all(&dir)?;
        Ok(dir)
    }

    /// A path in `section` named after `stem` that does not exist yet.
    pub fn unique_path(&self, section: Section, stem: &str, extension: &str) -> Result<PathBuf> {
        let dir = self.section_dir(section)?;
        let stem = sanitize(stem);
        let mut candidate = dir.join(format!("{stem}.{extension}"));
        let mut suffix = 1;
        while candidate.exists() {
            candidate = dir.join(format!("{stem}-{suffix}.{extension}"));
            suffix += 1;
        }
        Ok(candidate)
    }
}

/// Replaces runs of characters that are awkward in filenames with `_`.
pub fn sanitize(name: &str) -> String {
    let cleaned = UNSAFE_CHARS.replace_all(name.trim(), "_");
    let cleaned = cleaned.trim_matches('_');
    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned.to_string()
    }
}

/// On-disk envelope shared by every scraper.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrapeFile<S, D> {
    pub scrape_settings: S,
    pub data: D,
}

/// Writes a scrape envelope to `path` and logs where it went.
pub fn export<S: Serialize, D: Serialize>(path: &Path, scrape_settings: S, data: D) -> Result<()> {
    ScrapeFile {
        scrape_settings,
        data,
    }
    .save(path)?;
    info!("Saved to {}", path.display());
    Ok(())
}
