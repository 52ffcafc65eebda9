use crate::{
    analytics::ImageFormat,
    export::DATE_FORMAT,
    reddit::{Category, TimeFilter},
    Result, UrsError,
};
use chrono::{Local, NaiveDate};
use clap::{ArgAction, Parser};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref SUBMISSION_URL: Regex = Regex::new(
        r"^https?://(?:(?:www|old|new|np)\.)?reddit\.com/r/(?P<subreddit>[A-Za-z0-9_]+)/comments/(?P<id>[A-Za-z0-9]+)(?:/|$)"
    )
    .expect("static regex");
}

pub const TITLE: &str = r"
 __  __  _ __   ____
/\ \/\ \/\`'__\/',__\
\ \ \_\ \ \ \//\__, `\
 \ \____/\ \_\\/\____/
  \/___/  \/_/ \/___/
";

pub const EXAMPLES: &str = "\
Check API credentials:
    urs --check

Scrape the 10 hottest posts of r/rust and the top 25 of the week from r/programming:
    urs -r rust h 10 -r programming t 25 week

Scrape 15 submissions and comments of a redditor:
    urs -u spez 15

Scrape every comment of a submission:
    urs -c https://www.reddit.com/r/rust/comments/abc123/some_title/ 0

Interactively pick subreddits and categories:
    urs -b

Livestream comments (or submissions) of a subreddit or redditor:
    urs --live-subreddit rust
    urs --live-redditor spez --stream-submissions --duration 600

Display the scrapes stored today or on a given date:
    urs -t
    urs -t 2026-10-16

Word frequencies and wordclouds of a scrape file:
    urs -f scrapes/2026-10-16/subreddits/rust-hot-10.json
    urs --wordcloud scrapes/2026-10-16/subreddits/rust-hot-10.json svg
";

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "urs", author, version, about = "Universal Reddit Scraper", long_about = None)]
pub struct Args {
    /// Print usage examples and exit
    #[arg(short, long)]
    pub examples: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    pub verbose: bool,

    /// Check that the API credentials are valid
    #[arg(long)]
    pub check: bool,

    /// Scrape a subreddit listing (categories: h, n, t, r; time filter only with t)
    #[arg(
        short = 'r',
        long,
        num_args = 3..=4,
        action = ArgAction::Append,
        value_names = ["SUBREDDIT", "CATEGORY", "N_RESULTS", "TIME_FILTER"]
    )]
    pub subreddit: Vec<Vec<String>>,

    /// Scrape a redditor's profile, submissions and comments
    #[arg(short = 'u', long, num_args = 2, action = ArgAction::Append, value_names = ["USERNAME", "N_RESULTS"])]
    pub redditor: Vec<Vec<String>>,

    /// Scrape the comments of a submission (0 results means all)
    #[arg(short = 'c', long, num_args = 2, action = ArgAction::Append, value_names = ["SUBMISSION_URL", "N_RESULTS"])]
    pub comments: Vec<Vec<String>>,

    /// Interactively choose subreddits and categories to scrape
    #[arg(short, long)]
    pub basic: bool,

    /// Livestream a subreddit
    #[arg(long, value_name = "SUBREDDIT", conflicts_with = "live_redditor")]
    pub live_subreddit: Option<String>,

    /// Livestream a redditor
    #[arg(long, value_name = "REDDITOR")]
    pub live_redditor: Option<String>,

    /// Livestream submissions instead of comments
    #[arg(long)]
    pub stream_submissions: bool,

    /// Stop a livestream after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<u64>,

    /// Display the scrapes stored on a date (default: today)
    #[arg(short = 't', long, num_args = 0..=1, value_name = "DATE")]
    pub tree: Option<Option<String>>,

    /// Export word frequencies of a scrape file
    #[arg(short = 'f', long, value_name = "FILE")]
    pub frequencies: Option<PathBuf>,

    /// Render a wordcloud of a scrape file (formats: png, jpg, jpeg, bmp, svg)
    #[arg(long, num_args = 1..=2, value_names = ["FILE", "FORMAT"])]
    pub wordcloud: Option<Vec<String>>,

    /// Attach the subreddit's description and subscriber count to subreddit scrapes
    #[arg(long)]
    pub about: bool,

    /// Skip the confirmation prompt before scraping subreddits
    #[arg(short = 'y', long = "yes")]
    pub skip_confirmation: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubredditRequest {
    pub subreddit: String,
    pub category: Category,
    pub n_results: u32,
    pub time_filter: Option<TimeFilter>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedditorRequest {
    pub redditor: String,
    pub n_results: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentsRequest {
    pub url: String,
    pub subreddit: String,
    pub id: String,
    /// `None` fetches the whole comment forest.
    pub n_results: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordcloudRequest {
    pub file: PathBuf,
    pub format: ImageFormat,
}

fn invalid(message: impl Into<String>) -> UrsError {
    UrsError::InvalidArgument(message.into())
}

/// Parses a result count; zero is only meaningful where `allow_zero` is set.
pub fn parse_count(raw: &str, allow_zero: bool) -> Result<u32> {
    match raw.parse::<u32>() {
        Ok(0) if !allow_zero => Err(invalid(format!("{raw:?} must be greater than zero"))),
        Ok(n) => Ok(n),
        Err(_) => Err(invalid(format!("{raw:?} is not a valid number of results"))),
    }
}

/// Extracts the subreddit and submission id from a submission URL.
pub fn parse_submission_url(url: &str) -> Result<(String, String)> {
    SUBMISSION_URL
        .captures(url.trim())
        .map(|caps| (caps["subreddit"].to_string(), caps["id"].to_string()))
        .ok_or_else(|| invalid(format!("{url:?} is not a reddit submission URL")))
}

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| invalid(format!("{raw:?} is not a date in YYYY-MM-DD format")))
}

fn check_scrape_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(invalid(format!("{} does not exist", path.display())));
    }
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") | Some("jsonl") => Ok(()),
        _ => Err(invalid(format!(
            "{} is not a scrape file (expected .json or .jsonl)",
            path.display()
        ))),
    }
}

impl Args {
    pub fn subreddit_requests(&self) -> Result<Vec<SubredditRequest>> {
        self.subreddit
            .iter()
            .map(|group| {
                let category: Category = group[1].parse()?;
                let n_results = parse_count(&group[2], false)?;
                let time_filter = match group.get(3) {
                    Some(raw) if category.accepts_time_filter() => Some(raw.parse::<TimeFilter>()?),
                    Some(raw) => {
                        return Err(invalid(format!(
                            "time filter {raw:?} only applies to the top category, not {category}"
                        )))
                    }
                    None if category.accepts_time_filter() => Some(TimeFilter::default()),
                    None => None,
                };
                Ok(SubredditRequest {
                    subreddit: group[0].clone(),
                    category,
                    n_results,
                    time_filter,
                })
            })
            .collect()
    }

    pub fn redditor_requests(&self) -> Result<Vec<RedditorRequest>> {
        self.redditor
            .iter()
            .map(|group| {
                Ok(RedditorRequest {
                    redditor: group[0].clone(),
                    n_results: parse_count(&group[1], false)?,
                })
            })
            .collect()
    }

    pub fn comments_requests(&self) -> Result<Vec<CommentsRequest>> {
        self.comments
            .iter()
            .map(|group| {
                let (subreddit, id) = parse_submission_url(&group[0])?;
                let n_results = parse_count(&group[1], true)?;
                Ok(CommentsRequest {
                    url: group[0].clone(),
                    subreddit,
                    id,
                    n_results: (n_results > 0).then_some(n_results),
                })
            })
            .collect()
    }

    /// The date to display with `--tree`, today when none was given.
    pub fn tree_date(&self) -> Option<String> {
        self.tree.as_ref().map(|date| {
            date.clone()
                .unwrap_or_else(|| Local::now().format(DATE_FORMAT).to_string())
        })
    }

    pub fn wordcloud_request(&self) -> Option<Result<WordcloudRequest>> {
        self.wordcloud.as_ref().map(|values| {
            let format = match values.get(1) {
                Some(raw) => raw.parse::<ImageFormat>()?,
                None => ImageFormat::default(),
            };
            Ok(WordcloudRequest {
                file: PathBuf::from(&values[0]),
                format,
            })
        })
    }

    fn has_action(&self) -> bool {
        self.check
            || self.tree.is_some()
            || !self.subreddit.is_empty()
            || !self.redditor.is_empty()
            || !self.comments.is_empty()
            || self.basic
            || self.live_subreddit.is_some()
            || self.live_redditor.is_some()
            || self.frequencies.is_some()
            || self.wordcloud.is_some()
    }
}

/// Rejects argument combinations `clap` alone cannot catch, before anything touches the network.
pub fn check_args(args: &Args) -> Result<()> {
    if !args.has_action() {
        return Err(invalid("nothing to do; run with --help or --examples"));
    }
    args.subreddit_requests()?;
    args.redditor_requests()?;
    args.comments_requests()?;
    if let Some(date) = args.tree_date() {
        parse_date(&date)?;
    }
    if let Some(file) = &args.frequencies {
        check_scrape_file(file)?;
    }
    if let Some(request) = args.wordcloud_request() {
        check_scrape_file(&request?.file)?;
    }
    if args.duration == Some(0) {
        return Err(invalid("--duration must be greater than zero"));
    }
    Ok(())
}
