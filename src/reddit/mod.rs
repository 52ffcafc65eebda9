mod scrape;
pub use scrape::*;

mod validation;
pub use validation::*;

use crate::{Result, UrsError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{fmt, fs::{read_to_string, write}, path::Path, str::FromStr};

/// JSON persistence for anything the scrapers produce.
pub trait Data: Serialize {
    fn save(&self, file: &Path) -> Result<()> {
        let output_json = serde_json::to_string_pretty(self)?;
        write(file, output_json)?;
        Ok(())
    }

    fn restore(file: &Path) -> Result<Self>
    where
        Self: DeserializeOwned + Sized,
    {
        let input_json = read_to_string(file)?;
        Ok(serde_json::from_str(&input_json)?)
    }
}

impl<T> Data for T where T: Serialize {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SubredditInfo {
    /// The subreddit's name, without the "r/" prefix.
    pub name: String,
    /// A brief description of the subreddit provided by the moderators.
    pub description: String,
    /// The number of subscribers to the subreddit.
    pub subscribers: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RedditorInfo {
    pub name: String,
    pub id: String,
    pub created_utc: f64,
    pub link_karma: i64,
    pub comment_karma: i64,
    pub is_mod: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    /// The title of the post.
    pub title: String,
    pub author: String,
    pub subreddit: String,
    /// The post content; empty for link posts.
    pub selftext: String,
    /// The score (upvotes - downvotes) the post has received.
    pub score: i64,
    pub upvote_ratio: f64,
    pub num_comments: u64,
    /// Is this post not safe for work?
    pub over_18: bool,
    /// Is this post locked by the moderators?
    pub locked: bool,
    pub permalink: String,
    pub created_utc: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author: String,
    /// The text of the comment.
    pub body: String,
    /// The score (upvotes - downvotes) the comment has received.
    pub score: i64,
    pub parent_id: String,
    pub created_utc: f64,
    /// The replies to the comment.
    pub replies: Vec<Comment>,
}

impl Comment {
    /// What is the size of the comment's reply tree (including this comment)?
    pub fn size(&self) -> usize {
        self.replies.iter().map(Comment::size).sum::<usize>() + 1
    }
}

/// Total number of comments in a forest.
pub fn forest_size(comments: &[Comment]) -> usize {
    comments.iter().map(Comment::size).sum()
}

/// Listing a subreddit can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Hot,
    New,
    Top,
    Rising,
}

impl Category {
    pub const LETTERS: &'static str = "h, n, t, r";

    pub fn accepts_time_filter(self) -> bool {
        matches!(self, Self::Top)
    }
}

impl FromStr for Category {
    type Err = UrsError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "h" | "hot" => Self::Hot,
            "n" | "new" => Self::New,
            "t" | "top" => Self::Top,
            "r" | "rising" => Self::Rising,
            _ => {
                return Err(UrsError::InvalidArgument(format!(
                    "unknown category {s:?}, expected one of {}",
                    Self::LETTERS
                )))
            }
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hot => "hot",
            Self::New => "new",
            Self::Top => "top",
            Self::Rising => "rising",
        };
        f.write_str(name)
    }
}

/// Time window for `top` listings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFilter {
    Hour,
    Day,
    Week,
    Month,
    Year,
    #[default]
    All,
}

impl TimeFilter {
    pub const NAMES: &'static str = "hour, day, week, month, year, all";
}

impl FromStr for TimeFilter {
    type Err = UrsError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "hour" => Self::Hour,
            "day" => Self::Day,
            "week" => Self::Week,
            "month" => Self::Month,
            "year" => Self::Year,
            "all" => Self::All,
            _ => {
                return Err(UrsError::InvalidArgument(format!(
                    "unknown time filter {s:?}, expected one of {}",
                    Self::NAMES
                )))
            }
        })
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::All => "all",
        };
        f.write_str(name)
    }
}

/// Everything the scrapers need from Reddit.
///
/// `RouxClient` talks to the live API; tests substitute an in-memory fake.
pub trait RedditApi {
    /// Logs in with the configured credentials and returns the account name.
    fn authenticate(&self) -> Result<String>;

    fn subreddit_about(&self, subreddit: &str) -> Result<SubredditInfo>;

    /// Up to `limit` posts from a subreddit listing, following pagination.
    fn subreddit_posts(
        &self,
        subreddit: &str,
        category: Category,
        limit: u32,
        time_filter: Option<TimeFilter>,
    ) -> Result<Vec<Submission>>;

    /// The comment forest of a submission. `limit` of `None` fetches everything Reddit returns.
    fn submission_comments(&self, subreddit: &str, id: &str, limit: Option<u32>) -> Result<Vec<Comment>>;

    fn redditor_about(&self, redditor: &str) -> Result<RedditorInfo>;

    fn redditor_submissions(&self, redditor: &str, limit: u32) -> Result<Vec<Submission>>;

    fn redditor_comments(&self, redditor: &str, limit: u32) -> Result<Vec<Comment>>;

    /// The newest submissions of a subreddit, newest first.
    fn latest_subreddit_submissions(&self, subreddit: &str) -> Result<Vec<Submission>>;

    /// The newest comments of a subreddit, newest first.
    fn latest_subreddit_comments(&self, subreddit: &str) -> Result<Vec<Comment>>;
}
