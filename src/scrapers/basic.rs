use super::{scrape_subreddits, Console};
use crate::{
    cli::{parse_count, SubredditRequest},
    export::Layout,
    reddit::{existence, Category, ObjectKind, RedditApi, TimeFilter},
    Result,
};
use std::path::PathBuf;

fn ask_category(console: &mut Console, subreddit: &str) -> Result<Category> {
    loop {
        let answer = console.prompt(&format!("Category for r/{subreddit} [{}]:", Category::LETTERS))?;
        match answer.parse() {
            Ok(category) => return Ok(category),
            Err(err) => console.say(&err.to_string())?,
        }
    }
}

fn ask_time_filter(console: &mut Console) -> Result<TimeFilter> {
    loop {
        let answer = console.prompt(&format!("Time filter [{}] (empty for all):", TimeFilter::NAMES))?;
        if answer.is_empty() {
            return Ok(TimeFilter::default());
        }
        match answer.parse() {
            Ok(filter) => return Ok(filter),
            Err(err) => console.say(&err.to_string())?,
        }
    }
}

fn ask_count(console: &mut Console) -> Result<u32> {
    loop {
        let answer = console.prompt("Number of results:")?;
        match parse_count(&answer, false) {
            Ok(n) => return Ok(n),
            Err(err) => console.say(&err.to_string())?,
        }
    }
}

/// Builds subreddit requests from answers on the console.
pub fn ask_requests(client: &impl RedditApi, console: &mut Console) -> Result<Vec<SubredditRequest>> {
    let answer = loop {
        let answer = console.prompt("Enter subreddits separated by a space:")?;
        if !answer.is_empty() {
            break answer;
        }
    };
    let (valid, invalid) = existence(client, answer.split_whitespace(), ObjectKind::Subreddit)?;
    if !invalid.is_empty() {
        console.say(&format!("Skipping: {}", invalid.join(", ")))?;
    }

    let mut requests = vec![];
    for subreddit in valid {
        let category = ask_category(console, &subreddit)?;
        let time_filter = if category.accepts_time_filter() {
            Some(ask_time_filter(console)?)
        } else {
            None
        };
        let n_results = ask_count(console)?;
        requests.push(SubredditRequest {
            subreddit,
            category,
            n_results,
            time_filter,
        });
    }
    Ok(requests)
}

/// The interactive subreddit scraper.
pub fn run_basic(client: &impl RedditApi, layout: &Layout, console: &mut Console) -> Result<Vec<PathBuf>> {
    let requests = ask_requests(client, console)?;
    scrape_subreddits(client, layout, &requests, false)
}
