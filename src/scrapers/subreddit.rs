use super::{batch_bar, Console};
use crate::{
    cli::SubredditRequest,
    export::{export, Layout, Section},
    reddit::{existence, Category, ObjectKind, RedditApi, Submission, SubredditInfo, TimeFilter},
    Result,
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, path::PathBuf};
use tracing::{info, warn};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubredditSettings {
    pub subreddit: String,
    pub category: Category,
    pub n_results: u32,
    pub time_filter: Option<TimeFilter>,
    pub include_about: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubredditScrape {
    pub about: Option<SubredditInfo>,
    pub submissions: Vec<Submission>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SubredditOptions {
    /// Attach description and subscriber count.
    pub include_about: bool,
    pub skip_confirmation: bool,
}

fn file_stem(request: &SubredditRequest) -> String {
    match request.time_filter {
        Some(filter) => format!("{}-{}-{}-{}", request.subreddit, request.category, request.n_results, filter),
        None => format!("{}-{}-{}", request.subreddit, request.category, request.n_results),
    }
}

fn settings_table(requests: &[SubredditRequest]) -> String {
    let mut table = format!("{:<24} {:<8} {:>9} {:<6}\n", "SUBREDDIT", "CATEGORY", "N_RESULTS", "TIME");
    for request in requests {
        let time = request.time_filter.map(|filter| filter.to_string()).unwrap_or_else(|| "-".to_string());
        table.push_str(&format!(
            "{:<24} {:<8} {:>9} {:<6}\n",
            request.subreddit, request.category, request.n_results, time
        ));
    }
    table
}

/// Checks the subreddits exist, asks for confirmation, then scrapes each request.
pub fn run_subreddits(
    client: &impl RedditApi,
    layout: &Layout,
    console: &mut Console,
    requests: &[SubredditRequest],
    options: SubredditOptions,
) -> Result<Vec<PathBuf>> {
    let names: BTreeSet<&str> = requests.iter().map(|r| r.subreddit.as_str()).collect();
    let (valid, _) = existence(client, names, ObjectKind::Subreddit)?;
    let requests: Vec<SubredditRequest> = requests
        .iter()
        .filter(|request| valid.contains(&request.subreddit))
        .cloned()
        .collect();

    console.say(&settings_table(&requests))?;
    if !options.skip_confirmation && !console.confirm("Scrape these subreddits?")? {
        warn!("Cancelled subreddit scrape.");
        return Ok(vec![]);
    }

    scrape_subreddits(client, layout, &requests, options.include_about)
}

/// Scrapes already-validated requests without asking anything.
pub fn scrape_subreddits(
    client: &impl RedditApi,
    layout: &Layout,
    requests: &[SubredditRequest],
    include_about: bool,
) -> Result<Vec<PathBuf>> {
    let bar = batch_bar(requests.len(), "Scraping subreddits");
    let mut outputs = vec![];
    for request in requests {
        bar.set_message(format!("r/{}", request.subreddit));
        let submissions = client.subreddit_posts(
            &request.subreddit,
            request.category,
            request.n_results,
            request.time_filter,
        )?;
        info!(
            "Scraped {} {} posts from r/{}.",
            submissions.len(),
            request.category,
            request.subreddit
        );
        let about = if include_about {
            Some(client.subreddit_about(&request.subreddit)?)
        } else {
            None
        };

        let output = layout.unique_path(Section::Subreddits, &file_stem(request), "json")?;
        export(
            &output,
            SubredditSettings {
                subreddit: request.subreddit.clone(),
                category: request.category,
                n_results: request.n_results,
                time_filter: request.time_filter,
                include_about,
            },
            SubredditScrape { about, submissions },
        )?;
        outputs.push(output);
        bar.inc(1);
    }
    bar.finish_and_clear();
    Ok(outputs)
}
