use super::batch_bar;
use crate::{
    cli::RedditorRequest,
    export::{export, Layout, Section},
    reddit::{existence, Comment, ObjectKind, RedditApi, RedditorInfo, Submission},
    Result,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedditorSettings {
    pub redditor: String,
    pub n_results: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RedditorScrape {
    pub information: RedditorInfo,
    pub submissions: Vec<Submission>,
    pub comments: Vec<Comment>,
}

/// Scrapes the profile plus the latest `n_results` submissions and comments of each redditor.
pub fn run_redditors(client: &impl RedditApi, layout: &Layout, requests: &[RedditorRequest]) -> Result<Vec<PathBuf>> {
    let (valid, _) = existence(
        client,
        requests.iter().map(|r| r.redditor.as_str()),
        ObjectKind::Redditor,
    )?;

    let bar = batch_bar(valid.len(), "Scraping redditors");
    let mut outputs = vec![];
    for request in requests.iter().filter(|r| valid.contains(&r.redditor)) {
        bar.set_message(format!("u/{}", request.redditor));
        let information = client.redditor_about(&request.redditor)?;
        let submissions = client.redditor_submissions(&request.redditor, request.n_results)?;
        let comments = client.redditor_comments(&request.redditor, request.n_results)?;
        info!(
            "Scraped {} submissions and {} comments from u/{}.",
            submissions.len(),
            comments.len(),
            request.redditor
        );

        let output = layout.unique_path(
            Section::Redditors,
            &format!("{}-{}", request.redditor, request.n_results),
            "json",
        )?;
        export(
            &output,
            RedditorSettings {
                redditor: request.redditor.clone(),
                n_results: request.n_results,
            },
            RedditorScrape {
                information,
                submissions,
                comments,
            },
        )?;
        outputs.push(output);
        bar.inc(1);
    }
    bar.finish_and_clear();
    Ok(outputs)
}
