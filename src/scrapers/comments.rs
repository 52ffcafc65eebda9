use super::batch_bar;
use crate::{
    cli::CommentsRequest,
    export::{export, Layout, Section},
    reddit::{forest_size, Comment, RedditApi},
    Result,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentsSettings {
    pub url: String,
    /// `None` means every comment Reddit returned.
    pub n_results: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRef {
    pub subreddit: String,
    pub id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommentsScrape {
    pub submission: SubmissionRef,
    pub total_comments: usize,
    pub comments: Vec<Comment>,
}

pub fn run_comments(client: &impl RedditApi, layout: &Layout, requests: &[CommentsRequest]) -> Result<Vec<PathBuf>> {
    let bar = batch_bar(requests.len(), "Scraping comments");
    let mut outputs = vec![];
    for request in requests {
        bar.set_message(request.id.clone());
        let comments = client.submission_comments(&request.subreddit, &request.id, request.n_results)?;
        let total_comments = forest_size(&comments);
        info!(
            "Scraped {total_comments} comments ({} top-level) from r/{}/comments/{}.",
            comments.len(),
            request.subreddit,
            request.id
        );

        let count = request
            .n_results
            .map(|n| n.to_string())
            .unwrap_or_else(|| "all".to_string());
        let output = layout.unique_path(
            Section::Comments,
            &format!("{}-{}-{count}", request.subreddit, request.id),
            "json",
        )?;
        export(
            &output,
            CommentsSettings {
                url: request.url.clone(),
                n_results: request.n_results,
            },
            CommentsScrape {
                submission: SubmissionRef {
                    subreddit: request.subreddit.clone(),
                    id: request.id.clone(),
                },
                total_comments,
                comments,
            },
        )?;
        outputs.push(output);
        bar.inc(1);
    }
    bar.finish_and_clear();
    Ok(outputs)
}
