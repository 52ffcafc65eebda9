#![allow(dead_code)]

use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
};
use urs::{
    reddit::{Category, Comment, RedditApi, RedditorInfo, Submission, SubredditInfo, TimeFilter},
    Result, UrsError,
};

pub fn post(id: &str, title: &str, selftext: &str) -> Submission {
    Submission {
        id: id.to_string(),
        title: title.to_string(),
        selftext: selftext.to_string(),
        author: "ferris".to_string(),
        ..Default::default()
    }
}

pub fn comment(id: &str, body: &str, replies: Vec<Comment>) -> Comment {
    Comment {
        id: id.to_string(),
        body: body.to_string(),
        author: "ferris".to_string(),
        replies,
        ..Default::default()
    }
}

/// In-memory Reddit. Every call is recorded as `method:argument`.
#[derive(Default)]
pub struct FakeReddit {
    pub reject_login: bool,
    /// Every lookup fails with a server error.
    pub outage: bool,
    pub subreddits: HashMap<String, Vec<Submission>>,
    pub redditors: HashMap<String, (Vec<Submission>, Vec<Comment>)>,
    pub threads: HashMap<String, Vec<Comment>>,
    /// Successive answers to live comment polls; the last one repeats.
    pub live_comments: RefCell<VecDeque<Vec<Comment>>>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeReddit {
    pub fn with_subreddit(mut self, name: &str, posts: Vec<Submission>) -> Self {
        self.subreddits.insert(name.to_string(), posts);
        self
    }

    pub fn with_redditor(mut self, name: &str, posts: Vec<Submission>, comments: Vec<Comment>) -> Self {
        self.redditors.insert(name.to_string(), (posts, comments));
        self
    }

    pub fn with_thread(mut self, id: &str, comments: Vec<Comment>) -> Self {
        self.threads.insert(id.to_string(), comments);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn missing(what: &str) -> UrsError {
        UrsError::Unavailable {
            context: format!("reading {what}"),
            status: 404,
        }
    }

    fn down(&self, what: &str) -> Result<()> {
        if self.outage {
            Err(UrsError::Reddit {
                context: format!("reading {what}"),
                message: "Status error: 503 Service Unavailable".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl RedditApi for FakeReddit {
    fn authenticate(&self) -> Result<String> {
        self.record("authenticate".to_string());
        if self.reject_login {
            Err(UrsError::InvalidCredentials("invalid_grant".to_string()))
        } else {
            Ok("tester".to_string())
        }
    }

    fn subreddit_about(&self, subreddit: &str) -> Result<SubredditInfo> {
        self.record(format!("subreddit_about:{subreddit}"));
        self.down(subreddit)?;
        self.subreddits
            .get(subreddit)
            .map(|_| SubredditInfo {
                name: subreddit.to_string(),
                description: format!("All about {subreddit}"),
                subscribers: 1234,
            })
            .ok_or_else(|| Self::missing(subreddit))
    }

    fn subreddit_posts(
        &self,
        subreddit: &str,
        category: Category,
        limit: u32,
        _time_filter: Option<TimeFilter>,
    ) -> Result<Vec<Submission>> {
        self.record(format!("subreddit_posts:{subreddit}:{category}:{limit}"));
        let posts = self.subreddits.get(subreddit).ok_or_else(|| Self::missing(subreddit))?;
        Ok(posts.iter().take(limit as usize).cloned().collect())
    }

    fn submission_comments(&self, subreddit: &str, id: &str, limit: Option<u32>) -> Result<Vec<Comment>> {
        self.record(format!("submission_comments:{subreddit}:{id}"));
        let comments = self.threads.get(id).ok_or_else(|| Self::missing(id))?;
        let limit = limit.map(|n| n as usize).unwrap_or(usize::MAX);
        Ok(comments.iter().take(limit).cloned().collect())
    }

    fn redditor_about(&self, redditor: &str) -> Result<RedditorInfo> {
        self.record(format!("redditor_about:{redditor}"));
        self.down(redditor)?;
        self.redditors
            .get(redditor)
            .map(|_| RedditorInfo {
                name: redditor.to_string(),
                id: "t2_abc".to_string(),
                link_karma: 10,
                comment_karma: 20,
                ..Default::default()
            })
            .ok_or_else(|| Self::missing(redditor))
    }

    fn redditor_submissions(&self, redditor: &str, limit: u32) -> Result<Vec<Submission>> {
        self.record(format!("redditor_submissions:{redditor}:{limit}"));
        let (posts, _) = self.redditors.get(redditor).ok_or_else(|| Self::missing(redditor))?;
        Ok(posts.iter().take(limit as usize).cloned().collect())
    }

    fn redditor_comments(&self, redditor: &str, limit: u32) -> Result<Vec<Comment>> {
        self.record(format!("redditor_comments:{redditor}:{limit}"));
        let (_, comments) = self.redditors.get(redditor).ok_or_else(|| Self::missing(redditor))?;
        Ok(comments.iter().take(limit as usize).cloned().collect())
    }

    fn latest_subreddit_submissions(&self, subreddit: &str) -> Result<Vec<Submission>> {
        self.record(format!("latest_subreddit_submissions:{subreddit}"));
        let posts = self.subreddits.get(subreddit).ok_or_else(|| Self::missing(subreddit))?;
        Ok(posts.clone())
    }

    fn latest_subreddit_comments(&self, subreddit: &str) -> Result<Vec<Comment>> {
        self.record(format!("latest_subreddit_comments:{subreddit}"));
        let mut batches = self.live_comments.borrow_mut();
        if batches.len() > 1 {
            Ok(batches.pop_front().unwrap_or_default())
        } else {
            Ok(batches.front().cloned().unwrap_or_default())
        }
    }
}
