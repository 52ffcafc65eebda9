use super::{Category, Comment, RedditApi, RedditorInfo, Submission, SubredditInfo, TimeFilter};
use crate::{Config, Result, UrsError};
use roux::{
    comment::CommentData,
    reply::MaybeReplies,
    submission::SubmissionData,
    util::{FeedOption, RouxError, TimePeriod},
    Comments, Me, Reddit, Subreddit, User,
};
use std::cell::OnceCell;
use tracing::debug;

/// Reddit caps every listing page at this many children.
const PAGE_SIZE: u32 = 100;
/// Items fetched per poll of a live listing.
const LIVE_BATCH: u32 = 25;

impl From<CommentData> for Comment {
    fn from(comment: CommentData) -> Self {
        Self {
            id: comment.id.unwrap_or_default(),
            author: comment.author.unwrap_or_else(|| "[deleted]".to_string()),
            body: comment.body.unwrap_or_default(),
            score: comment.score.unwrap_or(0) as i64,
            parent_id: comment.parent_id.unwrap_or_default(),
            created_utc: comment.created_utc.unwrap_or(0.0),
            replies: match comment.replies {
                Some(MaybeReplies::Reply(raw_replies)) => convert_comments(raw_replies),
                _ => vec![],
            },
        }
    }
}

impl From<SubmissionData> for Submission {
    fn from(post: SubmissionData) -> Self {
        Self {
            id: post.id,
            title: post.title,
            author: post.author,
            subreddit: post.subreddit,
            selftext: post.selftext,
            score: post.score as i64,
            upvote_ratio: post.upvote_ratio as f64,
            num_comments: post.num_comments as u64,
            over_18: post.over_18,
            locked: post.locked,
            permalink: post.permalink,
            created_utc: post.created_utc as f64,
        }
    }
}

/// "load more" stubs come back as comments without a body.
fn is_comment(comment: &CommentData) -> bool {
    comment.body.is_some()
}

/// Converts a comment listing, dropping "load more" stubs at every level.
fn convert_comments(listing: Comments) -> Vec<Comment> {
    listing
        .data
        .children
        .into_iter()
        .map(|child| child.data)
        .filter(is_comment)
        .map(Comment::from)
        .collect()
}

impl From<TimeFilter> for TimePeriod {
    fn from(filter: TimeFilter) -> Self {
        match filter {
            TimeFilter::Hour => TimePeriod::Now,
            TimeFilter::Day => TimePeriod::Today,
            TimeFilter::Week => TimePeriod::ThisWeek,
            TimeFilter::Month => TimePeriod::ThisMonth,
            TimeFilter::Year => TimePeriod::ThisYear,
            TimeFilter::All => TimePeriod::AllTime,
        }
    }
}

/// Follows `after` cursors until `limit` items are collected or the listing runs dry.
fn paginate<T>(
    limit: u32,
    mut fetch_page: impl FnMut(u32, Option<&str>) -> Result<(Vec<T>, Option<String>)>,
) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut after: Option<String> = None;
    while (items.len() as u32) < limit {
        let page_size = (limit - items.len() as u32).min(PAGE_SIZE);
        let (page, next) = fetch_page(page_size, after.as_deref())?;
        let exhausted = page.is_empty() || next.is_none();
        items.extend(page.into_iter().take(page_size as usize));
        if exhausted {
            break;
        }
        after = next;
    }
    Ok(items)
}

fn feed_option(page_size: Option<u32>, after: Option<&str>, period: Option<TimeFilter>) -> FeedOption {
    let mut options = FeedOption::new();
    if let Some(page_size) = page_size {
        options = options.limit(page_size);
    }
    if let Some(after) = after {
        options = options.after(after);
    }
    if let Some(period) = period {
        options = options.period(period.into());
    }
    options
}

/// Maps roux failures, keeping 403/404 apart so missing objects can be skipped.
fn reddit_error(context: impl Into<String>, err: RouxError) -> UrsError {
    if let RouxError::Status(response) = &err {
        let status = response.status().as_u16();
        if matches!(status, 403 | 404) {
            return UrsError::Unavailable {
                context: context.into(),
                status,
            };
        }
    }
    UrsError::reddit(context, err)
}

/// `RedditApi` on top of the blocking `roux` client.
///
/// The first request logs in with the configured credentials; the OAuth
/// session is then reused for every listing.
#[derive(Clone, Debug)]
pub struct RouxClient {
    config: Config,
    session: OnceCell<Me>,
}

impl RouxClient {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session: OnceCell::new(),
        }
    }

    fn session(&self) -> Result<&Me> {
        if let Some(me) = self.session.get() {
            return Ok(me);
        }
        let credentials = self.config.credentials()?;
        debug!(user_agent = %credentials.user_agent, "logging in");
        let me = Reddit::new(
            &credentials.user_agent,
            &credentials.client_id,
            &credentials.client_secret,
        )
        .username(&credentials.username)
        .password(&credentials.password)
        .login()
        .map_err(|err| UrsError::InvalidCredentials(err.to_string()))?;
        Ok(self.session.get_or_init(|| me))
    }

    fn subreddit(&self, name: &str) -> Result<Subreddit> {
        Ok(Subreddit::new_oauth(name, &self.session()?.client))
    }

    fn user(&self, name: &str) -> Result<User> {
        Ok(User::new_oauth(name, &self.session()?.client))
    }
}

impl RedditApi for RouxClient {
    fn authenticate(&self) -> Result<String> {
        self.session()?;
        Ok(self.config.credentials()?.username)
    }

    fn subreddit_about(&self, subreddit: &str) -> Result<SubredditInfo> {
        let about = self
            .subreddit(subreddit)?
            .about()
            .map_err(|err| reddit_error(format!("reading r/{subreddit}"), err))?;
        Ok(SubredditInfo {
            name: subreddit.to_string(),
            description: about.public_description.unwrap_or_default(),
            subscribers: about.subscribers.unwrap_or(0),
        })
    }

    fn subreddit_posts(
        &self,
        subreddit: &str,
        category: Category,
        limit: u32,
        time_filter: Option<TimeFilter>,
    ) -> Result<Vec<Submission>> {
        let sub = self.subreddit(subreddit)?;
        let context = format!("listing {category} posts of r/{subreddit}");
        paginate(limit, |page_size, after| {
            debug!(subreddit, %category, page_size, after, "fetching page");
            let options = Some(feed_option(None, after, time_filter));
            let listing = match category {
                Category::Hot => sub.hot(page_size, options),
                Category::New => sub.latest(page_size, options),
                Category::Top => sub.top(page_size, options),
                Category::Rising => sub.rising(page_size, options),
            }
            .map_err(|err| reddit_error(&context, err))?;
            let posts = listing
                .data
                .children
                .into_iter()
                .map(|child| Submission::from(child.data))
                .collect();
            Ok((posts, listing.data.after))
        })
    }

    fn submission_comments(&self, subreddit: &str, id: &str, limit: Option<u32>) -> Result<Vec<Comment>> {
        let raw_comments = self
            .subreddit(subreddit)?
            .article_comments(id, None, limit)
            .map_err(|err| reddit_error(format!("reading comments of {id}"), err))?;
        Ok(convert_comments(raw_comments))
    }

    fn redditor_about(&self, redditor: &str) -> Result<RedditorInfo> {
        let about = self
            .user(redditor)?
            .about(None)
            .map_err(|err| reddit_error(format!("reading u/{redditor}"), err))?;
        let data = about.data;
        Ok(RedditorInfo {
            name: data.name.unwrap_or_else(|| redditor.to_string()),
            id: data.id.unwrap_or_default(),
            created_utc: data.created_utc.unwrap_or_default(),
            link_karma: data.link_karma.unwrap_or_default() as i64,
            comment_karma: data.comment_karma.unwrap_or_default() as i64,
            is_mod: data.is_mod.unwrap_or_default(),
        })
    }

    fn redditor_submissions(&self, redditor: &str, limit: u32) -> Result<Vec<Submission>> {
        let user = self.user(redditor)?;
        let context = format!("listing submissions of u/{redditor}");
        paginate(limit, |page_size, after| {
            let listing = user
                .submitted(Some(feed_option(Some(page_size), after, None)))
                .map_err(|err| reddit_error(&context, err))?;
            let posts = listing
                .data
                .children
                .into_iter()
                .map(|child| Submission::from(child.data))
                .collect();
            Ok((posts, listing.data.after))
        })
    }

    fn redditor_comments(&self, redditor: &str, limit: u32) -> Result<Vec<Comment>> {
        let user = self.user(redditor)?;
        let context = format!("listing comments of u/{redditor}");
        paginate(limit, |page_size, after| {
            let listing = user
                .comments(Some(feed_option(Some(page_size), after, None)))
                .map_err(|err| reddit_error(&context, err))?;
            let after = listing.data.after.clone();
            Ok((convert_comments(listing), after))
        })
    }

    fn latest_subreddit_submissions(&self, subreddit: &str) -> Result<Vec<Submission>> {
        let listing = self
            .subreddit(subreddit)?
            .latest(LIVE_BATCH, None)
            .map_err(|err| reddit_error(format!("polling r/{subreddit}"), err))?;
        Ok(listing
            .data
            .children
            .into_iter()
            .map(|child| Submission::from(child.data))
            .collect())
    }

    fn latest_subreddit_comments(&self, subreddit: &str) -> Result<Vec<Comment>> {
        let listing = self
            .subreddit(subreddit)?
            .latest_comments(None, Some(LIVE_BATCH))
            .map_err(|err| reddit_error(format!("polling r/{subreddit} comments"), err))?;
        Ok(convert_comments(listing))
    }
}
