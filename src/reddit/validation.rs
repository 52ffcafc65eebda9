use super::RedditApi;
use crate::{Result, UrsError};
use tracing::{info, warn};

/// Which kind of Reddit object is being checked for existence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    Subreddit,
    Redditor,
}

impl ObjectKind {
    fn plural(self) -> &'static str {
        match self {
            Self::Subreddit => "subreddits",
            Self::Redditor => "redditors",
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Self::Subreddit => "r/",
            Self::Redditor => "u/",
        }
    }
}

/// Confirms the configured credentials are accepted by Reddit.
pub fn validate_user(client: &impl RedditApi) -> Result<()> {
    match client.authenticate() {
        Ok(username) => {
            info!("Logged in as u/{username}.");
            Ok(())
        }
        Err(err) => {
            warn!("API credentials were rejected. Check the CLIENT_ID, CLIENT_SECRET, USER_AGENT, REDDIT_USERNAME and REDDIT_PASSWORD variables.");
            Err(err)
        }
    }
}

/// Splits `names` into those Reddit knows about and those it does not.
///
/// Names Reddit refuses to show (404/403) are logged and skipped; it is an error
/// only when nothing is left. Any other failure aborts the check.
pub fn existence<'a>(
    client: &impl RedditApi,
    names: impl IntoIterator<Item = &'a str>,
    kind: ObjectKind,
) -> Result<(Vec<String>, Vec<String>)> {
    let mut valid = vec![];
    let mut invalid = vec![];
    for name in names {
        let lookup = match kind {
            ObjectKind::Subreddit => client.subreddit_about(name).map(drop),
            ObjectKind::Redditor => client.redditor_about(name).map(drop),
        };
        match lookup {
            Ok(()) => valid.push(name.to_string()),
            Err(err) if err.is_unavailable() => {
                warn!("{}{name} does not exist or is unavailable, skipping.", kind.prefix());
                invalid.push(name.to_string());
            }
            Err(err) => return Err(err),
        }
    }

    if valid.is_empty() {
        return Err(UrsError::NothingToScrape {
            kind: kind.plural(),
            rejected: invalid,
        });
    }
    Ok((valid, invalid))
}
