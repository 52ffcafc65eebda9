use crate::{Result, UrsError};
use std::path::PathBuf;

const DEFAULT_SCRAPES_DIR: &str = "scrapes";

/// Credentials for Reddit's password-grant OAuth flow.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Root of the dated output tree.
    pub scrapes_dir: PathBuf,
    credentials: CredentialVars,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct CredentialVars {
    client_id: Option<String>,
    client_secret: Option<String>,
    user_agent: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            scrapes_dir: get("URS_SCRAPES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRAPES_DIR)),
            credentials: CredentialVars {
                client_id: get("CLIENT_ID"),
                client_secret: get("CLIENT_SECRET"),
                user_agent: get("USER_AGENT"),
                username: get("REDDIT_USERNAME"),
                password: get("REDDIT_PASSWORD"),
            },
        }
    }

    pub fn with_scrapes_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scrapes_dir = dir.into();
        self
    }

    /// Resolves the credentials, naming the first missing variable.
    pub fn credentials(&self) -> Result<Credentials> {
        let vars = &self.credentials;
        let require = |value: &Option<String>, name: &'static str| {
            value.clone().ok_or(UrsError::MissingConfig(name))
        };
        Ok(Credentials {
            client_id: require(&vars.client_id, "CLIENT_ID")?,
            client_secret: require(&vars.client_secret, "CLIENT_SECRET")?,
            user_agent: require(&vars.user_agent, "USER_AGENT")?,
            username: require(&vars.username, "REDDIT_USERNAME")?,
            password: require(&vars.password, "REDDIT_PASSWORD")?,
        })
    }
}
