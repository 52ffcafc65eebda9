//! Routes one invocation to the tool its flags select.

use crate::{
    analytics::{generate_frequencies, generate_wordcloud},
    cli::Args,
    export::Layout,
    live::{stream, LiveItems, LiveTarget},
    reddit::{validate_user, RedditApi},
    scrapers::{run_basic, run_comments, run_redditors, run_subreddits, Console, SubredditOptions},
    tree::display_tree,
    Config, Result, UrsError,
};
use std::time::Duration;
use tracing::info;

/// The collaborators `Run` delegates to.
pub trait Tools {
    fn validate_user(&mut self) -> Result<()>;
    fn display_tree(&mut self, args: &Args) -> Result<()>;
    fn run_subreddit(&mut self, args: &Args) -> Result<()>;
    fn run_redditor(&mut self, args: &Args) -> Result<()>;
    fn run_comments(&mut self, args: &Args) -> Result<()>;
    fn run_basic(&mut self, args: &Args) -> Result<()>;
    fn livestream(&mut self, args: &Args) -> Result<()>;
    fn generate_frequencies(&mut self, args: &Args) -> Result<()>;
    fn generate_wordcloud(&mut self, args: &Args) -> Result<()>;
}

pub struct Run<'a, T> {
    args: &'a Args,
    tools: T,
}

impl<'a, T: Tools> Run<'a, T> {
    pub fn new(args: &'a Args, tools: T) -> Self {
        Self { args, tools }
    }

    pub fn into_tools(self) -> T {
        self.tools
    }

    /// Runs the first matching flag group. Collaborator errors propagate untouched.
    pub fn run_urs(&mut self) -> Result<()> {
        let args = self.args;

        if args.check {
            info!("RUNNING API CREDENTIALS CHECK.");
            self.tools.validate_user()?;
        } else if args.tree.is_some() {
            self.tools.display_tree(args)?;
        } else if !args.subreddit.is_empty() || !args.redditor.is_empty() || !args.comments.is_empty() || args.basic {
            self.tools.validate_user()?;

            if !args.subreddit.is_empty() {
                self.tools.run_subreddit(args)?;
            }
            if !args.redditor.is_empty() {
                self.tools.run_redditor(args)?;
            }
            if !args.comments.is_empty() {
                self.tools.run_comments(args)?;
            } else if args.basic {
                self.tools.run_basic(args)?;
            }
        } else if args.live_subreddit.is_some() || args.live_redditor.is_some() {
            self.tools.validate_user()?;
            self.tools.livestream(args)?;
        } else if args.frequencies.is_some() || args.wordcloud.is_some() {
            if args.frequencies.is_some() {
                self.tools.generate_frequencies(args)?;
            }
            if args.wordcloud.is_some() {
                self.tools.generate_wordcloud(args)?;
            }
        }
        Ok(())
    }
}

/// The real tools, writing below today's directory of `config.scrapes_dir`.
pub struct Urs<C> {
    client: C,
    config: Config,
    console: Console,
}

impl<C: RedditApi> Urs<C> {
    pub fn new(client: C, config: Config, console: Console) -> Self {
        Self { client, config, console }
    }

    fn layout(&self) -> Layout {
        Layout::today(&self.config.scrapes_dir)
    }
}

impl<C: RedditApi> Tools for Urs<C> {
    fn validate_user(&mut self) -> Result<()> {
        validate_user(&self.client)
    }

    fn display_tree(&mut self, args: &Args) -> Result<()> {
        let date = args
            .tree_date()
            .ok_or_else(|| UrsError::InvalidArgument("--tree was not given".to_string()))?;
        display_tree(&self.config.scrapes_dir, &date)
    }

    fn run_subreddit(&mut self, args: &Args) -> Result<()> {
        let options = SubredditOptions {
            include_about: args.about,
            skip_confirmation: args.skip_confirmation,
        };
        let layout = self.layout();
        run_subreddits(&self.client, &layout, &mut self.console, &args.subreddit_requests()?, options)?;
        Ok(())
    }

    fn run_redditor(&mut self, args: &Args) -> Result<()> {
        run_redditors(&self.client, &self.layout(), &args.redditor_requests()?)?;
        Ok(())
    }

    fn run_comments(&mut self, args: &Args) -> Result<()> {
        run_comments(&self.client, &self.layout(), &args.comments_requests()?)?;
        Ok(())
    }

    fn run_basic(&mut self, _args: &Args) -> Result<()> {
        let layout = self.layout();
        run_basic(&self.client, &layout, &mut self.console)?;
        Ok(())
    }

    fn livestream(&mut self, args: &Args) -> Result<()> {
        let target = match (&args.live_subreddit, &args.live_redditor) {
            (Some(subreddit), _) => LiveTarget::Subreddit(subreddit.clone()),
            (None, Some(redditor)) => LiveTarget::Redditor(redditor.clone()),
            (None, None) => return Err(UrsError::InvalidArgument("no livestream target given".to_string())),
        };
        let items = if args.stream_submissions {
            LiveItems::Submissions
        } else {
            LiveItems::Comments
        };
        stream(
            &self.client,
            &self.layout(),
            target,
            items,
            args.duration.map(Duration::from_secs),
        )?;
        Ok(())
    }

    fn generate_frequencies(&mut self, args: &Args) -> Result<()> {
        if let Some(file) = &args.frequencies {
            generate_frequencies(&self.layout(), file)?;
        }
        Ok(())
    }

    fn generate_wordcloud(&mut self, args: &Args) -> Result<()> {
        if let Some(request) = args.wordcloud_request() {
            let request = request?;
            generate_wordcloud(&self.layout(), &request.file, request.format)?;
        }
        Ok(())
    }
}
