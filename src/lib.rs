//! Universal Reddit Scraper: scrapes subreddits, redditors and submission
//! comments into a dated directory tree, livestreams new activity, and turns
//! scrape files into word frequencies and wordclouds.

pub mod analytics;
pub mod cli;
pub mod export;
pub mod live;
pub mod logging;
pub mod reddit;
pub mod scrapers;
pub mod tools;
pub mod tree;

mod config;
pub use config::*;

mod error;
pub use error::*;

pub use tools::{Run, Tools, Urs};
