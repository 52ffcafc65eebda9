mod basic;
pub use basic::*;

mod comments;
pub use comments::*;

mod redditor;
pub use redditor::*;

mod subreddit;
pub use subreddit::*;

use crate::{Result, UrsError};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, BufReader, Cursor, Write};

/// Where prompts are written and answers read from.
pub struct Console {
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
}

impl Console {
    pub fn stdio() -> Self {
        Self {
            input: Box::new(BufReader::new(io::stdin())),
            output: Box::new(io::stdout()),
        }
    }

    /// Answers prompts from `input`, one line per answer, and discards output.
    pub fn scripted(input: &str) -> Self {
        Self {
            input: Box::new(Cursor::new(input.to_string())),
            output: Box::new(io::sink()),
        }
    }

    pub fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    /// Reads one trimmed line. End of input cancels the run.
    pub fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{message} ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(UrsError::Cancelled);
        }
        Ok(line.trim().to_string())
    }

    /// Asks until the answer is yes or no.
    pub fn confirm(&mut self, message: &str) -> Result<bool> {
        loop {
            match self.prompt(&format!("{message} [Y/N]"))?.to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say("Please answer Y or N.")?,
            }
        }
    }
}

/// One bar per batch of scrapes, in the style of the collect tool.
pub(crate) fn batch_bar(len: usize, prefix: &'static str) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    bar.set_style(
        ProgressStyle::with_template(" [{elapsed_precise}] {prefix:<22} {bar:30.cyan/red} {pos}/{len} {msg} {spinner}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.set_prefix(prefix);
    bar
}
