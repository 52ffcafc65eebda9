use super::file_frequencies;
use crate::{
    export::{export, Layout, Section},
    Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencySettings {
    pub raw_file: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordFrequency {
    pub word: String,
    pub frequency: usize,
}

/// Counts the words of a scrape file and exports them, most frequent first.
pub fn generate_frequencies(layout: &Layout, scrape_file: &Path) -> Result<PathBuf> {
    info!("Generating word frequencies for {}.", scrape_file.display());
    let data: Vec<WordFrequency> = file_frequencies(scrape_file)?
        .into_iter()
        .map(|(word, frequency)| WordFrequency { word, frequency })
        .collect();
    info!("Counted {} distinct words.", data.len());

    let stem = stem_of(scrape_file);
    let output = layout.unique_path(Section::Frequencies, &format!("{stem}-frequencies"), "json")?;
    export(
        &output,
        FrequencySettings {
            raw_file: scrape_file.to_path_buf(),
        },
        data,
    )?;
    Ok(output)
}

pub(crate) fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scrape".to_string())
}
