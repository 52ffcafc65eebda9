mod frequencies;
pub use frequencies::*;

mod wordcloud;
pub use wordcloud::*;

use crate::{reddit::Data, Result, UrsError};
use lazy_static::lazy_static;
use rayon::prelude::*;
use regex::Regex;
use serde_json::Value;
use std::{
    collections::{HashMap, HashSet},
    fs::read_to_string,
    path::Path,
};

/// Keys whose string values are treated as prose, wherever they appear in a scrape.
const TEXT_FIELDS: [&str; 3] = ["title", "selftext", "body"];

lazy_static! {
    static ref URL: Regex = Regex::new(r"(?:https?://|www\.)\S+").expect("static regex");
    static ref WORD: Regex = Regex::new(r"[a-z][a-z0-9']*").expect("static regex");
    static ref STOP_WORDS: HashSet<&'static str> = [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
        "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
        "between", "both", "but", "by", "can", "could", "did", "do", "does", "doing", "don't",
        "down", "during", "each", "even", "few", "for", "from", "further", "get", "got", "had",
        "has", "have", "having", "he", "her", "here", "hers", "herself", "him", "himself",
        "his", "how", "i", "i'm", "if", "in", "into", "is", "it", "it's", "its", "itself",
        "just", "like", "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of",
        "off", "on", "once", "one", "only", "or", "other", "our", "ours", "ourselves", "out",
        "over", "own", "really", "same", "she", "should", "so", "some", "such", "than", "that",
        "that's", "the", "their", "theirs", "them", "themselves", "then", "there", "these",
        "they", "this", "those", "through", "to", "too", "under", "until", "up", "very", "was",
        "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why", "will",
        "with", "would", "you", "you're", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect();
}

/// Reads a scrape file. Livestream `.jsonl` files yield one document per line.
pub fn load_scrape(path: &Path) -> Result<Vec<Value>> {
    if path.extension().and_then(|ext| ext.to_str()) == Some("jsonl") {
        read_to_string(path)?
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(UrsError::from))
            .collect()
    } else {
        Ok(vec![Value::restore(path)?])
    }
}

/// Collects every prose string in a scrape document.
pub fn extract_text(document: &Value) -> Vec<String> {
    fn walk(value: &Value, out: &mut Vec<String>) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    match child {
                        Value::String(text) if TEXT_FIELDS.contains(&key.as_str()) => {
                            out.push(text.clone())
                        }
                        _ => walk(child, out),
                    }
                }
            }
            Value::Array(items) => items.iter().for_each(|item| walk(item, out)),
            _ => {}
        }
    }

    let mut out = vec![];
    walk(document, &mut out);
    out
}

/// Lower-cased words of `text`, without URLs, stop words or single letters.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let without_urls = URL.replace_all(&lowered, " ");
    WORD.find_iter(&without_urls)
        .map(|word| word.as_str().trim_end_matches('\'').trim_end_matches("'s"))
        .filter(|word| word.len() > 1 && !STOP_WORDS.contains(word))
        .map(str::to_string)
        .collect()
}

/// Word counts over all texts, computed in parallel.
pub fn count_words(texts: &[String]) -> HashMap<String, usize> {
    texts
        .par_iter()
        .fold(HashMap::new, |mut counts, text| {
            for word in tokenize(text) {
                *counts.entry(word).or_insert(0) += 1;
            }
            counts
        })
        .reduce(HashMap::new, |mut left, right| {
            for (word, count) in right {
                *left.entry(word).or_insert(0) += count;
            }
            left
        })
}

/// Most frequent first; ties broken alphabetically so output is stable.
pub fn sort_frequencies(counts: HashMap<String, usize>) -> Vec<(String, usize)> {
    let mut sorted: Vec<_> = counts.into_iter().collect();
    sorted.sort_by(|(word_a, count_a), (word_b, count_b)| count_b.cmp(count_a).then_with(|| word_a.cmp(word_b)));
    sorted
}

/// Frequencies of every word in a scrape file.
pub fn file_frequencies(path: &Path) -> Result<Vec<(String, usize)>> {
    let texts: Vec<String> = load_scrape(path)?.iter().flat_map(extract_text).collect();
    Ok(sort_frequencies(count_words(&texts)))
}
