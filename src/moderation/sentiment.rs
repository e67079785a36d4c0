use std::{collections::HashMap, fs::read_to_string, io, path::Path};

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use tracing::warn;

use super::afinn::{AFINN_165, NEGATORS};

lazy_static! {
    static ref PUNCTUATION: Regex = Regex::new(r#"[.,/#!?$%^&*;:{}=_`"~()\n]"#).unwrap();
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentAnalysis {
    pub score: i32,
    pub comparative: f64,
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

/// Lexicon-based valence scorer in the style of AFINN.
pub struct Sentiment {
    lexicon: HashMap<String, i32>,
}

impl Default for Sentiment {
    fn default() -> Self {
        Self::from_afinn(AFINN_165)
    }
}

impl Sentiment {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, i32)>,
    {
        Self { lexicon: entries.into_iter().collect() }
    }

    /// Parses AFINN's `word<TAB>valence` format. Lines that don't parse are
    /// skipped.
    pub fn from_afinn(text: &str) -> Self {
        let entries = text.lines().enumerate().filter_map(|(n, line)| {
            if line.trim().is_empty() {
                return None;
            }
            let parsed = line
                .rsplit_once('\t')
                .and_then(|(word, value)| Some((word.trim().to_lowercase(), value.trim().parse::<i32>().ok()?)));
            if parsed.is_none() {
                warn!("Skipping malformed lexicon line {}: {line:?}", n + 1);
            }
            parsed
        });
        Self::from_entries(entries)
    }

    pub fn load(path: &Path) -> io::Result<Self> {
        Ok(Self::from_afinn(&read_to_string(path)?))
    }

    pub fn len(&self) -> usize {
        self.lexicon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexicon.is_empty()
    }

    pub fn analyze(&self, text: &str) -> SentimentAnalysis {
        let tokens = tokenize(text);
        let mut score = 0;
        let mut positive = vec![];
        let mut negative = vec![];
        for (i, token) in tokens.iter().enumerate() {
            let Some(&valence) = self.lexicon.get(token) else {
                continue;
            };
            let valence = if i > 0 && NEGATORS.contains(&tokens[i - 1].as_str()) {
                -valence
            } else {
                valence
            };
            if valence > 0 {
                positive.push(token.clone());
            } else if valence < 0 {
                negative.push(token.clone());
            }
            score += valence;
        }
        let comparative = if tokens.is_empty() { 0.0 } else { score as f64 / tokens.len() as f64 };
        SentimentAnalysis { score, comparative, positive, negative }
    }
}

fn tokenize(text: &str) -> Vec<String> {
    PUNCTUATION
        .replace_all(&text.to_lowercase(), " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
