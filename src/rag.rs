//! Keyword-overlap retrieval over a fixed corpus of text chunks.

use std::{fs::read_to_string, io::ErrorKind, path::Path};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::AppError;

pub const WORDS_PER_CHUNK: usize = 200;

lazy_static! {
    static ref BLANK_LINES: Regex = Regex::new(r"\n{2,}").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub chunk: String,
}

#[derive(Debug, Default)]
pub struct Corpus {
    chunks: Vec<Chunk>,
}

impl Corpus {
    pub fn new(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    /// A missing file gives an empty corpus.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = match read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Corpus {} not found, mentor chat will run without context", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        let chunks: Vec<Chunk> = serde_json::from_str(&text)
            .map_err(|e| AppError::Internal(format!("Malformed corpus {}: {e}", path.display())))?;
        info!("Loaded {} corpus chunks from {}", chunks.len(), path.display());
        Ok(Self { chunks })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Ranked by query words contained. Equal scores keep corpus order.
    pub fn relevant_chunks(&self, query: &str, top_n: usize) -> Vec<&str> {
        let query = query.to_lowercase();
        let words: Vec<&str> = query.split_whitespace().collect();
        let mut scored: Vec<(&str, usize)> = self.chunks.iter()
            .map(|Chunk { chunk }| {
                let text = chunk.to_lowercase();
                let score = words.iter().filter(|w| text.contains(*w)).count();
                (chunk.as_str(), score)
            })
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.into_iter().take(top_n).map(|(chunk, _)| chunk).collect()
    }
}

pub fn chunk_text(text: &str, words_per_chunk: usize) -> Vec<Chunk> {
    let text = BLANK_LINES.replace_all(text, "\n");
    let words: Vec<&str> = text.split_whitespace().collect();
    words.chunks(words_per_chunk.max(1))
        .map(|w| w.join(" "))
        .filter(|c| !c.trim().is_empty())
        .map(|chunk| Chunk { chunk })
        .collect()
}
