//! Keyword and sentiment based content moderation.
//!
//! Text is flagged when it contains any banned keyword (case-insensitive
//! substring match) or when its sentiment score falls below
//! [`NEGATIVE_SENTIMENT_THRESHOLD`]. Both checks always run so the caller
//! gets every reason and the score.

mod afinn;
mod sentiment;

pub use sentiment::{Sentiment, SentimentAnalysis};

use crate::data::ModerationResult;

pub const BANNED_KEYWORDS: &[&str] = &[
    "hate",
    "violence",
    "abuse",
    "kill",
    "racist",
    "sexist",
    "plagiarize",
    "stupid",
    "idiot",
    "dumb",
    "fool",
    "nonsense",
];

/// Scores strictly below this are flagged.
pub const NEGATIVE_SENTIMENT_THRESHOLD: i32 = -2;

pub struct Moderator {
    banned: Vec<String>,
    sentiment: Sentiment,
}

impl Default for Moderator {
    fn default() -> Self {
        Self::new(Sentiment::default())
    }
}

impl Moderator {
    pub fn new(sentiment: Sentiment) -> Self {
        Self {
            banned: BANNED_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            sentiment,
        }
    }

    pub fn sentiment(&self) -> &Sentiment {
        &self.sentiment
    }

    pub fn moderate(&self, text: &str) -> ModerationResult {
        let mut reasons = vec![];

        let lower = text.to_lowercase();
        let found: Vec<&str> = self.banned.iter()
            .map(String::as_str)
            .filter(|k| lower.contains(k))
            .collect();
        if !found.is_empty() {
            reasons.push(format!("Banned keywords detected: {}", found.join(", ")));
        }

        let score = self.sentiment.analyze(text).score;
        if score < NEGATIVE_SENTIMENT_THRESHOLD {
            reasons.push(format!("Negative sentiment detected (score: {score})"));
        }

        ModerationResult {
            is_flagged: !reasons.is_empty(),
            reasons,
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hate_is_flagged_for_keyword_and_sentiment() {
        let result = Moderator::default().moderate("I hate this");
        assert!(result.is_flagged);
        assert!(result.reasons.contains(&"Banned keywords detected: hate".to_string()));
        assert_eq!(result.score, -3);
        assert_eq!(result.reasons.len(), 2);
        assert_eq!(result.reasons[1], "Negative sentiment detected (score: -3)");
    }

    #[test]
    fn keywords_match_case_insensitively_in_list_order() {
        let result = Moderator::default().moderate("What NONSENSE, you Fool");
        assert!(result.is_flagged);
        assert_eq!(result.reasons[0], "Banned keywords detected: fool, nonsense");
    }

    #[test]
    fn keywords_match_inside_words() {
        let result = Moderator::default().moderate("Great skills on display");
        assert!(result.is_flagged);
        assert_eq!(result.reasons, ["Banned keywords detected: kill"]);
    }

    #[test]
    fn mildly_negative_text_passes() {
        let result = Moderator::default().moderate("The lighting was a bit sad");
        assert_eq!(result.score, -2);
        assert!(!result.is_flagged);
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn strongly_negative_text_without_keywords_is_flagged() {
        let result = Moderator::default().moderate("awful, horrible and boring");
        assert!(result.is_flagged);
        assert_eq!(result.score, -9);
        assert_eq!(result.reasons, ["Negative sentiment detected (score: -9)"]);
    }

    #[test]
    fn words_outside_common_vocabulary_are_scored() {
        let moderator = Moderator::default();
        for text in ["I am disgusted by this", "You are scum", "This is an outrage"] {
            let result = moderator.moderate(text);
            assert!(result.is_flagged, "{text}");
            assert_eq!(result.reasons, ["Negative sentiment detected (score: -3)"], "{text}");
        }
    }

    #[test]
    fn positive_text_passes() {
        let result = Moderator::default().moderate("Loved the new reel, fantastic work!");
        assert!(!result.is_flagged);
        assert!(result.score > 0);
    }

    #[test]
    fn custom_lexicon_changes_score_only() {
        let moderator = Moderator::new(Sentiment::from_afinn("rehearsal\t-4\n"));
        let result = moderator.moderate("rehearsal today");
        assert_eq!(result.score, -4);
        assert_eq!(result.reasons, ["Negative sentiment detected (score: -4)"]);
    }
}
