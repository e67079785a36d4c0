use serde::Serialize;

/// Outcome of running the moderator over a piece of text. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationResult {
    pub is_flagged: bool,
    pub reasons: Vec<String>,
    pub score: i32,
}
