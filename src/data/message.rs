use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{PostID, UserID};

/// A direct message. At least one of `content` and `post` is set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub sender: UserID,
    pub receiver: UserID,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<PostID>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn is_between(&self, a: &UserID, b: &UserID) -> bool {
        (&self.sender == a && &self.receiver == b) || (&self.sender == b && &self.receiver == a)
    }
}
