use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{CommentID, UserID};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub author: UserID,
    pub content: String,
    pub caption: String,
    pub titles: Vec<String>,
    pub media: Vec<String>,
    pub likes: Vec<UserID>,
    pub saved_by: Vec<UserID>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentID,
    pub author: UserID,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewPost {
    pub content: String,
    pub caption: String,
    pub titles: Vec<String>,
    pub media: Vec<String>,
}

impl Post {
    pub fn is_liked_by(&self, user: &UserID) -> bool {
        self.likes.contains(user)
    }

    pub fn is_saved_by(&self, user: &UserID) -> bool {
        self.saved_by.contains(user)
    }
}
