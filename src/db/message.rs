use chrono::Utc;
use tracing::info;

use super::DB;

use crate::{
    data::{Message, MessageID, PostID, UserID},
    error::AppError,
};

impl DB {
    /// Needs text, a shared post, or both.
    pub fn send_message(&mut self, sender: &UserID, receiver: &UserID, content: Option<String>, post: Option<PostID>) -> Result<MessageID, AppError> {
        if content.is_none() && post.is_none() {
            return Err(AppError::invalid("Either content or post must be provided."));
        }
        if let Some(post) = &post {
            if !self.posts.contains_key(post) {
                return Err(AppError::NotFound("Post"));
            }
        }
        let message = Message {
            sender: sender.clone(),
            receiver: receiver.clone(),
            content,
            post,
            created_at: Utc::now(),
        };
        let id = self.store.gen_message_id();
        self.store.store_message(&id, &message)?;
        self.messages.insert(id.clone(), message);
        info!("{} messaged {}", sender.as_str(), receiver.as_str());
        Ok(id)
    }

    /// Messages exchanged between two users in either direction, oldest first.
    pub fn conversation(&self, a: &UserID, b: &UserID) -> Vec<(&MessageID, &Message)> {
        let mut messages: Vec<_> = self.messages.iter()
            .filter(|(_, m)| m.is_between(a, b))
            .collect();
        messages.sort_by_key(|(id, m)| (m.created_at, *id));
        messages
    }
}
