use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{UserSummary, DB};

use crate::{
    data::{CommentID, Opportunity, OpportunityID, PostID, UserID},
    error::AppError,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPost<'a> {
    pub id: &'a PostID,
    pub titles: &'a [String],
    pub content: &'a str,
    pub caption: &'a str,
    pub media: &'a [String],
    pub author: UserSummary,
    pub like_count: usize,
    pub comment_count: usize,
    pub liked_by_me: bool,
    pub saved_by_me: bool,
    pub comments: Vec<FeedComment<'a>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedComment<'a> {
    pub id: &'a CommentID,
    pub text: &'a str,
    pub created_at: DateTime<Utc>,
    pub author: UserSummary,
}

impl DB {
    /// Posts by everyone `user_id` follows, newest first.
    pub fn following_feed(&self, user_id: &UserID) -> Result<Vec<FeedPost<'_>>, AppError> {
        let profile = self.profiles.get(user_id).ok_or(AppError::NotFound("User"))?;
        let mut posts: Vec<_> = self.posts.iter()
            .filter(|(_, p)| profile.following.contains(&p.author))
            .collect();
        posts.sort_by_key(|(id, p)| (Reverse(p.created_at), *id));

        Ok(posts.into_iter().map(|(id, post)| FeedPost {
            id,
            titles: &post.titles,
            content: &post.content,
            caption: &post.caption,
            media: &post.media,
            author: self.user_summary(&post.author),
            like_count: post.likes.len(),
            comment_count: post.comments.len(),
            liked_by_me: post.is_liked_by(user_id),
            saved_by_me: post.is_saved_by(user_id),
            comments: post.comments.iter().map(|c| FeedComment {
                id: &c.id,
                text: &c.text,
                created_at: c.created_at,
                author: self.user_summary(&c.author),
            }).collect(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }).collect())
    }

    /// All opportunities, newest first.
    pub fn sorted_opportunities(&self) -> Vec<(&OpportunityID, &Opportunity)> {
        let mut opportunities: Vec<_> = self.opportunities.iter().collect();
        opportunities.sort_by_key(|(id, o)| (Reverse(o.created_at), *id));
        opportunities
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        data::NewPost,
        db::tests::{member, temp_db},
    };

    use super::*;

    fn post(db: &mut DB, author: &UserID, content: &str) -> PostID {
        db.create_post(author, NewPost {
            content: content.to_string(),
            caption: String::new(),
            titles: vec![],
            media: vec![],
        }).unwrap()
    }

    #[test]
    fn feed_only_contains_followed_authors_newest_first() {
        let (_dir, mut db) = temp_db();
        let me = member(&mut db, "me", &[]);
        let friend = member(&mut db, "friend", &[]);
        let stranger = member(&mut db, "stranger", &[]);
        db.follow(&me, &friend).unwrap();

        let older = post(&mut db, &friend, "older");
        std::thread::sleep(std::time::Duration::from_millis(5));
        let newer = post(&mut db, &friend, "newer");
        post(&mut db, &stranger, "not followed");
        db.toggle_like(&newer, &me).unwrap();

        let feed = db.following_feed(&me).unwrap();
        let ids: Vec<_> = feed.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, [newer, older]);
        assert!(feed[0].liked_by_me);
        assert_eq!(feed[0].like_count, 1);
        assert!(!feed[1].liked_by_me);
        assert_eq!(feed[0].author.username, "friend");
    }

    #[test]
    fn feed_is_empty_when_following_nobody() {
        let (_dir, mut db) = temp_db();
        let me = member(&mut db, "me", &[]);
        assert!(db.following_feed(&me).unwrap().is_empty());
        assert!(matches!(db.following_feed(&UserID("ghost".into())), Err(AppError::NotFound(_))));
    }

    #[test]
    fn feed_comments_name_their_authors() {
        let (_dir, mut db) = temp_db();
        let me = member(&mut db, "me", &[]);
        let friend = member(&mut db, "friend", &[]);
        db.follow(&me, &friend).unwrap();
        let id = post(&mut db, &friend, "x");
        db.add_comment(&id, &me, "love it".into()).unwrap();
        let feed = db.following_feed(&me).unwrap();
        assert_eq!(feed[0].comment_count, 1);
        assert_eq!(feed[0].comments[0].author.username, "me");
    }
}
