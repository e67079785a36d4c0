use chrono::Utc;
use tracing::info;

use super::DB;

use crate::{
    data::{Comment, NewPost, Post, PostID, UserID},
    error::AppError,
};

/// Adds `user` if absent, removes it otherwise. Returns whether it is now present.
fn toggle(list: &mut Vec<UserID>, user: &UserID) -> bool {
    match list.iter().position(|x| x == user) {
        Some(i) => {
            list.remove(i);
            false
        }
        None => {
            list.push(user.clone());
            true
        }
    }
}

impl DB {
    /// Applies `change` to a copy of the post and keeps it only once it is on disk.
    pub(super) fn update_post<R>(&mut self, id: &PostID, change: impl FnOnce(&mut Post) -> R) -> Result<R, AppError> {
        let mut post = self.posts.get(id).ok_or(AppError::NotFound("Post"))?.clone();
        let result = change(&mut post);
        self.store.store_post(id, &post)?;
        self.posts.insert(id.clone(), post);
        Ok(result)
    }

    pub fn create_post(&mut self, author: &UserID, new: NewPost) -> Result<PostID, AppError> {
        if !self.accounts.contains_key(author) {
            return Err(AppError::NotFound("User"));
        }
        let now = Utc::now();
        let post = Post {
            author: author.clone(),
            content: new.content,
            caption: new.caption,
            titles: new.titles,
            media: new.media,
            likes: vec![],
            saved_by: vec![],
            comments: vec![],
            created_at: now,
            updated_at: now,
        };
        let id = self.store.gen_post_id();
        self.store.store_post(&id, &post)?;
        self.posts.insert(id.clone(), post);

        if self.profiles.contains_key(author) {
            self.update_profile(author, |profile| profile.posts.push(id.clone()))?;
        }
        info!("{} created post {}", author.as_str(), id.as_str());
        Ok(id)
    }

    /// Returns the new like count and whether `user` now likes the post.
    pub fn toggle_like(&mut self, post_id: &PostID, user: &UserID) -> Result<(usize, bool), AppError> {
        self.update_post(post_id, |post| {
            let liked = toggle(&mut post.likes, user);
            (post.likes.len(), liked)
        })
    }

    /// Returns whether `user` now has the post saved.
    pub fn toggle_save(&mut self, post_id: &PostID, user: &UserID) -> Result<bool, AppError> {
        self.update_post(post_id, |post| toggle(&mut post.saved_by, user))
    }

    /// Returns the stored comment and the post's new comment count.
    pub fn add_comment(&mut self, post_id: &PostID, author: &UserID, text: String) -> Result<(Comment, usize), AppError> {
        let comment = Comment {
            id: self.store.gen_comment_id(),
            author: author.clone(),
            text,
            created_at: Utc::now(),
        };
        let count = self.update_post(post_id, |post| {
            post.comments.push(comment.clone());
            post.comments.len()
        })?;
        Ok((comment, count))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::db::{store::{Store, POSTS_PATH}, tests::{member, temp_db}};

    use super::*;

    fn new_post(content: &str) -> NewPost {
        NewPost {
            content: content.to_string(),
            caption: String::new(),
            titles: vec![],
            media: vec![],
        }
    }

    #[test]
    fn create_links_post_to_profile() {
        let (_dir, mut db) = temp_db();
        let a = member(&mut db, "a", &[]);
        let id = db.create_post(&a, new_post("First reel")).unwrap();
        assert_eq!(db.get_post(&id).unwrap().content, "First reel");
        assert_eq!(db.get_profile(&a).unwrap().posts, [id]);
    }

    #[test]
    fn create_needs_an_account() {
        let (_dir, mut db) = temp_db();
        let err = db.create_post(&UserID("ghost".into()), new_post("x")).unwrap_err();
        assert!(matches!(err, AppError::NotFound("User")));
    }

    #[test]
    fn like_and_save_toggle() {
        let (_dir, mut db) = temp_db();
        let a = member(&mut db, "a", &[]);
        let b = member(&mut db, "b", &[]);
        let id = db.create_post(&a, new_post("x")).unwrap();

        assert_eq!(db.toggle_like(&id, &b).unwrap(), (1, true));
        assert_eq!(db.toggle_like(&id, &a).unwrap(), (2, true));
        assert_eq!(db.toggle_like(&id, &b).unwrap(), (1, false));

        assert!(db.toggle_save(&id, &b).unwrap());
        assert!(!db.toggle_save(&id, &b).unwrap());
        assert!(matches!(db.toggle_like(&PostID("nope".into()), &a), Err(AppError::NotFound("Post"))));
    }

    #[test]
    fn comments_persist() {
        let (dir, mut db) = temp_db();
        let a = member(&mut db, "a", &[]);
        let id = db.create_post(&a, new_post("x")).unwrap();
        let (comment, count) = db.add_comment(&id, &a, "Nice framing".to_string()).unwrap();
        assert_eq!(count, 1);

        let reloaded = DB::load(Store::open(dir.path()));
        let stored = &reloaded.get_post(&id).unwrap().comments[0];
        assert_eq!(stored.id, comment.id);
        assert_eq!(stored.text, "Nice framing");
    }

    #[test]
    fn failed_writes_leave_the_post_untouched() {
        let (dir, mut db) = temp_db();
        let a = member(&mut db, "a", &[]);
        let id = db.create_post(&a, new_post("x")).unwrap();

        let posts = dir.path().join(POSTS_PATH);
        fs::remove_dir_all(&posts).unwrap();
        fs::write(&posts, "not a directory").unwrap();

        assert!(matches!(db.toggle_like(&id, &a), Err(AppError::Internal(_))));
        assert!(db.add_comment(&id, &a, "hi".to_string()).is_err());
        assert!(db.toggle_save(&id, &a).is_err());
        let post = db.get_post(&id).unwrap();
        assert!(post.likes.is_empty());
        assert!(post.comments.is_empty());
        assert!(post.saved_by.is_empty());
    }
}
