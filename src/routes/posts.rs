use std::{collections::HashSet, sync::Mutex};

use actix_web::{get, post, web::{Data, Json, Path, Query}, HttpResponse};
use ammonia::Builder;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::{lock, required, UserQuery, WithId};

use crate::{
    data::{NewPost, PostID, UserID},
    db::DB,
    error::AppError,
    moderation::Moderator,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePost {
    user_id: Option<String>,
    content: Option<String>,
    caption: Option<String>,
    titles: Option<Vec<String>>,
    media: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostAction {
    user_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComment {
    user_id: Option<String>,
    text: Option<String>,
}

#[derive(Deserialize)]
pub struct PostQuery {
    populate: Option<String>,
}

fn sanitize(text: &str) -> String {
    Builder::new()
        .tags(HashSet::from(["b", "i", "em", "strong", "q", "u", "br", "p", "a"]))
        .clean_content_tags(HashSet::from(["script", "style", "iframe"]))
        .clean(text)
        .to_string()
}

/// Rejects text the moderator flags, naming `what` in the error.
fn moderate(moderator: &Moderator, text: &str, what: &'static str) -> Result<(), AppError> {
    let result = moderator.moderate(text);
    if result.is_flagged {
        info!("{what} flagged by moderation: {:?}", result.reasons);
        return Err(AppError::Flagged { what, reasons: result.reasons });
    }
    Ok(())
}

fn acting_user(user_id: Option<String>) -> Result<UserID, AppError> {
    UserID::parse(&required(user_id, "userId")?)
}

#[get("/api/posts/following")]
pub async fn following_posts(db: Data<Mutex<DB>>, Query(query): Query<UserQuery>) -> Result<HttpResponse, AppError> {
    let user_id = query.user_id()?;
    let db = lock(&db)?;
    let posts = db.following_feed(&user_id)?;
    Ok(HttpResponse::Ok().json(json!({ "posts": posts })))
}

#[post("/api/posts")]
pub async fn create_post(
    db: Data<Mutex<DB>>,
    moderator: Data<Moderator>,
    Json(input): Json<CreatePost>,
) -> Result<HttpResponse, AppError> {
    let author = acting_user(input.user_id)?;
    let content = required(input.content, "content")?;
    moderate(&moderator, &content, "Content")?;

    let new = NewPost {
        content: sanitize(&content),
        caption: sanitize(input.caption.unwrap_or_default().trim()),
        titles: input.titles.unwrap_or_default(),
        media: input.media.unwrap_or_default(),
    };
    let mut db = lock(&db)?;
    let id = db.create_post(&author, new)?;
    let post = db.get_post(&id).ok_or(AppError::NotFound("Post"))?;
    Ok(HttpResponse::Created().json(json!({ "post": WithId { id: &id, doc: post } })))
}

#[get("/api/posts/{id}")]
pub async fn get_post(db: Data<Mutex<DB>>, id: Path<String>, Query(query): Query<PostQuery>) -> Result<HttpResponse, AppError> {
    let id = PostID::parse(&id)?;
    let db = lock(&db)?;
    let post = db.get_post(&id).ok_or(AppError::NotFound("Post"))?;

    if query.populate.as_deref() != Some("author") {
        return Ok(HttpResponse::Ok().json(WithId { id: &id, doc: post }));
    }
    let account = db.get_account(&post.author).ok_or(AppError::NotFound("Author"))?;
    let profile_picture = db.get_profile(&post.author)
        .map(|p| p.profile_picture.as_str())
        .unwrap_or_default();
    Ok(HttpResponse::Ok().json(json!({
        "id": id,
        "content": post.content,
        "media": post.media,
        "titles": post.titles,
        "author": {
            "username": account.username,
            "profilePicture": profile_picture,
        },
    })))
}

#[post("/api/posts/{id}/like")]
pub async fn like_post(db: Data<Mutex<DB>>, id: Path<String>, Json(input): Json<PostAction>) -> Result<HttpResponse, AppError> {
    let id = PostID::parse(&id)?;
    let user = acting_user(input.user_id)?;
    let (like_count, liked_by_me) = lock(&db)?.toggle_like(&id, &user)?;
    Ok(HttpResponse::Ok().json(json!({ "likeCount": like_count, "likedByMe": liked_by_me })))
}

#[post("/api/posts/{id}/save")]
pub async fn save_post(db: Data<Mutex<DB>>, id: Path<String>, Json(input): Json<PostAction>) -> Result<HttpResponse, AppError> {
    let id = PostID::parse(&id)?;
    let user = acting_user(input.user_id)?;
    let saved_by_me = lock(&db)?.toggle_save(&id, &user)?;
    Ok(HttpResponse::Ok().json(json!({ "savedByMe": saved_by_me })))
}

#[post("/api/posts/{id}/comment")]
pub async fn comment_post(
    db: Data<Mutex<DB>>,
    moderator: Data<Moderator>,
    id: Path<String>,
    Json(input): Json<CreateComment>,
) -> Result<HttpResponse, AppError> {
    let id = PostID::parse(&id)?;
    let author = acting_user(input.user_id)?;
    let text = required(input.text, "text")?;

    let mut db = lock(&db)?;
    if db.get_post(&id).is_none() {
        return Err(AppError::NotFound("Post"));
    }
    moderate(&moderator, &text, "Comment")?;
    let (comment, comment_count) = db.add_comment(&id, &author, sanitize(&text))?;
    Ok(HttpResponse::Created().json(json!({ "comment": comment, "commentCount": comment_count })))
}

#[get("/api/posts/{id}/status")]
pub async fn post_status(db: Data<Mutex<DB>>, id: Path<String>, Query(query): Query<UserQuery>) -> Result<HttpResponse, AppError> {
    let id = PostID::parse(&id)?;
    let user = query.user_id()?;
    let db = lock(&db)?;
    let post = db.get_post(&id).ok_or(AppError::NotFound("Post"))?;
    Ok(HttpResponse::Ok().json(json!({
        "likedByMe": post.is_liked_by(&user),
        "savedByMe": post.is_saved_by(&user),
    })))
}
