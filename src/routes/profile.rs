use std::sync::Mutex;

use actix_web::{get, patch, post, web::{Data, Json, Path, Query}, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use super::{lock, required, WithId};

use crate::{
    data::{ProfileUpdate, UserID},
    db::{ProfileView, DB},
    error::AppError,
};

#[derive(Deserialize)]
pub struct NewUser {
    username: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProfile {
    user_id: Option<String>,
    professions: Option<Vec<String>>,
    skills: Option<Vec<String>>,
    experiences: Option<Vec<String>>,
    about: Option<String>,
    profile_picture: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    user_id: Option<String>,
}

impl UserQuery {
    pub fn user_id(self) -> Result<UserID, AppError> {
        UserID::parse(&required(self.user_id, "userId")?)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInterests {
    user_id: Option<String>,
    interests: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Follow {
    follower_id: Option<String>,
    following_id: Option<String>,
}

#[post("/api/users")]
pub async fn create_user(db: Data<Mutex<DB>>, Json(input): Json<NewUser>) -> Result<HttpResponse, AppError> {
    let username = required(input.username, "username")?;
    let mut db = lock(&db)?;
    let id = db.create_account(&username)?;
    let account = db.get_account(&id).ok_or(AppError::NotFound("User"))?;
    Ok(HttpResponse::Created().json(json!({ "user": WithId { id: &id, doc: account } })))
}

#[post("/api/user-profile")]
pub async fn save_profile(db: Data<Mutex<DB>>, Json(input): Json<SaveProfile>) -> Result<HttpResponse, AppError> {
    let user_id = UserID::parse(&required(input.user_id, "userId")?)?;
    let update = ProfileUpdate {
        professions: input.professions,
        skills: input.skills,
        experiences: input.experiences,
        about: input.about,
        profile_picture: input.profile_picture,
    };
    let mut db = lock(&db)?;
    let profile = db.save_profile(&user_id, update)?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Profile saved successfully",
        "profile": ProfileView { user_id: &user_id, profile },
    })))
}

#[get("/api/user-profile")]
pub async fn get_profile(db: Data<Mutex<DB>>, Query(query): Query<UserQuery>) -> Result<HttpResponse, AppError> {
    let user_id = query.user_id()?;
    let db = lock(&db)?;
    let profile = db.get_profile(&user_id).ok_or(AppError::NotFound("User profile"))?;
    Ok(HttpResponse::Ok().json(json!({ "profile": ProfileView { user_id: &user_id, profile } })))
}

#[get("/api/profile-other/{user_id}")]
pub async fn get_other_profile(db: Data<Mutex<DB>>, user_id: Path<String>) -> Result<HttpResponse, AppError> {
    let user_id = UserID::parse(&user_id)?;
    let db = lock(&db)?;
    let profile = db.get_profile(&user_id).ok_or(AppError::NotFound("User profile"))?;
    let user = db.get_account(&user_id).map(|account| WithId { id: &user_id, doc: account });
    Ok(HttpResponse::Ok().json(json!({
        "userProfile": ProfileView { user_id: &user_id, profile },
        "user": user,
    })))
}

#[post("/api/update-interests")]
pub async fn update_interests(db: Data<Mutex<DB>>, Json(input): Json<UpdateInterests>) -> Result<HttpResponse, AppError> {
    let user_id = UserID::parse(&required(input.user_id, "userId")?)?;
    let interests = input.interests.ok_or_else(|| AppError::invalid("Missing required field: interests."))?;
    let mut db = lock(&db)?;
    let profile = db.update_interests(&user_id, interests)?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Interests updated successfully",
        "updatedProfile": ProfileView { user_id: &user_id, profile },
    })))
}

#[patch("/api/follow")]
pub async fn follow(db: Data<Mutex<DB>>, Json(input): Json<Follow>) -> Result<HttpResponse, AppError> {
    let follower = UserID::parse(&required(input.follower_id, "followerId")?)?;
    let followee = UserID::parse(&required(input.following_id, "followingId")?)?;
    lock(&db)?.follow(&follower, &followee)?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Followed successfully" })))
}

#[get("/api/users/following")]
pub async fn following(db: Data<Mutex<DB>>, Query(query): Query<UserQuery>) -> Result<HttpResponse, AppError> {
    let user_id = query.user_id()?;
    let followed = lock(&db)?.following_of(&user_id)?;
    Ok(HttpResponse::Ok().json(json!({ "following": followed })))
}
