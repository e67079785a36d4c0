use std::sync::Mutex;

use actix_web::{get, post, web::{Data, Json, Path}, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use super::{lock, required, WithId};

use crate::{
    data::{PostID, UserID},
    db::DB,
    error::AppError,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessage {
    from_user_id: Option<String>,
    to_user_id: Option<String>,
    post_id: Option<String>,
    text: Option<String>,
}

#[post("/api/chat/send")]
pub async fn send_message(db: Data<Mutex<DB>>, Json(input): Json<SendMessage>) -> Result<HttpResponse, AppError> {
    let from = UserID::parse(&required(input.from_user_id, "fromUserId")?)?;
    let to = UserID::parse(&required(input.to_user_id, "toUserId")?)?;
    let post = input.post_id.as_deref().map(PostID::parse).transpose()?;
    let text = input.text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());

    let id = lock(&db)?.send_message(&from, &to, text, post)?;
    Ok(HttpResponse::Created().json(json!({ "message": "Message sent", "messageId": id })))
}

#[get("/api/chat/{user_id}/{other_id}")]
pub async fn conversation(db: Data<Mutex<DB>>, path: Path<(String, String)>) -> Result<HttpResponse, AppError> {
    let (user_id, other_id) = path.into_inner();
    let user_id = UserID::parse(&user_id)?;
    let other_id = UserID::parse(&other_id)?;
    let db = lock(&db)?;
    let messages: Vec<_> = db.conversation(&user_id, &other_id)
        .into_iter()
        .map(|(id, doc)| WithId { id, doc })
        .collect();
    Ok(HttpResponse::Ok().json(json!({ "messages": messages })))
}
