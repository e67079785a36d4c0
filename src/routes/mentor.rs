use actix_web::{post, web::{Data, Json}, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use super::required;

use crate::{
    error::AppError,
    mentor::{Mentor, CONTEXT_CHUNKS},
    rag::Corpus,
};

#[derive(Deserialize)]
pub struct MentorQuestion {
    message: Option<String>,
}

#[post("/api/mentor-chat")]
pub async fn mentor_chat(
    mentor: Data<Mentor>,
    corpus: Data<Corpus>,
    Json(input): Json<MentorQuestion>,
) -> Result<HttpResponse, AppError> {
    let message = required(input.message, "message")?;
    let context = corpus.relevant_chunks(&message, CONTEXT_CHUNKS);
    let reply = mentor.ask(&message, &context).await?;
    Ok(HttpResponse::Ok().json(json!({ "reply": reply })))
}
