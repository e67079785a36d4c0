use actix_web::{post, web::{Data, Json}, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::{error::AppError, moderation::Moderator};

#[derive(Deserialize)]
pub struct TextInput {
    text: Option<String>,
}

impl TextInput {
    /// Whitespace-only text is still text to score; only absence or `""` is rejected.
    fn text(self) -> Result<String, AppError> {
        self.text
            .filter(|text| !text.is_empty())
            .ok_or_else(|| AppError::invalid("Missing required field: text."))
    }
}

#[post("/api/moderation")]
pub async fn moderate_text(moderator: Data<Moderator>, Json(input): Json<TextInput>) -> Result<HttpResponse, AppError> {
    let text = input.text()?;
    Ok(HttpResponse::Ok().json(moderator.moderate(&text)))
}

#[post("/api/sentiment")]
pub async fn sentiment(moderator: Data<Moderator>, Json(input): Json<TextInput>) -> Result<HttpResponse, AppError> {
    let text = input.text()?;
    let analysis = moderator.sentiment().analyze(&text);
    Ok(HttpResponse::Ok().json(json!({
        "score": analysis.score,
        "comparative": analysis.comparative,
    })))
}
