use std::sync::Mutex;

use actix_web::{get, web::{Data, Path}, HttpResponse};
use serde_json::json;

use super::lock;

use crate::{
    data::UserID,
    db::{recommend::RECOMMENDATION_LIMIT, DB},
    error::AppError,
};

#[get("/api/recommendations/{user_id}")]
pub async fn recommendations(db: Data<Mutex<DB>>, user_id: Path<String>) -> Result<HttpResponse, AppError> {
    let user_id = UserID::parse(&user_id)?;
    let db = lock(&db)?;
    let ranked = db.recommend(&user_id, RECOMMENDATION_LIMIT)?;
    Ok(HttpResponse::Ok().json(json!({ "recommendations": ranked })))
}
