use std::sync::Mutex;

use actix_web::{get, post, web::{Data, Json, Query}, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{lock, required, UserQuery};

use crate::{
    data::{Portfolio, PortfolioElement, UserID},
    db::DB,
    error::AppError,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePortfolio {
    user_id: Option<String>,
    elements: Option<Vec<PortfolioElement>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PortfolioView<'a> {
    user_id: &'a UserID,
    #[serde(flatten)]
    portfolio: &'a Portfolio,
}

#[post("/api/savePortfolio")]
pub async fn save_portfolio(db: Data<Mutex<DB>>, Json(input): Json<SavePortfolio>) -> Result<HttpResponse, AppError> {
    let user_id = UserID::parse(&required(input.user_id, "userId")?)?;
    let elements = input.elements.ok_or_else(|| AppError::invalid("Missing required field: elements."))?;
    let mut db = lock(&db)?;
    let portfolio = db.save_portfolio(&user_id, elements)?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Portfolio saved successfully",
        "portfolio": PortfolioView { user_id: &user_id, portfolio },
    })))
}

#[get("/api/portfolio")]
pub async fn get_portfolio(db: Data<Mutex<DB>>, Query(query): Query<UserQuery>) -> Result<HttpResponse, AppError> {
    let user_id = query.user_id()?;
    let db = lock(&db)?;
    let portfolio = db.get_portfolio(&user_id).ok_or(AppError::NotFound("Portfolio"))?;
    Ok(HttpResponse::Ok().json(json!({ "portfolio": PortfolioView { user_id: &user_id, portfolio } })))
}
