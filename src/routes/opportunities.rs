use std::sync::Mutex;

use actix_web::{get, post, web::{Data, Json, Path}, HttpResponse};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use serde_json::json;

use super::{lock, required, WithId};

use crate::{
    data::{NewOpportunity, OpportunityID, UserID},
    db::DB,
    error::AppError,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOpportunity {
    user_id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    location: Option<String>,
    date: Option<String>,
    requirements: Option<String>,
}

/// Accepts an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
fn parse_date(date: &str) -> Result<DateTime<Utc>, AppError> {
    if let Ok(date) = DateTime::parse_from_rfc3339(date) {
        return Ok(date.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| Utc.from_utc_datetime(&d))
        .ok_or_else(|| AppError::invalid("Invalid date. Use RFC 3339 or YYYY-MM-DD."))
}

#[post("/api/opportunities")]
pub async fn create_opportunity(db: Data<Mutex<DB>>, Json(input): Json<CreateOpportunity>) -> Result<HttpResponse, AppError> {
    let created_by = UserID::parse(&required(input.user_id, "userId")?)?;
    let new = NewOpportunity {
        title: required(input.title, "title")?,
        description: required(input.description, "description")?,
        location: required(input.location, "location")?,
        date: parse_date(&required(input.date, "date")?)?,
        requirements: input.requirements.map(|r| r.trim().to_string()).unwrap_or_default(),
    };
    let mut db = lock(&db)?;
    let (id, opportunity) = db.create_opportunity(&created_by, new)?;
    Ok(HttpResponse::Created().json(json!({ "opportunity": WithId { id: &id, doc: opportunity } })))
}

#[get("/api/opportunities")]
pub async fn list_opportunities(db: Data<Mutex<DB>>) -> Result<HttpResponse, AppError> {
    let db = lock(&db)?;
    let opportunities: Vec<_> = db.sorted_opportunities()
        .into_iter()
        .map(|(id, doc)| WithId { id, doc })
        .collect();
    Ok(HttpResponse::Ok().json(json!({ "opportunities": opportunities })))
}

#[get("/api/opportunities/{id}")]
pub async fn get_opportunity(db: Data<Mutex<DB>>, id: Path<String>) -> Result<HttpResponse, AppError> {
    let id = OpportunityID::parse(&id)?;
    let db = lock(&db)?;
    let opportunity = db.get_opportunity(&id).ok_or(AppError::NotFound("Opportunity"))?;
    Ok(HttpResponse::Ok().json(json!({ "opportunity": WithId { id: &id, doc: opportunity } })))
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn accepts_rfc3339_and_plain_dates() {
        let full = parse_date("2025-03-01T18:30:00+02:00").unwrap();
        assert_eq!((full.day(), full.hour()), (1, 16));
        let plain = parse_date("2025-03-01").unwrap();
        assert_eq!((plain.month(), plain.day(), plain.hour()), (3, 1, 0));
        assert!(parse_date("next friday").is_err());
    }
}
