use actix_web::{web, HttpResponse};

use error::AppError;
use routes::*;

pub mod config;
pub mod data;
pub mod db;
pub mod error;
pub mod mentor;
pub mod moderation;
pub mod rag;
pub mod routes;
pub mod similarity;

/// Registers every API route plus extractor error handlers that answer with
/// the JSON error body instead of actix's plain-text default.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .app_data(web::JsonConfig::default().error_handler(|err, _| {
            AppError::invalid(format!("Invalid request body: {err}")).into()
        }))
        .app_data(web::QueryConfig::default().error_handler(|err, _| {
            AppError::invalid(format!("Invalid query: {err}")).into()
        }))
        .app_data(web::PathConfig::default().error_handler(|err, _| {
            AppError::invalid(format!("Invalid path: {err}")).into()
        }))

        .service(recommendations)
        .service(moderate_text)
        .service(sentiment)
        .service(mentor_chat)

        .service(create_user)
        .service(save_profile)
        .service(get_profile)
        .service(get_other_profile)
        .service(update_interests)
        .service(follow)
        .service(following)
        .service(save_portfolio)
        .service(get_portfolio)

        // before `/api/posts/{id}`
        .service(following_posts)
        .service(create_post)
        .service(get_post)
        .service(like_post)
        .service(save_post)
        .service(comment_post)
        .service(post_status)

        .service(create_opportunity)
        .service(list_opportunities)
        .service(get_opportunity)

        .service(send_message)
        .service(conversation);
}

pub async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound("Route"))
}
