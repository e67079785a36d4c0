use std::sync::{Mutex, MutexGuard};

use serde::Serialize;

use crate::{db::DB, error::AppError};

mod chat;
mod mentor;
mod moderation;
mod opportunities;
mod portfolio;
mod posts;
mod profile;
mod recommend;

pub use chat::*;
pub use mentor::*;
pub use moderation::*;
pub use opportunities::*;
pub use portfolio::*;
pub use posts::*;
pub use profile::*;
pub use recommend::*;

/// A stored document serialized with its id alongside its fields.
#[derive(Serialize)]
pub struct WithId<'a, K, T> {
    pub id: &'a K,
    #[serde(flatten)]
    pub doc: &'a T,
}

pub(crate) fn lock(db: &Mutex<DB>) -> Result<MutexGuard<'_, DB>, AppError> {
    db.lock().map_err(|_| AppError::Internal("Database lock poisoned.".to_string()))
}

/// Trimmed, non-empty value of a required field.
pub(crate) fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::InvalidInput(format!("Missing required field: {field}.")))
}
