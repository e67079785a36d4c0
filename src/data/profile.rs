use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{PostID, UserID};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub username: String,
    pub profile_picture: String,
    pub interests: Vec<String>,
    pub followers: Vec<UserID>,
    pub following: Vec<UserID>,
    pub posts: Vec<PostID>,
    pub professions: Vec<String>,
    pub skills: Vec<String>,
    pub experiences: Vec<String>,
    pub about: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(username: String) -> Self {
        let now = Utc::now();
        Self {
            username,
            profile_picture: Default::default(),
            interests: vec![],
            followers: vec![],
            following: vec![],
            posts: vec![],
            professions: vec![],
            skills: vec![],
            experiences: vec![],
            about: Default::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Fields a profile save may change. `None` leaves the stored value untouched.
#[derive(Debug, Default)]
pub struct ProfileUpdate {
    pub professions: Option<Vec<String>>,
    pub skills: Option<Vec<String>>,
    pub experiences: Option<Vec<String>>,
    pub about: Option<String>,
    pub profile_picture: Option<String>,
}
