use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

mod account;
mod message;
mod moderation;
mod opportunity;
mod portfolio;
mod post;
mod profile;

pub use account::*;
pub use message::*;
pub use moderation::*;
pub use opportunity::*;
pub use portfolio::*;
pub use post::*;
pub use profile::*;

lazy_static! {
    static ref ID_PATTERN: Regex = Regex::new("^[a-zA-Z0-9_-]{1,64}$").unwrap();
}

pub fn is_valid_id(id: &str) -> bool {
    ID_PATTERN.is_match(id)
}

macro_rules! id_type {
    ($name:ident, $what:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn parse(id: &str) -> Result<Self, AppError> {
                if is_valid_id(id) {
                    Ok(Self(id.to_string()))
                } else {
                    Err(AppError::InvalidInput(format!("Invalid {} ID.", $what)))
                }
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }
    };
}

id_type!(UserID, "user");
id_type!(PostID, "post");
id_type!(CommentID, "comment");
id_type!(OpportunityID, "opportunity");
id_type!(MessageID, "message");
