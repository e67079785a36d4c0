use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Image,
    Text,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Text => "text",
        }
    }

    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "image" => Some(Self::Image),
            "text" => Some(Self::Text),
            _ => None,
        }
    }
}

/// One positioned box on the portfolio canvas. `content` is an image URL
/// (possibly a data URL) or the text itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioElement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// At most one per user, stored under the user's id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub elements: Vec<PortfolioElement>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
