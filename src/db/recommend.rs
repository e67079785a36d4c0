use serde::Serialize;
use tracing::info;

use super::{ProfileView, DB};

use crate::{data::UserID, error::AppError, similarity::rank_by_interest};

pub const RECOMMENDATION_LIMIT: usize = 5;

#[derive(Debug, Serialize)]
pub struct Recommendation<'a> {
    pub profile: ProfileView<'a>,
    pub similarity: f64,
    pub username: Option<&'a str>,
}

impl DB {
    pub fn recommend(&self, user_id: &UserID, limit: usize) -> Result<Vec<Recommendation<'_>>, AppError> {
        let profiles = self.profiles_in_load_order();
        let candidates: Vec<_> = profiles.iter()
            .map(|(id, p)| (*id, Some(p.interests.as_slice())))
            .collect();

        let ranked = rank_by_interest(&user_id, &candidates, limit)
            .ok_or(AppError::NotFound("Target user"))?;
        info!("Ranked {} candidates for {}", candidates.len().saturating_sub(1), user_id.as_str());

        Ok(ranked.into_iter()
            .filter_map(|r| {
                let (id, profile) = self.profiles.get_key_value(r.key)?;
                Some(Recommendation {
                    profile: ProfileView { user_id: id, profile },
                    similarity: r.similarity,
                    username: self.accounts.get(id).map(|a| a.username.as_str()),
                })
            })
            .collect())
    }
}
