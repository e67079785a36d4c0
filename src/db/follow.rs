use tracing::info;

use super::{UserSummary, DB};

use crate::{data::UserID, error::AppError};

impl DB {
    pub fn follow(&mut self, follower_id: &UserID, following_id: &UserID) -> Result<(), AppError> {
        if follower_id == following_id {
            return Err(AppError::invalid("Users cannot follow themselves."));
        }
        if !self.profiles.contains_key(following_id) {
            return Err(AppError::NotFound("User profile"));
        }

        let already_following = self.profiles.get(follower_id)
            .ok_or(AppError::NotFound("User profile"))?
            .following.contains(following_id);
        if !already_following {
            self.update_profile(follower_id, |follower| follower.following.push(following_id.clone()))?;
        }

        let already_followed = self.profiles.get(following_id)
            .is_some_and(|followed| followed.followers.contains(follower_id));
        if !already_followed {
            self.update_profile(following_id, |followed| followed.followers.push(follower_id.clone()))?;
        }

        info!("{} follows {}", follower_id.as_str(), following_id.as_str());
        Ok(())
    }

    /// Users followed by `user_id`, in follow order. Ids without a profile are
    /// skipped.
    pub fn following_of(&self, user_id: &UserID) -> Result<Vec<UserSummary>, AppError> {
        let profile = self.profiles.get(user_id).ok_or(AppError::NotFound("User profile"))?;
        Ok(profile.following.iter()
            .filter(|id| self.profiles.contains_key(*id))
            .map(|id| self.user_summary(id))
            .collect())
    }
}
