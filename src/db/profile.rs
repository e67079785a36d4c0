use chrono::Utc;
use tracing::info;

use super::DB;

use crate::{data::{Profile, ProfileUpdate, UserID}, error::AppError};

impl DB {
    /// Applies `change` to a copy of the profile, bumps `updatedAt` and keeps
    /// the copy only once it is on disk.
    pub(super) fn update_profile<R>(&mut self, id: &UserID, change: impl FnOnce(&mut Profile) -> R) -> Result<R, AppError> {
        let mut profile = self.profiles.get(id).ok_or(AppError::NotFound("User profile"))?.clone();
        let result = change(&mut profile);
        profile.updated_at = Utc::now();
        self.store.store_profile(id, &profile)?;
        self.profiles.insert(id.clone(), profile);
        Ok(result)
    }

    /// Creates the profile on first save, otherwise applies only the supplied
    /// fields.
    pub fn save_profile(&mut self, user_id: &UserID, update: ProfileUpdate) -> Result<&Profile, AppError> {
        let mut profile = match self.profiles.get(user_id) {
            Some(profile) => profile.clone(),
            None => {
                let account = self.accounts.get(user_id).ok_or(AppError::NotFound("User"))?;
                Profile::new(account.username.clone())
            }
        };
        if let Some(professions) = update.professions {
            profile.professions = professions;
        }
        if let Some(skills) = update.skills {
            profile.skills = skills;
        }
        if let Some(experiences) = update.experiences {
            profile.experiences = experiences;
        }
        if let Some(about) = update.about {
            profile.about = about;
        }
        if let Some(picture) = update.profile_picture {
            profile.profile_picture = picture;
        }
        profile.updated_at = Utc::now();
        self.store.store_profile(user_id, &profile)?;

        if self.profiles.insert(user_id.clone(), profile).is_none() {
            self.profile_order.push(user_id.clone());
            info!("Created profile for {}", user_id.as_str());
        }
        self.profiles.get(user_id).ok_or(AppError::NotFound("User profile"))
    }

    /// Adds trimmed tags not already present, keeping existing order. Blank
    /// tags are dropped.
    pub fn update_interests(&mut self, user_id: &UserID, interests: Vec<String>) -> Result<&Profile, AppError> {
        self.update_profile(user_id, |profile| {
            for interest in &interests {
                let interest = interest.trim();
                if !interest.is_empty() && !profile.interests.iter().any(|x| x == interest) {
                    profile.interests.push(interest.to_string());
                }
            }
        })?;
        self.profiles.get(user_id).ok_or(AppError::NotFound("User profile"))
    }
}
