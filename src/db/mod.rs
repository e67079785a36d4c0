use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::{
    data::{
        Account, Message, MessageID, Opportunity, OpportunityID, Portfolio, Post, PostID, Profile, UserID,
    },
    error::AppError,
};

pub mod feed;
pub mod follow;
pub mod message;
pub mod opportunity;
pub mod portfolio;
pub mod post;
pub mod profile;
pub mod recommend;
pub mod store;

use store::Store;

pub struct DB {
    store: Store,

    accounts: HashMap<UserID, Account>,
    profiles: HashMap<UserID, Profile>,
    posts: HashMap<PostID, Post>,
    opportunities: HashMap<OpportunityID, Opportunity>,
    messages: HashMap<MessageID, Message>,
    portfolios: HashMap<UserID, Portfolio>,

    /// Profile ids in creation order.
    profile_order: Vec<UserID>,
}

/// A profile together with the id it is stored under.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView<'a> {
    pub user_id: &'a UserID,
    #[serde(flatten)]
    pub profile: &'a Profile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserID,
    pub username: String,
    pub profile_picture: String,
}

impl DB {
    pub fn load(store: Store) -> Self {
        let mut l = Self {
            store,
            accounts: HashMap::new(),
            profiles: HashMap::new(),
            posts: HashMap::new(),
            opportunities: HashMap::new(),
            messages: HashMap::new(),
            portfolios: HashMap::new(),
            profile_order: vec![],
        };
        l.reload();
        l
    }

    pub fn reload(&mut self) {
        self.accounts = self.store.load_accounts();
        self.profiles = self.store.load_profiles();
        self.posts = self.store.load_posts();
        self.opportunities = self.store.load_opportunities();
        self.messages = self.store.load_messages();
        self.portfolios = self.store.load_portfolios();

        let mut order: Vec<_> = self.profiles.iter()
            .map(|(id, p)| (p.created_at, id.clone()))
            .collect();
        order.sort();
        self.profile_order = order.into_iter().map(|(_, id)| id).collect();

        info!(
            "Loaded {} accounts, {} profiles, {} posts, {} opportunities, {} messages, {} portfolios",
            self.accounts.len(),
            self.profiles.len(),
            self.posts.len(),
            self.opportunities.len(),
            self.messages.len(),
            self.portfolios.len(),
        );
    }

    pub fn get_account(&self, id: &UserID) -> Option<&Account> {
        self.accounts.get(id)
    }

    pub fn get_profile(&self, id: &UserID) -> Option<&Profile> {
        self.profiles.get(id)
    }

    pub fn get_post(&self, id: &PostID) -> Option<&Post> {
        self.posts.get(id)
    }

    pub fn get_opportunity(&self, id: &OpportunityID) -> Option<&Opportunity> {
        self.opportunities.get(id)
    }

    pub fn get_portfolio(&self, user_id: &UserID) -> Option<&Portfolio> {
        self.portfolios.get(user_id)
    }

    /// All profiles, oldest first.
    pub fn profiles_in_load_order(&self) -> Vec<(&UserID, &Profile)> {
        self.profile_order.iter()
            .filter_map(|id| self.profiles.get_key_value(id))
            .collect()
    }

    /// Username comes from the account, then the profile, then `"Unknown"`.
    pub fn user_summary(&self, id: &UserID) -> UserSummary {
        let profile = self.profiles.get(id);
        let username = self.accounts.get(id)
            .map(|a| a.username.clone())
            .or_else(|| profile.map(|p| p.username.clone()))
            .unwrap_or_else(|| "Unknown".to_string());
        UserSummary {
            id: id.clone(),
            username,
            profile_picture: profile.map(|p| p.profile_picture.clone()).unwrap_or_default(),
        }
    }
}

impl DB {
    pub fn create_account(&mut self, username: &str) -> Result<UserID, AppError> {
        if !crate::data::is_valid_id(username) {
            return Err(AppError::invalid(
                "Invalid user name. Only alphanumeric characters, '_' & '-' are allowed",
            ));
        }
        if self.accounts.values().any(|a| a.username == username) {
            return Err(AppError::invalid("User with such name already exists"));
        }
        let id = self.store.gen_user_id();
        let account = Account { username: username.to_string(), created_at: Utc::now() };
        self.store.store_account(&id, &account)?;
        self.accounts.insert(id.clone(), account);
        info!("Created account {} for {username}", id.as_str());
        Ok(id)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use tempfile::TempDir;

    use super::*;

    pub(crate) fn temp_db() -> (TempDir, DB) {
        let dir = tempfile::tempdir().unwrap();
        let db = DB::load(Store::open(dir.path()));
        (dir, db)
    }

    pub(crate) fn member(db: &mut DB, name: &str, interests: &[&str]) -> UserID {
        let id = db.create_account(name).unwrap();
        db.save_profile(&id, Default::default()).unwrap();
        db.update_interests(&id, interests.iter().map(|s| s.to_string()).collect()).unwrap();
        id
    }

    #[test]
    fn accounts_persist_across_reload() {
        let (dir, mut db) = temp_db();
        let id = db.create_account("maya").unwrap();
        let reloaded = DB::load(Store::open(dir.path()));
        assert_eq!(reloaded.get_account(&id).unwrap().username, "maya");
    }

    #[test]
    fn duplicate_and_invalid_usernames_are_rejected() {
        let (_dir, mut db) = temp_db();
        db.create_account("maya").unwrap();
        assert!(matches!(db.create_account("maya"), Err(AppError::InvalidInput(_))));
        assert!(matches!(db.create_account("no spaces"), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn profiles_keep_creation_order() {
        let (_dir, mut db) = temp_db();
        let ids: Vec<_> = ["a", "b", "c"].iter().map(|n| member(&mut db, n, &[])).collect();
        let order: Vec<_> = db.profiles_in_load_order().into_iter().map(|(id, _)| id.clone()).collect();
        assert_eq!(order, ids);
    }

    #[test]
    fn summary_falls_back_to_unknown() {
        let (_dir, db) = temp_db();
        let summary = db.user_summary(&UserID("ghost".to_string()));
        assert_eq!(summary.username, "Unknown");
        assert_eq!(summary.profile_picture, "");
    }
}
