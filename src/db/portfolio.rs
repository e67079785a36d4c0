use chrono::Utc;
use tracing::info;

use super::DB;

use crate::{
    data::{Portfolio, PortfolioElement, UserID},
    error::AppError,
};

impl DB {
    /// Replaces the user's portfolio elements, creating the portfolio on first
    /// save.
    pub fn save_portfolio(&mut self, user_id: &UserID, elements: Vec<PortfolioElement>) -> Result<&Portfolio, AppError> {
        if !self.accounts.contains_key(user_id) {
            return Err(AppError::NotFound("User"));
        }
        let now = Utc::now();
        let portfolio = Portfolio {
            elements,
            created_at: self.portfolios.get(user_id).map_or(now, |p| p.created_at),
            updated_at: now,
        };
        self.store.store_portfolio(user_id, &portfolio)?;
        info!("Saved portfolio of {} with {} elements", user_id.as_str(), portfolio.elements.len());
        self.portfolios.insert(user_id.clone(), portfolio);
        self.portfolios.get(user_id).ok_or(AppError::NotFound("Portfolio"))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        data::ElementKind,
        db::{store::Store, tests::temp_db},
    };

    use super::*;

    fn element(id: &str, kind: ElementKind, content: &str) -> PortfolioElement {
        PortfolioElement {
            id: id.to_string(),
            kind,
            content: content.to_string(),
            x: 50.0,
            y: 80.5,
            width: 200.0,
            height: 120.0,
        }
    }

    #[test]
    fn second_save_replaces_elements_and_keeps_creation_time() {
        let (_dir, mut db) = temp_db();
        let id = db.create_account("maya").unwrap();
        let first = db.save_portfolio(&id, vec![element("1", ElementKind::Image, "/headshot.jpg")]).unwrap().clone();

        let saved = db.save_portfolio(&id, vec![
            element("2", ElementKind::Text, "Stage and screen"),
            element("3", ElementKind::Image, "/reel.jpg"),
        ]).unwrap();
        assert_eq!(saved.elements.len(), 2);
        assert_eq!(saved.elements[0].content, "Stage and screen");
        assert_eq!(saved.created_at, first.created_at);
        assert!(saved.updated_at >= first.updated_at);
    }

    #[test]
    fn portfolio_needs_an_account() {
        let (_dir, mut db) = temp_db();
        let err = db.save_portfolio(&UserID("ghost".into()), vec![]).unwrap_err();
        assert!(matches!(err, AppError::NotFound("User")));
        assert!(db.get_portfolio(&UserID("ghost".into())).is_none());
    }

    #[test]
    fn portfolio_survives_reload() {
        let (dir, mut db) = temp_db();
        let id = db.create_account("maya").unwrap();
        let stored = vec![element("1", ElementKind::Text, "Caption"), element("2", ElementKind::Image, "data:image/png;base64,AAAA")];
        db.save_portfolio(&id, stored.clone()).unwrap();

        let reloaded = DB::load(Store::open(dir.path()));
        assert_eq!(reloaded.get_portfolio(&id).unwrap().elements, stored);
    }

    #[test]
    fn empty_layout_is_a_valid_portfolio() {
        let (_dir, mut db) = temp_db();
        let id = db.create_account("maya").unwrap();
        assert!(db.save_portfolio(&id, vec![]).unwrap().elements.is_empty());
    }
}
