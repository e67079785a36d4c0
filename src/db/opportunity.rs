use chrono::Utc;
use tracing::info;

use super::DB;

use crate::{
    data::{NewOpportunity, Opportunity, OpportunityID, UserID},
    error::AppError,
};

impl DB {
    pub fn create_opportunity(&mut self, created_by: &UserID, new: NewOpportunity) -> Result<(OpportunityID, &Opportunity), AppError> {
        let now = Utc::now();
        let opportunity = Opportunity {
            title: new.title,
            description: new.description,
            location: new.location,
            date: new.date,
            requirements: new.requirements,
            created_by: created_by.clone(),
            created_at: now,
            updated_at: now,
        };
        let id = self.store.gen_opportunity_id();
        self.store.store_opportunity(&id, &opportunity)?;
        info!("{} posted opportunity {}", created_by.as_str(), id.as_str());
        let opportunity = self.opportunities.entry(id.clone()).or_insert(opportunity);
        Ok((id, opportunity))
    }
}
