//! Plan CRUD and check-in endpoints.

use reqwest::Method;
use tracing::info;

use crate::client::ApiClient;
use crate::error::Result;
use crate::model::{NewPlan, NewRecord, Plan, PlanRecord, PlanUpdate};

impl ApiClient {
    /// Lists a user's plans with their records.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_plans(&self, user_id: i64) -> Result<Vec<Plan>> {
        let builder = self
            .request(Method::GET, "api/plans")?
            .query(&[("userId", user_id)]);
        Ok(self.execute_optional(builder).await?.unwrap_or_default())
    }

    /// Fetches one plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the plan does not exist.
    pub async fn get_plan(&self, id: i64) -> Result<Plan> {
        let builder = self.request(Method::GET, &format!("api/plans/{id}"))?;
        self.execute(builder, "plan").await
    }

    /// Creates a plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create_plan(&self, plan: &NewPlan) -> Result<Plan> {
        let builder = self.request(Method::POST, "api/plans")?.json(plan);
        let created: Plan = self.execute(builder, "plan").await?;
        info!("Created plan {} ({})", created.id, created.cycle);
        Ok(created)
    }

    /// Edits a plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update_plan(&self, id: i64, update: &PlanUpdate) -> Result<()> {
        let builder = self
            .request(Method::PUT, &format!("api/plans/{id}"))?
            .json(update);
        self.execute_unit(builder).await
    }

    /// Deletes a plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_plan(&self, id: i64) -> Result<()> {
        let builder = self.request(Method::DELETE, &format!("api/plans/{id}"))?;
        self.execute_unit(builder).await
    }

    /// Checks in once against a plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn check_in(&self, plan_id: i64, user_id: i64) -> Result<PlanRecord> {
        let body = NewRecord { plan_id, user_id };
        let builder = self
            .request(Method::POST, &format!("api/plans/{plan_id}/records"))?
            .json(&body);
        self.execute(builder, "plan record").await
    }
}
