//! Diary and recycle-bin endpoints.

use reqwest::Method;

use crate::client::ApiClient;
use crate::error::Result;
use crate::model::{
    DeletedDiary, DiaryDetail, DiaryGenerateRequest, DiaryQuery, DiaryUpdate, HistoryEntry,
};

impl ApiClient {
    /// Generates and saves a diary from a conversation, streaming its text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server aborts the stream.
    pub async fn generate_diary(
        &self,
        user_id: i64,
        conversation: &[HistoryEntry],
        on_token: impl FnMut(&str),
    ) -> Result<String> {
        let body = DiaryGenerateRequest {
            user_id,
            conversation,
        };
        let builder = self.request(Method::POST, "api/diary/save")?.json(&body);
        self.execute_stream(builder, on_token).await
    }

    /// Lists diaries matching the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_diaries(&self, query: &DiaryQuery) -> Result<Vec<DiaryDetail>> {
        let builder = self.request(Method::POST, "api/diaries")?.json(query);
        Ok(self.execute_optional(builder).await?.unwrap_or_default())
    }

    /// Fetches one diary.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the diary does not exist.
    pub async fn get_diary(&self, id: i64) -> Result<DiaryDetail> {
        let builder = self.request(Method::GET, &format!("api/diaries/{id}"))?;
        self.execute(builder, "diary").await
    }

    /// Edits a diary in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update_diary(&self, id: i64, update: &DiaryUpdate) -> Result<()> {
        let builder = self
            .request(Method::PUT, &format!("api/diaries/{id}"))?
            .json(update);
        self.execute_unit(builder).await
    }

    /// Moves a diary to the recycle bin.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_diary(&self, id: i64) -> Result<()> {
        let builder = self.request(Method::DELETE, &format!("api/diaries/{id}"))?;
        self.execute_unit(builder).await
    }

    /// Lists the recycle bin.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_recycled_diaries(&self, user_id: i64) -> Result<Vec<DeletedDiary>> {
        let builder = self
            .request(Method::GET, "api/diaries/recycle")?
            .query(&[("userId", user_id)]);
        Ok(self.execute_optional(builder).await?.unwrap_or_default())
    }

    /// Restores a diary from the recycle bin.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn restore_diary(&self, id: i64) -> Result<()> {
        let builder = self.request(Method::POST, &format!("api/diaries/{id}/restore"))?;
        self.execute_unit(builder).await
    }

    /// Deletes a recycled diary for good.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn purge_diary(&self, id: i64) -> Result<()> {
        let builder = self.request(Method::DELETE, &format!("api/diaries/{id}/permanent"))?;
        self.execute_unit(builder).await
    }
}
