//! Login and session endpoints.

use reqwest::Method;

use crate::client::ApiClient;
use crate::error::Result;
use crate::model::{LoginRequest, LoginResponse, User};

impl ApiClient {
    /// Signs in with a username and password.
    ///
    /// The returned token is not applied automatically; pass it to
    /// [`ApiClient::set_token`].
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let body = LoginRequest { username, password };
        let builder = self.request(Method::POST, "api/login")?.json(&body);
        self.execute(builder, "login result").await
    }

    /// Fetches the user the current token belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is missing or rejected.
    pub async fn current_user(&self) -> Result<User> {
        let builder = self.request(Method::GET, "api/user/info")?;
        self.execute(builder, "user").await
    }
}
