//! Shared state for one CLI invocation.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use tracing::{debug, warn};

use daybook_api::ApiClient;
use daybook_core::settings::{self, Settings};
use daybook_core::{
    AuthService, Clock, KeyringTokenStore, KvStore, SessionContext, SharedClock, SystemClock,
    TokenStore,
};

/// Everything a command needs: settings, local store, client and clock.
pub struct App {
    pub settings: Settings,
    pub store: KvStore,
    pub client: ApiClient,
    pub tokens: Arc<dyn TokenStore>,
    pub clock: SharedClock,
}

impl App {
    /// Loads settings, opens the store and builds an authenticated client.
    pub async fn init(base_url: Option<String>) -> Result<Self> {
        let mut settings = Settings::load().await.context("loading settings")?;
        if let Some(url) = base_url {
            settings.base_url = url;
        }
        settings.validate()?;

        let db_path = settings::database_path().await?;
        let store = KvStore::new(&db_path.to_string_lossy())
            .await
            .with_context(|| format!("opening {}", db_path.display()))?;

        let tokens: Arc<dyn TokenStore> = Arc::new(KeyringTokenStore);
        let mut client = ApiClient::with_timeout(&settings.base_url, settings.request_timeout())?;
        match tokens.load() {
            Ok(token) => client.set_token(token),
            Err(e) => warn!("Could not read session token: {e}"),
        }
        debug!("Using backend {}", client.base_url());

        Ok(Self {
            settings,
            store,
            client,
            tokens,
            clock: Arc::new(SystemClock),
        })
    }

    pub fn auth(&self) -> AuthService<ApiClient> {
        AuthService::new(self.client.clone(), self.store.clone(), Arc::clone(&self.tokens))
    }

    pub fn session_context(&self) -> Arc<SessionContext> {
        Arc::new(
            SessionContext::new(Arc::clone(&self.clock))
                .with_timeout(self.settings.session_timeout()),
        )
    }

    /// The user id to act as: the settings override, else the signed-in user.
    pub async fn user_id(&self) -> Result<i64> {
        if let Some(id) = self.settings.user_id {
            return Ok(id);
        }
        let user = self
            .auth()
            .require_user()
            .await
            .context("run `daybook login` first")?;
        Ok(user.id)
    }

    /// Local wall-clock time.
    pub fn now(&self) -> NaiveDateTime {
        self.clock.local_now()
    }
}
