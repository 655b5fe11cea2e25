use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use bloglist_api::auth::{generate_jwt, Claims};
use bloglist_api::config::AppConfig;
use bloglist_api::database::models::Account;
use bloglist_api::database::{AccountStore, MemoryStore};
use bloglist_api::{app, AppState};

/// A server on its own port with a fresh in-memory store, running on the
/// current test's runtime.
pub struct TestServer {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub config: AppConfig,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let config = AppConfig::development();
        let store = Arc::new(MemoryStore::new());
        let router = app(AppState::new(config.clone(), store.clone()));

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let server = Self {
            base_url,
            store,
            config,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            if self.client.get(self.url("/health")).send().await.is_ok() {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn account(&self, username: &str) -> Result<Account> {
        Ok(self.store.insert_account(username, Some(username)).await?)
    }

    pub async fn reload(&self, account: &Account) -> Result<Account> {
        self.store
            .find_account(account.id)
            .await?
            .context("account disappeared")
    }

    pub fn token_for(&self, account: &Account) -> Result<String> {
        let claims = Claims::for_account(account, 1);
        Ok(generate_jwt(&claims, &self.config.security.jwt_secret)?)
    }
}
