use std::sync::Arc;

use crate::clients::GeminiClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{AssistantService, TextGenerator};

/// Build a shared HTTP client for outbound API calls.
/// The timeout bounds every call so a hung upstream cannot stall a request.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(concat!("lifedesk/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub assistant: AssistantService,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_url,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let http_client = build_shared_http_client(config.ai.request_timeout_seconds)?;
        let gemini = GeminiClient::with_shared_client(http_client, config.ai.clone());
        if !gemini.is_configured() {
            tracing::warn!("AI is disabled or has no API key; AI endpoints will return fallbacks");
        }

        Ok(Self::with_generator(config, store, Arc::new(gemini)))
    }

    /// Assembles state around an already-open store and a custom text
    /// generator.
    #[must_use]
    pub fn with_generator(config: Config, store: Store, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            assistant: AssistantService::new(generator),
        }
    }
}
