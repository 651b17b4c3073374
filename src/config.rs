use std::path::PathBuf;

use crate::credentials::Credentials;
use crate::storage::Storage;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

#[derive(Debug, Clone)]
pub struct Config {
    /// `GROQ_API_KEY` from the environment. The stored credential is
    /// consulted later, once storage is open.
    pub llm_api_key: Option<String>,
    pub llm_base_url: String,
    pub recommend_model: String,
    pub store_path: PathBuf,
    pub log_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            llm_api_key: std::env::var("GROQ_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            llm_base_url: std::env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
            recommend_model: std::env::var("RECOMMEND_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.into()),
            store_path: std::env::var("RECO_STORE_PATH")
                .unwrap_or_else(|_| "data/store.json".into())
                .into(),
            log_dir: std::env::var("RECO_LOG_DIR")
                .unwrap_or_else(|_| "logs".into())
                .into(),
        }
    }

    /// Environment key wins over the stored one.
    pub fn with_stored_key(mut self, stored: Option<String>) -> Self {
        if self.llm_api_key.is_none() {
            self.llm_api_key = stored.filter(|key| !key.trim().is_empty());
        }
        self
    }

    /// Falls back to the stored credential only when the environment has no
    /// key. A store that cannot be read is logged and treated as empty.
    pub fn with_credentials<S: Storage>(self, credentials: &Credentials<S>) -> Self {
        if self.llm_api_key.is_some() {
            return self;
        }
        match credentials.get() {
            Ok(stored) => self.with_stored_key(stored),
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored API key");
                self
            }
        }
    }
}
