use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use log::{debug, info};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const ENV_PREFIX: &str = "UNICORN_FEEDBACK";
const DEFAULT_CONFIG_FILE: &str = "unicorn-feedback";

pub const DEFAULT_API_ID: &str = "zejy1hx0p0";
pub const DEFAULT_REGION: &str = "execute-api.us-west-2";
pub const DEFAULT_STAGE: &str = "test";

/// Where the feedback API lives and how the HTTP client talks to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackConfig {
    pub api_id: String,
    /// Host segment between the API id and `amazonaws.com`, e.g. `execute-api.us-west-2`.
    pub region: String,
    pub stage: String,
    /// Full base URL; replaces the API Gateway URL built from the fields above.
    #[serde(default)]
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            api_id: DEFAULT_API_ID.to_string(),
            region: DEFAULT_REGION.to_string(),
            stage: DEFAULT_STAGE.to_string(),
            base_url: None,
            timeout_secs: 15,
            connect_timeout_secs: 5,
            user_agent: format!("UnicornFeedback/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FeedbackConfig {
    /// Layers defaults, an optional config file and `UNICORN_FEEDBACK_*` variables.
    ///
    /// An explicit `path` must exist; without one, `unicorn-feedback.{toml,json,yaml}`
    /// in the working directory is picked up when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        // Don't fail if .env doesn't exist
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("api_id", defaults.api_id)?
            .set_default("region", defaults.region)?
            .set_default("stage", defaults.stage)?
            .set_default("timeout_secs", defaults.timeout_secs as i64)?
            .set_default("connect_timeout_secs", defaults.connect_timeout_secs as i64)?
            .set_default("user_agent", defaults.user_agent)?;

        builder = match path {
            Some(path) => {
                info!("Loading feedback config from {}", path.display());
                builder.add_source(File::from(path).required(true))
            }
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize::<FeedbackConfig>()?;

        debug!("Resolved feedback config: {:?}", config);
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// `https://{api_id}.{region}.amazonaws.com/{stage}/`, always with a trailing slash
    /// so endpoint paths join beneath the stage.
    pub fn base_url(&self) -> Result<Url> {
        let raw = match &self.base_url {
            Some(url) => url.trim().to_string(),
            None => format!(
                "https://{}.{}.amazonaws.com/{}/",
                self.api_id.trim(),
                self.region.trim(),
                self.stage.trim()
            ),
        };

        let with_slash = if raw.ends_with('/') { raw } else { format!("{}/", raw) };
        Ok(Url::parse(&with_slash)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
