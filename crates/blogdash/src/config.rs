use std::{env, path::PathBuf, time::Duration};

/// Project id that switches the dashboard into demo mode.
pub const DEMO_PROJECT_ID: &str = "demo-project";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Sanity project id (unset means demo mode)
    pub project_id: Option<String>,
    /// Dataset name (default: "production")
    pub dataset: String,
    /// API version date (default: "2024-03-15")
    pub api_version: String,
    /// API token for authenticated reads and mutations
    pub token: Option<String>,
    /// Override of `https://{project}.api.sanity.io`
    pub api_host: Option<String>,
    /// HTTP request timeout in seconds (default: 30)
    pub timeout_seconds: u64,
    /// Directory holding local planning data (default: ".blogdash")
    pub data_dir: PathBuf,
}

/// Connection settings for the hosted document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanityConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub token: Option<String>,
    pub api_host: Option<String>,
    pub timeout: Duration,
}

impl SanityConfig {
    /// Base URL of the API, always ending in `/`.
    pub fn api_base_url(&self) -> String {
        let host = match &self.api_host {
            Some(host) => host.clone(),
            None => format!("https://{}.api.sanity.io", self.project_id),
        };
        if host.ends_with('/') {
            host
        } else {
            format!("{host}/")
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SANITY_PROJECT_ID` - Project id (unset: demo mode)
    /// - `SANITY_DATASET` - Dataset (default: "production")
    /// - `SANITY_API_VERSION` - API version (default: "2024-03-15")
    /// - `SANITY_TOKEN` - API token (optional)
    /// - `SANITY_API_HOST` - API host override (optional)
    /// - `SANITY_TIMEOUT_SECONDS` - Request timeout (default: 30)
    /// - `BLOGDASH_DATA_DIR` - Local data directory (default: ".blogdash")
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            project_id: non_empty("SANITY_PROJECT_ID"),
            dataset: non_empty("SANITY_DATASET").unwrap_or_else(|| "production".to_string()),
            api_version: non_empty("SANITY_API_VERSION")
                .unwrap_or_else(|| "2024-03-15".to_string()),
            token: non_empty("SANITY_TOKEN"),
            api_host: non_empty("SANITY_API_HOST"),
            timeout_seconds: non_empty("SANITY_TIMEOUT_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            data_dir: non_empty("BLOGDASH_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".blogdash")),
        }
    }

    /// True when no project is configured or the demo sentinel is used.
    pub fn is_demo_mode(&self) -> bool {
        match self.project_id.as_deref() {
            None => true,
            Some(id) => id == DEMO_PROJECT_ID,
        }
    }

    /// Get the request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Connection settings, or `None` in demo mode.
    pub fn sanity(&self) -> Option<SanityConfig> {
        if self.is_demo_mode() {
            return None;
        }
        let project_id = self.project_id.clone()?;
        Some(SanityConfig {
            project_id,
            dataset: self.dataset.clone(),
            api_version: self.api_version.clone(),
            token: self.token.clone(),
            api_host: self.api_host.clone(),
            timeout: self.timeout(),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
