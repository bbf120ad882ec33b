use serde::{Deserialize, Serialize};

/// Main configuration structure loaded from clm_bridge.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub navigation: NavigationConfig,
    pub account: AccountConfig,
    pub tracking: TrackingConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Slide naming rules for navigation commands
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Suffix every slide archive carries (`01-home` -> `01-home.zip`)
    pub archive_suffix: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            archive_suffix: ".zip".to_string(),
        }
    }
}

/// Projection and ordering for the account lookup
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AccountConfig {
    pub fields: Vec<String>,
    pub sort: String,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            fields: [
                "Id",
                "Name",
                "FirstName",
                "KeyMessages__c",
                "LastName",
                "PersonEmail",
                "Fax",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            sort: "Name, ASC".to_string(),
        }
    }
}

/// Clickstream submission settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Disabled in dev previews where no viewer host exists
    pub enabled: bool,
    pub collection: String,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            collection: "Call_Clickstream_vod__c".to_string(),
        }
    }
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: "clm_bridge=info".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Load runtime configuration from environment variables
    pub fn load_from_env() -> Self {
        Self {
            log_level: std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "clm_bridge=info".to_string()),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    let value = value.trim();
    if value == "1" || value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value == "0" || value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables
    /// Uses CLM_BRIDGE_CONFIG environment variable or defaults to "clm_bridge.toml"
    pub fn load() -> anyhow::Result<Self> {
        if let Ok(env_path) = std::env::var("CLM_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::from_path(".env");
        }

        let config_path =
            std::env::var("CLM_BRIDGE_CONFIG").unwrap_or_else(|_| "clm_bridge.toml".to_string());

        let mut config = if let Ok(content) = std::fs::read_to_string(&config_path) {
            Self::from_toml_str(&content)?
        } else {
            tracing::warn!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        config.apply_env_overrides();
        config.runtime = RuntimeConfig::load_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Parse a TOML document; missing sections fall back to defaults
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply `CLM_*` overrides read through `lookup`
    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(suffix) = lookup("CLM_ARCHIVE_SUFFIX") {
            self.navigation.archive_suffix = suffix;
            tracing::debug!("CLM_ARCHIVE_SUFFIX env override applied");
        }
        if let Some(enabled) = lookup("CLM_TRACKING_ENABLED") {
            match parse_flag(&enabled) {
                Some(flag) => {
                    self.tracking.enabled = flag;
                    tracing::debug!("CLM_TRACKING_ENABLED env override applied");
                }
                None => tracing::warn!(
                    "Ignoring CLM_TRACKING_ENABLED={:?}, expected true/false/1/0",
                    enabled
                ),
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        let suffix = &self.navigation.archive_suffix;
        if suffix.len() < 2 || !suffix.starts_with('.') {
            anyhow::bail!("navigation.archive_suffix must look like '.zip', got '{suffix}'");
        }
        if !self.account.fields.iter().any(|f| f == "Id") {
            anyhow::bail!("account.fields must include 'Id'");
        }
        if self.tracking.collection.trim().is_empty() {
            anyhow::bail!("tracking.collection must not be empty");
        }
        Ok(())
    }
}
