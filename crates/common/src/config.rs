use serde::{Deserialize, Serialize};

use crate::error::{PostboxError, PostboxResult};

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub admission: AdmissionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub listen: String,
    #[serde(default)]
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Bearer token required on the message listing/deletion endpoints.
    /// When unset, those endpoints reject every request.
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self { token: None }
    }
}

/// Admission control settings for the public contact endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Window length per client, in seconds.
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Maximum submissions per client per window.
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    /// How often expired client records are swept from memory.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_secs: default_window_secs(),
            max_requests: default_max_requests(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}
fn default_window_secs() -> u64 {
    900 // 15 minutes
}
fn default_max_requests() -> u32 {
    50
}
fn default_sweep_interval_secs() -> u64 {
    60
}

impl AppConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &str) -> PostboxResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| PostboxError::Config(format!("failed to parse {}: {}", path, e)))?;
        config.validate()?;

        tracing::info!(path = %path, "configuration loaded");
        Ok(config)
    }

    /// Validate the configuration for consistency.
    pub fn validate(&self) -> PostboxResult<()> {
        if self.server.listen.is_empty() {
            return Err(PostboxError::Config(
                "server.listen must not be empty".to_string(),
            ));
        }

        if self.admission.window_secs == 0 {
            return Err(PostboxError::Config(
                "admission.window_secs must be greater than zero".to_string(),
            ));
        }

        if self.admission.max_requests == 0 {
            return Err(PostboxError::Config(
                "admission.max_requests must be greater than zero".to_string(),
            ));
        }

        if self.admission.sweep_interval_secs == 0 {
            return Err(PostboxError::Config(
                "admission.sweep_interval_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_gets_admission_defaults() {
        let config: AppConfig = serde_yaml::from_str("server:\n  listen: \"0.0.0.0:8080\"\n")
            .expect("minimal config should parse");

        assert!(config.admission.enabled);
        assert_eq!(config.admission.window_secs, 900);
        assert_eq!(config.admission.max_requests, 50);
        assert_eq!(config.admission.sweep_interval_secs, 60);
        assert!(config.server.admin.token.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_window_is_rejected() {
        let config: AppConfig = serde_yaml::from_str(
            "server:\n  listen: \"0.0.0.0:8080\"\nadmission:\n  window_secs: 0\n",
        )
        .expect("config should parse");

        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_listen_is_rejected() {
        let config: AppConfig =
            serde_yaml::from_str("server:\n  listen: \"\"\n").expect("config should parse");

        assert!(config.validate().is_err());
    }
}
