use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for a re-authorization run
///
/// Read-only for the duration of a run; everything the workflow needs is
/// supplied here at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReauthConfig {
    /// Target sandbox instance
    pub target: TargetConfig,
    /// The operator whose session authenticates the REST calls
    pub operator: OperatorConfig,
    /// The API user being re-authorized
    pub api_user: ApiUserConfig,
    /// Connected-app OAuth settings
    pub oauth: OAuthConfig,
    /// Identity CLI settings
    pub auth: AuthConfig,
    /// Browser hand-off settings
    pub browser: BrowserConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TargetConfig {
    /// Sandbox base URL, e.g. https://acme--dev.my.salesforce.com
    pub instance_url: String,
    /// REST API version path segment
    pub api_version: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OperatorConfig {
    /// Username the identity CLI logs in as (a sysadmin in the sandbox)
    pub username: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiUserConfig {
    /// Username of the service account being re-authorized
    pub username: String,
    /// Replacement email, so the operator receives the MFA/confirmation mail
    pub new_email: String,
    /// Permission set temporarily removed around the consent flow
    pub permission_set: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OAuthConfig {
    /// Connected-app client identifier (consumer key)
    pub connected_app_client_id: String,
    /// Length of the generated CSRF state value
    pub state_length: usize,
    /// Length of the generated OpenID nonce
    pub nonce_length: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Ceiling on the wait for the CLI's token-retrieval call
    pub token_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BrowserConfig {
    /// Command invoked with a URL argument to open the local browser
    pub command: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level for the tracing layer
    pub log_level: String,
}

impl Default for ReauthConfig {
    fn default() -> Self {
        Self {
            target: TargetConfig {
                instance_url: "https://acme--dev.my.salesforce.com".to_string(),
                api_version: "v56.0".to_string(),
            },
            operator: OperatorConfig {
                username: "admin@example.com.dev".to_string(),
            },
            api_user: ApiUserConfig {
                username: "integration@example.com.dev".to_string(),
                new_email: "admin@example.com".to_string(),
                permission_set: "API_Only_User".to_string(),
            },
            oauth: OAuthConfig {
                connected_app_client_id: "REPLACE_WITH_CONNECTED_APP_CLIENT_ID".to_string(),
                state_length: crate::oauth::DEFAULT_STATE_LENGTH,
                nonce_length: crate::oauth::DEFAULT_NONCE_LENGTH,
            },
            auth: AuthConfig {
                token_timeout_seconds: 20,
            },
            browser: BrowserConfig {
                command: "open".to_string(),
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
            },
        }
    }
}

pub const CONFIG_FILE: &str = "sandbox-reauth.toml";

impl ReauthConfig {
    /// Load configuration with precedence:
    /// 1. Configuration file (sandbox-reauth.toml)
    /// 2. Environment variables (prefixed with SANDBOX_REAUTH_)
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder();

        if Path::new(CONFIG_FILE).exists() {
            builder = builder.add_source(File::with_name("sandbox-reauth"));
        }

        builder = builder.add_source(
            Environment::with_prefix("SANDBOX_REAUTH")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let reauth_config: ReauthConfig = config.try_deserialize()?;
        Ok(reauth_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = ReauthConfig::default();
        assert_eq!(config.target.api_version, "v56.0");
        assert_eq!(config.api_user.permission_set, "API_Only_User");
        assert_eq!(config.browser.command, "open");
        assert_eq!(config.auth.token_timeout_seconds, 20);
        assert_eq!(config.oauth.state_length, 10);
        assert_eq!(config.oauth.nonce_length, 11);
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let config = ReauthConfig::default();
        config.save_to_file(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let reloaded: ReauthConfig = toml::from_str(&text).unwrap();
        assert_eq!(reloaded.operator.username, config.operator.username);
        assert_eq!(
            reloaded.oauth.connected_app_client_id,
            config.oauth.connected_app_client_id
        );
        assert_eq!(reloaded.observability.log_level, "info");
    }
}
