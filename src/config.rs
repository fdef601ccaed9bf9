use crate::transaction::{Lamports, LAMPORTS_PER_SOL};
use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use toml::map::Map;

/// Environment variable holding the base58 secret key of the sender.
pub const SECRET_KEY_ENV: &str = "SOLANA_SECRET_KEY";

/// Lamports moved by every demo transfer.
pub const DEFAULT_TRANSFER_LAMPORTS: Lamports = LAMPORTS_PER_SOL / 1_000_000 * 5;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    pub network: NetworkSettings,
    pub accounts: AccountSettings,
    pub transfer: TransferSettings,
    pub retry: RetrySettings,
    pub monitoring: MonitoringSettings,
    /// Filled from [`SECRET_KEY_ENV`]; never read from or written to a file.
    #[serde(skip)]
    pub secret_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkSettings {
    pub rpc_url: String,
    pub cluster: String,
    pub explorer_url: String,
    pub commitment: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountSettings {
    pub sender_address: String,
    pub receiver_address: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransferSettings {
    pub amount_lamports: Lamports,
    pub funding_multiplier: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitoringSettings {
    pub confirmation_timeout_seconds: u64,
    pub poll_interval_ms: u64,
    pub request_timeout_seconds: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            network: NetworkSettings {
                rpc_url: "https://api.devnet.solana.com".to_string(),
                cluster: "devnet".to_string(),
                explorer_url: "https://explorer.solana.com".to_string(),
                commitment: "confirmed".to_string(),
            },
            accounts: AccountSettings {
                sender_address: "7GnVC9WogD4DKRhFn9QXMiGJtPSP9Skz7reTpfgqXrL8".to_string(),
                receiver_address: "63EEC9FfGyksm7PkVC6z8uAmqozbQcTzbkWJNsgqjkFs".to_string(),
            },
            transfer: TransferSettings {
                amount_lamports: DEFAULT_TRANSFER_LAMPORTS,
                funding_multiplier: 10,
            },
            retry: RetrySettings {
                max_attempts: 3,
                base_delay_ms: 500,
                max_delay_ms: 10_000,
                backoff_multiplier: 2.0,
            },
            monitoring: MonitoringSettings {
                confirmation_timeout_seconds: 60,
                poll_interval_ms: 500,
                request_timeout_seconds: 30,
            },
            secret_key: None,
        }
    }
}

impl NetworkConfig {
    /// Built-in devnet defaults plus the secret key from the environment.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            secret_key: Self::read_secret_key(),
            ..Self::default()
        }
    }

    /// Loads a TOML file and merges it over the built-in defaults.
    pub fn load(path: &str) -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let defaults = toml::to_string(&Self::default())?;
        let specific_content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path, e))?;

        // Merge specific config over the defaults
        let merged_content = Self::merge_configs(defaults, specific_content)?;

        let content = Self::substitute_env_vars(merged_content)?;

        let mut config: NetworkConfig = toml::from_str(&content)?;
        config.validate()?;
        config.secret_key = Self::read_secret_key();
        Ok(config)
    }

    /// Rejects settings that serde accepts but the workflow cannot run with.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        let retry = &self.retry;

        if retry.max_attempts < 1 {
            errors.push("retry.max_attempts must be at least 1".to_string());
        }
        if !retry.backoff_multiplier.is_finite() || retry.backoff_multiplier < 1.0 {
            errors.push(format!(
                "retry.backoff_multiplier must be a finite number >= 1.0, got {}",
                retry.backoff_multiplier
            ));
        }
        if retry.base_delay_ms > retry.max_delay_ms {
            errors.push(format!(
                "retry.base_delay_ms ({}) exceeds retry.max_delay_ms ({})",
                retry.base_delay_ms, retry.max_delay_ms
            ));
        }
        if self.monitoring.poll_interval_ms == 0 {
            errors.push("monitoring.poll_interval_ms must be greater than 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(anyhow::anyhow!("Invalid configuration: {}", errors.join("; ")))
        }
    }

    pub fn explorer_tx_url(&self, signature: &str) -> String {
        format!(
            "{}/tx/{}?cluster={}",
            self.network.explorer_url.trim_end_matches('/'),
            signature,
            self.network.cluster
        )
    }

    pub fn funding_lamports(&self) -> Lamports {
        self.transfer
            .amount_lamports
            .saturating_mul(self.transfer.funding_multiplier)
    }

    fn read_secret_key() -> Option<String> {
        env::var(SECRET_KEY_ENV).ok().filter(|v| !v.trim().is_empty())
    }

    fn merge_configs(common: String, specific: String) -> Result<String> {
        if common.is_empty() {
            return Ok(specific);
        }

        let common_toml: toml::Value = toml::from_str(&common)?;
        let specific_toml: toml::Value = toml::from_str(&specific)?;

        // Specific values override common ones
        let merged = Self::merge_toml_values(common_toml, specific_toml);

        let merged_toml = toml::to_string_pretty(&merged)?;
        Ok(merged_toml)
    }

    fn merge_toml_values(mut base: toml::Value, override_val: toml::Value) -> toml::Value {
        match (&mut base, override_val) {
            (toml::Value::Table(base_map), toml::Value::Table(override_map)) => {
                for (key, value) in override_map {
                    base_map.insert(
                        key.clone(),
                        Self::merge_toml_values(
                            base_map
                                .get(&key)
                                .cloned()
                                .unwrap_or(toml::Value::Table(Map::new())),
                            value,
                        ),
                    );
                }
                base
            }
            (_, override_val) => override_val,
        }
    }

    fn substitute_env_vars(content: String) -> Result<String> {
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")?;
        let mut result = content.clone();

        for cap in re.captures_iter(&content) {
            let var_name = &cap[1];
            if let Ok(value) = env::var(var_name) {
                let placeholder = cap[0].to_string();
                result = result.replace(&placeholder, &value);
            }
        }

        Ok(result)
    }
}
