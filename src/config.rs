use crate::error::ConfigurationError;
use crate::llm::{Provider, DEFAULT_API_BASE, DEFAULT_MODEL};
use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

pub const APP_DIR_NAME: &str = "aqua-advisor";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const API_BASE_VAR: &str = "GEMINI_API_BASE";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub default_profile: Option<String>,
    #[serde(default)]
    pub profiles: std::collections::BTreeMap<String, Profile>,
}

/// A named set of generator settings. The API key is never stored here.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Profile {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub api_base: Option<String>,
}

pub fn default_config_path() -> Result<PathBuf> {
    let base = config_dir().context("unable to resolve OS config directory")?;
    Ok(base.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

pub fn ensure_config_parent_exists(path: &PathBuf) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating config dir: {}", parent.display()))?;
    }
    Ok(())
}

pub fn load_config_if_exists(path: &PathBuf) -> Result<Option<AppConfig>> {
    if path.exists() {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file: {}", path.display()))?;
        let cfg: AppConfig = toml::from_str(&text).context("parsing config TOML")?;
        Ok(Some(cfg))
    } else {
        Ok(None)
    }
}

pub fn write_config(path: &PathBuf, cfg: &AppConfig) -> Result<()> {
    ensure_config_parent_exists(path)?;
    let text = toml::to_string_pretty(cfg).context("serializing config to TOML")?;
    fs::write(path, text).with_context(|| format!("writing config file: {}", path.display()))?;
    Ok(())
}

pub fn load_startup_config(path: &PathBuf) -> Result<Option<AppConfig>, ConfigurationError> {
    load_config_if_exists(path).map_err(|source| ConfigurationError::ConfigFile { path: path.clone(), source })
}

/// Overrides coming from the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides<'a> {
    pub profile: Option<&'a str>,
    pub provider: Option<&'a str>,
    pub model: Option<&'a str>,
}

/// Immutable settings for the advice requester, built once at startup.
#[derive(Clone)]
pub struct AdvisorConfig {
    pub provider: Provider,
    pub model: String,
    pub api_base: String,
    pub api_key: Option<String>,
}

impl std::fmt::Debug for AdvisorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisorConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl AdvisorConfig {
    /// Startup routine: `.env`, process environment, then the config file.
    pub fn from_environment(overrides: &CliOverrides<'_>) -> Result<Self, ConfigurationError> {
        dotenvy::dotenv().ok();
        let path = default_config_path().map_err(ConfigurationError::ConfigDir)?;
        let file = load_startup_config(&path)?;
        Self::resolve(file.as_ref(), overrides, |k| std::env::var(k).ok())
    }

    /// Precedence: CLI flag, then environment (base only), then profile, then defaults.
    pub fn resolve<F>(file: Option<&AppConfig>, overrides: &CliOverrides<'_>, lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut provider: Option<String> = None;
        let mut model: Option<String> = None;
        let mut api_base: Option<String> = None;

        if let Some(cfg) = file {
            let profile_name = overrides
                .profile
                .map(|s| s.to_string())
                .or_else(|| cfg.default_profile.clone())
                .unwrap_or_else(|| "default".to_string());
            if let Some(p) = cfg.profiles.get(&profile_name) {
                provider = p.provider.clone();
                model = p.model.clone();
                api_base = p.api_base.clone();
            }
        }

        if let Some(b) = lookup(API_BASE_VAR).filter(|v| !v.trim().is_empty()) { api_base = Some(b); }
        if let Some(cp) = overrides.provider { provider = Some(cp.to_string()); }
        if let Some(cm) = overrides.model { model = Some(cm.to_string()); }

        let provider_name = provider.unwrap_or_else(|| Provider::Gemini.name().to_string());
        let provider = Provider::from_str(&provider_name)
            .ok_or(ConfigurationError::UnsupportedProvider(provider_name))?;

        let api_key = lookup(API_KEY_VAR).filter(|v| !v.trim().is_empty());
        if provider.requires_api_key() && api_key.is_none() {
            return Err(ConfigurationError::MissingApiKey { var: API_KEY_VAR });
        }

        Ok(Self {
            provider,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            api_key,
        })
    }
}
