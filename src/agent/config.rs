use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_ENCODING: &str = "cl100k_base";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 45;

/// Every environment variable that changes how the config resolves.
pub const CONFIG_ENV_VARS: &[&str] = &[
    "DJA_CONFIG_PATH",
    "DJA_API_KEY",
    "OPENAI_API_KEY",
    "DJA_MODEL",
    "DJA_BASE_URL",
    "DJA_TIMEOUT_SECS",
    "DJA_ENCODING",
    "DJA_SHOW_STATUS",
];

/// Connection settings owned by one agent. Built once, never mutated after
/// the agent is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub encoding: String,
    pub show_status: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            encoding: DEFAULT_ENCODING.to_string(),
            show_status: true,
        }
    }
}

impl AgentConfig {
    pub fn require_api_key(&self) -> Result<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(anyhow!(
                "missing provider api key; set DJA_API_KEY or OPENAI_API_KEY"
            )),
        }
    }

    pub fn masked_api_key(&self) -> String {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if key.chars().count() > 8 => {
                let head: String = key.chars().take(3).collect();
                let tail: String = key
                    .chars()
                    .rev()
                    .take(4)
                    .collect::<Vec<_>>()
                    .into_iter()
                    .rev()
                    .collect();
                format!("{head}…{tail}")
            }
            Some(key) if !key.is_empty() => "***".to_string(),
            _ => "unset".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
struct PartialAgentConfig {
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    encoding: Option<String>,
    show_status: Option<bool>,
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "true" | "TRUE" | "yes" | "on" => Some(true),
        "0" | "false" | "FALSE" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn validate(cfg: &AgentConfig) -> Result<()> {
    if cfg.model.trim().is_empty() {
        return Err(anyhow!("invalid model: cannot be empty"));
    }
    let base = cfg.base_url.trim();
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(anyhow!(
            "invalid base url `{}`: must start with http:// or https://",
            cfg.base_url
        ));
    }
    if cfg.request_timeout_secs == 0 {
        return Err(anyhow!("invalid request timeout: must be >= 1 second"));
    }
    if cfg.encoding.trim().is_empty() {
        return Err(anyhow!("invalid token encoding: cannot be empty"));
    }
    Ok(())
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(custom) = env::var("DJA_CONFIG_PATH") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    let base = dirs::config_dir()?;
    Some(base.join("dirty-json-agent").join("config.toml"))
}

fn merge_file_config(base: &mut AgentConfig, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(path)?;
    let parsed: PartialAgentConfig = toml::from_str(&raw)
        .map_err(|err| anyhow!("failed to parse agent config {}: {err}", path.display()))?;
    if let Some(api_key) = non_empty(parsed.api_key) {
        base.api_key = Some(api_key);
    }
    if let Some(model) = non_empty(parsed.model) {
        base.model = model;
    }
    if let Some(base_url) = non_empty(parsed.base_url) {
        base.base_url = base_url;
    }
    if let Some(timeout) = parsed.request_timeout_secs {
        base.request_timeout_secs = timeout;
    }
    if let Some(encoding) = non_empty(parsed.encoding) {
        base.encoding = encoding;
    }
    if let Some(show_status) = parsed.show_status {
        base.show_status = show_status;
    }
    Ok(())
}

fn merge_env_config<F>(cfg: &mut AgentConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = non_empty(lookup("DJA_API_KEY")).or_else(|| non_empty(lookup("OPENAI_API_KEY")))
    {
        cfg.api_key = Some(key);
    }
    if let Some(model) = non_empty(lookup("DJA_MODEL")) {
        cfg.model = model;
    }
    if let Some(base_url) = non_empty(lookup("DJA_BASE_URL")) {
        cfg.base_url = base_url;
    }
    if let Some(timeout) = non_empty(lookup("DJA_TIMEOUT_SECS")).and_then(|v| v.parse::<u64>().ok())
    {
        cfg.request_timeout_secs = timeout;
    }
    if let Some(encoding) = non_empty(lookup("DJA_ENCODING")) {
        cfg.encoding = encoding;
    }
    if let Some(show_status) = lookup("DJA_SHOW_STATUS").as_deref().and_then(parse_bool) {
        cfg.show_status = show_status;
    }
}

pub fn load_config() -> Result<AgentConfig> {
    let mut cfg = AgentConfig::default();
    if let Some(path) = resolve_config_path() {
        merge_file_config(&mut cfg, &path)?;
    }
    merge_env_config(&mut cfg, |var| env::var(var).ok());
    validate(&cfg)?;
    Ok(cfg)
}

fn env_vars_set<F>(is_set: F) -> Vec<&'static str>
where
    F: Fn(&str) -> bool,
{
    CONFIG_ENV_VARS.iter().copied().filter(|var| is_set(var)).collect()
}

/// Config variables that are set in the current process.
pub fn known_env_vars_set() -> Vec<&'static str> {
    env_vars_set(|var| env::var_os(var).is_some())
}
