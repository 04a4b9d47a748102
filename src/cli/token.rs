//! API key storage and the `aiornot token ...` commands

use super::TokenAction;
use aiornot::{AsyncClient, Config, API_KEY_ENV, BASE_URL_ENV};
use anyhow::{anyhow, Context, Result};
use console::Term;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Legacy environment variable accepted in place of `AIORNOT_API_KEY`
const API_TOKEN_ENV: &str = "AIORNOT_API_TOKEN";

const DASHBOARD_URL: &str = "https://aiornot.com/dashboard/api";

/// Contents of `~/.aiornot/config.json`
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_token: Option<String>,
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".aiornot").join("config.json"))
}

/// Read the API key saved in a config file, accepting `api_token` as a fallback
pub(crate) fn read_stored_key(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let stored: StoredConfig = serde_json::from_str(&content)
        .with_context(|| format!("Invalid config file {}", path.display()))?;

    Ok(stored
        .api_key
        .or(stored.api_token)
        .filter(|key| !key.trim().is_empty()))
}

pub(crate) fn write_stored_key(path: &Path, api_key: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let stored = StoredConfig {
        api_key: Some(api_key.to_string()),
        api_token: None,
    };
    fs::write(path, serde_json::to_string(&stored)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Find the API key in the environment, then in the config file
pub fn load_api_key() -> Result<String> {
    let from_env = [API_KEY_ENV, API_TOKEN_ENV]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|key| !key.trim().is_empty());
    if let Some(key) = from_env {
        return Ok(key);
    }

    if let Some(path) = config_path() {
        if let Some(key) = read_stored_key(&path)? {
            return Ok(key);
        }
    }

    Err(anyhow!(
        "No API token found. Set {API_KEY_ENV} environment variable or run `aiornot token config`"
    ))
}

/// Client configuration for CLI commands
pub fn client_config(api_key: String) -> Config {
    Config {
        api_key,
        base_url: std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty()),
        timeout_seconds: None,
    }
}

pub async fn execute(action: TokenAction) -> Result<i32> {
    match action {
        TokenAction::Check => {
            let client = AsyncClient::new(client_config(load_api_key()?))?;
            if client.is_live().await {
                println!("API is live and your token is configured.");
                Ok(0)
            } else {
                eprintln!("API is not responding.");
                Ok(1)
            }
        }
        TokenAction::Config => configure().await,
    }
}

async fn configure() -> Result<i32> {
    let term = Term::stdout();
    term.write_line(&format!("Go to {DASHBOARD_URL} to get an API key."))?;
    term.write_str("API key: ")?;
    let api_key = term.read_line()?.trim().to_string();
    if api_key.is_empty() {
        return Err(anyhow!("No API key entered"));
    }

    let client = AsyncClient::new(client_config(api_key.clone()))?;
    if !client.is_live().await {
        term.write_line("Warning: Could not verify API key (API may be down).")?;
        if !confirm(&term, "Save anyway?")? {
            return Ok(0);
        }
    }

    let path = config_path().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    if path.exists() && !confirm(&term, "Overwrite existing API token?")? {
        term.write_line("Not overwriting existing API token.")?;
        return Ok(0);
    }

    write_stored_key(&path, &api_key)?;
    term.write_line(&format!("API key saved to {}", path.display()))?;
    Ok(0)
}

fn confirm(term: &Term, question: &str) -> Result<bool> {
    term.write_str(&format!("{question} [y/N]: "))?;
    let answer = term.read_line()?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
