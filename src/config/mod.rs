mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./t2s.toml", "~/.config/t2s/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
///
/// Called again after command-line overrides are applied.
pub fn validate_config(config: &Config) -> Result<()> {
    let dispatch = &config.dispatch;

    if dispatch.limit == 0 {
        anyhow::bail!("Request limit cannot be 0");
    }
    if dispatch.attempts == 0 {
        anyhow::bail!("Attempt count cannot be 0");
    }
    if dispatch.timeout_secs == 0 {
        anyhow::bail!("Timeout cannot be 0");
    }
    if dispatch.max_segment_bytes == 0 {
        anyhow::bail!("Segment byte budget cannot be 0");
    }

    let url = &config.speechkit.base_url;
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        anyhow::bail!("Endpoint URL must be http(s): {}", url);
    }

    Ok(())
}
