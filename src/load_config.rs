use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;
use tracing::{error, info};

use crate::config::{ExportConfig, DEFAULT_PAGE_SIZE};
use crate::resolve::CurrencyStyle;

#[derive(Deserialize)]
struct StaticConfig {
    export: ExportSection,
    #[serde(default)]
    currency: Option<CurrencySection>,
}

#[derive(Deserialize)]
struct ExportSection {
    base_url: String,
    output_dir: PathBuf,
    #[serde(default)]
    tag: Option<String>,
    #[serde(default)]
    page_size: Option<usize>,
}

#[derive(Deserialize)]
struct CurrencySection {
    #[serde(default)]
    decimal_separator: Option<char>,
    #[serde(default)]
    grouping_separator: Option<char>,
    #[serde(default)]
    symbol: Option<String>,
}

/// Loads a static YAML config file (no secrets) and injects the API token
/// from the environment. `tag_override` (from the command line) wins over
/// the tag configured in the file.
pub fn load_config<P: AsRef<Path>>(path: P, tag_override: Option<String>) -> Result<ExportConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let static_conf: StaticConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => conf,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    let token = match std::env::var("PAPERLESS_TOKEN") {
        Ok(token) => token,
        Err(e) => {
            error!(error = ?e, "PAPERLESS_TOKEN environment variable not set");
            return Err(anyhow::anyhow!(
                "PAPERLESS_TOKEN environment variable not set: {e}"
            ));
        }
    };

    let tag = match tag_override.or(static_conf.export.tag) {
        Some(tag) => tag,
        None => {
            error!("No target tag configured");
            anyhow::bail!("No target tag: set export.tag in the config file or pass --tag");
        }
    };

    let mut currency = CurrencyStyle::default();
    if let Some(section) = static_conf.currency {
        if let Some(sep) = section.decimal_separator {
            currency.decimal_separator = sep;
        }
        if let Some(sep) = section.grouping_separator {
            currency.grouping_separator = sep;
        }
        if let Some(symbol) = section.symbol {
            currency.symbol = symbol;
        }
    }

    let page_size = static_conf.export.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

    info!(
        tag = %tag,
        base_url = %static_conf.export.base_url,
        output_dir = %static_conf.export.output_dir.display(),
        page_size,
        "Config loaded and merged successfully"
    );

    Ok(ExportConfig {
        base_url: static_conf.export.base_url,
        token,
        output_dir: static_conf.export.output_dir,
        tag,
        page_size,
        currency,
    })
}
