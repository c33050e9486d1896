use crate::config::{LibraryConfig, DEFAULT_API_URL};
use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{error, info};

#[derive(Deserialize)]
struct StaticConfig {
    library_id: String,
    #[serde(default)]
    api_token: Option<String>,
    #[serde(default)]
    api_url: Option<String>,
    #[serde(default)]
    library_name: Option<String>,
}

/// Loads the YAML config file and merges in the API token from the
/// environment when the file does not carry one.
/// Returns a fully populated LibraryConfig or an error.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<LibraryConfig> {
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
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    // The file value wins; ADS_API_TOKEN is the fallback for keeping the
    // secret out of the config file.
    let api_token = match static_conf.api_token {
        Some(token) => token,
        None => match std::env::var("ADS_API_TOKEN") {
            Ok(token) => {
                info!("ADS_API_TOKEN found in env");
                token
            }
            Err(e) => {
                error!(error = ?e, "No api_token in config and ADS_API_TOKEN not set");
                return Err(anyhow::anyhow!(
                    "No api_token in config file and ADS_API_TOKEN environment variable not set: {e}"
                ));
            }
        },
    };

    let api_url = static_conf
        .api_url
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
        .trim_end_matches('/')
        .to_string();

    info!(
        api_url = %api_url,
        library_id = %static_conf.library_id,
        target_name = ?static_conf.library_name,
        "Config loaded and merged successfully"
    );

    Ok(LibraryConfig {
        api_url,
        api_token,
        library_id: static_conf.library_id,
        library_name: static_conf.library_name,
    })
}
