use crate::config::AppConfig;
use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing::{error, info};

/// Loads a YAML config file. Keys left out of the file keep their defaults,
/// so an empty mapping yields the stock nflfastR-data run.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!("Failed to read config file {:?}: {}", path_ref, e));
        }
    };

    let config: AppConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    if config.run.start_year > config.run.end_year {
        error!(
            start_year = config.run.start_year,
            end_year = config.run.end_year,
            "Start year is after end year"
        );
        anyhow::bail!(
            "run.start_year ({}) must not be after run.end_year ({})",
            config.run.start_year,
            config.run.end_year
        );
    }

    config.trace_loaded();
    Ok(config)
}
