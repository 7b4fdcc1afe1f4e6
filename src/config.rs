use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// Where the play-by-play data lives on GitHub. One value is shared by the
/// repository introspector and the file lister.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    pub owner: String,
    pub name: String,
    /// Network location of the GitHub REST API (host, optionally with port).
    pub api_host: String,
    pub scheme: String,
    /// Directory inside the repository holding the data files.
    pub data_dir: String,
    /// Media type sent in the `Accept` header.
    pub accept: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            owner: "guga31bb".to_string(),
            name: "nflfastR-data".to_string(),
            api_host: "api.github.com".to_string(),
            scheme: "https".to_string(),
            data_dir: "data".to_string(),
            accept: "application/vnd.github.v3+json".to_string(),
        }
    }
}

impl RepositoryConfig {
    /// `owner/name`, as shown in log lines.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Which seasons to fetch, from which branch, with which file suffixes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunPlan {
    pub start_year: i32,
    /// Inclusive.
    pub end_year: i32,
    pub branch: String,
    pub file_extensions: Vec<String>,
}

impl Default for RunPlan {
    fn default() -> Self {
        Self {
            start_year: 2010,
            end_year: 2020,
            branch: "master".to_string(),
            file_extensions: vec![".parquet".to_string()],
        }
    }
}

impl RunPlan {
    pub fn years(&self) -> Vec<crate::github::Year> {
        (self.start_year..=self.end_year)
            .map(crate::github::Year::Numeric)
            .collect()
    }
}

/// Full application configuration: repository location, run plan and an
/// optional export path for the aggregated table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub repository: RepositoryConfig,
    pub run: RunPlan,
    pub output: Option<PathBuf>,
}

impl AppConfig {
    pub fn trace_loaded(&self) {
        info!(
            repository = %self.repository.slug(),
            branch = %self.run.branch,
            start_year = self.run.start_year,
            end_year = self.run.end_year,
            "Loaded Config"
        );
        debug!(?self, "Config loaded (full debug)");
    }
}
