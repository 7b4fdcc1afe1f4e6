//! GitHub-backed [`DataRepository`]: branch introspection and data file listing.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::call::{make_call, CallRequest};
use crate::config::RepositoryConfig;
use crate::contract::DataRepository;
use crate::error::{Error, Result};
use crate::url_builder::UrlPath;

/// A season to look for, either as a number or as the text found in file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Year {
    Numeric(i32),
    Label(String),
}

impl Year {
    /// Integer value of the year; labels must parse as integers.
    pub fn as_number(&self) -> Result<i32> {
        match self {
            Year::Numeric(year) => Ok(*year),
            Year::Label(label) => label
                .trim()
                .parse()
                .map_err(|_| Error::InvalidYear(label.clone())),
        }
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Year::Numeric(year) => write!(f, "{year}"),
            Year::Label(label) => f.write_str(label),
        }
    }
}

impl From<i32> for Year {
    fn from(year: i32) -> Self {
        Year::Numeric(year)
    }
}

impl From<&str> for Year {
    fn from(label: &str) -> Self {
        Year::Label(label.to_string())
    }
}

impl From<String> for Year {
    fn from(label: String) -> Self {
        Year::Label(label)
    }
}

/// Ordered suffix chain a file name must carry, e.g. `[".csv", ".gz"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter(Vec<String>);

impl ExtensionFilter {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(extensions.into_iter().map(Into::into).collect())
    }

    pub fn extensions(&self) -> &[String] {
        &self.0
    }

    /// True when the suffix chain of `name` is exactly this filter.
    pub fn matches(&self, name: &str) -> bool {
        suffixes(name) == self.0
    }
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self::from(".parquet")
    }
}

impl From<&str> for ExtensionFilter {
    fn from(extension: &str) -> Self {
        Self(vec![extension.to_string()])
    }
}

impl From<Vec<String>> for ExtensionFilter {
    fn from(extensions: Vec<String>) -> Self {
        Self(extensions)
    }
}

/// Suffix chain of a file name: `"pbp.csv.gz"` gives `[".csv", ".gz"]`.
/// Leading dots are ignored and a trailing dot yields no suffixes.
pub fn suffixes(name: &str) -> Vec<String> {
    if name.ends_with('.') {
        return Vec::new();
    }
    name.trim_start_matches('.')
        .split('.')
        .skip(1)
        .map(|suffix| format!(".{suffix}"))
        .collect()
}

/// A file matches when its suffix chain equals `extensions` and some
/// requested year appears anywhere in its name.
pub fn matches_file(name: &str, years: &[Year], extensions: &ExtensionFilter) -> bool {
    let year_match = years.iter().any(|year| name.contains(&year.to_string()));
    year_match && extensions.matches(name)
}

/// Smallest and largest requested year.
pub fn year_range(years: &[Year]) -> Result<(i32, i32)> {
    let numbers = years
        .iter()
        .map(Year::as_number)
        .collect::<Result<Vec<_>>>()?;
    match (numbers.iter().min(), numbers.iter().max()) {
        (Some(min), Some(max)) => Ok((*min, *max)),
        _ => Err(Error::EmptyYearFilter),
    }
}

/// Wall-clock time between a commit and `now`. The commit's offset is
/// dropped, not converted.
pub fn elapsed_since(commit: &DateTime<FixedOffset>, now: NaiveDateTime) -> chrono::Duration {
    now - commit.naive_local()
}

/// Render a duration as `"3 days, 4:05:06"` (or `"4:05:06"` under a day).
pub fn format_elapsed(elapsed: chrono::Duration) -> String {
    let total = elapsed.num_seconds();
    let days = total.div_euclid(86_400);
    let rest = total.rem_euclid(86_400);
    let clock = format!("{}:{:02}:{:02}", rest / 3600, (rest % 3600) / 60, rest % 60);
    match days {
        0 => clock,
        1 | -1 => format!("{days} day, {clock}"),
        _ => format!("{days} days, {clock}"),
    }
}

/// Entry of a GitHub Contents API directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryFile {
    pub name: String,
    /// `null` for directories and submodules.
    #[serde(default)]
    pub download_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BranchInfo {
    commit: BranchCommit,
}

#[derive(Debug, Deserialize)]
struct BranchCommit {
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    author: CommitAuthor,
}

#[derive(Debug, Deserialize)]
struct CommitAuthor {
    date: String,
}

/// Reads branch metadata and the data directory of the configured repository.
pub struct GithubRepository {
    client: Client,
    config: RepositoryConfig,
}

impl GithubRepository {
    pub fn new(client: Client, config: RepositoryConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    fn api_request(&self, tail: &[&str]) -> Result<CallRequest> {
        let accept = HeaderValue::from_str(&self.config.accept).map_err(|e| {
            Error::InvalidArgument(format!("invalid Accept header {:?}: {e}", self.config.accept))
        })?;
        let segments = ["repos", self.config.owner.as_str(), self.config.name.as_str()]
            .into_iter()
            .chain(tail.iter().copied());
        Ok(CallRequest::get()
            .network_location(self.config.api_host.as_str())
            .scheme(self.config.scheme.as_str())
            .path(UrlPath::segments(segments))
            .header(ACCEPT, accept))
    }

    /// Issue `request` and return the body, or fail unless GitHub says 200.
    async fn fetch_json_text(&self, request: CallRequest) -> Result<String> {
        let url = request.target()?;
        let response = make_call(&self.client, request).await?;
        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::OK {
            error!(url = %url, status = %status, "GitHub API returned error. Response body: {body}");
            return Err(Error::UpstreamStatus { url, status, body });
        }
        Ok(body)
    }
}

#[async_trait]
impl DataRepository for GithubRepository {
    async fn introduce_repository(&self, branch: &str) -> Result<()> {
        let request = self.api_request(&["branches", branch])?;
        let body = self.fetch_json_text(request).await?;
        let info: BranchInfo = serde_json::from_str(&body)?;
        let last_commit = DateTime::parse_from_rfc3339(&info.commit.commit.author.date)?;

        info!(
            repository = %self.config.slug(),
            branch = branch,
            "Loading data from {}:{}",
            self.config.slug(),
            branch
        );
        let elapsed = elapsed_since(&last_commit, Utc::now().naive_utc());
        info!(
            last_commit = %last_commit,
            "Last commit {}",
            format_elapsed(elapsed)
        );
        Ok(())
    }

    async fn list_files(
        &self,
        years: &[Year],
        branch: &str,
        extensions: &ExtensionFilter,
    ) -> Result<Vec<String>> {
        let request = self
            .api_request(&["contents", self.config.data_dir.as_str()])?
            .param("ref", branch);
        let body = self.fetch_json_text(request).await?;
        let entries: Vec<RepositoryFile> = serde_json::from_str(&body)?;
        debug!(entries = entries.len(), branch = branch, "Fetched data directory listing");

        let mut filtered_files = Vec::new();
        for entry in entries {
            if !matches_file(&entry.name, years, extensions) {
                continue;
            }
            match entry.download_url {
                Some(download_url) => filtered_files.push(download_url),
                None => warn!(name = %entry.name, "Matching entry has no download URL, skipping"),
            }
        }

        let (min, max) = year_range(years)?;
        info!(
            files = filtered_files.len(),
            "{} years of data returned between {} and {}",
            filtered_files.len(),
            min,
            max
        );
        Ok(filtered_files)
    }
}
