//! # contract: async seams between the pipeline and the outside world
//!
//! Two traits cover every network-facing step of a run:
//! - [`DataRepository`] talks to the GitHub REST API (branch metadata and
//!   the data directory listing).
//! - [`TableSource`] turns a file URL into an in-memory table.
//!
//! The pipeline only sees these traits, so tests can swap in the
//! `mockall`-generated `MockDataRepository` / `MockTableSource`.

use arrow::record_batch::RecordBatch;
use async_trait::async_trait;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::error::Error;
use crate::github::{ExtensionFilter, Year};

/// Read access to the repository that publishes the data files.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait DataRepository: Send + Sync {
    /// Log where data is loaded from and how old the branch head is.
    async fn introduce_repository(&self, branch: &str) -> Result<(), Error>;

    /// Download URLs of the data files matching `years` and `extensions`,
    /// in the order the repository lists them.
    async fn list_files(
        &self,
        years: &[Year],
        branch: &str,
        extensions: &ExtensionFilter,
    ) -> Result<Vec<String>, Error>;
}

/// Loads one remote columnar file into memory.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait TableSource: Send + Sync {
    async fn fetch_table(&self, url: &str) -> Result<RecordBatch, Error>;
}
