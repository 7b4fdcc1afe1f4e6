//! Coordinating module for the introduce -> list -> aggregate run.

use arrow::record_batch::RecordBatch;
use tracing::{error, info};

use crate::aggregate::aggregate;
use crate::config::RunPlan;
use crate::contract::{DataRepository, TableSource};
use crate::error::Result;
use crate::github::ExtensionFilter;

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub branch: String,
    pub files: Vec<String>,
    pub total_rows: usize,
    pub columns: Vec<String>,
}

/// The aggregated table and the report describing it.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub table: RecordBatch,
    pub report: PipelineReport,
}

pub async fn run_pipeline(
    repository: &dyn DataRepository,
    tables: &dyn TableSource,
    plan: &RunPlan,
) -> Result<PipelineOutcome> {
    info!(
        branch = %plan.branch,
        start_year = plan.start_year,
        end_year = plan.end_year,
        "[PIPELINE] Starting play-by-play download"
    );

    repository
        .introduce_repository(&plan.branch)
        .await
        .inspect_err(|e| error!(error = %e, "[PIPELINE][ERROR] Repository introduction failed"))?;

    let years = plan.years();
    let extensions = ExtensionFilter::new(plan.file_extensions.iter().cloned());
    let files = repository
        .list_files(&years, &plan.branch, &extensions)
        .await
        .inspect_err(|e| error!(error = %e, "[PIPELINE][ERROR] Listing data files failed"))?;
    info!(files = files.len(), "[PIPELINE] Data files selected");

    let table = aggregate(tables, &files)
        .await
        .inspect_err(|e| error!(error = %e, "[PIPELINE][ERROR] Aggregation failed"))?;

    let report = PipelineReport {
        branch: plan.branch.clone(),
        files,
        total_rows: table.num_rows(),
        columns: table
            .schema()
            .fields()
            .iter()
            .map(|field| field.name().clone())
            .collect(),
    };
    info!(rows = report.total_rows, columns = report.columns.len(), "[PIPELINE] Completed");
    Ok(PipelineOutcome { table, report })
}
