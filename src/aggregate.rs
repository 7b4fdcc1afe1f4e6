//! Cross-year aggregation: download each season file and stack the tables.

use std::fs::File;
use std::path::Path;

use arrow::compute::concat_batches;
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::file::reader::ChunkReader;
use reqwest::Client;
use tracing::{error, info};

use crate::call::{make_call, CallRequest};
use crate::contract::TableSource;
use crate::error::{Error, Result};

/// Fetches parquet files over plain HTTP GET.
pub struct HttpTableSource {
    client: Client,
}

impl HttpTableSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TableSource for HttpTableSource {
    async fn fetch_table(&self, url: &str) -> Result<RecordBatch> {
        let response = make_call(&self.client, CallRequest::get().url(url)).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(url = %url, status = %status, "Data file request failed");
            return Err(Error::UpstreamStatus {
                url: url.to_string(),
                status,
                body,
            });
        }
        let bytes = response.bytes().await?;
        read_parquet(bytes)
    }
}

/// Decode a whole parquet file into a single record batch.
pub fn read_parquet<R: ChunkReader + 'static>(reader: R) -> Result<RecordBatch> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(reader)?;
    let schema = builder.schema().clone();
    let batches = builder
        .build()?
        .collect::<Result<Vec<_>, ArrowError>>()?;
    Ok(concat_batches(&schema, &batches)?)
}

/// Load every file in `file_urls`, in order, and concatenate them.
///
/// All tables must share the first table's columns; the first fetch or
/// schema failure aborts the whole aggregation.
pub async fn aggregate(source: &dyn TableSource, file_urls: &[String]) -> Result<RecordBatch> {
    let mut tables: Vec<RecordBatch> = Vec::with_capacity(file_urls.len());
    for url in file_urls {
        let table = source.fetch_table(url).await?;
        info!(rows = table.num_rows(), url = %url, "Loading {} rows: {}", table.num_rows(), url);

        if let Some(first) = tables.first() {
            if first.schema().fields() != table.schema().fields() {
                error!(
                    url = %url,
                    expected = ?first.schema().fields(),
                    found = ?table.schema().fields(),
                    "Table columns differ from the first table"
                );
                return Err(Error::SchemaMismatch { url: url.clone() });
            }
        }
        tables.push(table);
    }

    let schema = tables.first().ok_or(Error::NothingToAggregate)?.schema();
    let combined = concat_batches(&schema, &tables)?;
    info!(
        rows = combined.num_rows(),
        "Final dataset prepared, {} rows",
        combined.num_rows()
    );
    Ok(combined)
}

/// Write `table` to `path` as a parquet file.
pub fn write_parquet(table: &RecordBatch, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, table.schema(), None)?;
    writer.write(table)?;
    writer.close()?;
    info!(path = %path.display(), rows = table.num_rows(), "Wrote aggregated table");
    Ok(())
}
