use std::fs::{write, File};
use std::path::PathBuf;
use std::sync::Arc;

use arrow::array::{Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use nfl_pbp::aggregate::read_parquet;
use nfl_pbp::cli::{run, Cli};
use nfl_pbp::config::AppConfig;
use parquet::arrow::ArrowWriter;
use serde_json::json;
use tempfile::{tempdir, NamedTempFile};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn season_parquet(season: i64, rows: i64) -> Vec<u8> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("play_id", DataType::Int64, false),
        Field::new("season", DataType::Int64, false),
    ]));
    let table = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(0..rows)),
            Arc::new(Int64Array::from(vec![season; rows as usize])),
        ],
    )
    .expect("valid batch");
    let mut buffer = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buffer, schema, None).expect("writer");
    writer.write(&table).expect("write");
    writer.close().expect("close");
    buffer
}

#[test]
fn cli_without_arguments_uses_stock_run() {
    let cli = Cli::try_parse_from(["nfl-pbp"]).expect("no arguments are valid");
    let config = cli.resolve_config().expect("defaults resolve");
    assert_eq!(config, AppConfig::default());
    assert_eq!(config.run.start_year, 2010);
    assert_eq!(config.run.end_year, 2020);
    assert_eq!(config.run.branch, "master");
    assert_eq!(config.output, None);
}

#[test]
fn cli_flags_override_config_file() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), "run:\n  branch: dev\n  start_year: 2000\n").unwrap();

    let cli = Cli::try_parse_from([
        "nfl-pbp",
        "--config",
        config_file.path().to_str().expect("utf-8 path"),
        "--end-year",
        "2003",
        "--extension",
        ".csv",
        "--extension",
        ".gz",
        "--output",
        "out.parquet",
    ])
    .expect("arguments parse");
    let config = cli.resolve_config().expect("config resolves");

    assert_eq!(config.run.branch, "dev");
    assert_eq!(config.run.start_year, 2000);
    assert_eq!(config.run.end_year, 2003);
    assert_eq!(config.run.file_extensions, vec![".csv", ".gz"]);
    assert_eq!(config.output, Some(PathBuf::from("out.parquet")));
}

#[test]
fn cli_rejects_inverted_year_flags() {
    let cli = Cli::try_parse_from(["nfl-pbp", "--start-year", "2021", "--end-year", "2020"])
        .expect("arguments parse");
    let err = cli.resolve_config().unwrap_err();
    assert!(err.to_string().contains("after end year"), "got: {err}");
}

#[tokio::test]
async fn cli_run_downloads_and_writes_aggregated_table() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/repos/guga31bb/nflfastR-data/branches/master"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "master",
            "commit": { "commit": { "author": { "date": "2021-02-04T17:31:22Z" } } }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/guga31bb/nflfastR-data/contents/data"))
        .and(query_param("ref", "master"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "play_by_play_2018.parquet", "download_url": format!("{base}/raw/play_by_play_2018.parquet") },
            { "name": "play_by_play_2019.parquet", "download_url": format!("{base}/raw/play_by_play_2019.parquet") },
            { "name": "play_by_play_2019.csv.gz", "download_url": format!("{base}/raw/play_by_play_2019.csv.gz") },
            { "name": "play_by_play_2020.parquet", "download_url": format!("{base}/raw/play_by_play_2020.parquet") },
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    for (season, rows) in [(2019, 100), (2020, 250)] {
        Mock::given(method("GET"))
            .and(path(format!("/raw/play_by_play_{season}.parquet")))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(season_parquet(season, rows)))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let out_dir = tempdir().expect("tempdir");
    let output = out_dir.path().join("pbp.parquet");
    let config_file = NamedTempFile::new().expect("temp file");
    let config_yaml = format!(
        "repository:\n  api_host: \"{}\"\n  scheme: http\nrun:\n  start_year: 2019\n  end_year: 2020\n",
        mock_server.address()
    );
    write(config_file.path(), config_yaml).unwrap();

    let cli = Cli {
        config: Some(config_file.path().to_path_buf()),
        output: Some(output.clone()),
        ..Cli::default()
    };
    run(cli).await.expect("run succeeds");

    let table = read_parquet(File::open(&output).expect("output written")).expect("readable");
    assert_eq!(table.num_rows(), 350);
    let seasons = table
        .column_by_name("season")
        .expect("season column")
        .as_any()
        .downcast_ref::<Int64Array>()
        .expect("int64 column");
    assert_eq!(seasons.value(0), 2019);
    assert_eq!(seasons.value(99), 2019);
    assert_eq!(seasons.value(100), 2020);
    assert_eq!(seasons.value(349), 2020);
}
