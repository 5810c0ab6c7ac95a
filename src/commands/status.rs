use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::model::ImportReportSummary;

pub fn run(args: StatusArgs) -> Result<()> {
    let db_path = resolve_db_path(&args);
    let reports_dir = args.cache_root.join("reports");

    info!(cache_root = %args.cache_root.display(), "status requested");

    if db_path.exists() {
        let connection = Connection::open(&db_path)
            .with_context(|| format!("failed to open {}", db_path.display()))?;

        let schema_present: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'order'",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0);

        if schema_present > 0 {
            let orders = query_count(&connection, "SELECT COUNT(*) FROM \"order\"").unwrap_or(0);
            let details =
                query_count(&connection, "SELECT COUNT(*) FROM order_details").unwrap_or(0);
            info!(
                path = %db_path.display(),
                orders,
                details,
                "database status"
            );
        } else {
            warn!(path = %db_path.display(), "database exists but storefront schema is missing");
        }
    } else {
        warn!(path = %db_path.display(), "database file missing");
    }

    match latest_report_path(&reports_dir)? {
        Some(report_path) => {
            let raw = fs::read(&report_path)
                .with_context(|| format!("failed to read {}", report_path.display()))?;
            let report: ImportReportSummary = serde_json::from_slice(&raw)
                .with_context(|| format!("failed to parse {}", report_path.display()))?;
            let counts = report.counts.unwrap_or_default();

            info!(
                path = %report_path.display(),
                run_id = %report.run_id.unwrap_or_default(),
                status = %report.status.unwrap_or_default(),
                updated_at = %report.updated_at.unwrap_or_default(),
                records_read = counts.records_read,
                orders_persisted = counts.orders_persisted,
                details_inserted = counts.details_inserted,
                store_failures = counts.store_failures,
                "latest import report"
            );
        }
        None => {
            warn!(path = %reports_dir.display(), "no import reports found");
        }
    }

    Ok(())
}

// Report filenames embed a compact UTC timestamp, so the lexical maximum is
// the most recent run.
fn latest_report_path(reports_dir: &std::path::Path) -> Result<Option<PathBuf>> {
    if !reports_dir.exists() {
        return Ok(None);
    }

    let mut latest: Option<PathBuf> = None;
    for entry in fs::read_dir(reports_dir)
        .with_context(|| format!("failed to list {}", reports_dir.display()))?
    {
        let path = entry?.path();
        let is_report = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("import_run_") && name.ends_with(".json"));
        if is_report && latest.as_ref().is_none_or(|current| path > *current) {
            latest = Some(path);
        }
    }

    Ok(latest)
}

fn query_count(connection: &Connection, sql: &str) -> Result<i64> {
    let count = connection.query_row(sql, [], |row| row.get(0))?;
    Ok(count)
}

fn resolve_db_path(args: &StatusArgs) -> PathBuf {
    if let Some(db_path) = &args.db_path {
        return db_path.clone();
    }
    if let Ok(db_path) = env::var("STOREFRONT_DB") {
        return PathBuf::from(db_path);
    }
    args.cache_root.join("storefront.sqlite")
}
