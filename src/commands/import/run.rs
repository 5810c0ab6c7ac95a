use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::ImportArgs;
use crate::model::{ImportPaths, ImportRunReport};

use super::dates::DateKeyValidator;
use super::document::encode_document;
use super::grouping::group_records;
use super::report::{input_sha256, report_filename_for, rfc3339_now, run_id_for, write_report};
use super::store::OrderStore;

const REPORT_VERSION: u32 = 1;
const DB_PATH_ENV: &str = "STOREFRONT_DB";

pub fn run(args: ImportArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = rfc3339_now();
    let run_id = run_id_for(started_ts);

    let cache_root = args.cache_root.clone();
    fs::create_dir_all(&cache_root)
        .with_context(|| format!("failed to create directory: {}", cache_root.display()))?;

    let db_path = resolve_db_path(&args);
    let report_path = args
        .report_path
        .clone()
        .unwrap_or_else(|| cache_root.join("reports").join(report_filename_for(started_ts)));

    info!(
        run_id = %run_id,
        input = %args.input.display(),
        db_path = %db_path.display(),
        "starting import"
    );

    let mut store = OrderStore::open(&db_path)?;
    if !store.schema_exists()? {
        info!("storefront schema does not exist");
        store.bootstrap()?;
        info!("storefront schema created, re-run to begin import");
        return Ok(());
    }

    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let input_sha256 = input_sha256(&args.input)?;
    let lines: Vec<&str> = raw.lines().collect();

    let outcome = group_records(&lines)?;
    let groups = outcome.groups;
    let mut counts = outcome.counts;

    info!(
        orders = counts.orders_grouped,
        items = counts.items_grouped,
        "grouping completed, beginning persistence"
    );

    let validator = DateKeyValidator::new()?;
    let mut warnings = Vec::new();

    for (date_key, items) in &groups {
        let order_date = match validator.parse(date_key) {
            Ok(order_date) => order_date,
            Err(err) => {
                warn!(key = %date_key, error = %err, "skipping order group with bad date key");
                counts.bad_date_groups += 1;
                warnings.push(format!("bad date key, group skipped: {date_key}"));
                continue;
            }
        };

        let Some(document) = encode_document(items)? else {
            warn!(key = %date_key, "skipping order group with no line items");
            warnings.push(format!("empty order group skipped: {date_key}"));
            continue;
        };

        match store.add_order(order_date, &document) {
            Ok((order_id, inserted)) => {
                info!(
                    key = %date_key,
                    order_id,
                    inserted,
                    expected = items.len(),
                    "order persisted"
                );
                if inserted != items.len() {
                    warn!(
                        key = %date_key,
                        inserted,
                        expected = items.len(),
                        "inserted detail count does not match group size"
                    );
                    warnings.push(format!(
                        "inserted count mismatch for {date_key}: {inserted} != {}",
                        items.len()
                    ));
                }
                counts.orders_persisted += 1;
                counts.details_inserted += inserted;
            }
            Err(err) => {
                warn!(key = %date_key, error = %err, "failed to persist order group");
                counts.store_failures += 1;
                warnings.push(format!("persistence failed for {date_key}: {err:#}"));
            }
        }
    }

    let orders_total = store.count_orders()?;
    let details_total = store.count_details()?;
    let updated_at = rfc3339_now();

    let report = ImportRunReport {
        report_version: REPORT_VERSION,
        run_id: run_id.clone(),
        status: "completed".to_string(),
        started_at,
        updated_at,
        input_sha256,
        paths: ImportPaths {
            cache_root: cache_root.display().to_string(),
            input_path: args.input.display().to_string(),
            db_path: db_path.display().to_string(),
            report_path: report_path.display().to_string(),
        },
        counts,
        warnings,
    };

    write_report(&report_path, &report)?;

    info!(path = %report_path.display(), "wrote import run report");
    info!(
        orders = orders_total,
        details = details_total,
        "import completed"
    );

    Ok(())
}

fn resolve_db_path(args: &ImportArgs) -> PathBuf {
    if let Some(db_path) = &args.db_path {
        return db_path.clone();
    }
    if let Ok(db_path) = env::var(DB_PATH_ENV) {
        return PathBuf::from(db_path);
    }
    args.cache_root.join("storefront.sqlite")
}
