use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};

use crate::model::ImportRunReport;

const RUN_STAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

pub(super) fn run_id_for(started: DateTime<Utc>) -> String {
    format!("run-{}", started.format(RUN_STAMP_FORMAT))
}

// Report filenames share the run stamp so the lexically greatest file is the
// most recent run (the status command relies on this).
pub(super) fn report_filename_for(started: DateTime<Utc>) -> String {
    format!("import_run_{}.json", started.format(RUN_STAMP_FORMAT))
}

pub(super) fn rfc3339_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

// The report pins the exact input bytes that produced it, not just the path.
// Streamed so the order file is not held in memory a second time.
pub(super) fn input_sha256(input_path: &Path) -> Result<String> {
    let mut file = File::open(input_path)
        .with_context(|| format!("failed to open input for hashing: {}", input_path.display()))?;

    let mut hasher = Sha256::new();
    let mut buf = [0_u8; 8192];

    loop {
        let count = file
            .read(&mut buf)
            .with_context(|| format!("failed to hash input: {}", input_path.display()))?;
        if count == 0 {
            break;
        }
        hasher.update(&buf[..count]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

pub(super) fn write_report(report_path: &Path, report: &ImportRunReport) -> Result<()> {
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }

    let data = serde_json::to_vec_pretty(report)
        .with_context(|| format!("failed to serialize report: {}", report_path.display()))?;

    let mut file = File::create(report_path)
        .with_context(|| format!("failed to create report: {}", report_path.display()))?;
    file.write_all(&data)
        .with_context(|| format!("failed to write report: {}", report_path.display()))?;
    file.write_all(b"\n")
        .with_context(|| format!("failed to finalize report: {}", report_path.display()))?;

    Ok(())
}
