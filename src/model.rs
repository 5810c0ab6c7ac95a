use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportPaths {
    pub cache_root: String,
    pub input_path: String,
    pub db_path: String,
    pub report_path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportCounts {
    pub records_read: usize,
    pub orders_grouped: usize,
    pub items_grouped: usize,
    pub unrecognized_records: usize,
    pub malformed_items: usize,
    pub orphan_items: usize,
    pub empty_groups: usize,
    pub bad_date_groups: usize,
    pub orders_persisted: usize,
    pub details_inserted: usize,
    pub store_failures: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportReportSummary {
    pub run_id: Option<String>,
    pub status: Option<String>,
    pub updated_at: Option<String>,
    pub counts: Option<ImportCounts>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportRunReport {
    pub report_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub input_sha256: String,
    pub paths: ImportPaths,
    pub counts: ImportCounts,
    pub warnings: Vec<String>,
}
