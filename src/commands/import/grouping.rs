use std::collections::HashMap;

use anyhow::{Result, bail};
use tracing::{error, warn};

use crate::model::{ImportCounts, LineItem};

use super::record::{RawRecord, parse_record};

#[derive(Debug)]
pub(super) struct GroupingOutcome {
    pub groups: HashMap<String, Vec<LineItem>>,
    pub counts: ImportCounts,
}

// A date key seen on a second `order` line is fatal: the persistence pass
// cannot tell which occurrence the following items belong to, so the whole
// grouping structure is dumped and the run aborts before any store call.
pub(super) fn group_records(lines: &[&str]) -> Result<GroupingOutcome> {
    let mut groups: HashMap<String, Vec<LineItem>> = HashMap::new();
    let mut current_key: Option<String> = None;
    let mut counts = ImportCounts::default();

    for line in lines {
        counts.records_read += 1;

        match parse_record(line) {
            RawRecord::Order { date_key } => {
                if groups.contains_key(&date_key) {
                    error!(record = %line, key = %date_key, "duplicate order key");
                    for (key, items) in &groups {
                        error!(key = %key, items = ?items, "grouping structure at failure");
                    }
                    bail!("duplicate order key in input: {date_key}");
                }
                groups.insert(date_key.clone(), Vec::new());
                current_key = Some(date_key);
            }
            RawRecord::Item(item) => match current_key.as_deref() {
                Some(key) => {
                    // the order line that set current_key created this group
                    let Some(items) = groups.get_mut(key) else {
                        bail!("no group for current order key: {key}");
                    };
                    items.push(item);
                    counts.items_grouped += 1;
                }
                None => {
                    warn!(record = %line, "item record before any order record, dropped");
                    counts.orphan_items += 1;
                }
            },
            RawRecord::BadItem => {
                warn!(
                    record = %line,
                    key = %current_key.as_deref().unwrap_or("<none>"),
                    "item record with unparseable quantity, dropped"
                );
                counts.malformed_items += 1;
            }
            RawRecord::Unrecognized => {
                warn!(
                    record = %line,
                    key = %current_key.as_deref().unwrap_or("<none>"),
                    "unrecognized record kind, skipped"
                );
                counts.unrecognized_records += 1;
            }
        }
    }

    counts.orders_grouped = groups.len();

    let empty_keys: Vec<&str> = groups
        .iter()
        .filter(|(_, items)| items.is_empty())
        .map(|(key, _)| key.as_str())
        .collect();
    if !empty_keys.is_empty() {
        warn!(keys = ?empty_keys, "order groups with no line items will be skipped");
        counts.empty_groups = empty_keys.len();
    }

    Ok(GroupingOutcome { groups, counts })
}
