use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use regex::Regex;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// chrono's %Y accepts two-digit years, so a fixed-width shape check runs
// first; chrono then rejects calendrically impossible values (month 13,
// Feb 30) instead of rolling them over.
pub(super) struct DateKeyValidator {
    shape: Regex,
}

impl DateKeyValidator {
    pub fn new() -> Result<Self> {
        let shape = Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$")
            .context("failed to compile date key pattern")?;
        Ok(Self { shape })
    }

    pub fn parse(&self, date_key: &str) -> Result<NaiveDateTime> {
        if !self.shape.is_match(date_key) {
            bail!("date key does not match YYYY-MM-DD HH:MM:SS: {date_key}");
        }

        NaiveDateTime::parse_from_str(date_key, DATE_KEY_FORMAT)
            .with_context(|| format!("date key is not a valid calendar date: {date_key}"))
    }
}
