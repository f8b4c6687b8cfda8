//! Pre-clean profile of a raw export.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use tracing::{info, warn};

use crate::constants::MISSING_BATCH_PLACEHOLDER;
use crate::pipeline::processing::normalize::is_long_form;
use crate::types::CompanyRecord;

/// Read-only analysis of a raw export, taken before cleaning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProfile {
    pub total_records: usize,
    /// Records whose batch is spelled out, e.g. "Winter 2014"
    pub long_form_batches: usize,
    pub unique_batches: usize,
    /// Non-empty slugs beyond the first occurrence of each
    pub duplicate_slugs: usize,
    pub duplicate_rate: f64,
    pub high_duplicate_rate: bool,
}

/// Profile the raw records. `high_duplicate_rate` is the share of duplicates
/// above which the profile is flagged.
pub fn profile_raw(records: &[CompanyRecord], high_duplicate_rate: f64) -> RawProfile {
    let total_records = records.len();

    let mut batches: HashSet<Cow<'_, str>> = HashSet::new();
    let mut long_form_batches = 0;
    for record in records {
        if record.batch().is_some_and(is_long_form) {
            long_form_batches += 1;
        }
        batches.insert(
            record
                .batch_label()
                .unwrap_or(Cow::Borrowed(MISSING_BATCH_PLACEHOLDER)),
        );
    }

    let slugs: Vec<&str> = records.iter().filter_map(CompanyRecord::slug).collect();
    let distinct: HashSet<&str> = slugs.iter().copied().collect();
    let duplicate_slugs = slugs.len() - distinct.len();

    let duplicate_rate = if total_records == 0 {
        0.0
    } else {
        duplicate_slugs as f64 / total_records as f64
    };

    RawProfile {
        total_records,
        long_form_batches,
        unique_batches: batches.len(),
        duplicate_slugs,
        duplicate_rate,
        high_duplicate_rate: duplicate_slugs as f64 > total_records as f64 * high_duplicate_rate,
    }
}

impl RawProfile {
    /// Emit the profile to the log, warning when the duplicate rate is high
    pub fn log(&self) {
        info!(
            total_records = self.total_records,
            long_form_batches = self.long_form_batches,
            unique_batches = self.unique_batches,
            duplicate_slugs = self.duplicate_slugs,
            "Raw data analysis"
        );
        if self.high_duplicate_rate {
            warn!(
                duplicate_rate = self.duplicate_rate,
                duplicate_slugs = self.duplicate_slugs,
                "High duplicate rate detected in raw data"
            );
        }
    }
}
