//! Dedup & clean stage.
//!
//! One left-to-right pass over the raw export: drop records without a slug or
//! with a slug already seen, and rewrite each kept record's batch label to its
//! canonical form. Every change is reported to a caller-supplied observer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashSet;
use tracing::{debug, info};

use crate::constants::{FIELD_BATCH, UNSPECIFIED_BATCH};
use crate::observability::metrics;
use crate::pipeline::processing::normalize::normalize_batch;
use crate::types::CompanyRecord;

/// Tallies from one clean pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanStats {
    pub raw_count: usize,
    pub clean_count: usize,
    /// Everything dropped, i.e. `raw_count - clean_count`. Records dropped for
    /// a missing slug are included here and also counted separately below.
    pub duplicates_removed: usize,
    pub normalizations_applied: usize,
    pub missing_slug_dropped: usize,
}

/// Structured audit events emitted while cleaning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CleanEvent {
    /// A kept record's batch label was rewritten
    BatchNormalized {
        position: usize,
        slug: String,
        name: Option<String>,
        /// Previous batch: the string itself, or the JSON text of a non-string
        /// value such as `null` or `2014`. `None` when the field was absent.
        from: Option<String>,
        to: String,
    },
    /// A record repeated an already seen slug and was dropped
    DuplicateDropped { position: usize, slug: String },
    /// A record had no usable slug and was dropped
    MissingSlug { position: usize },
    /// Final tallies for the pass
    Finished(CleanStats),
}

/// Receives audit events from `clean`. Rendering is up to the implementation.
pub trait CleanObserver {
    fn on_event(&mut self, event: &CleanEvent);
}

/// Observer that discards everything
pub struct NoopObserver;

impl CleanObserver for NoopObserver {
    fn on_event(&mut self, _event: &CleanEvent) {}
}

impl CleanObserver for Vec<CleanEvent> {
    fn on_event(&mut self, event: &CleanEvent) {
        self.push(event.clone());
    }
}

/// Logs each event through `tracing`
#[derive(Debug, Default)]
pub struct TracingObserver;

impl CleanObserver for TracingObserver {
    fn on_event(&mut self, event: &CleanEvent) {
        match event {
            CleanEvent::BatchNormalized { position, slug, name, from, to } => {
                info!(
                    position,
                    slug = %slug,
                    name = name.as_deref().unwrap_or("Unknown"),
                    from = from.as_deref().unwrap_or(UNSPECIFIED_BATCH),
                    to = %to,
                    "Batch normalized"
                );
            }
            CleanEvent::DuplicateDropped { position, slug } => {
                debug!(position, slug = %slug, "Dropped duplicate record");
            }
            CleanEvent::MissingSlug { position } => {
                debug!(position, "Dropped record without slug");
            }
            CleanEvent::Finished(stats) => {
                info!(
                    raw_count = stats.raw_count,
                    clean_count = stats.clean_count,
                    duplicates_removed = stats.duplicates_removed,
                    normalizations_applied = stats.normalizations_applied,
                    "Data cleaning completed"
                );
            }
        }
    }
}

/// Output of a clean pass
#[derive(Debug, Clone, PartialEq)]
pub struct CleanOutcome {
    pub records: Vec<CompanyRecord>,
    pub stats: CleanStats,
}

/// Deduplicate by slug and normalize batch labels in a single pass.
///
/// The first record carrying a slug wins; later ones are dropped, never
/// merged. Records without a slug are dropped. Every kept record has its
/// batch replaced by the canonical label.
pub fn clean(raw_records: Vec<CompanyRecord>, observer: &mut dyn CleanObserver) -> CleanOutcome {
    let raw_count = raw_records.len();
    let mut seen_slugs: HashSet<String> = HashSet::with_capacity(raw_count);
    let mut records = Vec::with_capacity(raw_count);
    let mut normalizations_applied = 0;
    let mut missing_slug_dropped = 0;

    for (position, mut record) in raw_records.into_iter().enumerate() {
        let slug = match record.slug() {
            Some(slug) => slug.to_string(),
            None => {
                missing_slug_dropped += 1;
                observer.on_event(&CleanEvent::MissingSlug { position });
                continue;
            }
        };
        if seen_slugs.contains(&slug) {
            observer.on_event(&CleanEvent::DuplicateDropped { position, slug });
            continue;
        }

        let normalized = normalize_batch(record.batch());
        // An absent field already means Unspecified; null and non-string
        // values are real rewrites
        let changed = match record.get(FIELD_BATCH) {
            None => false,
            Some(Value::String(current)) => *current != normalized,
            Some(_) => true,
        };
        if changed {
            let original = record.batch_label().map(Cow::into_owned);
            normalizations_applied += 1;
            observer.on_event(&CleanEvent::BatchNormalized {
                position,
                slug: slug.clone(),
                name: record.name().map(str::to_string),
                from: original,
                to: normalized.clone(),
            });
        }
        record.set_batch(normalized);

        seen_slugs.insert(slug);
        records.push(record);
    }

    let clean_count = records.len();
    let stats = CleanStats {
        raw_count,
        clean_count,
        duplicates_removed: raw_count - clean_count,
        normalizations_applied,
        missing_slug_dropped,
    };

    metrics::clean::pass_completed(&stats);
    observer.on_event(&CleanEvent::Finished(stats));

    CleanOutcome { records, stats }
}

/// `clean` without an audit observer
pub fn clean_records(raw_records: Vec<CompanyRecord>) -> CleanOutcome {
    clean(raw_records, &mut NoopObserver)
}

/// Metadata written next to the clean output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingMetadata {
    pub processed_at: DateTime<Utc>,
    pub raw_count: usize,
    pub clean_count: usize,
    pub duplicates_removed: usize,
    pub normalizations_applied: usize,
}

impl ProcessingMetadata {
    pub fn from_stats(stats: &CleanStats, processed_at: DateTime<Utc>) -> Self {
        Self {
            processed_at,
            raw_count: stats.raw_count,
            clean_count: stats.clean_count,
            duplicates_removed: stats.duplicates_removed,
            normalizations_applied: stats.normalizations_applied,
        }
    }
}
