//! Publication gate for a finished dataset.
//!
//! Runs every check on every call and collects all defects; nothing stops at
//! the first failure.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::config::ValidationThresholds;
use crate::constants::{MISSING_BATCH_PLACEHOLDER, REQUIRED_FIELDS};
use crate::observability::metrics;
use crate::types::CompanyRecord;

/// Canonical batch grammar for published datasets
static CANONICAL_BATCH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(W|S|F|Sp)[0-9]{2}$|^IK[0-9]{2}$|^Unspecified$")
        .unwrap_or_else(|e| panic!("invalid canonical batch pattern: {e}"))
});

pub fn is_canonical_batch(label: &str) -> bool {
    CANONICAL_BATCH.is_match(label)
}

/// A single data-quality violation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Defect {
    /// Distinct batch values outside the canonical grammar, sorted
    InvalidBatchFormat { values: Vec<String> },
    /// Slugs occurring more than once. `sample` is bounded, `total` counts
    /// every distinct duplicated slug.
    DuplicateSlug { sample: Vec<String>, total: usize },
    /// A required field is absent or empty in the sampled records
    MissingField { position: usize, field: String },
    /// Share of records with an embedding fell below the threshold
    LowEmbeddingCoverage { observed: f64, required: f64 },
    /// Nothing to validate
    EmptyDataset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DefectKind {
    InvalidBatchFormat,
    DuplicateSlug,
    MissingField,
    LowEmbeddingCoverage,
    EmptyDataset,
}

impl DefectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefectKind::InvalidBatchFormat => "invalid_batch_format",
            DefectKind::DuplicateSlug => "duplicate_slug",
            DefectKind::MissingField => "missing_field",
            DefectKind::LowEmbeddingCoverage => "low_embedding_coverage",
            DefectKind::EmptyDataset => "empty_dataset",
        }
    }
}

impl Defect {
    pub fn kind(&self) -> DefectKind {
        match self {
            Defect::InvalidBatchFormat { .. } => DefectKind::InvalidBatchFormat,
            Defect::DuplicateSlug { .. } => DefectKind::DuplicateSlug,
            Defect::MissingField { .. } => DefectKind::MissingField,
            Defect::LowEmbeddingCoverage { .. } => DefectKind::LowEmbeddingCoverage,
            Defect::EmptyDataset => DefectKind::EmptyDataset,
        }
    }
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Defect::InvalidBatchFormat { values } => {
                write!(f, "Invalid batch formats: {:?}", values)
            }
            Defect::DuplicateSlug { sample, total } => {
                write!(f, "Duplicate company slugs found ({} total): {:?}", total, sample)?;
                if *total > sample.len() {
                    write!(f, "...")?;
                }
                Ok(())
            }
            Defect::MissingField { position, field } => {
                write!(f, "Company {}: missing {}", position, field)
            }
            Defect::LowEmbeddingCoverage { observed, required } => write!(
                f,
                "Low embedding coverage: {:.1}% (expected >= {:.1}%)",
                observed * 100.0,
                required * 100.0
            ),
            Defect::EmptyDataset => write!(f, "Dataset contains no records"),
        }
    }
}

/// Counts for the human-readable report, filled in whether or not the run passed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total_records: usize,
    pub unique_batches: usize,
    pub records_with_embeddings: usize,
    pub embedding_coverage: f64,
}

/// Complete result of one validation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub passed: bool,
    pub defects: Vec<Defect>,
    pub summary: ValidationSummary,
}

impl Verdict {
    pub fn has(&self, kind: DefectKind) -> bool {
        self.defects.iter().any(|d| d.kind() == kind)
    }

    /// Distinct defect kinds that fired, in a stable order
    pub fn kinds(&self) -> BTreeSet<DefectKind> {
        self.defects.iter().map(Defect::kind).collect()
    }
}

/// Gate that decides whether a finished dataset may be published
pub trait QualityGate {
    fn validate(&self, records: &[CompanyRecord]) -> Verdict;
}

/// Default gate running the batch, uniqueness, required-field and coverage checks
#[derive(Debug, Clone, Default)]
pub struct DatasetQualityGate {
    pub thresholds: ValidationThresholds,
}

impl DatasetQualityGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: ValidationThresholds) -> Self {
        Self { thresholds }
    }

    fn check_batch_format(&self, batches: &BTreeSet<Cow<'_, str>>) -> Option<Defect> {
        let values: Vec<String> = batches
            .iter()
            .filter(|b| !is_canonical_batch(b.as_ref()))
            .map(|b| b.to_string())
            .collect();

        if values.is_empty() {
            None
        } else {
            Some(Defect::InvalidBatchFormat { values })
        }
    }

    fn check_unique_slugs(&self, records: &[CompanyRecord]) -> Option<Defect> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for slug in records.iter().filter_map(CompanyRecord::slug) {
            *counts.entry(slug).or_insert(0) += 1;
        }

        let duplicated: Vec<&str> = counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(slug, _)| slug)
            .collect();

        if duplicated.is_empty() {
            return None;
        }
        Some(Defect::DuplicateSlug {
            total: duplicated.len(),
            sample: duplicated
                .iter()
                .take(self.thresholds.duplicate_slug_sample_size)
                .map(|s| s.to_string())
                .collect(),
        })
    }

    /// Only the leading `required_field_sample_size` records are inspected
    fn check_required_fields(&self, records: &[CompanyRecord]) -> Vec<Defect> {
        let mut defects = Vec::new();
        for (position, record) in records
            .iter()
            .take(self.thresholds.required_field_sample_size)
            .enumerate()
        {
            for field in REQUIRED_FIELDS {
                if !record.has_text(field) {
                    defects.push(Defect::MissingField {
                        position,
                        field: field.to_string(),
                    });
                }
            }
        }
        defects
    }

    fn check_embedding_coverage(&self, coverage: f64) -> Option<Defect> {
        let required = self.thresholds.min_embedding_coverage;
        if coverage >= required {
            None
        } else {
            Some(Defect::LowEmbeddingCoverage {
                observed: coverage,
                required,
            })
        }
    }
}

impl QualityGate for DatasetQualityGate {
    fn validate(&self, records: &[CompanyRecord]) -> Verdict {
        let total_records = records.len();
        // Non-string batches show up as their JSON text; only an absent key
        // is reported under the placeholder
        let batches: BTreeSet<Cow<'_, str>> = records
            .iter()
            .map(|r| r.batch_label().unwrap_or(Cow::Borrowed(MISSING_BATCH_PLACEHOLDER)))
            .collect();
        let records_with_embeddings = records.iter().filter(|r| r.has_embedding()).count();
        let embedding_coverage = if total_records == 0 {
            0.0
        } else {
            records_with_embeddings as f64 / total_records as f64
        };

        let mut defects = Vec::new();
        if total_records == 0 {
            defects.push(Defect::EmptyDataset);
        }
        defects.extend(self.check_batch_format(&batches));
        defects.extend(self.check_unique_slugs(records));
        defects.extend(self.check_required_fields(records));
        if total_records > 0 {
            defects.extend(self.check_embedding_coverage(embedding_coverage));
        }

        let verdict = Verdict {
            passed: defects.is_empty(),
            defects,
            summary: ValidationSummary {
                total_records,
                unique_batches: batches.len(),
                records_with_embeddings,
                embedding_coverage,
            },
        };
        metrics::validation::verdict_recorded(&verdict);
        verdict
    }
}

/// Validate with explicit thresholds
pub fn validate(records: &[CompanyRecord], thresholds: &ValidationThresholds) -> Verdict {
    DatasetQualityGate::with_thresholds(thresholds.clone()).validate(records)
}

pub fn validate_with_defaults(records: &[CompanyRecord]) -> Verdict {
    DatasetQualityGate::new().validate(records)
}
