//! Pipeline metrics recorded through the `metrics` facade.
//!
//! No recorder is installed by this crate; the host process decides where the
//! numbers go. Without a recorder every call here is a no-op.

use std::fmt;

/// Enum representing all metric names used in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Clean metrics
    CleanRecordsIn,
    CleanRecordsOut,
    CleanDuplicatesRemoved,
    CleanNormalizationsApplied,
    CleanMissingSlugs,

    // Embedding metrics
    EmbeddingRecordsEmbedded,
    EmbeddingRecordsSkipped,

    // Validation metrics
    ValidationRuns,
    ValidationDefects,
    ValidationEmbeddingCoverage,
    ValidationRecords,
}

impl MetricName {
    /// Get the metric name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::CleanRecordsIn => "yc_clean_records_in_total",
            MetricName::CleanRecordsOut => "yc_clean_records_out_total",
            MetricName::CleanDuplicatesRemoved => "yc_clean_duplicates_removed_total",
            MetricName::CleanNormalizationsApplied => "yc_clean_normalizations_applied_total",
            MetricName::CleanMissingSlugs => "yc_clean_missing_slugs_total",

            MetricName::EmbeddingRecordsEmbedded => "yc_embedding_records_embedded_total",
            MetricName::EmbeddingRecordsSkipped => "yc_embedding_records_skipped_total",

            MetricName::ValidationRuns => "yc_validation_runs_total",
            MetricName::ValidationDefects => "yc_validation_defects_total",
            MetricName::ValidationEmbeddingCoverage => "yc_validation_embedding_coverage",
            MetricName::ValidationRecords => "yc_validation_records",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub mod clean {
    use super::MetricName;
    use crate::pipeline::processing::clean::CleanStats;

    /// Record the tallies of a finished clean pass
    pub fn pass_completed(stats: &CleanStats) {
        let counts = [
            (MetricName::CleanRecordsIn, stats.raw_count),
            (MetricName::CleanRecordsOut, stats.clean_count),
            (MetricName::CleanDuplicatesRemoved, stats.duplicates_removed),
            (MetricName::CleanNormalizationsApplied, stats.normalizations_applied),
            (MetricName::CleanMissingSlugs, stats.missing_slug_dropped),
        ];
        for (name, count) in counts {
            ::metrics::counter!(name.as_str()).increment(count as u64);
        }
    }
}

pub mod embedding {
    use super::MetricName;
    use crate::pipeline::processing::enrich::EmbedStats;

    pub fn pass_completed(stats: &EmbedStats) {
        ::metrics::counter!(MetricName::EmbeddingRecordsEmbedded.as_str())
            .increment(stats.embedded as u64);
        ::metrics::counter!(MetricName::EmbeddingRecordsSkipped.as_str())
            .increment(stats.skipped as u64);
    }
}

pub mod validation {
    use super::MetricName;
    use crate::pipeline::processing::quality_gate::Verdict;

    /// Record the outcome of a validation run, with one defect counter per kind
    pub fn verdict_recorded(verdict: &Verdict) {
        let outcome = if verdict.passed { "passed" } else { "failed" };
        ::metrics::counter!(MetricName::ValidationRuns.as_str(), "outcome" => outcome)
            .increment(1);

        for defect in &verdict.defects {
            ::metrics::counter!(
                MetricName::ValidationDefects.as_str(),
                "kind" => defect.kind().as_str()
            )
            .increment(1);
        }

        ::metrics::gauge!(MetricName::ValidationEmbeddingCoverage.as_str())
            .set(verdict.summary.embedding_coverage);
        ::metrics::gauge!(MetricName::ValidationRecords.as_str())
            .set(verdict.summary.total_records as f64);
    }
}
