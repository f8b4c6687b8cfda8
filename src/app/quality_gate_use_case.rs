use tracing::{info, warn};

use crate::app::ports::RecordSourcePort;
use crate::error::Result;
use crate::pipeline::processing::quality_gate::{DatasetQualityGate, QualityGate, Verdict};
use crate::config::ValidationThresholds;

/// Use case for deciding whether a finished dataset is fit to publish
pub struct QualityGateUseCase {
    source: Box<dyn RecordSourcePort>,
    quality_gate: Box<dyn QualityGate>,
}

impl QualityGateUseCase {
    pub fn new(source: Box<dyn RecordSourcePort>, quality_gate: Box<dyn QualityGate>) -> Self {
        Self { source, quality_gate }
    }

    /// Create a use case with the default quality gate
    pub fn with_thresholds(source: Box<dyn RecordSourcePort>, thresholds: ValidationThresholds) -> Self {
        Self::new(source, Box::new(DatasetQualityGate::with_thresholds(thresholds)))
    }

    /// Load and validate. Only input errors surface as `Err`; data-quality
    /// problems come back inside the verdict.
    pub fn run(&self) -> Result<Verdict> {
        let records = self.source.load_records()?;
        let verdict = self.quality_gate.validate(&records);

        if verdict.passed {
            info!(
                total_records = verdict.summary.total_records,
                unique_batches = verdict.summary.unique_batches,
                embedding_coverage = verdict.summary.embedding_coverage,
                "Validation passed"
            );
        } else {
            for defect in &verdict.defects {
                warn!(kind = defect.kind().as_str(), "{}", defect);
            }
        }
        Ok(verdict)
    }
}

/// Render a verdict as the multi-line report printed by the CLI
pub fn render_report(verdict: &Verdict) -> String {
    let mut lines = Vec::new();
    let summary = &verdict.summary;
    if verdict.passed {
        lines.push("✅ VALIDATION PASSED:".to_string());
        lines.push(format!("  • {} companies processed", summary.total_records));
        lines.push(format!("  • {} unique batches", summary.unique_batches));
        lines.push(format!(
            "  • {} companies with embeddings ({:.1}%)",
            summary.records_with_embeddings,
            summary.embedding_coverage * 100.0
        ));
        lines.push("  • 0 duplicates found".to_string());
    } else {
        lines.push("❌ VALIDATION FAILED:".to_string());
        for defect in &verdict.defects {
            lines.push(format!("  • {}", defect));
        }
    }
    lines.join("\n")
}
