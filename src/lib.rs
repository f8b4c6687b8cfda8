pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod observability;
pub mod pipeline;
pub mod types;

// Layered boundaries for application and infrastructure
pub mod app;
pub mod infra;

pub use config::{CleaningConfig, PipelineConfig, ValidationThresholds};
pub use error::{PipelineError, Result};
pub use pipeline::processing::clean::{
    clean, clean_records, CleanEvent, CleanObserver, CleanOutcome, CleanStats, ProcessingMetadata,
};
pub use pipeline::processing::enrich::{embed_records, EmbedStats, Encoder};
pub use pipeline::processing::normalize::normalize_batch;
pub use pipeline::processing::quality_gate::{
    validate, validate_with_defaults, Defect, DefectKind, ValidationSummary, Verdict,
};
pub use types::{parse_dataset, records_from_value, CompanyRecord};
