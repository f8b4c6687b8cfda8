/// Field names and policy defaults shared across the pipeline stages.
/// Thresholds here are only defaults; `PipelineConfig` is what the stages read.

// Record field names
pub const FIELD_SLUG: &str = "slug";
pub const FIELD_NAME: &str = "name";
pub const FIELD_BATCH: &str = "batch";
pub const FIELD_LONG_DESCRIPTION: &str = "long_description";
pub const FIELD_ONE_LINER: &str = "one_liner";
pub const FIELD_EMBEDDING: &str = "description_embedding";

/// Fields every published record must carry with a non-empty value
pub const REQUIRED_FIELDS: [&str; 3] = [FIELD_NAME, FIELD_SLUG, FIELD_BATCH];

/// Batch label used when the source gives no cohort at all
pub const UNSPECIFIED_BATCH: &str = "Unspecified";

/// Stand-in reported by the validator and profiler for a record with no batch field
pub const MISSING_BATCH_PLACEHOLDER: &str = "Unknown";

// Policy defaults
pub const DEFAULT_MIN_EMBEDDING_COVERAGE: f64 = 0.80;
pub const DEFAULT_HIGH_DUPLICATE_RATE: f64 = 0.40;
pub const DEFAULT_REQUIRED_FIELD_SAMPLE_SIZE: usize = 100;
pub const DEFAULT_DUPLICATE_SLUG_SAMPLE_SIZE: usize = 5;

// Default file locations used by the CLI
pub const DEFAULT_RAW_INPUT: &str = "data/raw/yc-raw.json";
pub const DEFAULT_CLEAN_OUTPUT: &str = "data/processed/yc-clean.json";
pub const DEFAULT_METADATA_OUTPUT: &str = "data/processed/processing-metadata.json";
pub const DEFAULT_VALIDATION_INPUT: &str = "data/yc-embedded.json";

// Logging
pub const DEFAULT_LOG_FILTER: &str = "yc_pipeline=info";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const LOG_DIR_ENV: &str = "YC_PIPELINE_LOG_DIR";
pub const LOG_FILE_PREFIX: &str = "pipeline.log";

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "YC_PIPELINE_CONFIG";
