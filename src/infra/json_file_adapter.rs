use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::app::ports::{RecordOutputPort, RecordSourcePort};
use crate::error::{PipelineError, Result};
use crate::pipeline::processing::clean::ProcessingMetadata;
use crate::types::{parse_dataset, CompanyRecord};

/// Reads a dataset from a JSON array file
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSourcePort for JsonFileSource {
    fn load_records(&self) -> Result<Vec<CompanyRecord>> {
        let content = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => PipelineError::MissingInput {
                path: self.path.display().to_string(),
            },
            _ => PipelineError::Io(e),
        })?;
        let records = parse_dataset(&content)?;
        info!(path = %self.path.display(), records = records.len(), "Loaded dataset");
        Ok(records)
    }
}

/// Writes a dataset as pretty-printed JSON, optionally with a metadata file
/// alongside it
pub struct JsonFileOutput {
    records_path: PathBuf,
    metadata_path: Option<PathBuf>,
}

impl JsonFileOutput {
    pub fn new(records_path: impl Into<PathBuf>) -> Self {
        Self {
            records_path: records_path.into(),
            metadata_path: None,
        }
    }

    pub fn with_metadata(mut self, metadata_path: impl Into<PathBuf>) -> Self {
        self.metadata_path = Some(metadata_path.into());
        self
    }
}

impl RecordOutputPort for JsonFileOutput {
    fn write_records(
        &self,
        records: &[CompanyRecord],
        metadata: Option<&ProcessingMetadata>,
    ) -> Result<()> {
        // Serialize everything before touching the filesystem
        let records_json = serde_json::to_string_pretty(records)?;
        let metadata_json = match (&self.metadata_path, metadata) {
            (Some(path), Some(meta)) => Some((path, serde_json::to_string_pretty(meta)?)),
            _ => None,
        };

        write_atomically(&self.records_path, &records_json)?;
        info!(path = %self.records_path.display(), records = records.len(), "Dataset saved");

        if let Some((path, json)) = metadata_json {
            write_atomically(path, &json)?;
            info!(path = %path.display(), "Processing metadata saved");
        }
        Ok(())
    }
}

/// Write to a sibling temp file, then rename over the target
fn write_atomically(path: &Path, content: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
