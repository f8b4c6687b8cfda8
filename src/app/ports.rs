use crate::error::Result;
use crate::pipeline::processing::clean::ProcessingMetadata;
use crate::types::CompanyRecord;

/// Where a stage reads its input snapshot from
pub trait RecordSourcePort {
    fn load_records(&self) -> Result<Vec<CompanyRecord>>;
}

/// Where a stage writes its output snapshot.
///
/// Implementations must write nothing when they return an error.
pub trait RecordOutputPort {
    fn write_records(
        &self,
        records: &[CompanyRecord],
        metadata: Option<&ProcessingMetadata>,
    ) -> Result<()>;
}
