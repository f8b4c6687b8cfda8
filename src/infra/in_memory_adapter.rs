use std::cell::RefCell;

use crate::app::ports::{RecordOutputPort, RecordSourcePort};
use crate::error::Result;
use crate::pipeline::processing::clean::ProcessingMetadata;
use crate::types::CompanyRecord;

/// Source serving a fixed snapshot held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Vec<CompanyRecord>,
}

impl InMemorySource {
    pub fn new(records: Vec<CompanyRecord>) -> Self {
        Self { records }
    }
}

impl RecordSourcePort for InMemorySource {
    fn load_records(&self) -> Result<Vec<CompanyRecord>> {
        Ok(self.records.clone())
    }
}

/// Output that keeps the last written snapshot for inspection
#[derive(Debug, Default)]
pub struct InMemoryOutput {
    records: RefCell<Option<Vec<CompanyRecord>>>,
    metadata: RefCell<Option<ProcessingMetadata>>,
}

impl InMemoryOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Option<Vec<CompanyRecord>> {
        self.records.borrow().clone()
    }

    pub fn metadata(&self) -> Option<ProcessingMetadata> {
        self.metadata.borrow().clone()
    }
}

impl RecordOutputPort for InMemoryOutput {
    fn write_records(
        &self,
        records: &[CompanyRecord],
        metadata: Option<&ProcessingMetadata>,
    ) -> Result<()> {
        *self.records.borrow_mut() = Some(records.to_vec());
        *self.metadata.borrow_mut() = metadata.cloned();
        Ok(())
    }
}
