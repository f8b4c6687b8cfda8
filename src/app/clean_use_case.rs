use chrono::Utc;
use tracing::info;

use crate::app::ports::{RecordOutputPort, RecordSourcePort};
use crate::config::CleaningConfig;
use crate::error::Result;
use crate::pipeline::processing::clean::{clean, CleanObserver, CleanStats, ProcessingMetadata};
use crate::pipeline::processing::profile::{profile_raw, RawProfile};

/// What a clean run produced, for the caller to report
#[derive(Debug, Clone)]
pub struct CleanReport {
    pub profile: RawProfile,
    pub stats: CleanStats,
    pub metadata: ProcessingMetadata,
}

/// Use case for turning a raw export into a deduplicated, normalized dataset
pub struct CleanUseCase {
    source: Box<dyn RecordSourcePort>,
    output: Box<dyn RecordOutputPort>,
    config: CleaningConfig,
}

impl CleanUseCase {
    pub fn new(
        source: Box<dyn RecordSourcePort>,
        output: Box<dyn RecordOutputPort>,
        config: CleaningConfig,
    ) -> Self {
        Self { source, output, config }
    }

    /// Load, profile, clean and write. Nothing is written if loading fails.
    pub fn run(&self, observer: &mut dyn CleanObserver) -> Result<CleanReport> {
        let raw_records = self.source.load_records()?;

        let profile = profile_raw(&raw_records, self.config.high_duplicate_rate);
        profile.log();

        info!("Cleaning and normalizing data");
        let outcome = clean(raw_records, observer);
        let metadata = ProcessingMetadata::from_stats(&outcome.stats, Utc::now());

        self.output.write_records(&outcome.records, Some(&metadata))?;

        Ok(CleanReport {
            profile,
            stats: outcome.stats,
            metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::in_memory_adapter::{InMemoryOutput, InMemorySource};
    use crate::pipeline::processing::clean::{CleanEvent, NoopObserver};
    use crate::types::records_from_value;
    use serde_json::json;
    use std::rc::Rc;

    /// Lets the test keep a handle on the output after the use case owns it
    struct SharedOutput(Rc<InMemoryOutput>);

    impl RecordOutputPort for SharedOutput {
        fn write_records(
            &self,
            records: &[crate::types::CompanyRecord],
            metadata: Option<&ProcessingMetadata>,
        ) -> Result<()> {
            self.0.write_records(records, metadata)
        }
    }

    #[test]
    fn test_clean_use_case_writes_records_and_metadata() {
        let raw = records_from_value(json!([
            {"slug": "x", "name": "A", "batch": "Winter 2014"},
            {"slug": "x", "name": "A2", "batch": "W14"},
            {"slug": "y", "name": "B", "batch": "Bogus"}
        ]))
        .unwrap();
        let output = Rc::new(InMemoryOutput::new());
        let use_case = CleanUseCase::new(
            Box::new(InMemorySource::new(raw)),
            Box::new(SharedOutput(output.clone())),
            CleaningConfig::default(),
        );

        let report = use_case.run(&mut NoopObserver).unwrap();

        assert_eq!(report.profile.total_records, 3);
        assert_eq!(report.profile.duplicate_slugs, 1);
        assert_eq!(report.stats.clean_count, 2);

        let written = output.records().unwrap();
        assert_eq!(written.len(), 2);
        let meta = output.metadata().unwrap();
        assert_eq!(meta, report.metadata);
        assert_eq!(meta.normalizations_applied, 1);
    }

    #[test]
    fn test_observer_passed_through() {
        let raw = records_from_value(json!([{"slug": "a", "batch": "Summer 2012"}])).unwrap();
        let use_case = CleanUseCase::new(
            Box::new(InMemorySource::new(raw)),
            Box::new(InMemoryOutput::new()),
            CleaningConfig::default(),
        );
        let mut events: Vec<CleanEvent> = Vec::new();

        use_case.run(&mut events).unwrap();

        assert!(matches!(
            events.first(),
            Some(CleanEvent::BatchNormalized { to, .. }) if to == "S12"
        ));
        assert!(matches!(events.last(), Some(CleanEvent::Finished(_))));
    }
}
