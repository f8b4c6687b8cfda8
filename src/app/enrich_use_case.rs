use tracing::info;

use crate::app::ports::{RecordOutputPort, RecordSourcePort};
use crate::error::Result;
use crate::pipeline::processing::enrich::{embed_records, EmbedStats, Encoder};

/// Use case for attaching description embeddings to a clean dataset
pub struct EnrichUseCase {
    source: Box<dyn RecordSourcePort>,
    output: Box<dyn RecordOutputPort>,
    encoder: Box<dyn Encoder>,
}

impl EnrichUseCase {
    pub fn new(
        source: Box<dyn RecordSourcePort>,
        output: Box<dyn RecordOutputPort>,
        encoder: Box<dyn Encoder>,
    ) -> Self {
        Self { source, output, encoder }
    }

    /// Embed every record with description text. An encoder failure aborts
    /// the run before anything is written.
    pub fn run(&self) -> Result<EmbedStats> {
        let mut records = self.source.load_records()?;
        let stats = embed_records(&mut records, self.encoder.as_ref())?;
        info!(
            total = stats.total,
            embedded = stats.embedded,
            skipped = stats.skipped,
            "Embedding step completed"
        );
        self.output.write_records(&records, None)?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::infra::in_memory_adapter::{InMemoryOutput, InMemorySource};
    use crate::types::records_from_value;
    use serde_json::json;

    struct FailingEncoder;

    impl Encoder for FailingEncoder {
        fn dimension(&self) -> usize {
            2
        }

        fn encode(&self, _text: &str) -> Result<Vec<f32>> {
            Err(PipelineError::Encoder("model unavailable".to_string()))
        }
    }

    #[test]
    fn test_encoder_failure_propagates() {
        let records = records_from_value(json!([{"slug": "a", "one_liner": "Hi"}])).unwrap();
        let use_case = EnrichUseCase::new(
            Box::new(InMemorySource::new(records)),
            Box::new(InMemoryOutput::new()),
            Box::new(FailingEncoder),
        );

        assert!(matches!(use_case.run(), Err(PipelineError::Encoder(_))));
    }

    #[test]
    fn test_records_without_text_never_reach_encoder() {
        let records = records_from_value(json!([{"slug": "a", "name": "Silent"}])).unwrap();
        let use_case = EnrichUseCase::new(
            Box::new(InMemorySource::new(records)),
            Box::new(InMemoryOutput::new()),
            Box::new(FailingEncoder),
        );

        let stats = use_case.run().unwrap();
        assert_eq!(stats, EmbedStats { total: 1, embedded: 0, skipped: 1 });
    }
}
