//! Embedding enrichment: fills `description_embedding` through a pluggable `Encoder`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::observability::metrics;
use crate::types::CompanyRecord;

/// Sentence encoder producing fixed-length vectors.
///
/// Implementations wrap whatever model the host provides. The pipeline only
/// relies on the output length staying equal to `dimension()`.
pub trait Encoder {
    fn dimension(&self) -> usize;
    fn encode(&self, text: &str) -> Result<Vec<f32>>;
}

/// Tallies from one embedding pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedStats {
    pub total: usize,
    pub embedded: usize,
    /// Records with neither a long description nor a one-liner
    pub skipped: usize,
}

/// Attach a `description_embedding` to every record that has description text.
///
/// Records without text are skipped and never reach the encoder. A vector of
/// the wrong length aborts the pass.
pub fn embed_records(records: &mut [CompanyRecord], encoder: &dyn Encoder) -> Result<EmbedStats> {
    let expected = encoder.dimension();
    let mut stats = EmbedStats {
        total: records.len(),
        ..EmbedStats::default()
    };

    for record in records.iter_mut() {
        let embedding = match record.description_text() {
            Some(text) => encoder.encode(text)?,
            None => {
                debug!(
                    name = record.name().unwrap_or("Unknown"),
                    "No long_description or one_liner, skipping semantic indexing"
                );
                stats.skipped += 1;
                continue;
            }
        };

        if embedding.len() != expected {
            return Err(PipelineError::EmbeddingShape {
                slug: record.slug().unwrap_or_default().to_string(),
                expected,
                actual: embedding.len(),
            });
        }
        record.set_embedding(&embedding);
        stats.embedded += 1;
    }

    metrics::embedding::pass_completed(&stats);
    Ok(stats)
}
