use serde_json::json;
use std::collections::HashSet;
use yc_pipeline::{
    clean_records, embed_records, records_from_value, validate_with_defaults, CompanyRecord,
    Defect, DefectKind, EmbedStats, Encoder, Result,
};

/// Fixed-size encoder that ignores meaning: good enough to exercise coverage
struct ConstantEncoder;

impl Encoder for ConstantEncoder {
    fn dimension(&self) -> usize {
        4
    }

    fn encode(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![0.25; 4])
    }
}

#[test]
fn test_raw_export_to_verdict() {
    let raw = records_from_value(json!([
        {"slug": "x", "name": "A", "batch": "Winter 2014"},
        {"slug": "x", "name": "A2", "batch": "W14"},
        {"slug": "y", "name": "B", "batch": "Bogus"}
    ]))
    .unwrap();

    let outcome = clean_records(raw);

    let expected = records_from_value(json!([
        {"slug": "x", "name": "A", "batch": "W14"},
        {"slug": "y", "name": "B", "batch": "Bogus"}
    ]))
    .unwrap();
    assert_eq!(outcome.records, expected);
    assert_eq!(outcome.stats.raw_count, 3);
    assert_eq!(outcome.stats.clean_count, 2);
    assert_eq!(outcome.stats.duplicates_removed, 1);
    assert_eq!(outcome.stats.normalizations_applied, 1);

    let verdict = validate_with_defaults(&outcome.records);
    assert!(!verdict.passed);
    assert_eq!(
        verdict.defects,
        vec![
            Defect::InvalidBatchFormat { values: vec!["Bogus".to_string()] },
            Defect::LowEmbeddingCoverage { observed: 0.0, required: 0.8 },
        ]
    );
}

#[test]
fn test_embedding_step_lifts_coverage_over_threshold() {
    let raw = records_from_value(json!([
        {"slug": "a", "name": "A", "batch": "Summer 2019", "one_liner": "Payroll"},
        {"slug": "b", "name": "B", "batch": "S19", "long_description": "Satellite imaging"},
        {"slug": "c", "name": "C", "batch": "Spring 2022", "one_liner": "Robots"},
        {"slug": "d", "name": "D", "batch": "IK12", "long_description": "Freight"},
        {"slug": "e", "name": "E", "batch": "F24"}
    ]))
    .unwrap();

    let mut records = clean_records(raw).records;
    let stats = embed_records(&mut records, &ConstantEncoder).unwrap();
    assert_eq!(stats, EmbedStats { total: 5, embedded: 4, skipped: 1 });

    let verdict = validate_with_defaults(&records);
    assert!(verdict.passed, "unexpected defects: {:?}", verdict.defects);
    assert_eq!(verdict.summary.records_with_embeddings, 4);
    // "Summer 2019" and "S19" collapse to one batch
    assert_eq!(verdict.summary.unique_batches, 4);
    assert!((verdict.summary.embedding_coverage - 0.8).abs() < 1e-12);
}

#[test]
fn test_clean_output_always_passes_uniqueness() {
    let mut items = Vec::new();
    for i in 0..50 {
        items.push(json!({"slug": format!("co-{}", i % 17), "name": "N", "batch": "W20"}));
    }
    let outcome = clean_records(records_from_value(serde_json::Value::Array(items)).unwrap());

    let slugs: HashSet<&str> = outcome.records.iter().filter_map(CompanyRecord::slug).collect();
    assert_eq!(slugs.len(), 17);
    assert_eq!(outcome.stats.duplicates_removed, 33);

    let verdict = validate_with_defaults(&outcome.records);
    assert!(!verdict.has(DefectKind::DuplicateSlug));
    assert!(!verdict.has(DefectKind::InvalidBatchFormat));
}

#[test]
fn test_clean_output_batches_are_canonical_for_recognized_labels() {
    let raw = records_from_value(json!([
        {"slug": "a", "name": "A", "batch": "Winter 2005"},
        {"slug": "b", "name": "B", "batch": "Fall 2024"},
        {"slug": "c", "name": "C"},
        {"slug": "d", "name": "D", "batch": ""},
        {"slug": "e", "name": "E", "batch": "Sp23"}
    ]))
    .unwrap();

    let records = clean_records(raw).records;
    let verdict = validate_with_defaults(&records);
    assert_eq!(verdict.kinds().into_iter().collect::<Vec<_>>(), vec![DefectKind::LowEmbeddingCoverage]);
}
