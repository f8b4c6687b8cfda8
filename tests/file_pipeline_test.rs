use anyhow::Result;
use serde_json::{json, Value};
use std::fs;
use tempfile::tempdir;
use yc_pipeline::app::clean_use_case::CleanUseCase;
use yc_pipeline::app::quality_gate_use_case::QualityGateUseCase;
use yc_pipeline::infra::json_file_adapter::{JsonFileOutput, JsonFileSource};
use yc_pipeline::pipeline::processing::clean::NoopObserver;
use yc_pipeline::{CleaningConfig, DefectKind, PipelineError, ValidationThresholds};

#[test]
fn test_clean_files_and_validate_output() -> Result<()> {
    let dir = tempdir()?;
    let raw_path = dir.path().join("raw/yc-raw.json");
    let clean_path = dir.path().join("processed/yc-clean.json");
    let meta_path = dir.path().join("processed/processing-metadata.json");

    fs::create_dir_all(raw_path.parent().unwrap())?;
    fs::write(
        &raw_path,
        serde_json::to_string(&json!([
            {"name": "Alpha", "slug": "alpha", "batch": "Winter 2014", "team_size": 12},
            {"name": "Alpha again", "slug": "alpha", "batch": "W14"},
            {"name": "Beta", "slug": "beta", "batch": "Spring 2021", "description_embedding": [0.1]}
        ]))?,
    )?;

    let report = CleanUseCase::new(
        Box::new(JsonFileSource::new(&raw_path)),
        Box::new(JsonFileOutput::new(&clean_path).with_metadata(&meta_path)),
        CleaningConfig::default(),
    )
    .run(&mut NoopObserver)?;
    assert_eq!(report.stats.clean_count, 2);

    let written: Value = serde_json::from_str(&fs::read_to_string(&clean_path)?)?;
    assert_eq!(written[0]["batch"], "W14");
    assert_eq!(written[0]["team_size"], 12);
    assert_eq!(written[1]["batch"], "Sp21");

    let meta: Value = serde_json::from_str(&fs::read_to_string(&meta_path)?)?;
    assert_eq!(meta["raw_count"], 3);
    assert_eq!(meta["clean_count"], 2);
    assert_eq!(meta["duplicates_removed"], 1);
    assert_eq!(meta["normalizations_applied"], 2);

    let verdict = QualityGateUseCase::with_thresholds(
        Box::new(JsonFileSource::new(&clean_path)),
        ValidationThresholds::default(),
    )
    .run()?;
    // One of two records has an embedding
    assert!(!verdict.passed);
    assert_eq!(
        verdict.kinds().into_iter().collect::<Vec<_>>(),
        vec![DefectKind::LowEmbeddingCoverage]
    );

    let relaxed = ValidationThresholds {
        min_embedding_coverage: 0.5,
        ..ValidationThresholds::default()
    };
    let verdict = QualityGateUseCase::with_thresholds(Box::new(JsonFileSource::new(&clean_path)), relaxed)
        .run()?;
    assert!(verdict.passed);
    Ok(())
}

#[test]
fn test_malformed_input_writes_nothing() -> Result<()> {
    let dir = tempdir()?;
    let raw_path = dir.path().join("raw.json");
    let clean_path = dir.path().join("clean.json");
    let meta_path = dir.path().join("meta.json");
    fs::write(&raw_path, r#"{"companies": []}"#)?;

    let result = CleanUseCase::new(
        Box::new(JsonFileSource::new(&raw_path)),
        Box::new(JsonFileOutput::new(&clean_path).with_metadata(&meta_path)),
        CleaningConfig::default(),
    )
    .run(&mut NoopObserver);

    assert!(matches!(result, Err(PipelineError::MalformedInput(_))));
    assert!(!clean_path.exists());
    assert!(!meta_path.exists());
    Ok(())
}

#[test]
fn test_missing_input_file_is_reported() {
    let dir = tempdir().unwrap();
    let result = QualityGateUseCase::with_thresholds(
        Box::new(JsonFileSource::new(dir.path().join("yc-embedded.json"))),
        ValidationThresholds::default(),
    )
    .run();

    match result {
        Err(PipelineError::MissingInput { path }) => assert!(path.ends_with("yc-embedded.json")),
        other => panic!("expected MissingInput, got {:?}", other.map(|v| v.passed)),
    }
}

#[test]
fn test_empty_dataset_file_fails_validation_cleanly() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("empty.json");
    fs::write(&path, "[]")?;

    let verdict = QualityGateUseCase::with_thresholds(
        Box::new(JsonFileSource::new(&path)),
        ValidationThresholds::default(),
    )
    .run()?;

    assert!(!verdict.passed);
    assert!(verdict.has(DefectKind::EmptyDataset));
    Ok(())
}
