//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd project team.

use std::path::PathBuf;

use serde_json::json;
use tempfile::tempdir;
use zitaipo::nlu::{parse_markup, parse_nlu_yaml, render_nlu_yaml};
use zitaipo::span::ZiEntitySpan;
use zitaipo::{ZiAugmentationConfig, ZiAugmenter, ZiFnModifier, ZiIO, ZiRecord};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/nlu.yml")
}

#[test]
fn test_load_fixture() {
    let batch = ZiIO::load_auto(fixture()).unwrap();
    assert_eq!(batch.len(), 9);

    let flight = &batch[4];
    assert_eq!(flight.payload["intent"], json!("book_flight"));
    assert_eq!(flight.payload["text"], json!("book a flight from NYC to Rome"));
    assert_eq!(
        flight.payload["entities"],
        json!([
            {"start": 19, "end": 22, "entity": "city", "value": "New York"},
            {"start": 26, "end": 30, "entity": "city", "value": "Rome"},
        ])
    );
    assert_eq!(batch[5].payload["entities"][0]["role"], json!("destination"));
}

#[test]
fn test_yaml_both_ways() {
    let batch = vec![
        ZiRecord::example("i really really like this", "positive", &[]),
        ZiRecord::example("i enjoy this", "positive", &[]),
        ZiRecord::example("this is not my thing", "negative", &[]),
    ];
    let dir = tempdir().unwrap();
    let path = dir.path().join("temp_nlu.yml");
    ZiIO::write_auto(&path, &batch).unwrap();
    let read = ZiIO::load_corpus(&path).unwrap();
    assert_eq!(read.len(), 3);
    assert_eq!(read[0].payload["intent"], json!("negative"));
}

#[test]
fn test_fixture_survives_render_and_parse() {
    let batch = ZiIO::load_auto(fixture()).unwrap();
    let rendered = render_nlu_yaml(&batch).unwrap();
    let mut reparsed = parse_nlu_yaml(&rendered).unwrap();
    let mut original = batch.clone();
    let key = |r: &ZiRecord| (r.payload["intent"].to_string(), r.payload["text"].to_string());
    original.sort_by_key(key);
    reparsed.sort_by_key(key);
    assert_eq!(original, reparsed);
}

#[test]
fn test_augmented_corpus_still_renders() {
    let mut batch = ZiIO::load_auto(fixture()).unwrap();
    let augmenter = ZiAugmenter::new(&ZiAugmentationConfig::default()).unwrap();
    let upper = ZiFnModifier::new("upper", |text: &str| text.to_uppercase());
    augmenter.apply_seeded(&upper, &mut batch, 0).unwrap();

    let rendered = render_nlu_yaml(&batch).unwrap();
    assert!(rendered.contains("    - FLY TO [Paris](city)\n"));
    assert!(rendered.contains("    - BOOK A FLIGHT FROM [NYC]{\"entity\":\"city\",\"value\":\"New York\"} TO [Rome](city)\n"));
    assert_eq!(parse_nlu_yaml(&rendered).unwrap().len(), 9);
}

#[test]
fn test_jsonl_round_trip_through_files() {
    let (text, entities) = parse_markup("wake me at [7am](time)").unwrap();
    let batch = vec![ZiRecord::example(text, "alarm", &entities)];
    let dir = tempdir().unwrap();
    let path = dir.path().join("corpus.jsonl");
    ZiIO::write_auto(&path, &batch).unwrap();
    let read = ZiIO::load_corpus(&path).unwrap();
    assert_eq!(read, batch);
    assert_eq!(
        ZiEntitySpan::from_values(read[0].payload["entities"].as_array().unwrap()).unwrap()[0].range(),
        (11, 14)
    );
}

#[test]
fn test_invalid_examples_are_rejected() {
    let content = "version: \"2.0\"\nnlu:\n- intent: broken\n  examples: |\n    - [x]{\"value\": \"y\"}\n";
    assert!(parse_nlu_yaml(content).is_err());
}

#[test]
fn test_unknown_extension_is_rejected() {
    assert!(ZiIO::load_auto("corpus.parquet").is_err());
}
