//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd project team.

use std::path::PathBuf;

use serde_json::json;
use zitaipo::operators::split::{split_uniform_factory, TEST_SPLIT, TRAIN_SPLIT};
use zitaipo::{ZiIO, ZiRecord, ZiSplitUniform};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/nlu.yml")
}

#[test]
fn test_split_one_in_nine() {
    let batch = ZiIO::load_corpus(fixture()).unwrap();
    assert_eq!(batch.len(), 9);
    let (train, test) = ZiSplitUniform::new(100.0 / 9.0, 234).unwrap().split(batch);
    assert_eq!(test.len(), 1);
    assert_eq!(train.len(), 8);
}

#[test]
fn test_split_is_seeded_and_order_preserving() {
    let batch: Vec<ZiRecord> = (0..20)
        .map(|i| ZiRecord::new(Some(i.to_string()), json!({"text": format!("example {i}")})))
        .collect();
    let splitter = ZiSplitUniform::new(25.0, 5).unwrap();
    let (train_a, test_a) = splitter.split(batch.clone());
    let (train_b, test_b) = splitter.split(batch.clone());
    assert_eq!(train_a, train_b);
    assert_eq!(test_a, test_b);
    assert_eq!(test_a.len(), 5);

    let ids = |side: &[ZiRecord]| -> Vec<usize> {
        side.iter().map(|r| r.id.as_deref().unwrap().parse().unwrap()).collect()
    };
    let test_ids = ids(test_a.as_slice());
    let train_ids = ids(train_a.as_slice());
    assert!(test_ids.windows(2).all(|w| w[0] < w[1]));
    assert!(train_ids.windows(2).all(|w| w[0] < w[1]));
    assert!(test_ids.iter().all(|id| !train_ids.contains(id)));
}

#[test]
fn test_split_operator_tags_metadata() {
    let operator = split_uniform_factory(&json!({"test_size": 50, "seed": 1})).unwrap();
    let batch: Vec<ZiRecord> = (0..10).map(|i| ZiRecord::new(None, json!({"text": i}))).collect();
    let out = operator.apply(batch).unwrap();
    assert_eq!(out.len(), 10);
    let sides: Vec<&str> = out
        .iter()
        .map(|r| r.metadata.as_ref().unwrap()["split"].as_str().unwrap())
        .collect();
    assert_eq!(sides.iter().filter(|s| **s == TEST_SPLIT).count(), 5);
    assert_eq!(sides.iter().filter(|s| **s == TRAIN_SPLIT).count(), 5);
}

#[test]
fn test_split_operator_agrees_with_split() {
    let batch: Vec<ZiRecord> = (0..12)
        .map(|i| ZiRecord::new(Some(i.to_string()), json!({"text": i})))
        .collect();
    let splitter = ZiSplitUniform::new(30.0, 77).unwrap();
    let (_, test) = splitter.split(batch.clone());
    let tagged = zitaipo::ZiOperator::apply(&splitter, batch).unwrap();
    let tagged_test: Vec<Option<String>> = tagged
        .iter()
        .filter(|r| r.metadata.as_ref().unwrap()["split"] == json!(TEST_SPLIT))
        .map(|r| r.id.clone())
        .collect();
    let test_ids: Vec<Option<String>> = test.iter().map(|r| r.id.clone()).collect();
    assert_eq!(tagged_test, test_ids);
}

#[test]
fn test_split_factory_requires_test_size() {
    assert!(split_uniform_factory(&json!({"seed": 1})).is_err());
    assert!(split_uniform_factory(&json!({"test_size": 120})).is_err());
}
