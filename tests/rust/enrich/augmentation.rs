//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd project team.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde_json::json;
use zitaipo::span::ZiEntitySpan;
use zitaipo::{
    ZiAugmentationConfig, ZiAugmenter, ZiCaseNoiseModifier, ZiEntityIndex, ZiError, ZiFnModifier,
    ZiIdentityModifier, ZiRecord, ZiTextModifier,
};

fn swap_double() -> impl ZiTextModifier + Sync {
    ZiFnModifier::new("swap_double", |text: &str| {
        let swapped: String = text
            .chars()
            .map(|c| {
                if c.is_uppercase() {
                    c.to_ascii_lowercase()
                } else {
                    c.to_ascii_uppercase()
                }
            })
            .collect();
        format!("{swapped}{swapped}")
    })
}

fn augmenter(skip_entities: bool) -> ZiAugmenter {
    ZiAugmenter::new(&ZiAugmentationConfig {
        skip_entities,
        ..Default::default()
    })
    .unwrap()
}

fn spans(ranges: &[(usize, usize)]) -> Vec<ZiEntitySpan> {
    ranges
        .iter()
        .map(|&(start, end)| ZiEntitySpan::new(start, end).with_attribute("value", json!("this could be anything")))
        .collect()
}

fn run(skip_entities: bool, text: &str, ranges: &[(usize, usize)]) -> (String, Vec<(usize, usize)>) {
    let mut batch = vec![ZiRecord::example(text, "bla", &spans(ranges))];
    augmenter(skip_entities)
        .apply_seeded(&swap_double(), &mut batch, 0)
        .unwrap();
    let text = batch[0].payload["text"].as_str().unwrap().to_string();
    let entities = batch[0].payload["entities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|value| ZiEntitySpan::from_value(value).unwrap().range())
        .collect();
    (text, entities)
}

#[test]
fn test_text_without_entities_is_fully_modified() {
    for skip in [true, false] {
        let (text, entities) = run(skip, "no entities here", &[]);
        assert_eq!(text, "NO ENTITIES HERENO ENTITIES HERE");
        assert!(entities.is_empty());
    }
}

#[test]
fn test_single_entity_doubles_when_not_skipping() {
    let (text, entities) = run(false, "EEEE", &[(0, 4)]);
    assert_eq!(text, "eeeeeeee");
    assert_eq!(entities, vec![(0, 8)]);
}

#[test]
fn test_single_entity_kept_when_skipping() {
    let (text, entities) = run(true, "EEEE", &[(0, 4)]);
    assert_eq!(text, "EEEE");
    assert_eq!(entities, vec![(0, 4)]);
}

#[test]
fn test_three_entities_when_not_skipping() {
    let (text, entities) = run(false, "EEEE and EE or EEEEE", &[(0, 4), (9, 11), (15, 20)]);
    assert_eq!(text, "eeeeeeee AND  AND eeee OR  OR eeeeeeeeee");
    assert_eq!(entities, vec![(0, 8), (18, 22), (30, 40)]);
    assert_eq!(&text[18..22], "eeee");
}

#[test]
fn test_three_entities_when_skipping() {
    let (text, entities) = run(true, "EEEE and EE or EEEEE", &[(0, 4), (9, 11), (15, 20)]);
    assert_eq!(text, "EEEE AND  AND EE OR  OR EEEEE");
    assert_eq!(entities, vec![(0, 4), (14, 16), (24, 29)]);
}

#[test]
fn test_unannotated_occurrences_are_protected() {
    let (text, entities) = run(true, "EEEE and EEEE or EEEE", &[(0, 4)]);
    assert_eq!(text, "EEEE AND  AND EEEE OR  OR EEEE");
    assert_eq!(entities, vec![(0, 4)]);
    assert_eq!(text.matches("EEEE").count(), 3);
}

#[test]
fn test_unannotated_occurrences_change_without_skipping() {
    let (text, entities) = run(false, "EEEE and EEEE or EEEE", &[(0, 4)]);
    assert_eq!(text, "eeeeeeee AND eeee OR eeee AND eeee OR eeee");
    assert_eq!(entities, vec![(0, 8)]);
}

#[test]
fn test_longer_entity_string_protected_before_shorter() {
    let (text, entities) = run(true, "E n E EE n E EE", &[(0, 1), (4, 8)]);
    assert_eq!(text, "E N  N E EE N  N E EE");
    assert_eq!(entities, vec![(0, 1), (7, 11)]);
}

#[test]
fn test_entities_come_back_in_input_order() {
    let mut batch = vec![ZiRecord::example(
        "a and b",
        "bla",
        &[
            ZiEntitySpan::new(6, 7).with_attribute("entity", json!("second")),
            ZiEntitySpan::new(0, 1).with_attribute("entity", json!("first")),
        ],
    )];
    augmenter(false).apply_seeded(&swap_double(), &mut batch, 0).unwrap();
    assert_eq!(batch[0].payload["text"], json!("AA AND  AND BB"));
    assert_eq!(
        batch[0].payload["entities"],
        json!([
            {"start": 12, "end": 14, "entity": "second"},
            {"start": 0, "end": 2, "entity": "first"},
        ])
    );
}

#[test]
fn test_char_offsets_survive_multibyte_text() {
    let upper = ZiFnModifier::new("upper", |text: &str| text.to_uppercase());
    let mut batch = vec![ZiRecord::example("über Köln", "travel", &[ZiEntitySpan::new(5, 9)])];
    augmenter(true).apply_seeded(&upper, &mut batch, 0).unwrap();
    assert_eq!(batch[0].payload["text"], json!("ÜBER Köln"));
    assert_eq!(batch[0].payload["entities"], json!([{"start": 5, "end": 9}]));
}

#[test]
fn test_identity_modifier_is_a_no_op() {
    let batch = vec![
        ZiRecord::example("fly to Paris", "travel", &spans(&[(7, 12)])),
        ZiRecord::example("Paris is nice", "chitchat", &[]),
    ];
    for skip in [true, false] {
        let mut out = batch.clone();
        augmenter(skip).apply_seeded(&ZiIdentityModifier, &mut out, 3).unwrap();
        assert_eq!(out, batch);
    }
}

#[test]
fn test_count_and_labels_unchanged() {
    let mut batch = vec![
        ZiRecord::example("fly to Paris", "travel", &spans(&[(7, 12)])),
        ZiRecord::example("hello there", "greet", &[]),
        ZiRecord::example("book Rome and Oslo", "travel", &spans(&[(5, 9), (14, 18)])),
    ];
    let noise = ZiCaseNoiseModifier::new(0.8);
    augmenter(true).apply_seeded(&noise, &mut batch, 11).unwrap();
    assert_eq!(batch.len(), 3);
    let intents: Vec<_> = batch.iter().map(|r| r.payload["intent"].clone()).collect();
    assert_eq!(intents, vec![json!("travel"), json!("greet"), json!("travel")]);

    let text = batch[2].payload["text"].as_str().unwrap();
    let entities = ZiEntitySpan::from_values(batch[2].payload["entities"].as_array().unwrap()).unwrap();
    assert_eq!(entities[0].slice(text).unwrap(), "Rome");
    assert_eq!(entities[1].slice(text).unwrap(), "Oslo");
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let batch = vec![
        ZiRecord::example("please fly me to Paris tomorrow", "travel", &spans(&[(17, 22)])),
        ZiRecord::example("what is the weather in Oslo", "weather", &spans(&[(23, 27)])),
    ];
    let noise = ZiCaseNoiseModifier::new(0.5);
    let mut first = batch.clone();
    let mut second = batch.clone();
    augmenter(true).apply_seeded(&noise, &mut first, 42).unwrap();
    augmenter(true).apply_seeded(&noise, &mut second, 42).unwrap();
    assert_eq!(first, second);

    let mut third = batch.clone();
    let mut rng = SmallRng::seed_from_u64(42);
    augmenter(true).apply(&noise, &mut third, &mut rng).unwrap();
    assert_eq!(first, third);
}

#[test]
fn test_failed_row_leaves_batch_untouched() {
    let batch = vec![
        ZiRecord::example("fly to Paris", "travel", &spans(&[(7, 12)])),
        ZiRecord::new(None, json!({"text": "abc", "intent": "x", "entities": [{"start": 2, "end": 9}]})),
    ];
    for skip in [true, false] {
        let mut out = batch.clone();
        let err = augmenter(skip).apply_seeded(&swap_double(), &mut out, 0).unwrap_err();
        assert!(matches!(err, ZiError::InvalidSpan { .. }));
        assert_eq!(out, batch);
    }
}

fn unwritable_entity_path_batch() -> (ZiAugmenter, Vec<ZiRecord>) {
    let augmenter = ZiAugmenter::new(&ZiAugmentationConfig {
        entity_path: "payload.ann.entities".into(),
        skip_entities: false,
        ..Default::default()
    })
    .unwrap();
    let batch = vec![
        ZiRecord::new(None, json!({"text": "fine", "ann": {}})),
        ZiRecord::new(None, json!({"text": "hello", "ann": "none"})),
    ];
    (augmenter, batch)
}

#[test]
fn test_failed_write_back_leaves_batch_untouched() {
    let upper = ZiFnModifier::new("upper", |text: &str| text.to_uppercase());
    let (augmenter, batch) = unwritable_entity_path_batch();
    let mut out = batch.clone();
    let err = augmenter.apply_seeded(&upper, &mut out, 0).unwrap_err();
    assert!(matches!(err, ZiError::Schema { .. }));
    assert_eq!(out, batch);
}

#[cfg(feature = "parallel")]
#[test]
fn test_failed_parallel_write_back_leaves_batch_untouched() {
    let upper = ZiFnModifier::new("upper", |text: &str| text.to_uppercase());
    let (augmenter, batch) = unwritable_entity_path_batch();
    let mut out = batch.clone();
    assert!(augmenter.apply_parallel(&upper, &mut out, 0).is_err());
    assert_eq!(out, batch);
}

#[test]
fn test_external_matcher_protects_strings_from_other_records() {
    let mut batch = vec![ZiRecord::example("to Rome", "travel", &[])];
    let matcher = ZiEntityIndex::from_iter(["Rome"]).matcher().unwrap();
    let mut rng = SmallRng::seed_from_u64(0);
    augmenter(true)
        .apply_with_matcher(&swap_double(), &mut batch, &matcher, &mut rng)
        .unwrap();
    assert_eq!(batch[0].payload["text"], json!("TO TO Rome"));
}

#[test]
fn test_custom_paths() {
    let augmenter = ZiAugmenter::new(&ZiAugmentationConfig {
        text_path: "payload.mytext".into(),
        entity_path: "payload.myentity".into(),
        skip_entities: true,
    })
    .unwrap();
    let mut batch = vec![ZiRecord::new(
        None,
        json!({"mytext": "go to Rome", "myintent": "bla", "myentity": [{"start": 6, "end": 10}]}),
    )];
    augmenter.apply_seeded(&swap_double(), &mut batch, 0).unwrap();
    assert_eq!(batch[0].payload["mytext"], json!("GO TO GO TO Rome"));
    assert_eq!(batch[0].payload["myentity"], json!([{"start": 12, "end": 16}]));
}

#[test]
fn test_missing_entity_field_is_written_back_empty() {
    let mut batch = vec![ZiRecord::new(None, json!({"text": "hi", "intent": "greet"}))];
    augmenter(true).apply_seeded(&swap_double(), &mut batch, 0).unwrap();
    assert_eq!(batch[0].payload["text"], json!("HIHI"));
    assert_eq!(batch[0].payload["entities"], json!([]));
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_matches_sequential_for_deterministic_modifier() {
    let batch: Vec<ZiRecord> = (0..64)
        .map(|i| ZiRecord::example(format!("row {i} to Paris"), "travel", &spans(&[(0, 3)])))
        .collect();
    let mut sequential = batch.clone();
    let mut parallel = batch.clone();
    augmenter(true).apply_seeded(&swap_double(), &mut sequential, 1).unwrap();
    augmenter(true).apply_parallel(&swap_double(), &mut parallel, 1).unwrap();
    assert_eq!(sequential, parallel);
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_is_reproducible_with_random_modifier() {
    let batch: Vec<ZiRecord> = (0..32)
        .map(|i| ZiRecord::example(format!("entry number {i} for Oslo"), "x", &[]))
        .collect();
    let noise = ZiCaseNoiseModifier::new(0.5);
    let mut first = batch.clone();
    let mut second = batch.clone();
    augmenter(false).apply_parallel(&noise, &mut first, 9).unwrap();
    augmenter(false).apply_parallel(&noise, &mut second, 9).unwrap();
    assert_eq!(first, second);
}
