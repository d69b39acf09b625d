//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

use std::fmt;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde_json::{Map, Value};

use crate::enrich::{ZiAugmentationConfig, ZiAugmenter};
use crate::errors::{Result, ZiError};
use crate::modifier::{ZiCaseNoiseModifier, ZiIdentityModifier, ZiTextModifier};
use crate::operator::ZiOperator;
use crate::record::ZiRecordBatch;

const DEFAULT_SEED: u64 = 0xfeed_f00d;

/// Entity-preserving augmentation as a batch operator.
///
/// Each call to [`ZiOperator::apply`] starts from a fresh generator seeded
/// with the configured seed, so the same batch always yields the same output.
pub struct ZiAugmentEntityPreserving {
    augmenter: ZiAugmenter,
    modifier: Box<dyn ZiTextModifier + Send + Sync>,
    seed: u64,
}

impl ZiAugmentEntityPreserving {
    pub fn new(
        augmenter: ZiAugmenter,
        modifier: Box<dyn ZiTextModifier + Send + Sync>,
        seed: u64,
    ) -> Self {
        Self {
            augmenter,
            modifier,
            seed,
        }
    }
}

impl fmt::Debug for ZiAugmentEntityPreserving {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZiAugmentEntityPreserving")
            .field("augmenter", &self.augmenter)
            .field("modifier", &self.modifier.name())
            .field("seed", &self.seed)
            .finish()
    }
}

impl ZiOperator for ZiAugmentEntityPreserving {
    fn name(&self) -> &'static str {
        "augment.entity_preserving"
    }

    fn apply(&self, mut batch: ZiRecordBatch) -> Result<ZiRecordBatch> {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        self.augmenter.apply(&self.modifier, &mut batch, &mut rng)?;
        Ok(batch)
    }
}

/// Reads an optional key, rejecting values of the wrong type.
fn read_key<'a, T>(
    obj: &'a Map<String, Value>,
    key: &str,
    default: T,
    kind: &str,
    extract: impl FnOnce(&'a Value) -> Option<T>,
) -> Result<T> {
    match obj.get(key) {
        None => Ok(default),
        Some(value) => extract(value).ok_or_else(|| {
            ZiError::validation(format!(
                "augment.entity_preserving '{key}' must be {kind}, got {value}"
            ))
        }),
    }
}

fn modifier_from_config(obj: &Map<String, Value>) -> Result<Box<dyn ZiTextModifier + Send + Sync>> {
    let name = read_key(obj, "modifier", "case_noise", "a string", Value::as_str)?;

    match name {
        "identity" => Ok(Box::new(ZiIdentityModifier)),
        "case_noise" => {
            let intensity = read_key(obj, "intensity", 0.1, "a number", Value::as_f64)?;
            if !(0.0..=1.0).contains(&intensity) {
                return Err(ZiError::validation(
                    "augment.entity_preserving 'intensity' must be in [0,1]",
                ));
            }
            Ok(Box::new(ZiCaseNoiseModifier::new(intensity)))
        }
        other => Err(ZiError::validation(format!(
            "augment.entity_preserving unknown modifier '{other}'"
        ))),
    }
}

/// Builds [`ZiAugmentEntityPreserving`] from
/// `{"text_path", "entity_path", "skip_entities", "seed", "modifier", "intensity"}`.
pub fn augment_entity_preserving_factory(config: &Value) -> Result<Box<dyn ZiOperator + Send + Sync>> {
    let obj = config
        .as_object()
        .ok_or_else(|| ZiError::validation("augment.entity_preserving config must be object"))?;

    let defaults = ZiAugmentationConfig::default();
    let augmentation = ZiAugmentationConfig {
        text_path: read_key(obj, "text_path", defaults.text_path.as_str(), "a string", Value::as_str)?
            .to_string(),
        entity_path: read_key(obj, "entity_path", defaults.entity_path.as_str(), "a string", Value::as_str)?
            .to_string(),
        skip_entities: read_key(obj, "skip_entities", defaults.skip_entities, "a boolean", Value::as_bool)?,
    };

    let seed = read_key(obj, "seed", DEFAULT_SEED, "a non-negative integer", Value::as_u64)?;
    let modifier = modifier_from_config(obj)?;

    Ok(Box::new(ZiAugmentEntityPreserving::new(
        ZiAugmenter::new(&augmentation)?,
        modifier,
        seed,
    )))
}
