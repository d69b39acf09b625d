//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd project team.
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

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity_index::{ZiEntityIndex, ZiEntityMatcher};
use crate::errors::Result;
use crate::field::ZiFieldPath;
use crate::modifier::ZiTextModifier;
use crate::record::ZiRecord;
use crate::span::{extract_spans, join_segments, join_with_entities, ZiEntitySpan};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZiAugmentationConfig {
    /// Field holding the example text.
    pub text_path: String,
    /// Field holding the entity annotations.
    pub entity_path: String,
    /// Keep every known entity string, annotated or not, out of the modifier.
    pub skip_entities: bool,
}

impl Default for ZiAugmentationConfig {
    fn default() -> Self {
        Self {
            text_path: "payload.text".to_string(),
            entity_path: "payload.entities".to_string(),
            skip_entities: true,
        }
    }
}

/// Applies a text modifier to every example of a corpus while keeping the
/// entity annotations consistent with the rewritten text.
///
/// With `skip_entities` the modifier only ever sees text that is neither an
/// annotated span nor an occurrence of any string annotated elsewhere in the
/// corpus. Without it, annotated spans are modified as well, each on its own,
/// and their offsets are recomputed from the modifier's output.
///
/// Rows are processed one at a time in corpus order and, within a row, pieces
/// are modified left to right. With a seeded generator the result is
/// therefore reproducible.
#[derive(Clone, Debug)]
pub struct ZiAugmenter {
    text_path: ZiFieldPath,
    entity_path: ZiFieldPath,
    skip_entities: bool,
}

impl ZiAugmenter {
    pub fn new(config: &ZiAugmentationConfig) -> Result<Self> {
        Ok(Self::from_paths(
            ZiFieldPath::parse(&config.text_path)?,
            ZiFieldPath::parse(&config.entity_path)?,
            config.skip_entities,
        ))
    }

    pub fn from_paths(text_path: ZiFieldPath, entity_path: ZiFieldPath, skip_entities: bool) -> Self {
        Self {
            text_path,
            entity_path,
            skip_entities,
        }
    }

    pub fn skip_entities(&self) -> bool {
        self.skip_entities
    }

    /// Builds the matcher for unannotated entity occurrences. Without
    /// `skip_entities` it never matches.
    pub fn prepare(&self, batch: &[ZiRecord]) -> Result<ZiEntityMatcher> {
        if !self.skip_entities {
            return Ok(ZiEntityMatcher::empty());
        }
        ZiEntityIndex::collect(batch, &self.text_path, &self.entity_path)?.matcher()
    }

    /// Rewrites the text and entity fields of every record in place.
    ///
    /// Every row is computed before any is written back: on error the batch
    /// is left exactly as it was.
    pub fn apply<M>(&self, modifier: &M, batch: &mut [ZiRecord], rng: &mut dyn RngCore) -> Result<()>
    where
        M: ZiTextModifier + ?Sized,
    {
        let matcher = self.prepare(batch)?;
        self.apply_with_matcher(modifier, batch, &matcher, rng)
    }

    /// [`apply`](Self::apply) with a generator seeded from `seed`.
    pub fn apply_seeded<M>(&self, modifier: &M, batch: &mut [ZiRecord], seed: u64) -> Result<()>
    where
        M: ZiTextModifier + ?Sized,
    {
        let mut rng = SmallRng::seed_from_u64(seed);
        self.apply(modifier, batch, &mut rng)
    }

    /// [`apply`](Self::apply) with a matcher built elsewhere, e.g. from the
    /// full corpus before it was split.
    pub fn apply_with_matcher<M>(
        &self,
        modifier: &M,
        batch: &mut [ZiRecord],
        matcher: &ZiEntityMatcher,
        rng: &mut dyn RngCore,
    ) -> Result<()>
    where
        M: ZiTextModifier + ?Sized,
    {
        let mut results = Vec::with_capacity(batch.len());
        for (row, record) in batch.iter().enumerate() {
            let result = self.augment_record(modifier, matcher, record, rng).map_err(|err| {
                log::error!("augmentation aborted at row {row}: {err}");
                err
            })?;
            results.push(result);
        }
        Self::commit(batch, results);
        log::info!(
            "applied '{}' to {} records (skip_entities={})",
            modifier.name(),
            batch.len(),
            self.skip_entities
        );
        Ok(())
    }

    /// Row-parallel [`apply`](Self::apply). Row `i` draws from its own
    /// generator seeded with `seed + i`, so the output does not depend on
    /// scheduling; it differs from [`apply_seeded`](Self::apply_seeded).
    #[cfg(feature = "parallel")]
    pub fn apply_parallel<M>(&self, modifier: &M, batch: &mut [ZiRecord], seed: u64) -> Result<()>
    where
        M: ZiTextModifier + Sync + ?Sized,
    {
        use rayon::prelude::*;

        let matcher = self.prepare(batch)?;
        let results = batch
            .par_iter()
            .enumerate()
            .map(|(row, record)| {
                let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(row as u64));
                self.augment_record(modifier, &matcher, record, &mut rng)
            })
            .collect::<Result<Vec<_>>>()?;
        Self::commit(batch, results);
        log::info!(
            "applied '{}' to {} records in parallel (skip_entities={})",
            modifier.name(),
            batch.len(),
            self.skip_entities
        );
        Ok(())
    }

    fn augment_record<M>(
        &self,
        modifier: &M,
        matcher: &ZiEntityMatcher,
        record: &ZiRecord,
        rng: &mut dyn RngCore,
    ) -> Result<ZiRecord>
    where
        M: ZiTextModifier + ?Sized,
    {
        let text = self.text_path.resolve_str(record)?;
        let entities = ZiEntitySpan::read_from(record, &self.entity_path)?;
        let (text, entities) = self.augment_example(modifier, matcher, text, &entities, rng)?;

        let mut updated = record.clone();
        let entities: Vec<Value> = entities.iter().map(ZiEntitySpan::to_value).collect();
        self.text_path.set_value(&mut updated, Value::String(text))?;
        self.entity_path.set_value(&mut updated, Value::Array(entities))?;
        Ok(updated)
    }

    /// Rewrites one example. The returned entities are in the input order.
    pub fn augment_example<M>(
        &self,
        modifier: &M,
        matcher: &ZiEntityMatcher,
        text: &str,
        entities: &[ZiEntitySpan],
        rng: &mut dyn RngCore,
    ) -> Result<(String, Vec<ZiEntitySpan>)>
    where
        M: ZiTextModifier + ?Sized,
    {
        let mut order: Vec<usize> = (0..entities.len()).collect();
        order.sort_by_key(|&idx| entities[idx].range());
        let sorted: Vec<ZiEntitySpan> = order.iter().map(|&idx| entities[idx].clone()).collect();
        let ranges: Vec<(usize, usize)> = sorted.iter().map(ZiEntitySpan::range).collect();

        let segments = extract_spans(text, &ranges)?;
        let (outside, inside) = if self.skip_entities {
            let outside = segments
                .outside
                .iter()
                .map(|segment| modify_unprotected(modifier, matcher, segment, rng))
                .collect::<Result<Vec<_>>>()?;
            (outside, segments.inside)
        } else {
            let mut outside = Vec::with_capacity(segments.outside.len());
            let mut inside = Vec::with_capacity(segments.inside.len());
            for (segment, piece) in segments.outside.iter().zip(&segments.inside) {
                outside.push(modifier.modify(segment, rng));
                inside.push(modifier.modify(piece, rng));
            }
            if let Some(last) = segments.outside.last() {
                outside.push(modifier.modify(last, rng));
            }
            (outside, inside)
        };

        let (text, updated) = join_with_entities(&outside, &sorted, &inside)?;
        let mut restored: Vec<Option<ZiEntitySpan>> = vec![None; entities.len()];
        for (&idx, entity) in order.iter().zip(updated) {
            restored[idx] = Some(entity);
        }
        Ok((text, restored.into_iter().flatten().collect()))
    }

    /// Swaps the rewritten rows in. Infallible: every write already
    /// succeeded on the row's copy.
    fn commit(batch: &mut [ZiRecord], results: Vec<ZiRecord>) {
        for (record, updated) in batch.iter_mut().zip(results) {
            *record = updated;
        }
    }
}

/// Modifies `segment` except for the matcher's hits, which are kept verbatim.
fn modify_unprotected<M>(
    modifier: &M,
    matcher: &ZiEntityMatcher,
    segment: &str,
    rng: &mut dyn RngCore,
) -> Result<String>
where
    M: ZiTextModifier + ?Sized,
{
    let inner = extract_spans(segment, &matcher.find_spans(segment))?;
    let pieces: Vec<String> = inner
        .outside
        .iter()
        .map(|piece| modifier.modify(piece, rng))
        .collect();
    join_segments(&pieces, &inner.inside)
}
