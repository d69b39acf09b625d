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

//! # Span Module
//!
//! Splitting an annotated text into independently transformable pieces and
//! putting it back together.
//!
//! For `k` spans, [`extract_spans`] yields `k + 1` outside segments and `k`
//! inside strings. Reassembled, they interleave as
//! `outside[0], inside[0], outside[1], ..., outside[k]`. Empty segments are
//! kept: a span touching either end of the text produces an empty outside
//! segment at that end, and its position in the sequence matters.
//!
//! All offsets are char (Unicode scalar value) offsets, the unit annotated
//! corpora use. Byte offsets never leave this module.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{Result, ZiError};
use crate::field::ZiFieldPath;
use crate::record::ZiRecord;

const START_KEY: &str = "start";
const END_KEY: &str = "end";

/// A labeled range of an example's text.
///
/// `start` is inclusive and `end` exclusive. Every other key of the
/// annotation (`entity`, `value`, `role`, ...) lives in `attributes` and is
/// carried through reindexing untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiEntitySpan {
    pub start: usize,
    pub end: usize,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl ZiEntitySpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Reads an annotation object such as `{"start": 0, "end": 4, "entity": "city"}`.
    pub fn from_value(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| ZiError::schema(format!("entity must be an object, got {value}")))?;
        let offset = |key: &str| {
            obj.get(key)
                .and_then(Value::as_u64)
                .map(|v| v as usize)
                .ok_or_else(|| ZiError::schema(format!("entity requires integer '{key}': {value}")))
        };
        let start = offset(START_KEY)?;
        let end = offset(END_KEY)?;

        let mut attributes = obj.clone();
        attributes.remove(START_KEY);
        attributes.remove(END_KEY);
        Ok(Self {
            start,
            end,
            attributes,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut obj = self.attributes.clone();
        obj.insert(START_KEY.to_string(), Value::from(self.start));
        obj.insert(END_KEY.to_string(), Value::from(self.end));
        Value::Object(obj)
    }

    /// Reads every annotation of an entity list.
    pub fn from_values(values: &[Value]) -> Result<Vec<Self>> {
        values.iter().map(Self::from_value).collect()
    }

    /// Reads the entity list stored at `path`. A missing or null field is an
    /// example without entities.
    pub fn read_from(record: &ZiRecord, path: &ZiFieldPath) -> Result<Vec<Self>> {
        match path.resolve(record) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(values)) => Self::from_values(values),
            Some(other) => Err(ZiError::schema(format!(
                "field '{path}' must be an array of entities, got {other}"
            ))),
        }
    }

    pub fn range(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    /// The annotated substring of `text`.
    pub fn slice<'a>(&self, text: &'a str) -> Result<&'a str> {
        let offsets = char_offsets(text);
        check_bounds(self.start, self.end, offsets.len() - 1)?;
        Ok(&text[offsets[self.start]..offsets[self.end]])
    }
}

/// Outside segments and inside strings of one extraction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ZiSegments {
    pub outside: Vec<String>,
    pub inside: Vec<String>,
}

impl ZiSegments {
    /// Concatenates the segments back into a single text.
    pub fn join(&self) -> Result<String> {
        join_segments(&self.outside, &self.inside)
    }
}

/// Number of chars in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte position of every char boundary, including the end of the text.
pub(crate) fn char_offsets(text: &str) -> Vec<usize> {
    let mut offsets: Vec<usize> = text.char_indices().map(|(byte_idx, _)| byte_idx).collect();
    offsets.push(text.len());
    offsets
}

fn check_bounds(start: usize, end: usize, len: usize) -> Result<()> {
    if start > end {
        return Err(ZiError::invalid_span(format!("span ({start}, {end}) is reversed")));
    }
    if end > len {
        return Err(ZiError::invalid_span(format!(
            "span ({start}, {end}) exceeds text of {len} chars"
        )));
    }
    Ok(())
}

/// Sorts spans right to left and rejects any pair that overlaps.
fn sorted_descending(spans: &[(usize, usize)]) -> Result<Vec<(usize, usize)>> {
    let mut ordered = spans.to_vec();
    ordered.sort_by(|a, b| b.cmp(a));
    for pair in ordered.windows(2) {
        let (right, left) = (pair[0], pair[1]);
        if left.1 > right.0 {
            return Err(ZiError::invalid_span(format!(
                "spans ({}, {}) and ({}, {}) overlap",
                left.0, left.1, right.0, right.1
            )));
        }
    }
    Ok(ordered)
}

/// Splits `text` around `spans` (char offsets, any order).
///
/// Spans are processed from the end of the text backwards, each step cutting
/// off the span and the text after it; the final remainder is the first
/// outside segment. The results come back in left-to-right order.
pub fn extract_spans(text: &str, spans: &[(usize, usize)]) -> Result<ZiSegments> {
    let offsets = char_offsets(text);
    let len = offsets.len() - 1;
    for &(start, end) in spans {
        check_bounds(start, end, len)?;
    }

    let mut outside = Vec::with_capacity(spans.len() + 1);
    let mut inside = Vec::with_capacity(spans.len());
    let mut remaining = text.len();
    for (start, end) in sorted_descending(spans)? {
        let (start, end) = (offsets[start], offsets[end]);
        outside.push(text[end..remaining].to_string());
        inside.push(text[start..end].to_string());
        remaining = start;
    }
    outside.push(text[..remaining].to_string());

    outside.reverse();
    inside.reverse();
    Ok(ZiSegments { outside, inside })
}

/// Interleaves `outside` and `inside`, starting and ending with an outside
/// segment.
pub fn join_segments<S: AsRef<str>, T: AsRef<str>>(outside: &[S], inside: &[T]) -> Result<String> {
    if outside.len() != inside.len() + 1 {
        return Err(ZiError::shape_mismatch(
            "outside segments vs inside strings",
            inside.len() + 1,
            outside.len(),
        ));
    }

    let mut text = String::new();
    for (segment, insertion) in outside.iter().zip(inside) {
        text.push_str(segment.as_ref());
        text.push_str(insertion.as_ref());
    }
    if let Some(last) = outside.last() {
        text.push_str(last.as_ref());
    }
    Ok(text)
}

/// Like [`join_segments`], but also recomputes the offsets of `entities`.
///
/// `inside[i]` is the (possibly rewritten) text of `entities[i]`. Each
/// entity's new `start` is the running char offset where its piece is
/// emitted and `end` is `start` plus the piece's length; the old offsets are
/// ignored, so pieces may have any length. All other attributes are copied.
pub fn join_with_entities<S: AsRef<str>, T: AsRef<str>>(
    outside: &[S],
    entities: &[ZiEntitySpan],
    inside: &[T],
) -> Result<(String, Vec<ZiEntitySpan>)> {
    if outside.len() != entities.len() + 1 {
        return Err(ZiError::shape_mismatch(
            "outside segments vs entities",
            entities.len() + 1,
            outside.len(),
        ));
    }
    if inside.len() != entities.len() {
        return Err(ZiError::shape_mismatch(
            "inside strings vs entities",
            entities.len(),
            inside.len(),
        ));
    }

    let mut text = String::new();
    let mut offset = 0;
    let mut updated = Vec::with_capacity(entities.len());
    for ((segment, entity), piece) in outside.iter().zip(entities).zip(inside) {
        let (segment, piece) = (segment.as_ref(), piece.as_ref());
        text.push_str(segment);
        offset += char_len(segment);

        let mut entity = entity.clone();
        entity.start = offset;
        offset += char_len(piece);
        entity.end = offset;
        text.push_str(piece);
        updated.push(entity);
    }
    if let Some(last) = outside.last() {
        text.push_str(last.as_ref());
    }
    Ok((text, updated))
}

/// Checks what a corpus loader guarantees: non-empty text and non-empty,
/// in-bounds, non-overlapping entity spans.
pub fn validate_example(text: &str, entities: &[ZiEntitySpan]) -> Result<()> {
    if text.is_empty() {
        return Err(ZiError::schema("example text may not be empty"));
    }
    let len = char_len(text);
    for entity in entities {
        check_bounds(entity.start, entity.end, len)?;
        if entity.start == entity.end {
            return Err(ZiError::invalid_span(format!(
                "span ({}, {}) is empty",
                entity.start, entity.end
            )));
        }
    }
    let ranges: Vec<(usize, usize)> = entities.iter().map(ZiEntitySpan::range).collect();
    sorted_descending(&ranges).map(|_| ())
}
