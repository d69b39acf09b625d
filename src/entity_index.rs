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

//! # Entity Index Module
//!
//! Entity values are not annotated at every occurrence. [`ZiEntityIndex`]
//! gathers every substring annotated anywhere in a corpus so that
//! [`ZiEntityMatcher`] can find the unannotated occurrences too.
//!
//! Matching is word-boundary anchored. A string that is an entity in one
//! context is also protected where it is plain text in another; this is an
//! accepted limitation of the heuristic.

use std::collections::BTreeSet;

use regex::{Regex, RegexBuilder};

use crate::errors::{Result, ZiError};
use crate::field::ZiFieldPath;
use crate::record::ZiRecord;
use crate::span::{char_len, char_offsets, ZiEntitySpan};

const PATTERN_SIZE_LIMIT: usize = 256 * (1 << 20);

/// Distinct strings annotated as entities somewhere in a corpus.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ZiEntityIndex {
    strings: BTreeSet<String>,
}

impl ZiEntityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slices out `text[start..end]` of every entity of every record.
    pub fn collect(
        batch: &[ZiRecord],
        text_path: &ZiFieldPath,
        entity_path: &ZiFieldPath,
    ) -> Result<Self> {
        let mut index = Self::new();
        for record in batch {
            let text = text_path.resolve_str(record)?;
            for entity in ZiEntitySpan::read_from(record, entity_path)? {
                index.insert(entity.slice(text)?);
            }
        }
        log::debug!(
            "collected {} distinct entity strings from {} records",
            index.len(),
            batch.len()
        );
        Ok(index)
    }

    pub fn insert(&mut self, value: impl Into<String>) -> bool {
        self.strings.insert(value.into())
    }

    pub fn contains(&self, value: &str) -> bool {
        self.strings.contains(value)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(String::as_str)
    }

    pub fn matcher(&self) -> Result<ZiEntityMatcher> {
        ZiEntityMatcher::new(self.iter())
    }
}

impl<S: Into<String>> FromIterator<S> for ZiEntityIndex {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            strings: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Finds known entity strings in arbitrary text.
///
/// Compiled once per corpus into a single alternation of escaped literals.
/// Longer strings come first so that a string contained in a longer one
/// never wins over it at the same position.
#[derive(Clone, Debug)]
pub struct ZiEntityMatcher {
    pattern: Option<Regex>,
}

impl ZiEntityMatcher {
    pub fn new<'a, I>(strings: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut strings: Vec<&str> = strings.into_iter().filter(|s| !s.is_empty()).collect();
        if strings.is_empty() {
            return Ok(Self::empty());
        }
        strings.sort_by(|a, b| char_len(b).cmp(&char_len(a)).then_with(|| a.cmp(b)));
        strings.dedup();

        let alternation = strings
            .iter()
            .map(|s| regex::escape(s))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()
            .map_err(|err| ZiError::validation(format!("entity pattern failed to compile: {err}")))?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// A matcher that never matches.
    pub fn empty() -> Self {
        Self { pattern: None }
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_ref().map(Regex::as_str)
    }

    /// Non-overlapping matches in `text`, as char offsets, left to right.
    pub fn find_spans(&self, text: &str) -> Vec<(usize, usize)> {
        let pattern = match &self.pattern {
            Some(pattern) => pattern,
            None => return Vec::new(),
        };
        let offsets = char_offsets(text);
        let to_char = |byte: usize| offsets.binary_search(&byte).unwrap_or_else(|idx| idx);
        pattern
            .find_iter(text)
            .map(|m| (to_char(m.start()), to_char(m.end())))
            .collect()
    }
}
