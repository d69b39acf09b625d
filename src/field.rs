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

use serde_json::{Map, Value};

use crate::errors::{Result, ZiError};
use crate::record::ZiRecord;

/// Dotted address of a field inside a record, e.g. `payload.text` or
/// `metadata.source.name`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZiFieldPath {
    segments: Vec<String>,
}

impl ZiFieldPath {
    pub fn parse(path: &str) -> Result<Self> {
        let segments: Vec<String> = path
            .split('.')
            .map(|segment| segment.trim().to_string())
            .filter(|segment| !segment.is_empty())
            .collect();

        let first = match segments.first() {
            Some(first) => first.as_str(),
            None => return Err(ZiError::validation("field path may not be empty")),
        };

        if first != "payload" && first != "metadata" {
            return Err(ZiError::validation(format!(
                "field path '{path}' must start with 'payload' or 'metadata'"
            )));
        }

        if segments.len() == 1 {
            return Err(ZiError::validation(format!(
                "field path '{path}' must name a key below '{first}'"
            )));
        }

        Ok(Self { segments })
    }

    pub fn resolve<'a>(&self, record: &'a ZiRecord) -> Option<&'a Value> {
        let mut segments = self.segments.iter();
        let mut current = match segments.next()?.as_str() {
            "payload" => &record.payload,
            "metadata" => record.metadata.as_ref()?.get(segments.next()?)?,
            _ => return None,
        };
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Resolves the field and requires it to be a string.
    pub fn resolve_str<'a>(&self, record: &'a ZiRecord) -> Result<&'a str> {
        match self.resolve(record) {
            Some(Value::String(text)) => Ok(text.as_str()),
            Some(other) => Err(ZiError::schema(format!(
                "field '{self}' must be a string, got {other}"
            ))),
            None => Err(ZiError::schema(format!("field '{self}' is missing"))),
        }
    }

    /// Writes `value` at this path, creating intermediate objects as needed.
    pub fn set_value(&self, record: &mut ZiRecord, value: Value) -> Result<()> {
        let (last, parents) = match self.segments.split_last() {
            Some(split) => split,
            None => return Err(ZiError::internal("field path without segments")),
        };

        let mut current: &mut Map<String, Value> = match parents[0].as_str() {
            "payload" => {
                if !record.payload.is_object() {
                    record.payload = Value::Object(Map::new());
                }
                match &mut record.payload {
                    Value::Object(map) => map,
                    _ => return Err(ZiError::internal("payload is not an object")),
                }
            }
            _ => record.metadata_mut(),
        };

        for seg in &parents[1..] {
            current = match current
                .entry(seg.clone())
                .or_insert_with(|| Value::Object(Map::new()))
            {
                Value::Object(map) => map,
                other => {
                    return Err(ZiError::schema(format!(
                        "cannot descend into '{seg}' of '{self}': found {other}"
                    )))
                }
            };
        }

        current.insert(last.clone(), value);
        Ok(())
    }
}

impl fmt::Display for ZiFieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}
