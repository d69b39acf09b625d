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

//! Inline entity markup: `[New York](city)`, `[NYC](city:New York)` and
//! `[NYC]{"entity": "city", "value": "New York", "role": "destination"}`.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::errors::{Result, ZiError};
use crate::span::{char_len, extract_spans, ZiEntitySpan};

pub const ENTITY_KEY: &str = "entity";
pub const VALUE_KEY: &str = "value";

static ENTITY_MARKUP: OnceLock<Regex> = OnceLock::new();

fn entity_markup() -> &'static Regex {
    ENTITY_MARKUP.get_or_init(|| {
        Regex::new(
            r"\[(?P<text>[^\]]+?)\](?:\((?P<entity>[^:)]+?)(?::(?P<value>[^)]+))?\)|(?P<dict>\{[^}]+?\}))",
        )
        .expect("entity markup pattern is valid")
    })
}

/// Strips inline markup from `line`, returning the plain text and the
/// entities it annotated. Every entity carries `entity` and `value`.
pub fn parse_markup(line: &str) -> Result<(String, Vec<ZiEntitySpan>)> {
    let mut text = String::with_capacity(line.len());
    let mut offset = 0;
    let mut last = 0;
    let mut entities = Vec::new();

    for caps in entity_markup().captures_iter(line) {
        let (whole, surface) = match (caps.get(0), caps.name("text")) {
            (Some(whole), Some(surface)) => (whole, surface.as_str()),
            _ => continue,
        };
        let before = &line[last..whole.start()];
        text.push_str(before);
        offset += char_len(before);

        let mut attributes = match caps.name("dict") {
            Some(dict) => match serde_json::from_str::<Value>(dict.as_str()) {
                Ok(Value::Object(map)) => map,
                _ => {
                    return Err(ZiError::schema(format!(
                        "entity annotation '{}' is not a json object",
                        dict.as_str()
                    )))
                }
            },
            None => {
                let mut map = Map::new();
                if let Some(entity) = caps.name("entity") {
                    map.insert(ENTITY_KEY.to_string(), Value::String(entity.as_str().to_string()));
                }
                if let Some(value) = caps.name("value") {
                    map.insert(VALUE_KEY.to_string(), Value::String(value.as_str().to_string()));
                }
                map
            }
        };
        if !matches!(attributes.get(ENTITY_KEY), Some(Value::String(_))) {
            return Err(ZiError::schema(format!(
                "entity annotation '{}' has no entity type",
                whole.as_str()
            )));
        }
        attributes
            .entry(VALUE_KEY.to_string())
            .or_insert_with(|| Value::String(surface.to_string()));

        let start = offset;
        offset += char_len(surface);
        text.push_str(surface);
        entities.push(ZiEntitySpan {
            start,
            end: offset,
            attributes,
        });
        last = whole.end();
    }
    text.push_str(&line[last..]);
    Ok((text, entities))
}

/// Writes `entities` back into `text` as inline markup.
///
/// The short `[text](type)` form is used when the value equals the
/// annotated text and no other attributes are present.
pub fn render_markup(text: &str, entities: &[ZiEntitySpan]) -> Result<String> {
    let mut sorted: Vec<&ZiEntitySpan> = entities.iter().collect();
    sorted.sort_by_key(|entity| entity.range());
    let ranges: Vec<(usize, usize)> = sorted.iter().map(|entity| entity.range()).collect();
    let segments = extract_spans(text, &ranges)?;

    let mut out = String::with_capacity(text.len());
    for ((segment, surface), entity) in segments.outside.iter().zip(&segments.inside).zip(&sorted) {
        out.push_str(segment);
        out.push_str(&render_entity(surface, entity)?);
    }
    if let Some(last) = segments.outside.last() {
        out.push_str(last);
    }
    Ok(out)
}

fn render_entity(surface: &str, entity: &ZiEntitySpan) -> Result<String> {
    let kind = match entity.attributes.get(ENTITY_KEY) {
        Some(Value::String(kind)) => kind,
        _ => {
            return Err(ZiError::schema(format!(
                "entity ({}, {}) has no entity type to render",
                entity.start, entity.end
            )))
        }
    };

    let mut attributes = entity.attributes.clone();
    if attributes.get(VALUE_KEY).and_then(Value::as_str) == Some(surface) {
        attributes.remove(VALUE_KEY);
    }
    if attributes.len() == 1 {
        return Ok(format!("[{surface}]({kind})"));
    }
    Ok(format!("[{surface}]{}", serde_json::to_string(&attributes)?))
}
