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

//! NLU training files:
//!
//! ```yaml
//! version: "2.0"
//! nlu:
//! - intent: book_flight
//!   examples: |
//!     - fly to [Paris](city)
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::errors::{Result, ZiError};
use crate::field::ZiFieldPath;
use crate::nlu::markup::{parse_markup, render_markup};
use crate::record::{ZiRecord, ZiRecordBatch, ENTITIES_KEY, INTENT_KEY, TEXT_KEY};
use crate::span::{validate_example, ZiEntitySpan};

const NLU_VERSION: &str = "2.0";

#[derive(Debug, Default, Deserialize)]
struct NluDocument {
    #[serde(default)]
    nlu: Vec<NluBlock>,
}

#[derive(Debug, Deserialize)]
struct NluBlock {
    intent: Option<String>,
    examples: Option<String>,
}

/// Parses an NLU document into records in the default layout.
///
/// Blocks without an `intent` key (synonyms, lookup tables, regexes) are
/// skipped.
pub fn parse_nlu_yaml(content: &str) -> Result<ZiRecordBatch> {
    let document: NluDocument = if content.trim().is_empty() {
        NluDocument::default()
    } else {
        serde_yaml::from_str(content)?
    };

    let mut batch = Vec::new();
    for block in document.nlu {
        let intent = match block.intent {
            Some(intent) => intent,
            None => {
                log::warn!("skipping nlu block without intent");
                continue;
            }
        };
        for line in block.examples.as_deref().unwrap_or_default().lines() {
            let line = line.trim();
            let line = line.strip_prefix('-').unwrap_or(line).trim();
            if line.is_empty() {
                continue;
            }
            let (text, entities) = parse_markup(line)?;
            validate_example(&text, &entities)
                .map_err(|err| ZiError::schema(format!("intent '{intent}', example '{line}': {err}")))?;
            batch.push(ZiRecord::example(text, intent.as_str(), &entities));
        }
    }
    log::debug!("parsed {} nlu examples", batch.len());
    Ok(batch)
}

pub fn load_nlu_yaml(path: impl AsRef<Path>) -> Result<ZiRecordBatch> {
    parse_nlu_yaml(&fs::read_to_string(path)?)
}

/// Renders records back into an NLU document, grouped by intent in sorted
/// order and with entities written as inline markup.
pub fn render_nlu_yaml(batch: &[ZiRecord]) -> Result<String> {
    let text_path = ZiFieldPath::parse(&format!("payload.{TEXT_KEY}"))?;
    let intent_path = ZiFieldPath::parse(&format!("payload.{INTENT_KEY}"))?;
    let entity_path = ZiFieldPath::parse(&format!("payload.{ENTITIES_KEY}"))?;

    let mut grouped: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for record in batch {
        let text = text_path.resolve_str(record)?;
        let intent = intent_path.resolve_str(record)?;
        let entities = ZiEntitySpan::read_from(record, &entity_path)?;
        grouped
            .entry(intent)
            .or_default()
            .push(render_markup(text, &entities)?);
    }

    let mut out = String::new();
    writeln!(out, "version: \"{NLU_VERSION}\"")?;
    writeln!(out, "nlu:")?;
    for (intent, examples) in grouped {
        let intent = serde_yaml::to_string(intent)?;
        writeln!(out, "- intent: {}", intent.trim_end())?;
        writeln!(out, "  examples: |")?;
        for example in examples {
            writeln!(out, "    - {}", example.replace('\n', " "))?;
        }
    }
    Ok(out)
}

pub fn write_nlu_yaml(path: impl AsRef<Path>, batch: &[ZiRecord]) -> Result<()> {
    fs::write(path, render_nlu_yaml(batch)?)?;
    Ok(())
}
