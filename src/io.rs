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

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde_json::Value;

use crate::errors::{Result, ZiError};
use crate::field::ZiFieldPath;
use crate::nlu;
use crate::record::{ZiMetadata, ZiRecord, ZiRecordBatch, ENTITIES_KEY, TEXT_KEY};
use crate::span::{validate_example, ZiEntitySpan};

/// Supported corpus formats.
#[derive(Clone, Debug)]
pub enum ZiIOFormat {
    Jsonl,
    Nlu,
    #[cfg(feature = "csv")]
    Csv(ZiCsvOptions),
}

/// Configuration for CSV corpora: one example per row, entities written
/// inline in the text column.
#[cfg(feature = "csv")]
#[derive(Clone, Debug)]
pub struct ZiCsvOptions {
    pub delimiter: u8,
    pub text_column: String,
    pub label_column: String,
}

#[cfg(feature = "csv")]
impl Default for ZiCsvOptions {
    fn default() -> Self {
        ZiCsvOptions {
            delimiter: b'|',
            text_column: crate::record::TEXT_KEY.to_string(),
            label_column: crate::record::INTENT_KEY.to_string(),
        }
    }
}

/// Corpus reader/writer façade.
pub struct ZiIO;

impl ZiIO {
    /// Attempts to infer a format from the file extension.
    pub fn detect_format(path: impl AsRef<Path>) -> Option<ZiIOFormat> {
        let ext = path
            .as_ref()
            .extension()?
            .to_string_lossy()
            .to_ascii_lowercase();
        match ext.as_str() {
            "jsonl" | "ndjson" => Some(ZiIOFormat::Jsonl),
            "yml" | "yaml" => Some(ZiIOFormat::Nlu),
            #[cfg(feature = "csv")]
            "csv" => Some(ZiIOFormat::Csv(ZiCsvOptions::default())),
            _ => None,
        }
    }

    pub fn load(path: impl AsRef<Path>, format: ZiIOFormat) -> Result<ZiRecordBatch> {
        match format {
            ZiIOFormat::Jsonl => Self::load_jsonl(path),
            ZiIOFormat::Nlu => nlu::load_nlu_yaml(path),
            #[cfg(feature = "csv")]
            ZiIOFormat::Csv(opts) => Self::_load_csv(path, &opts),
        }
    }

    pub fn load_auto(path: impl AsRef<Path>) -> Result<ZiRecordBatch> {
        let format = Self::detect_format(&path)
            .ok_or_else(|| ZiError::validation("unable to detect format from extension"))?;
        Self::load(path, format)
    }

    /// Loads a corpus in the default `text`/`intent`/`entities` layout and
    /// checks that every example is non-empty with valid entity offsets.
    pub fn load_corpus(path: impl AsRef<Path>) -> Result<ZiRecordBatch> {
        let batch = Self::load_auto(path)?;
        let text_path = ZiFieldPath::parse(&format!("payload.{TEXT_KEY}"))?;
        let entity_path = ZiFieldPath::parse(&format!("payload.{ENTITIES_KEY}"))?;
        Self::validate(&batch, &text_path, &entity_path)?;
        Ok(batch)
    }

    /// Checks every record with [`validate_example`].
    pub fn validate(batch: &[ZiRecord], text_path: &ZiFieldPath, entity_path: &ZiFieldPath) -> Result<()> {
        for (row, record) in batch.iter().enumerate() {
            let text = text_path.resolve_str(record)?;
            let entities = ZiEntitySpan::read_from(record, entity_path)?;
            validate_example(text, &entities).map_err(|err| {
                log::warn!("record {row} failed validation: {err}");
                err
            })?;
        }
        Ok(())
    }

    pub fn write(path: impl AsRef<Path>, format: ZiIOFormat, batch: &[ZiRecord]) -> Result<()> {
        match format {
            ZiIOFormat::Jsonl => Self::write_jsonl(path, batch),
            ZiIOFormat::Nlu => nlu::write_nlu_yaml(path, batch),
            #[cfg(feature = "csv")]
            ZiIOFormat::Csv(opts) => Self::_write_csv(path, &opts, batch),
        }
    }

    pub fn write_auto(path: impl AsRef<Path>, batch: &[ZiRecord]) -> Result<()> {
        let format = Self::detect_format(&path)
            .ok_or_else(|| ZiError::validation("unable to detect format from extension"))?;
        Self::write(path, format, batch)
    }

    /// Loads records from a JSONL file where each line is either a payload value
    /// or an object containing `id`, `payload`, and optional `metadata` fields.
    pub fn load_jsonl(path: impl AsRef<Path>) -> Result<ZiRecordBatch> {
        let file = File::open(path)?;
        Self::load_jsonl_reader(BufReader::new(file))
    }

    pub fn load_jsonl_reader<R: BufRead>(reader: R) -> Result<ZiRecordBatch> {
        reader
            .lines()
            .enumerate()
            .filter_map(|(idx, line)| match line {
                Ok(content) if content.trim().is_empty() => {
                    log::debug!("skipping blank line {}", idx + 1);
                    None
                }
                Ok(content) => Some(_parse_record(&content, idx + 1)),
                Err(err) => Some(Err(err.into())),
            })
            .collect()
    }

    pub fn write_jsonl(path: impl AsRef<Path>, batch: &[ZiRecord]) -> Result<()> {
        let file = File::create(path)?;
        Self::write_jsonl_writer(BufWriter::new(file), batch)
    }

    pub fn write_jsonl_writer<W: Write>(mut writer: W, batch: &[ZiRecord]) -> Result<()> {
        for record in batch {
            serde_json::to_writer(&mut writer, record)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }

    #[cfg(feature = "csv")]
    fn _load_csv(path: impl AsRef<Path>, options: &ZiCsvOptions) -> Result<ZiRecordBatch> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .has_headers(true)
            .from_path(path.as_ref())?;

        let headers = reader.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| ZiError::schema(format!("csv requires a '{name}' column")))
        };
        let text_idx = column(&options.text_column)?;
        let label_idx = column(&options.label_column)?;

        let mut batch = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let row = result?;
            let line = row.get(text_idx).unwrap_or_default();
            let label = row.get(label_idx).unwrap_or_default();
            let (text, entities) = nlu::parse_markup(line)?;
            validate_example(&text, &entities)
                .map_err(|err| ZiError::schema(format!("csv row {}: {err}", row_idx + 1)))?;
            batch.push(ZiRecord::example(text, label, &entities));
        }
        Ok(batch)
    }

    #[cfg(feature = "csv")]
    fn _write_csv(path: impl AsRef<Path>, options: &ZiCsvOptions, batch: &[ZiRecord]) -> Result<()> {
        let text_path = ZiFieldPath::parse(&format!("payload.{TEXT_KEY}"))?;
        let label_path = ZiFieldPath::parse(&format!("payload.{}", crate::record::INTENT_KEY))?;
        let entity_path = ZiFieldPath::parse(&format!("payload.{ENTITIES_KEY}"))?;

        let mut writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .from_path(path.as_ref())?;
        writer.write_record([options.text_column.as_str(), options.label_column.as_str()])?;

        for record in batch {
            let text = text_path.resolve_str(record)?;
            let label = label_path.resolve_str(record)?;
            let entities = ZiEntitySpan::read_from(record, &entity_path)?;
            writer.write_record([nlu::render_markup(text, &entities)?.as_str(), label])?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn _parse_record(line: &str, line_number: usize) -> Result<ZiRecord> {
    let value: Value = serde_json::from_str(line)
        .map_err(|err| ZiError::schema(format!("line {line_number}: invalid json ({err})")))?;

    match value {
        Value::Object(mut obj) if obj.contains_key("payload") => {
            let id = match obj.remove("id") {
                None | Some(Value::Null) => None,
                Some(Value::String(id)) => Some(id),
                Some(other) => Some(other.to_string()),
            };
            let payload = obj.remove("payload").unwrap_or(Value::Null);
            let metadata = match obj.remove("metadata") {
                None | Some(Value::Null) => None,
                Some(value) => Some(_value_to_metadata(value).map_err(|other| {
                    ZiError::schema(format!(
                        "line {line_number}: metadata must be object or null, got {other}"
                    ))
                })?),
            };
            Ok(ZiRecord {
                id,
                payload,
                metadata,
            })
        }
        payload => Ok(ZiRecord::new(None, payload)),
    }
}

fn _value_to_metadata(value: Value) -> std::result::Result<ZiMetadata, Value> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(other),
    }
}
