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

//! # Zi Record Module
//!
//! A training example is carried as a [`ZiRecord`]: an optional id, a JSON
//! payload and optional metadata. Annotated corpora use the payload keys
//! `text`, `intent` and `entities`, but every component addresses fields
//! through a [`crate::field::ZiFieldPath`], so other layouts work as well.
//!
//! ```rust
//! use zitaipo::record::ZiRecord;
//! use serde_json::json;
//!
//! let record = ZiRecord::new(None, json!({
//!     "text": "fly to Paris",
//!     "intent": "book_flight",
//!     "entities": [{"start": 7, "end": 12, "entity": "city"}],
//! }));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::span::ZiEntitySpan;

/// Generic metadata map that may accompany a record.
pub type ZiMetadata = Map<String, Value>;

/// Payload key holding the example text.
pub const TEXT_KEY: &str = "text";
/// Payload key holding the intent label.
pub const INTENT_KEY: &str = "intent";
/// Payload key holding the entity annotations.
pub const ENTITIES_KEY: &str = "entities";

/// Fundamental data unit: one annotated example.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiRecord {
    /// Optional stable identifier for the record.
    pub id: Option<String>,

    /// Primary payload carrying the example content.
    pub payload: Value,

    /// Additional attributes such as the split a record was assigned to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ZiMetadata>,
}

impl ZiRecord {
    /// Constructs a record with the given payload and optional identifier.
    pub fn new(id: impl Into<Option<String>>, payload: Value) -> Self {
        ZiRecord {
            id: id.into(),
            payload,
            metadata: None,
        }
    }

    /// Builds a record in the default `text`/`intent`/`entities` layout.
    pub fn example(text: impl Into<String>, intent: impl Into<String>, entities: &[ZiEntitySpan]) -> Self {
        let entities: Vec<Value> = entities.iter().map(ZiEntitySpan::to_value).collect();
        ZiRecord::new(
            None,
            json!({
                TEXT_KEY: text.into(),
                INTENT_KEY: intent.into(),
                ENTITIES_KEY: entities,
            }),
        )
    }

    /// Attaches metadata to the record.
    pub fn with_metadata(mut self, metadata: ZiMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Returns a mutable reference to the metadata map, creating it if necessary.
    pub fn metadata_mut(&mut self) -> &mut ZiMetadata {
        self.metadata.get_or_insert_with(ZiMetadata::new)
    }
}

/// Convenience alias for working on batches of records.
pub type ZiRecordBatch = Vec<ZiRecord>;
