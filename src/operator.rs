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

//! # Zi Operator Module
//!
//! Operators receive a batch of records, process it, and return a batch.
//! The built-in operators live in [`crate::operators`] and are usually
//! constructed from JSON configuration through their factory functions:
//!
//! ```rust
//! use zitaipo::operators::augment::augment_entity_preserving_factory;
//! use serde_json::json;
//!
//! let op = augment_entity_preserving_factory(&json!({
//!     "modifier": "case_noise",
//!     "intensity": 0.2,
//!     "seed": 7,
//! })).unwrap();
//! ```

use crate::errors::{Result, ZiError};
use crate::record::ZiRecordBatch;

/// Contract that every batch operator fulfills.
pub trait ZiOperator: std::fmt::Debug {
    /// Unique, human-readable name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Applies the operator to an incoming batch of records.
    ///
    /// Operators in this crate keep the number and order of records; a
    /// failure means no record of the returned batch may be trusted.
    fn apply(&self, batch: ZiRecordBatch) -> Result<ZiRecordBatch>;
}

/// Executes an operator, attaching its name to any error it raises.
///
/// Structural errors ([`ZiError::ShapeMismatch`], [`ZiError::InvalidSpan`])
/// are logged with the operator name and returned unchanged so callers can
/// still match on them.
pub fn execute_operator(operator: &dyn ZiOperator, batch: ZiRecordBatch) -> Result<ZiRecordBatch> {
    operator.apply(batch).map_err(|err| match err {
        ZiError::ShapeMismatch { .. } | ZiError::InvalidSpan { .. } => {
            log::error!("operator '{}' aborted: {}", operator.name(), err);
            err
        }
        other => ZiError::operator(operator.name(), other.to_string()),
    })
}
