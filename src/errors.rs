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

//! # Zi Error Module
//!
//! This module defines the error types used throughout the augmentation
//! engine for consistent error handling and reporting.
//!
//! ## Error Categories
//!
//! - **ShapeMismatch**: Segment/entity counts that cannot be interleaved.
//!   Always a defect in the extraction step or a malformed entity list
//! - **InvalidSpan**: Span offsets outside the text, reversed, or overlapping
//! - **Schema**: Records whose text or entity fields have the wrong shape
//! - **Validation**: Invalid parameters or configuration
//! - **Io / Serde / Csv**: Wrapped failures from collaborators
//! - **Operator**: Failures raised inside an operator, with its name attached
//! - **Internal**: Unexpected internal failures
//!
//! ## Usage
//!
//! ```rust
//! use zitaipo::errors::{Result, ZiError};
//!
//! fn check(outside: usize, inside: usize) -> Result<()> {
//!     if outside != inside + 1 {
//!         return Err(ZiError::shape_mismatch("segments vs inside strings", inside + 1, outside));
//!     }
//!     Ok(())
//! }
//! ```

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convience result type used throughout the crate.
pub type Result<T> = std::result::Result<T, ZiError>;

/// Canonical error enumeration.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum ZiError {
    /// Errors originating from filesystem IO.
    #[error("io error: {0}")]
    Io(String),

    /// Segment or entity counts violate the interleaving invariant.
    #[error("shape mismatch ({what}): expected {expected}, got {actual}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    /// A span does not describe a valid, non-overlapping range of the text.
    #[error("invalid span: {message}")]
    InvalidSpan { message: String },

    /// Errors caused by malformed records or incompatible data layout.
    #[error("schema error: {message}")]
    Schema { message: String },

    /// Validation errors triggered by invalid parameters or configuration.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Any failure raised by an operator implementation.
    #[error("operator '{operator}' failed: {message}")]
    Operator { operator: String, message: String },

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Errors from CSV reading or writing.
    #[error("csv error: {0}")]
    Csv(String),

    /// Catch-all variant for unexpected situations.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for ZiError {
    fn from(err: io::Error) -> Self {
        ZiError::Io(err.to_string())
    }
}

impl From<std::fmt::Error> for ZiError {
    fn from(err: std::fmt::Error) -> Self {
        ZiError::Internal(format!("formatting failed: {err}"))
    }
}

impl From<serde_json::Error> for ZiError {
    fn from(err: serde_json::Error) -> Self {
        ZiError::Serde(err.to_string())
    }
}

impl From<serde_yaml::Error> for ZiError {
    fn from(err: serde_yaml::Error) -> Self {
        ZiError::Serde(err.to_string())
    }
}

#[cfg(feature = "csv")]
impl From<csv::Error> for ZiError {
    fn from(err: csv::Error) -> Self {
        ZiError::Csv(err.to_string())
    }
}

impl ZiError {
    /// Helper to construct shape mismatch errors.
    pub fn shape_mismatch(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        ZiError::ShapeMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }

    /// Helper to construct span errors.
    pub fn invalid_span<T: Into<String>>(message: T) -> Self {
        ZiError::InvalidSpan {
            message: message.into(),
        }
    }

    /// Helper to construct simple validation errors.
    pub fn validation<T: Into<String>>(message: T) -> Self {
        ZiError::Validation {
            message: message.into(),
        }
    }

    /// Helper to construct schema errors.
    pub fn schema<T: Into<String>>(message: T) -> Self {
        ZiError::Schema {
            message: message.into(),
        }
    }

    /// Helper to construct operator errors.
    pub fn operator(name: impl Into<String>, message: impl Into<String>) -> Self {
        ZiError::Operator {
            operator: name.into(),
            message: message.into(),
        }
    }

    /// Helper to construct internal errors.
    pub fn internal<T: Into<String>>(message: T) -> Self {
        ZiError::Internal(message.into())
    }

    /// Whether the error signals a broken segment/entity interleaving.
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, ZiError::ShapeMismatch { .. })
    }
}
