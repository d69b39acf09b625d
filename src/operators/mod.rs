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


//! # Operators Module
//!
//! Batch operators built on the augmentation engine.
//!
//! ## Operator Categories
//!
//! - **augment**: Entity-preserving text augmentation (`augment.entity_preserving`)
//! - **split**: Uniform train/test splitting (`split.uniform`)
//!
//! ## Usage
//!
//! Operators are typically created through factory functions and applied to
//! record batches through the [`ZiOperator`](crate::operator::ZiOperator) trait.

pub mod augment;
pub mod split;

use serde_json::Value;

use crate::errors::{Result, ZiError};
use crate::operator::ZiOperator;

/// Looks up a built-in operator by name and builds it from `config`.
pub fn build_operator(name: &str, config: &Value) -> Result<Box<dyn ZiOperator + Send + Sync>> {
    match name {
        "augment.entity_preserving" => augment::augment_entity_preserving_factory(config),
        "split.uniform" => split::split_uniform_factory(config),
        other => Err(ZiError::validation(format!("unknown operator '{other}'"))),
    }
}
