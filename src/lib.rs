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

//! # ZiTaipo
//!
//! Entity-preserving text augmentation for annotated NLU training data.
//!
//! A training example is a text, an intent label and a list of entity spans
//! given as character offsets. Augmenters apply a text modifier (typos,
//! transliteration, case noise, any user function) to the parts of the text
//! that are not entities, then recompute every entity offset so the
//! annotations still point at the same surface strings.
//!
//! ## Module Overview
//!
//! - **record**: ZiRecord and the default `text`/`intent`/`entities` layout
//! - **span**: Span extraction, re-joining and offset recomputation
//! - **entity_index**: Corpus-wide set of entity strings and its matcher
//! - **modifier**: The ZiTextModifier trait and built-in modifiers
//! - **enrich**: The ZiAugmenter orchestrator
//! - **operator**: Core operator trait and execution logic
//! - **operators**: Batch operators for augmentation and splitting
//! - **nlu**: Inline entity markup and NLU YAML files
//! - **io**: JSONL and CSV corpora
//!
//! ## Feature Flags
//!
//! - `csv`: Enables pipe-separated CSV corpora
//! - `parallel`: Enables row-parallel augmentation with rayon
//! - `full`: Enables all features
//!
//! ## Quick Start
//!
//! ```rust
//! use zitaipo::{ZiAugmentationConfig, ZiAugmenter, ZiFnModifier, ZiRecord};
//! use zitaipo::span::ZiEntitySpan;
//!
//! let mut batch = vec![ZiRecord::example("fly to Paris", "travel", &[ZiEntitySpan::new(7, 12)])];
//! let augmenter = ZiAugmenter::new(&ZiAugmentationConfig::default()).unwrap();
//! let shout = ZiFnModifier::new("shout", |text: &str| text.to_uppercase());
//! augmenter.apply_seeded(&shout, &mut batch, 7).unwrap();
//! assert_eq!(batch[0].payload["text"], "FLY TO Paris");
//! ```
//!
//! ## Error Handling
//!
//! All operations return `Result<T, ZiError>`. Failures during augmentation
//! leave the batch untouched.

#![allow(non_snake_case)]

pub mod errors;
pub mod record;
pub mod field;
pub mod span;
pub mod entity_index;
pub mod modifier;
pub mod operator;
pub mod operators;
pub mod enrich;
pub mod nlu;
pub mod io;

pub use errors::{Result, ZiError};
pub use record::{ZiRecord, ZiMetadata, ZiRecordBatch};
pub use operator::{ZiOperator, execute_operator};
pub use field::ZiFieldPath;
pub use span::{ZiEntitySpan, ZiSegments, extract_spans, join_segments, join_with_entities, validate_example};
pub use entity_index::{ZiEntityIndex, ZiEntityMatcher};
pub use modifier::{ZiTextModifier, ZiFnModifier, ZiRngFnModifier, ZiIdentityModifier, ZiCaseNoiseModifier};
pub use enrich::{ZiAugmenter, ZiAugmentationConfig};
pub use operators::augment::ZiAugmentEntityPreserving;
pub use operators::split::ZiSplitUniform;
pub use io::{ZiIO, ZiIOFormat};
#[cfg(feature = "csv")]
pub use io::ZiCsvOptions;
