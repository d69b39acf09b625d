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


//! # NLU Corpus Module
//!
//! Reading and writing annotated intent-classification corpora. Entities are
//! written inline (`[Paris](city)`); loaders turn them into plain text plus
//! char-offset [`ZiEntitySpan`](crate::span::ZiEntitySpan)s and check every
//! example with [`validate_example`](crate::span::validate_example).

pub mod markup;
pub mod yaml;

pub use markup::{parse_markup, render_markup};
pub use yaml::{load_nlu_yaml, parse_nlu_yaml, render_nlu_yaml, write_nlu_yaml};
