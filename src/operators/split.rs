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

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{Result, ZiError};
use crate::operator::ZiOperator;
use crate::record::ZiRecordBatch;

pub const TRAIN_SPLIT: &str = "train";
pub const TEST_SPLIT: &str = "test";

/// Uniform random train/test split.
///
/// `test_size` is a percentage in `[0, 100]`. The test side receives
/// `round(n * test_size / 100)` records drawn uniformly with a seeded
/// generator; both sides keep the original record order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiSplitUniform {
    test_size: f64,
    seed: u64,
}

impl ZiSplitUniform {
    pub fn new(test_size: f64, seed: u64) -> Result<Self> {
        if !(0.0..=100.0).contains(&test_size) {
            return Err(ZiError::validation(format!(
                "split test_size must be a percentage in [0,100], got {test_size}"
            )));
        }
        Ok(Self { test_size, seed })
    }

    pub fn test_size(&self) -> f64 {
        self.test_size
    }

    /// Row indices that belong to the test side.
    fn test_rows(&self, total: usize) -> HashSet<usize> {
        let count = ((total as f64) * self.test_size / 100.0).round() as usize;
        let mut rows: Vec<usize> = (0..total).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        rows.shuffle(&mut rng);
        rows.into_iter().take(count.min(total)).collect()
    }

    /// Returns `(train, test)`.
    pub fn split(&self, batch: ZiRecordBatch) -> (ZiRecordBatch, ZiRecordBatch) {
        let test_rows = self.test_rows(batch.len());
        let (test, train): (Vec<_>, Vec<_>) = batch
            .into_iter()
            .enumerate()
            .partition(|(row, _)| test_rows.contains(row));
        log::debug!("split {} records into {} train / {} test", train.len() + test.len(), train.len(), test.len());
        (
            train.into_iter().map(|(_, record)| record).collect(),
            test.into_iter().map(|(_, record)| record).collect(),
        )
    }
}

/// Tags every record with `metadata.split` = `train` or `test` without
/// reordering or dropping any.
impl ZiOperator for ZiSplitUniform {
    fn name(&self) -> &'static str {
        "split.uniform"
    }

    fn apply(&self, mut batch: ZiRecordBatch) -> Result<ZiRecordBatch> {
        let test_rows = self.test_rows(batch.len());
        for (row, record) in batch.iter_mut().enumerate() {
            let side = if test_rows.contains(&row) { TEST_SPLIT } else { TRAIN_SPLIT };
            record
                .metadata_mut()
                .insert("split".to_string(), Value::String(side.to_string()));
        }
        Ok(batch)
    }
}

pub fn split_uniform_factory(config: &Value) -> Result<Box<dyn ZiOperator + Send + Sync>> {
    let obj = config
        .as_object()
        .ok_or_else(|| ZiError::validation("split.uniform config must be object"))?;

    let test_size = obj
        .get("test_size")
        .and_then(Value::as_f64)
        .ok_or_else(|| ZiError::validation("split.uniform requires number 'test_size'"))?;

    let seed = obj.get("seed").and_then(Value::as_u64).unwrap_or(42);

    Ok(Box::new(ZiSplitUniform::new(test_size, seed)?))
}
