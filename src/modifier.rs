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

//! # Modifier Module
//!
//! Text modifiers plugged into the augmentation engine. A modifier may be
//! randomized; it then draws from the generator handed to it, which the
//! caller owns and seeds. Keyboard typo models and transliteration tables
//! live outside this crate and are wrapped with [`ZiFnModifier`] or
//! [`ZiRngFnModifier`].

use std::fmt;

use rand::{Rng, RngCore};

/// Any total text-to-text transform.
pub trait ZiTextModifier {
    /// Name used in logs.
    fn name(&self) -> &str {
        "modifier.custom"
    }

    fn modify(&self, text: &str, rng: &mut dyn RngCore) -> String;
}

impl<M: ZiTextModifier + ?Sized> ZiTextModifier for &M {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn modify(&self, text: &str, rng: &mut dyn RngCore) -> String {
        (**self).modify(text, rng)
    }
}

impl<M: ZiTextModifier + ?Sized> ZiTextModifier for Box<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn modify(&self, text: &str, rng: &mut dyn RngCore) -> String {
        (**self).modify(text, rng)
    }
}

/// Wraps a deterministic `Fn(&str) -> String`.
pub struct ZiFnModifier<F> {
    name: String,
    func: F,
}

impl<F> ZiFnModifier<F>
where
    F: Fn(&str) -> String,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> ZiTextModifier for ZiFnModifier<F>
where
    F: Fn(&str) -> String,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn modify(&self, text: &str, _rng: &mut dyn RngCore) -> String {
        (self.func)(text)
    }
}

impl<F> fmt::Debug for ZiFnModifier<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZiFnModifier").field("name", &self.name).finish()
    }
}

/// Wraps a randomized `Fn(&str, &mut dyn RngCore) -> String`.
pub struct ZiRngFnModifier<F> {
    name: String,
    func: F,
}

impl<F> ZiRngFnModifier<F>
where
    F: Fn(&str, &mut dyn RngCore) -> String,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> ZiTextModifier for ZiRngFnModifier<F>
where
    F: Fn(&str, &mut dyn RngCore) -> String,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn modify(&self, text: &str, rng: &mut dyn RngCore) -> String {
        (self.func)(text, rng)
    }
}

impl<F> fmt::Debug for ZiRngFnModifier<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZiRngFnModifier").field("name", &self.name).finish()
    }
}

/// Returns its input unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZiIdentityModifier;

impl ZiTextModifier for ZiIdentityModifier {
    fn name(&self) -> &str {
        "identity"
    }

    fn modify(&self, text: &str, _rng: &mut dyn RngCore) -> String {
        text.to_string()
    }
}

/// Flips the case of letters and rotates digits, each with probability
/// `intensity`. Never changes the number of chars for ASCII input.
#[derive(Clone, Copy, Debug)]
pub struct ZiCaseNoiseModifier {
    intensity: f64,
}

impl ZiCaseNoiseModifier {
    /// `intensity` is clamped to `[0, 1]`.
    pub fn new(intensity: f64) -> Self {
        Self {
            intensity: intensity.clamp(0.0, 1.0),
        }
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }
}

impl ZiTextModifier for ZiCaseNoiseModifier {
    fn name(&self) -> &str {
        "case_noise"
    }

    fn modify(&self, text: &str, rng: &mut dyn RngCore) -> String {
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            if ch.is_alphabetic() && rng.gen_bool(self.intensity) {
                if ch.is_lowercase() {
                    out.extend(ch.to_uppercase());
                } else {
                    out.extend(ch.to_lowercase());
                }
            } else if ch.is_ascii_digit() && rng.gen_bool(self.intensity) {
                out.push(((ch as u8 - b'0' + 1) % 10 + b'0') as char);
            } else {
                out.push(ch);
            }
        }
        out
    }
}
