// Copyright 2025 Webtrail (https://github.com/webtrail)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! The prediction model: a pattern registry indexed for prefix lookup.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;
use webtrail_core::{Pattern, Result};

/// Two views of a frequent-pattern registry: pattern key -> support,
/// and pattern prefix -> the set of patterns sharing it. Single-item
/// patterns are indexed under the empty prefix and are therefore never
/// matched by a non-empty candidate.
#[derive(Debug, Clone, Default)]
pub struct PatternModel {
    pattern_support: HashMap<String, f32>,
    prefix_index: HashMap<String, HashSet<String>>,
}

impl PatternModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a `support,item1-...-itemN` pattern file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(&path)?);
        let mut model = Self::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            model.insert(&Pattern::parse_line(&line)?);
        }
        info!(
            path = %path.as_ref().display(),
            patterns = model.pattern_support.len(),
            "loaded prediction model"
        );
        Ok(model)
    }

    pub fn from_patterns<'a>(patterns: impl IntoIterator<Item = &'a Pattern>) -> Self {
        let mut model = Self::new();
        for pattern in patterns {
            model.insert(pattern);
        }
        model
    }

    pub fn insert(&mut self, pattern: &Pattern) {
        let key = pattern.key();
        self.prefix_index
            .entry(pattern.prefix())
            .or_default()
            .insert(key.clone());
        self.pattern_support.insert(key, pattern.support());
    }

    pub fn support_of(&self, key: &str) -> Option<f32> {
        self.pattern_support.get(key).copied()
    }

    /// Patterns whose prefix is exactly `prefix`, if any.
    pub fn patterns_with_prefix(&self, prefix: &str) -> Option<&HashSet<String>> {
        self.prefix_index.get(prefix)
    }

    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.prefix_index.contains_key(prefix)
    }

    pub fn len(&self) -> usize {
        self.pattern_support.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pattern_support.is_empty()
    }
}
