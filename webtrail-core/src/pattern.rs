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

//! A frequent sequential pattern with its support weight.
//!
//! Support is the fraction of corpus sequences containing the pattern as
//! a contiguous n-gram, so it always lies in `[0, 1]`. The on-disk line
//! format is `support,item1-item2-...-itemN`.

use crate::error::{Result, WebtrailError};
use crate::ITEM_SEPARATOR;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    items: Vec<String>,
    support: f32,
    maximal: bool,
}

impl Pattern {
    pub fn new(key: &str, support: f32, maximal: bool) -> Self {
        Self {
            items: key
                .split(ITEM_SEPARATOR)
                .map(|item| item.trim().to_string())
                .collect(),
            support,
            maximal,
        }
    }

    pub fn from_items(items: Vec<String>, support: f32) -> Self {
        Self {
            items,
            support,
            maximal: true,
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn support(&self) -> f32 {
        self.support
    }

    pub fn set_support(&mut self, support: f32) {
        self.support = support;
    }

    pub fn is_maximal(&self) -> bool {
        self.maximal
    }

    pub fn set_maximal(&mut self, maximal: bool) {
        self.maximal = maximal;
    }

    pub fn last_item(&self) -> Option<&str> {
        self.items.last().map(String::as_str)
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.iter().any(|i| i == item)
    }

    /// Dash-joined registry key.
    pub fn key(&self) -> String {
        self.items.join(&ITEM_SEPARATOR.to_string())
    }

    /// All items but the last; empty for a single-item pattern. Prefixes
    /// key the next-item prediction index.
    pub fn prefix(&self) -> String {
        if self.items.len() <= 1 {
            String::new()
        } else {
            self.items[..self.items.len() - 1].join(&ITEM_SEPARATOR.to_string())
        }
    }

    /// All items but the first; empty for a single-item pattern.
    pub fn suffix(&self) -> String {
        if self.items.len() <= 1 {
            String::new()
        } else {
            self.items[1..].join(&ITEM_SEPARATOR.to_string())
        }
    }

    /// Child pattern with `item` appended, marked maximal.
    pub fn extended_with(&self, item: impl Into<String>) -> Pattern {
        let mut items = self.items.clone();
        items.push(item.into());
        Pattern {
            items,
            support: 0.0,
            maximal: true,
        }
    }

    /// On-disk representation: `support,item1-item2-...-itemN`. The
    /// support uses the shortest round-trippable decimal form so a
    /// written registry reloads to identical support values.
    pub fn to_line(&self) -> String {
        format!("{},{}", self.support, self.key())
    }

    pub fn parse_line(line: &str) -> Result<Pattern> {
        let (support, key) = line
            .split_once(',')
            .ok_or_else(|| WebtrailError::MalformedPatternLine(line.to_string()))?;
        let support: f32 = support
            .trim()
            .parse()
            .map_err(|_| WebtrailError::MalformedPatternLine(line.to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(WebtrailError::MalformedPatternLine(line.to_string()));
        }
        Ok(Pattern::new(key, support, true))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (support {})", self.key(), self.support)
    }
}
