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

//! A candidate reconstructed navigation path.
//!
//! Sequences are forked during reconstruction: extending a candidate
//! freezes the parent (it is no longer maximal, its fan-out budget is
//! charged) and produces a child with the appended page and a fresh
//! budget. `is_maximal` never returns to `true` once cleared.

use crate::ITEM_SEPARATOR;
use std::fmt;

#[derive(Debug, Clone)]
pub struct Sequence {
    pages: Vec<String>,
    out_degree: usize,
    number_of_extension: usize,
    is_maximal: bool,
    penalty: f32,
    step: usize,
}

impl Sequence {
    pub fn new(initial_page: impl Into<String>) -> Self {
        Self {
            pages: vec![initial_page.into()],
            out_degree: 0,
            number_of_extension: 0,
            is_maximal: true,
            penalty: 1.0,
            step: 0,
        }
    }

    pub fn with_out_degree(initial_page: impl Into<String>, out_degree: usize) -> Self {
        let mut sequence = Self::new(initial_page);
        sequence.out_degree = out_degree;
        sequence
    }

    /// Parses a dash-joined `item1-item2-...-itemN` string.
    pub fn from_joined(joined: &str, penalty: f32) -> Self {
        Self {
            pages: joined
                .split(ITEM_SEPARATOR)
                .map(|item| item.trim().to_string())
                .collect(),
            out_degree: 0,
            number_of_extension: 0,
            is_maximal: true,
            penalty,
            step: 0,
        }
    }

    pub fn from_pages(pages: Vec<String>) -> Self {
        Self {
            pages,
            out_degree: 0,
            number_of_extension: 0,
            is_maximal: true,
            penalty: 1.0,
            step: 0,
        }
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn last(&self) -> &str {
        self.pages.last().map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn is_maximal(&self) -> bool {
        self.is_maximal
    }

    pub fn out_degree(&self) -> usize {
        self.out_degree
    }

    pub fn number_of_extension(&self) -> usize {
        self.number_of_extension
    }

    pub fn penalty(&self) -> f32 {
        self.penalty
    }

    pub fn set_penalty(&mut self, penalty: f32) {
        self.penalty = penalty;
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn set_step(&mut self, step: usize) {
        self.step = step;
    }

    /// Appends a page without the fork bookkeeping. Used by algorithms
    /// that grow a single linear run in place.
    pub fn push_page(&mut self, page: impl Into<String>) {
        self.pages.push(page.into());
    }

    /// Charges one extension against this sequence and freezes it: a
    /// successfully extended sequence is no longer maximal, permanently.
    pub fn mark_extended(&mut self) {
        self.is_maximal = false;
        self.number_of_extension += 1;
    }

    /// Forks a child with `page` appended: penalty reset to 1.0, maximal,
    /// fresh extension budget, out-degree of the new last page.
    pub fn fork(&self, page: impl Into<String>, out_degree: usize) -> Sequence {
        let mut pages = self.pages.clone();
        pages.push(page.into());
        Sequence {
            pages,
            out_degree,
            number_of_extension: 0,
            is_maximal: true,
            penalty: 1.0,
            step: 0,
        }
    }

    /// Copy with `page` appended and no budget tracking; used by SmartSRA
    /// which bounds branching by referrer ambiguity instead.
    pub fn child_with(&self, page: impl Into<String>) -> Sequence {
        let mut child = self.clone();
        child.pages.push(page.into());
        child.is_maximal = true;
        child
    }

    pub fn set_maximal(&mut self, maximal: bool) {
        self.is_maximal = maximal;
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, page) in self.pages.iter().enumerate() {
            if i != 0 {
                write!(f, "{ITEM_SEPARATOR}")?;
            }
            write!(f, "{}", page.trim())?;
        }
        Ok(())
    }
}
