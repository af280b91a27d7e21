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

//! Directed adjacency graph over page identifiers.
//!
//! A page that never appears as a source simply has no outgoing edges;
//! looking it up yields the empty neighbor set, never an error. The
//! topology is loaded once and read-only during reconstruction and
//! prediction.

use crate::error::{Result, WebtrailError};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct Topology {
    edges: HashMap<String, HashSet<String>>,
    empty: HashSet<String>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.edges.entry(from.into()).or_default().insert(to.into());
    }

    /// True when a directed edge `from -> to` exists.
    pub fn has_link(&self, from: &str, to: &str) -> bool {
        self.edges.get(from).is_some_and(|set| set.contains(to))
    }

    /// Neighbor set of `from`; the empty set when the page has no
    /// outgoing edges.
    pub fn neighbors(&self, from: &str) -> &HashSet<String> {
        self.edges.get(from).unwrap_or(&self.empty)
    }

    pub fn out_degree(&self, from: &str) -> usize {
        self.edges.get(from).map_or(0, HashSet::len)
    }

    /// Number of pages with at least one outgoing edge.
    pub fn source_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Loads an adjacency list: one `page,neighbor1,neighbor2,...` line
    /// per source page. A source without neighbors is permitted; a blank
    /// line is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut topology = Topology::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                return Err(WebtrailError::MalformedTopologyLine(line));
            }
            let mut fields = line.split(',');
            let from = fields.next().unwrap_or("").trim().to_string();
            if from.is_empty() {
                return Err(WebtrailError::MalformedTopologyLine(line));
            }
            let neighbors: HashSet<String> = fields
                .map(|field| field.trim().to_string())
                .filter(|field| !field.is_empty())
                .collect();
            topology.edges.insert(from, neighbors);
        }
        Ok(topology)
    }
}
