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

//! The mining input: one dash-joined sequence per line.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use webtrail_core::{Result, Topology, ITEM_SEPARATOR};

#[derive(Debug, Clone, Default)]
pub struct SequenceCorpus {
    lines: Vec<String>,
}

impl SequenceCorpus {
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Loads a corpus file, one dash-joined sequence per line. Blank
    /// lines are ignored.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut lines = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                lines.push(line);
            }
        }
        Ok(Self { lines })
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Item adjacency observed in the corpus: an edge `a -> b` for every
    /// pair of consecutive distinct items in some sequence.
    pub fn item_topology(&self) -> Topology {
        let mut topology = Topology::new();
        for line in &self.lines {
            let items: Vec<&str> = line.split(ITEM_SEPARATOR).map(str::trim).collect();
            for pair in items.windows(2) {
                if pair[0] != pair[1] {
                    topology.add_edge(pair[0], pair[1]);
                }
            }
        }
        topology
    }

    /// For each item, the number of sequences it occurs in (counted once
    /// per sequence).
    pub fn item_sequence_counts(&self) -> HashMap<String, u64> {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for line in &self.lines {
            let distinct: HashSet<&str> = line.split(ITEM_SEPARATOR).map(str::trim).collect();
            for item in distinct {
                *counts.entry(item.to_string()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Sequence-length histogram of the corpus.
    pub fn length_histogram(&self) -> BTreeMap<usize, u64> {
        let mut histogram = BTreeMap::new();
        for line in &self.lines {
            let length = line.split(ITEM_SEPARATOR).count();
            *histogram.entry(length).or_insert(0) += 1;
        }
        histogram
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn corpus() -> SequenceCorpus {
        SequenceCorpus::from_lines(vec![
            "/a-/b-/c".to_string(),
            "/a-/b".to_string(),
            "/c".to_string(),
        ])
    }

    #[test]
    fn topology_links_consecutive_distinct_items() {
        let topology = corpus().item_topology();
        assert!(topology.has_link("/a", "/b"));
        assert!(topology.has_link("/b", "/c"));
        assert!(!topology.has_link("/a", "/c"));
    }

    #[test]
    fn repeated_item_adds_no_self_edge() {
        let corpus = SequenceCorpus::from_lines(vec!["/a-/a-/b".to_string()]);
        let topology = corpus.item_topology();
        assert!(!topology.has_link("/a", "/a"));
        assert!(topology.has_link("/a", "/b"));
    }

    #[test]
    fn counts_items_once_per_sequence() {
        let corpus = SequenceCorpus::from_lines(vec!["/a-/b-/a".to_string(), "/a".to_string()]);
        let counts = corpus.item_sequence_counts();
        assert_eq!(counts.get("/a"), Some(&2));
        assert_eq!(counts.get("/b"), Some(&1));
    }

    #[test]
    fn load_skips_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "/a-/b").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "/c").unwrap();
        file.flush().unwrap();

        let corpus = SequenceCorpus::load(file.path()).unwrap();
        assert_eq!(corpus.len(), 2);
    }

    #[test]
    fn histogram_buckets_by_length() {
        let histogram = corpus().length_histogram();
        assert_eq!(histogram.get(&1), Some(&1));
        assert_eq!(histogram.get(&2), Some(&1));
        assert_eq!(histogram.get(&3), Some(&1));
    }
}
