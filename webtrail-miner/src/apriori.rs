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

//! Topology-constrained sequential Apriori.
//!
//! Round `n` only proposes length-`n` candidates whose last transition
//! exists in the corpus item adjacency and whose appended item is itself
//! frequent, which keeps the candidate space close to what the data can
//! actually support. Support is contiguous: a sequence supports a
//! pattern iff the pattern appears in it as an n-gram, counted once per
//! sequence.
//!
//! Maximality is approximate by construction: whenever a pattern is
//! accepted, its appended single item, its prefix and its suffix are
//! evicted from the maximal registry. Other subsumed subpatterns survive
//! only until a later round happens to evict them.

use crate::corpus::SequenceCorpus;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;
use webtrail_core::{ngrams, Pattern, Result, Topology};

pub struct SequentialApriori {
    threshold: f32,
    item_topology: Topology,
    frequent_atoms: HashSet<String>,
    maximal_patterns: HashMap<String, Pattern>,
    all_patterns: Vec<Pattern>,
    number_of_sequences: u64,
}

impl SequentialApriori {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            item_topology: Topology::new(),
            frequent_atoms: HashSet::new(),
            maximal_patterns: HashMap::new(),
            all_patterns: Vec::new(),
            number_of_sequences: 0,
        }
    }

    /// Runs the miner to a fixed point: rounds continue while at least
    /// one new frequent pattern is found.
    pub fn mine(&mut self, corpus: &SequenceCorpus) {
        self.item_topology = corpus.item_topology();
        self.number_of_sequences = corpus.len() as u64;
        if self.number_of_sequences == 0 {
            return;
        }

        let mut previous_round = self.frequent_atom_round(corpus);
        let mut step = 2;
        while !previous_round.is_empty() {
            debug!(step, candidates_from = previous_round.len(), "mining round");
            previous_round = self.extension_round(corpus, &previous_round, step);
            step += 1;
        }
    }

    /// Round one: every item whose sequence frequency clears the
    /// threshold becomes an atomic pattern.
    fn frequent_atom_round(&mut self, corpus: &SequenceCorpus) -> HashMap<String, Pattern> {
        let mut round = HashMap::new();
        for (item, count) in corpus.item_sequence_counts() {
            let support = count as f32 / self.number_of_sequences as f32;
            if support >= self.threshold {
                let pattern = Pattern::new(&item, support, true);
                self.frequent_atoms.insert(item.clone());
                self.maximal_patterns.insert(item.clone(), pattern.clone());
                self.all_patterns.push(pattern.clone());
                round.insert(item, pattern);
            }
        }
        round
    }

    /// One extension round: grow each previous-round pattern by a
    /// frequent topology neighbor of its last item, count candidate
    /// supports in a single corpus scan, keep the ones that clear the
    /// threshold.
    fn extension_round(
        &mut self,
        corpus: &SequenceCorpus,
        previous_round: &HashMap<String, Pattern>,
        step: usize,
    ) -> HashMap<String, Pattern> {
        let mut candidates: HashMap<String, u64> = HashMap::new();
        for pattern in previous_round.values() {
            let Some(last_item) = pattern.last_item() else {
                continue;
            };
            for neighbor in self.item_topology.neighbors(last_item) {
                if self.frequent_atoms.contains(neighbor) && !pattern.contains(neighbor) {
                    candidates.insert(pattern.extended_with(neighbor).key(), 0);
                }
            }
        }

        for line in corpus.lines() {
            for gram in ngrams(line, step) {
                if let Some(count) = candidates.get_mut(&gram) {
                    *count += 1;
                }
            }
        }

        let mut round = HashMap::new();
        for (key, count) in candidates {
            let support = count as f32 / self.number_of_sequences as f32;
            if support >= self.threshold {
                let pattern = Pattern::new(&key, support, true);
                self.maximal_patterns.insert(key.clone(), pattern.clone());
                self.evict_subsumed(&pattern);
                self.all_patterns.push(pattern.clone());
                round.insert(key, pattern);
            }
        }
        round
    }

    /// Drops the three subpatterns an accepted pattern directly
    /// subsumes: its appended single item, its prefix and its suffix.
    fn evict_subsumed(&mut self, pattern: &Pattern) {
        if let Some(last_item) = pattern.last_item() {
            let last_item = last_item.to_string();
            self.maximal_patterns.remove(&last_item);
        }
        let prefix = pattern.prefix();
        if !prefix.is_empty() {
            self.maximal_patterns.remove(&prefix);
        }
        let suffix = pattern.suffix();
        if !suffix.is_empty() {
            self.maximal_patterns.remove(&suffix);
        }
    }

    /// Every frequent pattern found, in descending support order. Equal
    /// supports keep discovery order.
    pub fn sorted_patterns(&self) -> Vec<Pattern> {
        let mut patterns = self.all_patterns.clone();
        patterns.sort_by(|a, b| b.support().total_cmp(&a.support()));
        patterns
    }

    /// The surviving maximal patterns, in descending support order.
    pub fn maximal_sorted(&self) -> Vec<Pattern> {
        let mut patterns: Vec<Pattern> = self.maximal_patterns.values().cloned().collect();
        patterns.sort_by(|a, b| {
            b.support()
                .total_cmp(&a.support())
                .then_with(|| a.key().cmp(&b.key()))
        });
        patterns
    }

    /// Length histogram of the surviving maximal patterns.
    pub fn length_histogram(&self) -> BTreeMap<usize, u64> {
        let mut histogram = BTreeMap::new();
        for pattern in self.maximal_patterns.values() {
            *histogram.entry(pattern.len()).or_insert(0) += 1;
        }
        histogram
    }

    pub fn pattern_count(&self) -> usize {
        self.all_patterns.len()
    }

    pub fn maximal_count(&self) -> usize {
        self.maximal_patterns.len()
    }

    /// Writes the maximal and full registries as `support,key` lines.
    pub fn write_results(
        &self,
        maximal_path: impl AsRef<Path>,
        all_path: impl AsRef<Path>,
    ) -> Result<()> {
        let mut maximal = BufWriter::new(File::create(maximal_path)?);
        for pattern in self.maximal_sorted() {
            writeln!(maximal, "{}", pattern.to_line())?;
        }
        maximal.flush()?;

        let mut all = BufWriter::new(File::create(all_path)?);
        for pattern in self.sorted_patterns() {
            writeln!(all, "{}", pattern.to_line())?;
        }
        all.flush()?;
        Ok(())
    }
}
