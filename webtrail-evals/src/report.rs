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

//! Evaluation counters and their text rendering.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Fixed report order. `CTO` is the combined predictor: a trial counts
/// as a hit when either the complete-reconstruction or the time-oriented
/// predictor hits.
pub const REPORT_LABELS: [&str; 6] = ["TO", "SmartSRA", "CSRA", "IP", "NO", "CTO"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmCounts {
    pub hits: u64,
    pub empty_predictions: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub tries: u64,
    pub trivial_sessions: u64,
    pub complex_sessions: u64,
    pub algorithms: BTreeMap<String, AlgorithmCounts>,
}

impl EvaluationReport {
    pub fn record(&mut self, label: &str, hit: bool, empty: bool) {
        let counts = self.algorithms.entry(label.to_string()).or_default();
        if hit {
            counts.hits += 1;
        }
        if empty {
            counts.empty_predictions += 1;
        }
    }

    pub fn counts(&self, label: &str) -> AlgorithmCounts {
        self.algorithms.get(label).copied().unwrap_or_default()
    }

    /// Hit rate of one algorithm over all trials.
    pub fn hit_rate(&self, label: &str) -> f64 {
        if self.tries == 0 {
            0.0
        } else {
            self.counts(label).hits as f64 / self.tries as f64
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Number Of Tries: {}", self.tries);
        for label in REPORT_LABELS {
            let _ = writeln!(out, "{} val: {}", label, self.counts(label).hits);
        }
        for label in REPORT_LABELS {
            let _ = writeln!(
                out,
                "{} empty val: {}",
                label,
                self.counts(label).empty_predictions
            );
        }
        let _ = writeln!(out, "Number of Trivial: {}", self.trivial_sessions);
        let _ = writeln!(out, "Number of Complex: {}", self.complex_sessions);
        out
    }
}
