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

//! Support-weighted next-item prediction.
//!
//! Candidate prefixes are looked up in the pattern index; when none
//! match, they are progressively shrunk from the front (the oldest
//! page is the least informative) for up to `max_tail_count` rounds.
//! Matched pattern supports, scaled by each candidate's penalty, are
//! aggregated per next item and the prediction set is drawn by
//! weighted sampling without replacement.

use crate::model::PatternModel;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};
use webtrail_core::{Pattern, Sequence};

/// Support values are scaled to integers for exact cumulative sums.
const SUPPORT_SCALE: f64 = 1e12;

pub struct BayesianPredictor {
    model: PatternModel,
    predicted_items: usize,
    max_tail_count: usize,
    rng: StdRng,
}

impl BayesianPredictor {
    pub fn new(model: PatternModel, predicted_items: usize, max_tail_count: usize) -> Self {
        Self {
            model,
            predicted_items,
            max_tail_count,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic variant for reproducible runs.
    pub fn with_seed(
        model: PatternModel,
        predicted_items: usize,
        max_tail_count: usize,
        seed: u64,
    ) -> Self {
        Self {
            model,
            predicted_items,
            max_tail_count,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn model(&self) -> &PatternModel {
        &self.model
    }

    /// Predicts the set of items likely to follow the given candidate
    /// prefixes. Every pattern matched along the way is appended to
    /// `matched_output` with its penalty-scaled support.
    pub fn predict_next_item(
        &mut self,
        candidates: &[Sequence],
        matched_output: &mut Vec<Pattern>,
    ) -> HashSet<String> {
        let candidates = self.shrink_to_known_prefix(candidates);
        let mut weights: HashMap<String, f32> = HashMap::new();

        for (joined, penalty) in &candidates {
            let Some(matched) = self.model.patterns_with_prefix(joined) else {
                continue;
            };
            for key in matched {
                let Some(support) = self.model.support_of(key) else {
                    continue;
                };
                let scaled = support * penalty;
                let pattern = Pattern::new(key, scaled, true);
                let Some(next_item) = pattern.last_item() else {
                    continue;
                };
                *weights.entry(next_item.to_string()).or_insert(0.0) += scaled;
                matched_output.push(pattern);
            }
        }

        self.weighted_select(weights)
    }

    /// When no candidate is a known prefix, drop the earliest page from
    /// every candidate and retry, up to `max_tail_count` rounds. A round
    /// that produces any known prefix wins; when every round fails the
    /// original candidates are returned unchanged.
    fn shrink_to_known_prefix(&self, candidates: &[Sequence]) -> Vec<(String, f32)> {
        let original: Vec<(String, f32)> = candidates
            .iter()
            .map(|sequence| (sequence.to_string(), sequence.penalty()))
            .collect();
        if original
            .iter()
            .any(|(joined, _)| self.model.has_prefix(joined.trim()))
        {
            return original;
        }

        let mut shrunk = original.clone();
        for _ in 0..self.max_tail_count {
            shrunk = shrunk
                .iter()
                .filter_map(|(joined, penalty)| {
                    tail_of(joined).map(|tail| (tail.to_string(), *penalty))
                })
                .collect();
            if shrunk.is_empty() {
                break;
            }
            let matching: Vec<(String, f32)> = shrunk
                .iter()
                .filter(|(joined, _)| self.model.has_prefix(joined))
                .cloned()
                .collect();
            if !matching.is_empty() {
                return matching;
            }
        }
        original
    }

    /// Draws up to `predicted_items` distinct items, each with
    /// probability proportional to its aggregated weight, without
    /// replacement.
    fn weighted_select(&mut self, weights: HashMap<String, f32>) -> HashSet<String> {
        // Fixed iteration order so seeded runs are reproducible.
        let mut entries: Vec<(String, f32)> = weights.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut result = HashSet::new();
        while result.len() < self.predicted_items && !entries.is_empty() {
            let mut cumulative = Vec::with_capacity(entries.len());
            let mut total: u64 = 0;
            for (_, weight) in &entries {
                total += (*weight as f64 * SUPPORT_SCALE) as u64;
                cumulative.push(total);
            }
            if total == 0 {
                break;
            }
            let target = self.rng.gen_range(0..total);
            let index = find_index(&cumulative, target);
            let (item, _) = entries.remove(index);
            result.insert(item);
        }
        result
    }
}

/// Everything after the first item of a dash-joined string; `None` for a
/// single item.
fn tail_of(joined: &str) -> Option<&str> {
    joined
        .split_once(webtrail_core::ITEM_SEPARATOR)
        .map(|(_, tail)| tail.trim())
}

/// Smallest `i` with `cumulative[i] >= target` and, for `i > 0`,
/// `target > cumulative[i - 1]`; falls back to the last slot when the
/// probe runs off the end.
fn find_index(cumulative: &[u64], target: u64) -> usize {
    let mut min = 0usize;
    let mut max = cumulative.len() - 1;
    loop {
        let mid = (min + max) / 2;
        if cumulative[mid] >= target && (mid == 0 || target > cumulative[mid - 1]) {
            return mid;
        }
        if mid == cumulative.len() - 1 {
            return mid;
        }
        if cumulative[mid] >= target {
            max = mid - 1;
        } else {
            min = mid + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> PatternModel {
        PatternModel::from_patterns(&[
            Pattern::new("/a-/b", 0.8, true),
            Pattern::new("/a-/c", 0.2, true),
            Pattern::new("/b-/d", 0.5, true),
        ])
    }

    #[test]
    fn single_matching_pattern_is_deterministic() {
        let model = PatternModel::from_patterns(&[Pattern::new("/a-/b", 1.0, true)]);
        let mut predictor = BayesianPredictor::with_seed(model, 1, 1, 7);
        let mut matched = Vec::new();
        let predicted =
            predictor.predict_next_item(&[Sequence::from_joined("/a", 1.0)], &mut matched);
        assert_eq!(predicted, HashSet::from(["/b".to_string()]));
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].key(), "/a-/b");
    }

    #[test]
    fn sampling_tracks_support_weights() {
        // /b carries four times the weight of /c; over many seeded draws
        // it must dominate.
        let mut predictor = BayesianPredictor::with_seed(model(), 1, 1, 42);
        let mut b_count = 0;
        let mut c_count = 0;
        for _ in 0..200 {
            let mut matched = Vec::new();
            let predicted =
                predictor.predict_next_item(&[Sequence::from_joined("/a", 1.0)], &mut matched);
            if predicted.contains("/b") {
                b_count += 1;
            }
            if predicted.contains("/c") {
                c_count += 1;
            }
        }
        assert_eq!(b_count + c_count, 200);
        assert!(b_count > c_count);
    }

    #[test]
    fn penalty_scales_matched_supports() {
        let mut predictor = BayesianPredictor::with_seed(model(), 1, 1, 3);
        let mut matched = Vec::new();
        predictor.predict_next_item(&[Sequence::from_joined("/a", 0.5)], &mut matched);
        let reported = matched.iter().find(|p| p.key() == "/a-/b").unwrap();
        assert!((reported.support() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn unknown_prefix_shrinks_from_the_front() {
        // /x-/b is unknown; dropping the oldest page leaves the known
        // prefix /b.
        let mut predictor = BayesianPredictor::with_seed(model(), 1, 2, 5);
        let mut matched = Vec::new();
        let predicted =
            predictor.predict_next_item(&[Sequence::from_joined("/x-/b", 1.0)], &mut matched);
        assert_eq!(predicted, HashSet::from(["/d".to_string()]));
    }

    #[test]
    fn shrink_budget_is_bounded() {
        // Two rounds would be needed but only one is allowed, so nothing
        // matches and the prediction set is empty.
        let mut predictor = BayesianPredictor::with_seed(model(), 1, 1, 5);
        let mut matched = Vec::new();
        let predicted = predictor
            .predict_next_item(&[Sequence::from_joined("/x-/y-/b", 1.0)], &mut matched);
        assert!(predicted.is_empty());
        assert!(matched.is_empty());
    }

    #[test]
    fn draws_without_replacement() {
        let mut predictor = BayesianPredictor::with_seed(model(), 2, 1, 11);
        let mut matched = Vec::new();
        let predicted =
            predictor.predict_next_item(&[Sequence::from_joined("/a", 1.0)], &mut matched);
        assert_eq!(
            predicted,
            HashSet::from(["/b".to_string(), "/c".to_string()])
        );
    }

    #[test]
    fn no_candidates_yields_empty_set() {
        let mut predictor = BayesianPredictor::with_seed(model(), 1, 1, 1);
        let mut matched = Vec::new();
        assert!(predictor.predict_next_item(&[], &mut matched).is_empty());
    }

    proptest::proptest! {
        // For any cumulative weight array and in-range target, the probe
        // lands on the slot whose half-open interval contains the target.
        #[test]
        fn find_index_lands_in_the_right_slot(
            weights in proptest::collection::vec(1u64..1000, 1..20),
            fraction in 0.0f64..1.0,
        ) {
            let mut cumulative = Vec::with_capacity(weights.len());
            let mut total = 0u64;
            for weight in &weights {
                total += weight;
                cumulative.push(total);
            }
            let target = (fraction * total as f64) as u64;
            let index = find_index(&cumulative, target);
            proptest::prop_assert!(cumulative[index] >= target);
            if index > 0 {
                proptest::prop_assert!(target > cumulative[index - 1]);
            }
        }
    }
}
