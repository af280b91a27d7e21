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

//! Webtrail Prediction Evaluation
//!
//! Replays held-out sessions against one predictor per reconstruction
//! algorithm and scores next-page hits. Every session position after
//! the first is a separate trial: the prefix before it is reconstructed
//! at decaying penalties, the predictor samples a next-item set, and a
//! hit means the set contains the page actually visited.

pub mod evaluator;
pub mod report;

pub use evaluator::PredictionEvaluator;
pub use report::{AlgorithmCounts, EvaluationReport, REPORT_LABELS};
