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

//! Configuration for reconstruction, mining, and prediction.

use crate::error::{Result, WebtrailError};
use serde::{Deserialize, Serialize};

/// Default session expiry threshold in minutes.
pub const DEFAULT_DURATION_THRESHOLD_MINUTES: i64 = 30;

/// Default multiplicative discount per truncation step when generating
/// prediction candidates from shortened session prefixes.
pub const DEFAULT_STEP_PENALTY: f32 = 0.1;

/// Settings shared by the session reconstruction algorithms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructionConfig {
    /// Sessions older than this (minutes since their first page view)
    /// are flushed to reconstruction.
    pub duration_threshold_minutes: i64,

    /// Fan-out budget per candidate sequence in topology mode. Referrer
    /// mode is bounded by referrer ambiguity instead.
    pub max_extension_count: usize,

    /// Skip sessions that are already a straight-line path on the graph.
    pub skip_simple_sessions: bool,
}

impl ReconstructionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.duration_threshold_minutes <= 0 {
            return Err(WebtrailError::InvalidConfig(
                "duration_threshold_minutes must be positive".into(),
            ));
        }
        if self.max_extension_count == 0 {
            return Err(WebtrailError::InvalidConfig(
                "max_extension_count must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self {
            duration_threshold_minutes: DEFAULT_DURATION_THRESHOLD_MINUTES,
            max_extension_count: usize::MAX,
            skip_simple_sessions: false,
        }
    }
}

/// Settings for the sequential pattern miner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    /// Minimum support for a candidate to become a frequent pattern.
    pub threshold: f32,
}

impl MiningConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(WebtrailError::InvalidConfig(
                "threshold must lie in (0, 1]".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self { threshold: 0.01 }
    }
}

/// Settings for next-item prediction and evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// Size of the sampled prediction set.
    pub predicted_items: usize,

    /// Maximum number of prefix-shrinking rounds before an unmatched
    /// candidate set is accepted as-is.
    pub max_tail_count: usize,

    /// Per-truncation-step penalty applied to prediction candidates.
    pub step_penalty: f32,
}

impl PredictionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.predicted_items == 0 {
            return Err(WebtrailError::InvalidConfig(
                "predicted_items must be at least 1".into(),
            ));
        }
        if !(self.step_penalty > 0.0 && self.step_penalty <= 1.0) {
            return Err(WebtrailError::InvalidConfig(
                "step_penalty must lie in (0, 1]".into(),
            ));
        }
        Ok(())
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            predicted_items: 1,
            max_tail_count: 1,
            step_penalty: DEFAULT_STEP_PENALTY,
        }
    }
}
