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

//! Webtrail Next-Item Prediction
//!
//! A mined pattern registry becomes a prediction model: reconstructed
//! candidate prefixes are matched against the pattern index and the
//! next item is drawn by support-weighted random sampling.

pub mod model;
pub mod predictor;

pub use model::PatternModel;
pub use predictor::BayesianPredictor;
