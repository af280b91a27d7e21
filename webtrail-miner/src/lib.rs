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

//! Webtrail Pattern Mining
//!
//! Topology-constrained sequential Apriori over a dash-joined sequence
//! corpus. Candidate growth follows the item adjacency observed in the
//! corpus itself, so each round only proposes extensions that occur
//! consecutively somewhere in the data.

pub mod apriori;
pub mod corpus;

pub use apriori::SequentialApriori;
pub use corpus::SequenceCorpus;
