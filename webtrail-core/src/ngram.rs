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

//! Contiguous n-gram extraction over dash-joined sequences.

use crate::ITEM_SEPARATOR;
use std::collections::HashSet;

/// All distinct contiguous n-grams of length `n` in a dash-joined line,
/// each returned re-joined with dashes. Items are trimmed.
pub fn ngrams(line: &str, n: usize) -> HashSet<String> {
    let items: Vec<&str> = line.split(ITEM_SEPARATOR).map(str::trim).collect();
    let mut set = HashSet::new();
    if n == 0 || items.len() < n {
        return set;
    }
    for window in items.windows(n) {
        set.insert(window.join(&ITEM_SEPARATOR.to_string()));
    }
    set
}
