/*
* Copyright (C) 2026  Henrique Almeida
* This file is part of gridsolve.
*
* gridsolve is free software: you can redistribute it and/or modify
* it under the terms of the GNU Affero General Public License as published
* by the Free Software Foundation, either version 3 of the License, or
* (at your option) any later version.
*
* gridsolve is distributed in the hope that it will be useful,
* but WITHOUT ANY WARRANTY; without even the implied warranty of
* MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
* GNU Affero General Public License for more details.
*
* You should have received a copy of the GNU Affero General Public License
* along with gridsolve.  If not, see <https://www.gnu.org/licenses/>.
*/

//! Bookmarkable state: the puzzle (and its solution, once solved) as
//! percent-encoded JSON in the page fragment.

use crate::codec::ProtocolError;
use crate::puzzle::{Puzzle, PuzzleRecord, ValidationError};
use crate::solution::Solution;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("fragment is not valid percent-encoded UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("fragment is not a saved puzzle: {0}")]
    Json(#[from] serde_json::Error),
    #[error("saved puzzle is inconsistent: {0}")]
    Structure(#[from] ValidationError),
    #[error("saved solution does not belong to the saved puzzle: {0}")]
    Solution(#[from] ProtocolError),
}

/// The fragment payload: the puzzle's own fields plus an optional solution.
#[derive(Serialize)]
struct SavedRef<'a> {
    #[serde(flatten)]
    puzzle: &'a Puzzle,
    #[serde(skip_serializing_if = "Option::is_none")]
    solution: Option<&'a Solution>,
}

#[derive(Deserialize)]
struct Saved {
    #[serde(flatten)]
    record: PuzzleRecord,
    #[serde(default)]
    solution: Option<Solution>,
}

/// State recovered from a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restored {
    pub puzzle: Puzzle,
    pub solution: Option<Solution>,
}

/// Encode a puzzle, and optionally its solution, as a fragment (without `#`).
pub fn encode(puzzle: &Puzzle, solution: Option<&Solution>) -> Result<String, PersistenceError> {
    let json = serde_json::to_string(&SavedRef { puzzle, solution })?;
    Ok(urlencoding::encode(&json).into_owned())
}

/// Decode a fragment, with or without its leading `#`.
///
/// The puzzle is only checked structurally, since a bookmark may be taken
/// mid-edit. A saved solution must name only the puzzle's categories and labels.
pub fn decode(fragment: &str) -> Result<Restored, PersistenceError> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    let json = urlencoding::decode(fragment)?;
    let saved: Saved = serde_json::from_str(&json)?;

    let puzzle = Puzzle::try_from(saved.record)?;
    if let Some(solution) = &saved.solution {
        solution.conforms_to(&puzzle)?;
    }
    Ok(Restored {
        puzzle,
        solution: saved.solution,
    })
}
