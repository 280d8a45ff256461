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

//! The engine's answer and the step replay used to scrub through it.

use crate::codec::ProtocolError;
use crate::puzzle::Puzzle;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// One entity of the solved grid: category name to label name, or `None`
/// when the engine could not determine that category.
pub type SolutionRow = BTreeMap<String, Option<String>>;

/// A single pairwise deduction of the trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionStep {
    pub label1: String,
    pub label2: String,
    /// Whether both labels belong to the same entity.
    pub yes: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// What is known about two labels at some point of the trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    Related,
    Excluded,
    Unknown,
}

impl Relation {
    pub fn as_str(self) -> &'static str {
        match self {
            Relation::Related => "related",
            Relation::Excluded => "excluded",
            Relation::Unknown => "unknown",
        }
    }
}

impl From<bool> for Relation {
    fn from(yes: bool) -> Self {
        if yes {
            Relation::Related
        } else {
            Relation::Excluded
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A solved grid together with the trace that justifies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    #[serde(rename = "solution")]
    pub rows: Vec<SolutionRow>,
    pub steps: Vec<SolutionStep>,
}

impl Solution {
    /// Fold the first `k` steps into a relation table.
    ///
    /// The table is rebuilt from the first step every time, since `k` moves
    /// in both directions while the user scrubs. A `k` past the end of the
    /// trace replays the whole trace.
    pub fn replay(&self, k: usize) -> Replay<'_> {
        let mut known = HashMap::new();
        let mut len = 0;
        for step in self.steps.iter().take(k) {
            let (a, b) = (step.label1.as_str(), step.label2.as_str());
            // Last write wins regardless of orientation.
            known.remove(&(b, a));
            known.insert((a, b), step.yes);
            len += 1;
        }
        Replay { known, len }
    }

    /// Relation between `a` and `b` after the first `k` steps.
    pub fn relation(&self, k: usize, a: &str, b: &str) -> Relation {
        self.replay(k).relation(a, b)
    }

    /// The steps taken up to prefix length `k`.
    pub fn visible_steps(&self, k: usize) -> &[SolutionStep] {
        &self.steps[..k.min(self.steps.len())]
    }

    /// Label occupying `category` in the given row, if solved.
    pub fn label_in_row(&self, row: usize, category: &str) -> Option<&str> {
        self.rows.get(row)?.get(category)?.as_deref()
    }

    /// Check that every name in the grid and the trace belongs to `puzzle`.
    pub fn conforms_to(&self, puzzle: &Puzzle) -> Result<(), ProtocolError> {
        let categories: HashSet<&str> = puzzle.categories().iter().map(String::as_str).collect();
        let labels: HashSet<&str> = puzzle.labels().iter().map(String::as_str).collect();
        let check_label = |name: &str| {
            if labels.contains(name) {
                Ok(())
            } else {
                Err(ProtocolError::UnknownLabel {
                    name: name.to_string(),
                })
            }
        };

        for row in &self.rows {
            for (category, label) in row {
                if !categories.contains(category.as_str()) {
                    return Err(ProtocolError::UnknownCategory {
                        name: category.clone(),
                    });
                }
                if let Some(label) = label {
                    check_label(label)?;
                }
            }
        }
        for step in &self.steps {
            check_label(&step.label1)?;
            check_label(&step.label2)?;
        }
        Ok(())
    }
}

/// Relation table for one prefix of the trace.
#[derive(Debug, Clone)]
pub struct Replay<'s> {
    known: HashMap<(&'s str, &'s str), bool>,
    len: usize,
}

impl<'s> Replay<'s> {
    /// Number of steps folded into this table.
    pub fn prefix_len(&self) -> usize {
        self.len
    }

    /// Directed lookup with a symmetric fallback.
    pub fn relation(&self, a: &str, b: &str) -> Relation {
        self.known
            .get(&(a, b))
            .or_else(|| self.known.get(&(b, a)))
            .map_or(Relation::Unknown, |&yes| Relation::from(yes))
    }

    /// Relation of two labels addressed by global index, as the grid lays
    /// them out. Pairs within one category are not grid cells.
    pub fn cell(&self, puzzle: &Puzzle, a: usize, b: usize) -> Option<Relation> {
        let (name_a, name_b) = (puzzle.labels().get(a)?, puzzle.labels().get(b)?);
        if puzzle.category_of(a) == puzzle.category_of(b) {
            return None;
        }
        Some(self.relation(name_a, name_b))
    }
}
