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

//! The puzzle domain model: categories, labels and typed clues.
//!
//! A `Puzzle` can be in an incomplete, editing state (labels not filled in
//! yet, no clues). Only a puzzle that passes [`Puzzle::validated`] may be
//! handed to the codec.

use crate::codec;
use crate::kinds::{ClueKind, ParamType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Smallest number of labels per category.
pub const MIN_LABELS: usize = 2;

/// Smallest number of categories a solvable grid can have.
pub const MIN_CATEGORIES: usize = 2;

/// A clue instance: a kind plus concrete parameter values.
///
/// Label slots hold global label indices, category slots hold category
/// indices and number slots hold the number itself. Values are signed so
/// that bad input from the UI is rejected by validation instead of parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clue {
    pub name: String,
    pub kind: ClueKind,
    pub params: Vec<i64>,
}

impl Clue {
    pub fn new(name: impl Into<String>, kind: ClueKind, params: Vec<i64>) -> Self {
        Clue {
            name: name.into(),
            kind,
            params,
        }
    }
}

/// What a validated name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRole {
    Category,
    Label,
    Clue,
}

impl fmt::Display for NameRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NameRole::Category => "category",
            NameRole::Label => "label",
            NameRole::Clue => "clue",
        })
    }
}

/// A local, recoverable problem with the puzzle being edited.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("a puzzle needs at least {min} labels per category, got {found}")]
    TooFewLabels { found: usize, min: usize },
    #[error("the number of labels per category cannot change once categories exist")]
    NumLabelsLocked,
    #[error("a puzzle needs at least {min} categories, got {found}")]
    TooFewCategories { found: usize, min: usize },
    #[error("{role} name must not be empty")]
    EmptyName { role: NameRole },
    #[error("{role} name {name:?} must not contain a comma or a line break")]
    ForbiddenCharacter { role: NameRole, name: String },
    #[error("{role} name {name:?} is used more than once")]
    DuplicateName { role: NameRole, name: String },
    #[error("category {index} does not exist (the puzzle has {count})")]
    NoSuchCategory { index: usize, count: usize },
    #[error("label position {position} is outside 0..{num_labels}")]
    NoSuchPosition { position: usize, num_labels: usize },
    #[error("category {category:?} has no label at position {position}")]
    MissingLabel { category: String, position: usize },
    #[error("clue {index} does not exist (the puzzle has {count})")]
    NoSuchClue { index: usize, count: usize },
    #[error("the puzzle has no clues")]
    NoClues,
    #[error("clue {clue:?} of kind {kind} takes {expected} parameters, got {found}")]
    ParamCountMismatch {
        clue: String,
        kind: ClueKind,
        expected: usize,
        found: usize,
    },
    #[error("parameter {slot} of clue {clue:?} refers to {param_type} {value}, which does not exist")]
    ParamOutOfRange {
        clue: String,
        slot: usize,
        param_type: ParamType,
        value: i64,
    },
    #[error("parameter {slot} of clue {clue:?} must be at least {min}, got {value}")]
    NumberTooSmall {
        clue: String,
        slot: usize,
        value: i64,
        min: i64,
    },
    #[error("{categories} categories of {num_labels} labels each is more than can be addressed")]
    TooManyLabels { categories: usize, num_labels: usize },
    #[error("expected {expected} labels for {categories} categories, got {found}")]
    LabelCountMismatch {
        expected: usize,
        categories: usize,
        found: usize,
    },
}

/// Check the characters of a category, label or clue name.
fn check_name(role: NameRole, name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyName { role });
    }
    if name.contains([',', '\n', '\r']) {
        return Err(ValidationError::ForbiddenCharacter {
            role,
            name: name.to_string(),
        });
    }
    Ok(())
}

/// A logic-grid puzzle.
///
/// Labels are stored flat; the label at `position` of `category` lives at
/// global index `category * num_labels + position`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PuzzleRecord", into = "PuzzleRecord")]
pub struct Puzzle {
    categories: Vec<String>,
    labels: Vec<String>,
    num_labels: usize,
    clues: Vec<Clue>,
}

/// The plain serialized shape of a puzzle, as stored in the page fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleRecord {
    pub categories: Vec<String>,
    pub labels: Vec<String>,
    pub num_labels: usize,
    #[serde(default)]
    pub clues: Vec<Clue>,
}

impl TryFrom<PuzzleRecord> for Puzzle {
    type Error = ValidationError;

    /// Only the structure is checked here; names and clues may still be
    /// incomplete while the puzzle is being edited.
    fn try_from(record: PuzzleRecord) -> Result<Self, Self::Error> {
        let mut puzzle = Puzzle::new(record.num_labels)?;
        let expected = record
            .categories
            .len()
            .checked_mul(record.num_labels)
            .ok_or(ValidationError::TooManyLabels {
                categories: record.categories.len(),
                num_labels: record.num_labels,
            })?;
        if record.labels.len() != expected {
            return Err(ValidationError::LabelCountMismatch {
                expected,
                categories: record.categories.len(),
                found: record.labels.len(),
            });
        }
        puzzle.categories = record.categories;
        puzzle.labels = record.labels;
        puzzle.clues = record.clues;
        Ok(puzzle)
    }
}

impl From<Puzzle> for PuzzleRecord {
    fn from(puzzle: Puzzle) -> Self {
        PuzzleRecord {
            categories: puzzle.categories,
            labels: puzzle.labels,
            num_labels: puzzle.num_labels,
            clues: puzzle.clues,
        }
    }
}

impl Puzzle {
    /// Create an empty puzzle with `num_labels` labels per category.
    pub fn new(num_labels: usize) -> Result<Self, ValidationError> {
        if num_labels < MIN_LABELS {
            return Err(ValidationError::TooFewLabels {
                found: num_labels,
                min: MIN_LABELS,
            });
        }
        Ok(Puzzle {
            categories: Vec::new(),
            labels: Vec::new(),
            num_labels,
            clues: Vec::new(),
        })
    }

    /// Change the number of labels per category. Only allowed while the
    /// puzzle has no categories; existing labels are never truncated or padded.
    pub fn set_num_labels(&mut self, num_labels: usize) -> Result<(), ValidationError> {
        if num_labels == self.num_labels {
            return Ok(());
        }
        if !self.categories.is_empty() {
            return Err(ValidationError::NumLabelsLocked);
        }
        if num_labels < MIN_LABELS {
            return Err(ValidationError::TooFewLabels {
                found: num_labels,
                min: MIN_LABELS,
            });
        }
        self.num_labels = num_labels;
        Ok(())
    }

    /// Append a category with empty label slots and return its index.
    pub fn add_category(&mut self, name: &str) -> Result<usize, ValidationError> {
        check_name(NameRole::Category, name)?;
        if self.find_category(name).is_some() {
            return Err(ValidationError::DuplicateName {
                role: NameRole::Category,
                name: name.to_string(),
            });
        }
        self.categories.push(name.to_string());
        self.labels
            .extend(std::iter::repeat_n(String::new(), self.num_labels));
        Ok(self.categories.len() - 1)
    }

    /// Set the label at `position` within `category`, returning its global index.
    pub fn add_label(
        &mut self,
        category: usize,
        position: usize,
        name: &str,
    ) -> Result<usize, ValidationError> {
        self.check_category(category)?;
        if position >= self.num_labels {
            return Err(ValidationError::NoSuchPosition {
                position,
                num_labels: self.num_labels,
            });
        }
        check_name(NameRole::Label, name)?;
        let index = self.label_index(category, position);
        if self.find_label(name).is_some_and(|other| other != index) {
            return Err(ValidationError::DuplicateName {
                role: NameRole::Label,
                name: name.to_string(),
            });
        }
        self.labels[index] = name.to_string();
        Ok(index)
    }

    /// Insert a clue at `index`, or replace the clue already there.
    /// `index == clues().len()` appends.
    pub fn add_or_replace_clue(&mut self, index: usize, clue: Clue) -> Result<(), ValidationError> {
        if index > self.clues.len() {
            return Err(ValidationError::NoSuchClue {
                index,
                count: self.clues.len(),
            });
        }
        self.check_clue(&clue)?;
        if index == self.clues.len() {
            self.clues.push(clue);
        } else {
            self.clues[index] = clue;
        }
        Ok(())
    }

    /// Remove and return the clue at `index`.
    pub fn remove_clue(&mut self, index: usize) -> Result<Clue, ValidationError> {
        if index >= self.clues.len() {
            return Err(ValidationError::NoSuchClue {
                index,
                count: self.clues.len(),
            });
        }
        Ok(self.clues.remove(index))
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn num_labels(&self) -> usize {
        self.num_labels
    }

    pub fn clues(&self) -> &[Clue] {
        &self.clues
    }

    /// The labels of one category, in order, or `None` past the last category.
    pub fn category_labels(&self, category: usize) -> Option<&[String]> {
        let start = category.checked_mul(self.num_labels)?;
        self.labels.get(start..start.checked_add(self.num_labels)?)
    }

    /// Global index of the label at `position` in `category`.
    #[inline]
    pub fn label_index(&self, category: usize, position: usize) -> usize {
        category * self.num_labels + position
    }

    /// Category owning the label with global index `label`.
    #[inline]
    pub fn category_of(&self, label: usize) -> usize {
        label / self.num_labels
    }

    pub fn find_category(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c == name)
    }

    pub fn find_label(&self, name: &str) -> Option<usize> {
        self.labels.iter().position(|l| !l.is_empty() && l == name)
    }

    /// Run every check required before the puzzle may be encoded.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.categories.len() < MIN_CATEGORIES {
            return Err(ValidationError::TooFewCategories {
                found: self.categories.len(),
                min: MIN_CATEGORIES,
            });
        }

        let mut seen = HashSet::new();
        for name in &self.categories {
            check_name(NameRole::Category, name)?;
            if !seen.insert(name.as_str()) {
                return Err(ValidationError::DuplicateName {
                    role: NameRole::Category,
                    name: name.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        for (index, name) in self.labels.iter().enumerate() {
            if name.is_empty() {
                return Err(ValidationError::MissingLabel {
                    category: self.categories[self.category_of(index)].clone(),
                    position: index % self.num_labels,
                });
            }
            check_name(NameRole::Label, name)?;
            if !seen.insert(name.as_str()) {
                return Err(ValidationError::DuplicateName {
                    role: NameRole::Label,
                    name: name.clone(),
                });
            }
        }

        if self.clues.is_empty() {
            return Err(ValidationError::NoClues);
        }
        self.clues.iter().try_for_each(|clue| self.check_clue(clue))
    }

    /// Validate the puzzle and return a witness the codec accepts.
    pub fn validated(&self) -> Result<Validated<'_>, ValidationError> {
        self.validate()?;
        Ok(Validated(self))
    }

    /// Validate, then encode into the solver's canonical text.
    pub fn to_canonical_text(&self) -> Result<String, ValidationError> {
        Ok(codec::encode(self.validated()?))
    }

    fn check_category(&self, category: usize) -> Result<(), ValidationError> {
        if category >= self.categories.len() {
            return Err(ValidationError::NoSuchCategory {
                index: category,
                count: self.categories.len(),
            });
        }
        Ok(())
    }

    fn check_clue(&self, clue: &Clue) -> Result<(), ValidationError> {
        check_name(NameRole::Clue, &clue.name)?;
        let types = clue.kind.params();
        if clue.params.len() != types.len() {
            return Err(ValidationError::ParamCountMismatch {
                clue: clue.name.clone(),
                kind: clue.kind,
                expected: types.len(),
                found: clue.params.len(),
            });
        }

        for (slot, (&param_type, &value)) in types.iter().zip(&clue.params).enumerate() {
            let bound = match param_type {
                ParamType::Label => self.labels.len(),
                ParamType::Category => self.categories.len(),
                ParamType::Number => {
                    let min = clue.kind.min_number();
                    if value < min {
                        return Err(ValidationError::NumberTooSmall {
                            clue: clue.name.clone(),
                            slot,
                            value,
                            min,
                        });
                    }
                    continue;
                }
            };
            if !usize::try_from(value).is_ok_and(|v| v < bound) {
                return Err(ValidationError::ParamOutOfRange {
                    clue: clue.name.clone(),
                    slot,
                    param_type,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Proof that a puzzle passed [`Puzzle::validate`].
#[derive(Debug, Clone, Copy)]
pub struct Validated<'p>(&'p Puzzle);

impl<'p> Validated<'p> {
    pub fn puzzle(&self) -> &'p Puzzle {
        self.0
    }
}
