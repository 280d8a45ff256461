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

//! The canonical text protocol spoken with the solving engine.
//!
//! ```text
//! [Categories]
//! <category>
//! <label>
//! ...
//!
//! [Clues]
//! <clue name>,<kind>,<param>,...
//! ```
//!
//! Names are printed verbatim; the protocol has no escaping, which is why
//! the puzzle model rejects commas and line breaks in names.

use crate::kinds::{ClueKind, ParamType};
use crate::puzzle::{Clue, MIN_LABELS, Puzzle, Validated, ValidationError};
use crate::solution::Solution;
use serde_json::Value;

const CATEGORIES_MARKER: &str = "[Categories]";
const CLUES_MARKER: &str = "[Clues]";

/// Errors raised while reading canonical puzzle text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("missing [Categories] marker")]
    MissingCategories,
    #[error("missing [Clues] marker")]
    MissingClues,
    #[error("line {line}: category {category:?} has no labels")]
    EmptyCategory { line: usize, category: String },
    #[error("line {line}: category {category:?} has {found} labels, expected {expected}")]
    LabelCountMismatch {
        line: usize,
        category: String,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: unknown clue kind {kind:?}")]
    UnknownClueKind { line: usize, kind: String },
    #[error("line {line}: clue kind {kind} takes {expected} parameters, got {found}")]
    ParamCountMismatch {
        line: usize,
        kind: ClueKind,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: unknown label {name:?}")]
    UnknownLabel { line: usize, name: String },
    #[error("line {line}: unknown category {name:?}")]
    UnknownCategory { line: usize, name: String },
    #[error("line {line}: invalid number {text:?}")]
    InvalidNumber { line: usize, text: String },
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// The engine answered with something that is neither a solution nor an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("solver response is malformed: {reason}")]
    Malformed { reason: String },
    #[error("solver response is not a JSON object")]
    NotAnObject,
    #[error("solver response carries both an error and a solution")]
    Ambiguous,
    #[error("solver response carries neither an error nor a solution")]
    Empty,
    #[error("solver response has unexpected field {field:?}")]
    UnexpectedField { field: String },
    #[error("solution refers to unknown category {name:?}")]
    UnknownCategory { name: String },
    #[error("solution refers to unknown label {name:?}")]
    UnknownLabel { name: String },
}

/// A well-formed engine response.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineResponse {
    Solved(Solution),
    /// The engine rejected the puzzle; the message is shown verbatim.
    Error(String),
}

/// Category names, label names and labels-per-category read back from text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryLayout {
    pub categories: Vec<String>,
    pub labels: Vec<String>,
    pub num_labels: usize,
}

/// Encode a validated puzzle into canonical text.
pub fn encode(validated: Validated<'_>) -> String {
    let puzzle = validated.puzzle();
    let mut text = String::new();

    text.push_str(CATEGORIES_MARKER);
    text.push('\n');
    for (index, category) in puzzle.categories().iter().enumerate() {
        text.push_str(category);
        text.push('\n');
        for label in puzzle.category_labels(index).unwrap_or_default() {
            text.push_str(label);
            text.push('\n');
        }
        text.push('\n');
    }

    text.push_str(CLUES_MARKER);
    text.push('\n');
    for clue in puzzle.clues() {
        encode_clue(puzzle, clue, &mut text);
        text.push('\n');
    }
    text
}

fn encode_clue(puzzle: &Puzzle, clue: &Clue, text: &mut String) {
    text.push_str(&clue.name);
    text.push(',');
    text.push_str(clue.kind.name());
    // Validation guarantees every index is in bounds.
    for (param_type, &value) in clue.kind.params().iter().zip(&clue.params) {
        text.push(',');
        match param_type {
            ParamType::Label => text.push_str(&puzzle.labels()[value as usize]),
            ParamType::Category => text.push_str(&puzzle.categories()[value as usize]),
            ParamType::Number => text.push_str(&value.to_string()),
        }
    }
}

/// Split canonical text into its category layout and the numbered clue lines.
fn read_sections(text: &str) -> Result<(CategoryLayout, Vec<(usize, &str)>), CodecError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line))
        .peekable();

    lines
        .by_ref()
        .find(|(_, line)| line.trim() == CATEGORIES_MARKER)
        .ok_or(CodecError::MissingCategories)?;

    let mut layout = CategoryLayout::default();
    let mut num_labels = None;
    loop {
        let (line, category) = match lines.next() {
            None => return Err(CodecError::MissingClues),
            Some((_, text)) if text.trim().is_empty() => continue,
            Some((_, text)) if text.trim() == CLUES_MARKER => break,
            Some(entry) => entry,
        };

        let mut labels = Vec::new();
        while let Some(&(_, text)) = lines.peek() {
            if text.trim() == CLUES_MARKER {
                break;
            }
            lines.next();
            if text.trim().is_empty() {
                break;
            }
            labels.push(text.to_string());
        }

        if labels.is_empty() {
            return Err(CodecError::EmptyCategory {
                line,
                category: category.to_string(),
            });
        }
        match num_labels {
            None => num_labels = Some(labels.len()),
            Some(expected) if expected != labels.len() => {
                return Err(CodecError::LabelCountMismatch {
                    line,
                    category: category.to_string(),
                    expected,
                    found: labels.len(),
                });
            }
            Some(_) => {}
        }
        layout.categories.push(category.to_string());
        layout.labels.extend(labels);
    }

    layout.num_labels = num_labels.unwrap_or(0);
    Ok((layout, lines.collect()))
}

/// Read back only the categories and labels of canonical text.
pub fn decode_categories(text: &str) -> Result<CategoryLayout, CodecError> {
    read_sections(text).map(|(layout, _)| layout)
}

/// Decode canonical text into a validated puzzle.
pub fn decode(text: &str) -> Result<Puzzle, CodecError> {
    let (layout, clue_lines) = read_sections(text)?;

    let num_labels = if layout.categories.is_empty() {
        MIN_LABELS
    } else {
        layout.num_labels
    };
    let mut puzzle = Puzzle::new(num_labels)?;
    for (category, name) in layout.categories.iter().enumerate() {
        puzzle.add_category(name)?;
        let labels = &layout.labels[category * num_labels..(category + 1) * num_labels];
        for (position, label) in labels.iter().enumerate() {
            puzzle.add_label(category, position, label)?;
        }
    }

    for (line, text) in clue_lines {
        if text.trim().is_empty() {
            continue;
        }
        let clue = decode_clue(&puzzle, line, text)?;
        puzzle.add_or_replace_clue(puzzle.clues().len(), clue)?;
    }

    puzzle.validate()?;
    Ok(puzzle)
}

fn decode_clue(puzzle: &Puzzle, line: usize, text: &str) -> Result<Clue, CodecError> {
    let mut fields = text.split(',');
    let name = fields.next().unwrap_or_default();
    let kind_name = fields.next().unwrap_or_default();
    let kind = ClueKind::lookup(kind_name).ok_or_else(|| CodecError::UnknownClueKind {
        line,
        kind: kind_name.to_string(),
    })?;

    let values: Vec<&str> = fields.collect();
    let types = kind.params();
    if values.len() != types.len() {
        return Err(CodecError::ParamCountMismatch {
            line,
            kind,
            expected: types.len(),
            found: values.len(),
        });
    }

    let params = types
        .iter()
        .zip(values)
        .map(|(param_type, field)| decode_param(puzzle, line, *param_type, field))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Clue::new(name, kind, params))
}

fn decode_param(
    puzzle: &Puzzle,
    line: usize,
    param_type: ParamType,
    field: &str,
) -> Result<i64, CodecError> {
    match param_type {
        ParamType::Label => puzzle
            .find_label(field)
            .map(|index| index as i64)
            .ok_or_else(|| CodecError::UnknownLabel {
                line,
                name: field.to_string(),
            }),
        ParamType::Category => puzzle
            .find_category(field)
            .map(|index| index as i64)
            .ok_or_else(|| CodecError::UnknownCategory {
                line,
                name: field.to_string(),
            }),
        ParamType::Number => field.parse().map_err(|_| CodecError::InvalidNumber {
            line,
            text: field.to_string(),
        }),
    }
}

/// Check the shape of an engine response and parse it.
///
/// A response is exactly one of `{"error": <string>}` or
/// `{"solution": [...], "steps": [...]}`.
pub fn parse_response(body: &str) -> Result<EngineResponse, ProtocolError> {
    let value: Value = serde_json::from_str(body).map_err(|e| ProtocolError::Malformed {
        reason: e.to_string(),
    })?;
    let Value::Object(mut fields) = value else {
        return Err(ProtocolError::NotAnObject);
    };
    if let Some(field) = fields
        .keys()
        .find(|key| !matches!(key.as_str(), "error" | "solution" | "steps"))
    {
        return Err(ProtocolError::UnexpectedField {
            field: field.clone(),
        });
    }

    let error = fields.remove("error");
    let has_solution = fields.contains_key("solution") || fields.contains_key("steps");
    match (error, has_solution) {
        (Some(_), true) => Err(ProtocolError::Ambiguous),
        (None, false) => Err(ProtocolError::Empty),
        (Some(Value::String(message)), false) => Ok(EngineResponse::Error(message)),
        (Some(_), false) => Err(ProtocolError::Malformed {
            reason: "`error` is not a string".to_string(),
        }),
        (None, true) => serde_json::from_value(Value::Object(fields))
            .map(EngineResponse::Solved)
            .map_err(|e| ProtocolError::Malformed {
                reason: e.to_string(),
            }),
    }
}
