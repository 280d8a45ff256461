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

//! The fixed catalogue of clue shapes understood by the solving engine.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The type of a single clue parameter slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// A global label index.
    Label,
    /// A category index.
    Category,
    /// A non-negative integer, e.g. an offset within a category.
    Number,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParamType::Label => "label",
            ParamType::Category => "category",
            ParamType::Number => "number",
        })
    }
}

use ParamType::{Category as C, Label as L, Number as N};

/// A clue shape. The set is closed; each variant owns its parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClueKind {
    /// `x` and `y` belong to the same entity.
    Yes,
    /// `x` and `y` belong to different entities.
    No,
    /// `x` comes after `y` in category `C`.
    After,
    /// `x` comes exactly `n` spots after `y` in category `C`.
    AfterExactly,
    /// `x` goes with `y`, or with `z`, or both.
    Or,
    /// `x` goes with exactly one of `y` and `z`.
    Xor,
    /// Either (`x1`,`y1`) and (`x2`,`y2`), or (`x1`,`y2`) and (`x2`,`y1`).
    TwoByTwo,
}

lazy_static::lazy_static! {
    /// Name index over the catalogue, built from `ClueKind::ALL`.
    static ref KINDS_BY_NAME: HashMap<&'static str, ClueKind> =
        ClueKind::ALL.iter().map(|&kind| (kind.name(), kind)).collect();
}

impl ClueKind {
    /// Every kind, in the order a clue editor should offer them.
    pub const ALL: [ClueKind; 7] = [
        ClueKind::Yes,
        ClueKind::No,
        ClueKind::After,
        ClueKind::AfterExactly,
        ClueKind::Or,
        ClueKind::Xor,
        ClueKind::TwoByTwo,
    ];

    /// The name used as the kind field of a canonical clue line.
    pub fn name(self) -> &'static str {
        match self {
            ClueKind::Yes => "yes",
            ClueKind::No => "no",
            ClueKind::After => "after",
            ClueKind::AfterExactly => "afterexactly",
            ClueKind::Or => "or",
            ClueKind::Xor => "xor",
            ClueKind::TwoByTwo => "twobytwo",
        }
    }

    /// The ordered parameter types of this kind.
    pub fn params(self) -> &'static [ParamType] {
        match self {
            ClueKind::Yes | ClueKind::No => &[L, L],
            ClueKind::After => &[L, C, L],
            ClueKind::AfterExactly => &[L, C, L, N],
            ClueKind::Or | ClueKind::Xor => &[L, L, L],
            ClueKind::TwoByTwo => &[L, L, L, L],
        }
    }

    /// Smallest value accepted in a `Number` slot of this kind.
    /// "0 spots after" is degenerate, so `afterexactly` starts at 1.
    pub fn min_number(self) -> i64 {
        match self {
            ClueKind::AfterExactly => 1,
            _ => 0,
        }
    }

    /// Look a kind up by its catalogue name.
    pub fn lookup(name: &str) -> Option<ClueKind> {
        KINDS_BY_NAME.get(name).copied()
    }
}

impl fmt::Display for ClueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A catalogue entry as handed to the UI for building parameter prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindInfo {
    pub name: &'static str,
    pub params: &'static [ParamType],
}

/// List the whole catalogue.
pub fn catalogue() -> Vec<KindInfo> {
    ClueKind::ALL
        .iter()
        .map(|&kind| KindInfo {
            name: kind.name(),
            params: kind.params(),
        })
        .collect()
}
