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

//! Logic-grid puzzles for the browser: the clue catalogue, the puzzle model,
//! the text protocol spoken with the solving engine and the replay of its
//! deduction trace.

pub mod codec;
pub mod fragment;
pub mod kinds;
pub mod puzzle;
pub mod session;
pub mod solution;
mod utils;

use crate::puzzle::Puzzle;
use crate::session::{Completion, EngineError, Session};
use serde::Serialize;
use utils::set_panic_hook;
use wasm_bindgen::prelude::*;

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Convert to a plain JS value: objects instead of `Map`s, `null` for `None`.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(to_js_error)
}

/// List the clue kinds and their parameter types.
#[wasm_bindgen]
pub fn clue_kinds() -> Result<JsValue, JsValue> {
    set_panic_hook();
    to_js(&kinds::catalogue())
}

/// Validate a puzzle object and encode it as canonical solver text.
#[wasm_bindgen]
pub fn encode_puzzle(puzzle: JsValue) -> Result<String, JsValue> {
    set_panic_hook();
    let puzzle: Puzzle = serde_wasm_bindgen::from_value(puzzle)?;
    puzzle.to_canonical_text().map_err(to_js_error)
}

/// Parse canonical solver text into a puzzle object.
#[wasm_bindgen]
pub fn decode_puzzle(text: &str) -> Result<JsValue, JsValue> {
    set_panic_hook();
    let puzzle = codec::decode(text).map_err(to_js_error)?;
    to_js(&puzzle)
}

/// The session handle held by the page.
#[wasm_bindgen]
pub struct PuzzleSession(Session);

impl Default for PuzzleSession {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl PuzzleSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> PuzzleSession {
        set_panic_hook();
        PuzzleSession(Session::new())
    }

    /// Restore a session from `location.hash`; bad input gives an empty session.
    pub fn from_fragment(fragment: &str) -> PuzzleSession {
        set_panic_hook();
        PuzzleSession(Session::from_fragment(fragment))
    }

    pub fn phase(&self) -> Result<JsValue, JsValue> {
        to_js(&self.0.phase())
    }

    pub fn puzzle(&self) -> Result<JsValue, JsValue> {
        to_js(&self.0.puzzle())
    }

    pub fn edit(&mut self, puzzle: JsValue) -> Result<(), JsValue> {
        let puzzle: Puzzle = serde_wasm_bindgen::from_value(puzzle)?;
        self.0.edit(puzzle).map_err(to_js_error)
    }

    pub fn resume_editing(&mut self) -> Result<(), JsValue> {
        self.0.resume_editing().map_err(to_js_error)
    }

    pub fn reset(&mut self) {
        self.0.reset();
    }

    /// Returns `{ ticket, text }` for the engine call.
    pub fn begin_solve(&mut self) -> Result<JsValue, JsValue> {
        let request = self.0.begin_solve().map_err(to_js_error)?;
        to_js(&request)
    }

    /// Hand over the engine's response body. Returns `false` for a stale ticket.
    pub fn complete_solve(&mut self, ticket: u32, body: String) -> bool {
        self.0.complete_solve(ticket, Ok(body)) != Completion::Stale
    }

    /// Report that the engine call threw. Returns `false` for a stale ticket.
    pub fn fail_solve(&mut self, ticket: u32, message: String) -> bool {
        self.0.complete_solve(ticket, Err(EngineError::new(message))) != Completion::Stale
    }

    pub fn failure(&self) -> Option<String> {
        self.0.failure().map(ToString::to_string)
    }

    pub fn solution(&self) -> Result<JsValue, JsValue> {
        to_js(&self.0.solution())
    }

    pub fn step(&self) -> Option<u32> {
        self.0.step().map(|k| u32::try_from(k).unwrap_or(u32::MAX))
    }

    pub fn scrub(&mut self, k: u32) -> Option<u32> {
        let k = usize::try_from(k).unwrap_or(usize::MAX);
        self.0
            .scrub(k)
            .map(|k| u32::try_from(k).unwrap_or(u32::MAX))
    }

    /// `"related"`, `"excluded"` or `"unknown"` at the current scrub position.
    pub fn relation(&self, a: &str, b: &str) -> Option<String> {
        self.0.relation(a, b).map(|r| r.as_str().to_string())
    }

    /// Grid cell for two global label indices; `undefined` within a category.
    pub fn cell(&self, a: u32, b: u32) -> Option<String> {
        let (puzzle, replay) = (self.0.puzzle()?, self.0.replay()?);
        let index = |i: u32| usize::try_from(i).unwrap_or(usize::MAX);
        replay
            .cell(puzzle, index(a), index(b))
            .map(|r| r.as_str().to_string())
    }

    /// The fragment to put in `location.hash`, if there is a puzzle.
    pub fn fragment(&self) -> Result<Option<String>, JsValue> {
        self.0.to_fragment().transpose().map_err(to_js_error)
    }
}
