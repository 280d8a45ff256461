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

//! The per-session state machine around one puzzle and its solve attempts.
//!
//! ```text
//! NoPuzzle -> Editing -> Solving -> Solved
//!                ^           |
//!                |           v
//!                +------- Failed
//! ```
//!
//! The engine call is the only suspend point. It is split into
//! [`Session::begin_solve`] and [`Session::complete_solve`] so the browser can
//! await the engine in between; each request carries a ticket and a result
//! whose ticket is not the one in flight is dropped.

use crate::codec::{self, EngineResponse, ProtocolError};
use crate::fragment::{self, PersistenceError};
use crate::puzzle::{Puzzle, ValidationError};
use crate::solution::{Relation, Replay, Solution};
use serde::Serialize;

/// The engine could not be called, or the call threw.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("solving engine call failed: {message}")]
pub struct EngineError {
    pub message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        EngineError {
            message: message.into(),
        }
    }
}

/// The external solver: canonical puzzle text in, JSON response body out.
pub trait SolveEngine {
    fn solve(&self, text: &str) -> Result<String, EngineError>;
}

impl<F> SolveEngine for F
where
    F: Fn(&str) -> Result<String, EngineError>,
{
    fn solve(&self, text: &str) -> Result<String, EngineError> {
        self(text)
    }
}

/// Why a solve attempt ended in `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolveFailure {
    /// The engine reported an error; shown to the user verbatim.
    #[error("{0}")]
    Rejected(String),
    #[error("the solver returned an unexpected response: {0}")]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// A transition that is not allowed from the current phase.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("a solve is already in progress")]
    Busy,
    #[error("there is no puzzle")]
    NoPuzzle,
    #[error("the puzzle is already solved; edit it to solve again")]
    AlreadySolved,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Observable phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    NoPuzzle,
    Editing,
    Solving,
    Solved,
    Failed,
}

/// What the engine must be given for one solve attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolveRequest {
    pub ticket: u32,
    pub text: String,
}

/// Whether a completed engine call changed the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied(Phase),
    /// The result belonged to a request the session no longer waits for.
    Stale,
}

#[derive(Debug, Clone, Default)]
enum State {
    #[default]
    NoPuzzle,
    Editing {
        puzzle: Puzzle,
    },
    Solving {
        puzzle: Puzzle,
        ticket: u32,
    },
    Solved {
        puzzle: Puzzle,
        solution: Solution,
        step: usize,
    },
    Failed {
        puzzle: Puzzle,
        failure: SolveFailure,
    },
}

/// One user's puzzle, its latest solve attempt and the scrub position.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: State,
    last_ticket: u32,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a session from a page fragment, falling back to an empty
    /// session when the fragment cannot be read.
    pub fn from_fragment(fragment: &str) -> Self {
        let mut session = Self::new();
        session.load_fragment(fragment);
        session
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::NoPuzzle => Phase::NoPuzzle,
            State::Editing { .. } => Phase::Editing,
            State::Solving { .. } => Phase::Solving,
            State::Solved { .. } => Phase::Solved,
            State::Failed { .. } => Phase::Failed,
        }
    }

    pub fn puzzle(&self) -> Option<&Puzzle> {
        match &self.state {
            State::NoPuzzle => None,
            State::Editing { puzzle }
            | State::Solving { puzzle, .. }
            | State::Solved { puzzle, .. }
            | State::Failed { puzzle, .. } => Some(puzzle),
        }
    }

    pub fn solution(&self) -> Option<&Solution> {
        match &self.state {
            State::Solved { solution, .. } => Some(solution),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&SolveFailure> {
        match &self.state {
            State::Failed { failure, .. } => Some(failure),
            _ => None,
        }
    }

    /// Replace the puzzle being edited.
    pub fn edit(&mut self, puzzle: Puzzle) -> Result<(), SessionError> {
        if let State::Solving { .. } = self.state {
            return Err(SessionError::Busy);
        }
        self.state = State::Editing { puzzle };
        Ok(())
    }

    /// Go back to editing the current puzzle from `Solved` or `Failed`.
    pub fn resume_editing(&mut self) -> Result<(), SessionError> {
        match std::mem::take(&mut self.state) {
            State::NoPuzzle => Err(SessionError::NoPuzzle),
            state @ State::Solving { .. } => {
                self.state = state;
                Err(SessionError::Busy)
            }
            State::Editing { puzzle }
            | State::Solved { puzzle, .. }
            | State::Failed { puzzle, .. } => {
                self.state = State::Editing { puzzle };
                Ok(())
            }
        }
    }

    /// Forget everything. Any request in flight becomes stale.
    pub fn reset(&mut self) {
        self.state = State::NoPuzzle;
    }

    /// Validate and encode the puzzle and enter `Solving`. A puzzle that
    /// fails validation stays in `Editing`.
    pub fn begin_solve(&mut self) -> Result<SolveRequest, SessionError> {
        let puzzle = match std::mem::take(&mut self.state) {
            State::Editing { puzzle } | State::Failed { puzzle, .. } => puzzle,
            state => {
                let err = match state {
                    State::Solving { .. } => SessionError::Busy,
                    State::Solved { .. } => SessionError::AlreadySolved,
                    _ => SessionError::NoPuzzle,
                };
                self.state = state;
                return Err(err);
            }
        };
        let text = match puzzle.to_canonical_text() {
            Ok(text) => text,
            Err(err) => {
                self.state = State::Editing { puzzle };
                return Err(err.into());
            }
        };

        self.last_ticket = self.last_ticket.wrapping_add(1);
        let ticket = self.last_ticket;
        tracing::debug!("solve request {} submitted", ticket);
        self.state = State::Solving { puzzle, ticket };
        Ok(SolveRequest { ticket, text })
    }

    /// Apply the engine's outcome for the request identified by `ticket`.
    pub fn complete_solve(
        &mut self,
        ticket: u32,
        outcome: Result<String, EngineError>,
    ) -> Completion {
        let puzzle = match std::mem::take(&mut self.state) {
            State::Solving {
                puzzle,
                ticket: current,
            } if current == ticket => puzzle,
            state => {
                tracing::debug!("dropping result of stale solve request {}", ticket);
                self.state = state;
                return Completion::Stale;
            }
        };

        let result = outcome
            .map_err(SolveFailure::from)
            .and_then(|body| interpret(&puzzle, &body));
        self.state = match result {
            Ok(solution) => {
                let step = solution.steps.len();
                State::Solved {
                    puzzle,
                    solution,
                    step,
                }
            }
            Err(failure) => {
                match &failure {
                    SolveFailure::Protocol(err) => tracing::error!("solve request {}: {}", ticket, err),
                    other => tracing::debug!("solve request {} failed: {}", ticket, other),
                }
                State::Failed { puzzle, failure }
            }
        };
        Completion::Applied(self.phase())
    }

    /// Run a whole solve attempt against a synchronous engine.
    pub fn solve_with<E: SolveEngine + ?Sized>(&mut self, engine: &E) -> Result<Phase, SessionError> {
        let request = self.begin_solve()?;
        let outcome = engine.solve(&request.text);
        self.complete_solve(request.ticket, outcome);
        Ok(self.phase())
    }

    /// Current scrub position, when solved.
    pub fn step(&self) -> Option<usize> {
        match &self.state {
            State::Solved { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// Move the scrub position, clamped to `1..=steps`, and return it.
    pub fn scrub(&mut self, k: usize) -> Option<usize> {
        match &mut self.state {
            State::Solved { solution, step, .. } => {
                let len = solution.steps.len();
                *step = if len == 0 { 0 } else { k.clamp(1, len) };
                Some(*step)
            }
            _ => None,
        }
    }

    /// Relation table at the current scrub position.
    pub fn replay(&self) -> Option<Replay<'_>> {
        match &self.state {
            State::Solved { solution, step, .. } => Some(solution.replay(*step)),
            _ => None,
        }
    }

    /// Relation between two labels at the current scrub position.
    pub fn relation(&self, a: &str, b: &str) -> Option<Relation> {
        self.replay().map(|replay| replay.relation(a, b))
    }

    /// Load state from a page fragment. An unreadable fragment leaves an
    /// empty session behind.
    pub fn load_fragment(&mut self, fragment: &str) {
        self.state = match fragment::decode(fragment) {
            Ok(restored) => match restored.solution {
                Some(solution) if restored.puzzle.validate().is_ok() => {
                    let step = solution.steps.len();
                    State::Solved {
                        puzzle: restored.puzzle,
                        solution,
                        step,
                    }
                }
                _ => State::Editing {
                    puzzle: restored.puzzle,
                },
            },
            Err(err) => {
                tracing::warn!("ignoring saved state: {}", err);
                State::NoPuzzle
            }
        };
    }

    /// Encode the current puzzle, and its solution when solved, as a fragment.
    pub fn to_fragment(&self) -> Option<Result<String, PersistenceError>> {
        let puzzle = self.puzzle()?;
        Some(fragment::encode(puzzle, self.solution()))
    }
}

fn interpret(puzzle: &Puzzle, body: &str) -> Result<Solution, SolveFailure> {
    match codec::parse_response(body)? {
        EngineResponse::Error(message) => Err(SolveFailure::Rejected(message)),
        EngineResponse::Solved(solution) => {
            solution.conforms_to(puzzle)?;
            Ok(solution)
        }
    }
}
