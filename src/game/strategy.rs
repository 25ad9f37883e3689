//! Computer opponent move selection.
//!
//! Three policies of increasing strength. "Hard" is deliberately a
//! blocking heuristic rather than minimax: it steals any square the
//! human is about to win on, and never looks for its own winning move
//! first. The observable behavior is "the computer cannot be beaten",
//! not "the computer plays optimally".

use super::position::Position;
use super::rules;
use super::types::{Board, Player, Square};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Move-selection policy for the computer opponent.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::EnumIter,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Uniformly random empty square.
    Easy,
    /// Prefers center, then corners, then edges, with a 30% chance of a
    /// fully random square instead.
    Medium,
    /// Blocks any square the human would win on next turn.
    #[default]
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

/// Error raised when a policy is invoked without a legal move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum StrategyError {
    /// Every square is occupied.
    #[display("no empty squares to choose from")]
    NoEmptyCells,
}

impl std::error::Error for StrategyError {}

/// Picks a move for `to_move` on `board` under the given difficulty.
///
/// Callers are expected to guarantee at least one empty square; a full
/// board fails loudly with [`StrategyError::NoEmptyCells`].
#[instrument(skip(rng))]
pub fn choose_move(
    board: &Board,
    to_move: Player,
    difficulty: Difficulty,
    rng: &mut impl Rng,
) -> Result<Position, StrategyError> {
    let open = board.empty_positions();
    if open.is_empty() {
        return Err(StrategyError::NoEmptyCells);
    }
    let pos = match difficulty {
        Difficulty::Easy => random_pick(&open, rng),
        Difficulty::Medium => medium_pick(board, &open, rng),
        Difficulty::Hard => hard_pick(board, to_move, &open, rng),
    };
    Ok(pos)
}

fn random_pick(open: &[Position], rng: &mut impl Rng) -> Position {
    open[rng.random_range(0..open.len())]
}

/// Center, then corners, then edges, 70% of the time; otherwise any
/// empty square. Each decision draws the gate first, then at most one
/// uniform pick within the chosen tier.
fn medium_pick(board: &Board, open: &[Position], rng: &mut impl Rng) -> Position {
    if rng.random_bool(0.7) {
        if board.is_empty(Position::Center) {
            return Position::Center;
        }
        let corners: Vec<Position> = Position::CORNERS
            .iter()
            .copied()
            .filter(|&pos| board.is_empty(pos))
            .collect();
        if !corners.is_empty() {
            return random_pick(&corners, rng);
        }
        // Center and corners exhausted; any remaining empty square is an edge.
        let edges: Vec<Position> = Position::EDGES
            .iter()
            .copied()
            .filter(|&pos| board.is_empty(pos))
            .collect();
        random_pick(&edges, rng)
    } else {
        random_pick(open, rng)
    }
}

/// Anti-win steal: simulate the rival of `to_move` on each empty square
/// in ascending index order and take the first square that would complete
/// a line for them. Falls back to a random empty square. Never checks for
/// its own winning move - that asymmetry is the intended behavior.
fn hard_pick(board: &Board, to_move: Player, open: &[Position], rng: &mut impl Rng) -> Position {
    let rival = to_move.opponent();
    for &pos in open {
        let mut probe = board.clone();
        probe.set(pos, Square::Occupied(rival));
        if rules::winning_line(&probe, rival).is_some() {
            return pos;
        }
    }
    random_pick(open, rng)
}
