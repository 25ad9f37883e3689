//! Win and draw evaluation for tic-tac-toe.

use super::position::Position;
use super::types::{Board, Player, Square};
use tracing::instrument;

/// The eight winning lines, scanned in a fixed order: rows, then columns,
/// then the two diagonals. The order decides which line gets highlighted
/// when more than one could match.
pub const LINES: [[Position; 3]; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
    ],
    [
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ],
    // Columns
    [
        Position::TopLeft,
        Position::MiddleLeft,
        Position::BottomLeft,
    ],
    [
        Position::TopCenter,
        Position::Center,
        Position::BottomCenter,
    ],
    [
        Position::TopRight,
        Position::MiddleRight,
        Position::BottomRight,
    ],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Returns the first line fully occupied by `player`, if any.
#[instrument]
pub fn winning_line(board: &Board, player: Player) -> Option<[Position; 3]> {
    let mark = Square::Occupied(player);
    LINES
        .iter()
        .copied()
        .find(|&[a, b, c]| board.get(a) == mark && board.get(b) == mark && board.get(c) == mark)
}

/// Returns the winner and their completed line, if any.
#[instrument]
pub fn check_winner(board: &Board) -> Option<(Player, [Position; 3])> {
    for [a, b, c] in LINES {
        let sq = board.get(a);
        if sq != Square::Empty && sq == board.get(b) && sq == board.get(c) {
            if let Square::Occupied(player) = sq {
                return Some((player, [a, b, c]));
            }
        }
    }
    None
}

/// Checks whether the board is a draw: full with no winner.
///
/// A winning line always takes precedence - callers check for a win first,
/// and a full board containing one is a win, never a draw.
#[instrument]
pub fn is_draw(board: &Board) -> bool {
    board.is_full() && check_winner(board).is_none()
}
