//! Round/match controller.
//!
//! A [`GameSession`] owns all mutable match state - board, turn, scores,
//! rounds, difficulty - and is the only component that mutates it. The
//! board model and rules are pure functions it delegates to. Everything
//! the presentation layer needs to render leaves the session as a
//! [`SessionEvent`] on an unbounded channel.

use crate::game::{Board, Difficulty, MoveError, Player, Position, choose_move, winning_line};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Game wins required to take a round.
pub const ROUND_LIMIT: u32 = 5;

/// Rendering events emitted by the engine.
///
/// The presentation collaborator consumes these; the engine never touches
/// a rendering surface itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SessionEvent {
    /// A mark was placed on the board.
    CellFilled {
        /// Where the mark was placed.
        position: Position,
        /// Whose mark it is.
        player: Player,
    },
    /// A completed line to highlight.
    WinHighlight {
        /// The three positions of the winning line.
        line: [Position; 3],
    },
    /// A transient status message.
    Message {
        /// Message text, e.g. "Game Over" or "Draw!".
        text: String,
    },
    /// Any visible status message should be cleared.
    MessageCleared,
    /// Game scores changed.
    ScoreUpdate {
        /// Label for the X player.
        label_x: String,
        /// X's game score within the current round.
        score_x: u32,
        /// Label for the O player.
        label_o: String,
        /// O's game score within the current round.
        score_o: u32,
    },
    /// Round tallies changed.
    RoundLogUpdate {
        /// Label for the X player.
        label_x: String,
        /// Rounds won by X.
        rounds_won_x: u32,
        /// Label for the O player.
        label_o: String,
        /// Rounds won by O.
        rounds_won_o: u32,
    },
    /// All marks were removed from the board.
    BoardCleared,
}

/// Score state for the running match.
///
/// Game scores live in `[0, ROUND_LIMIT]`; hitting the limit converts
/// into exactly one round win and wipes both game scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBoard {
    /// Games won by X in the current round.
    pub score_x: u32,
    /// Games won by O in the current round.
    pub score_o: u32,
    /// Rounds won by X.
    pub rounds_won_x: u32,
    /// Rounds won by O.
    pub rounds_won_o: u32,
}

impl ScoreBoard {
    /// Credits a game win and returns the winner's new game score.
    fn record_win(&mut self, winner: Player) -> u32 {
        match winner {
            Player::X => {
                self.score_x += 1;
                self.score_x
            }
            Player::O => {
                self.score_o += 1;
                self.score_o
            }
        }
    }

    /// Credits a round win. Game scores are wiped separately by the
    /// session's full reset.
    fn record_round(&mut self, winner: Player) {
        match winner {
            Player::X => self.rounds_won_x += 1,
            Player::O => self.rounds_won_o += 1,
        }
    }

    /// Zeroes both game scores, leaving round tallies intact.
    fn reset_scores(&mut self) {
        self.score_x = 0;
        self.score_o = 0;
    }
}

/// What an accepted move led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Game continues; it is the human's turn.
    Continue,
    /// Game continues; the controller expects exactly one deferred
    /// computer move next.
    OpponentPending,
    /// The move won a game (not a round); the board auto-reset with
    /// game scores preserved.
    GameWon(Player),
    /// The board filled with no winner; the board auto-reset with
    /// scores unchanged.
    GameDrawn,
    /// The game win pushed the winner to [`ROUND_LIMIT`]; the round was
    /// credited and a full reset wiped both game scores.
    RoundWon(Player),
}

/// A running match against the computer.
///
/// The computer always plays O; X moves first in every game.
#[derive(Debug)]
pub struct GameSession {
    board: Board,
    to_move: Player,
    game_active: bool,
    scores: ScoreBoard,
    difficulty: Difficulty,
    label_x: String,
    label_o: String,
    epoch: u64,
    rng: StdRng,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl GameSession {
    /// Creates a session with an OS-entropy-seeded RNG.
    #[instrument(skip(events))]
    pub fn new(difficulty: Difficulty, events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self::with_rng(difficulty, StdRng::from_os_rng(), events)
    }

    /// Creates a session with a deterministic RNG, for reproducible play.
    #[instrument(skip(events))]
    pub fn seeded(
        difficulty: Difficulty,
        seed: u64,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        Self::with_rng(difficulty, StdRng::seed_from_u64(seed), events)
    }

    fn with_rng(
        difficulty: Difficulty,
        rng: StdRng,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        info!(%difficulty, "starting match session");
        Self {
            board: Board::new(),
            to_move: Player::X,
            game_active: true,
            scores: ScoreBoard::default(),
            difficulty,
            label_x: "Player X".to_string(),
            label_o: "Player O".to_string(),
            epoch: 0,
            rng,
            events,
        }
    }

    /// Submits a move for the side currently to move.
    ///
    /// Turn order is enforced here: the position is played by whichever
    /// side owns the turn. Rejected moves leave all state untouched.
    ///
    /// # Errors
    ///
    /// [`MoveError::GameOver`] while no game is active,
    /// [`MoveError::SquareOccupied`] when the square is taken. Both are
    /// recoverable no-ops; the presentation may silently ignore them.
    #[instrument(skip(self))]
    pub fn submit_move(&mut self, position: Position) -> Result<MoveOutcome, MoveError> {
        if !self.game_active {
            return Err(MoveError::GameOver);
        }
        let mover = self.to_move;
        self.board.place(position, mover)?;
        debug!(%mover, %position, "mark placed");
        self.emit(SessionEvent::CellFilled {
            position,
            player: mover,
        });

        if let Some(line) = winning_line(&self.board, mover) {
            return Ok(self.finish_win(mover, line));
        }
        if self.board.is_full() {
            return Ok(self.finish_draw());
        }

        self.to_move = mover.opponent();
        if self.to_move == Player::O {
            Ok(MoveOutcome::OpponentPending)
        } else {
            Ok(MoveOutcome::Continue)
        }
    }

    /// Plays the computer's deferred turn.
    ///
    /// Guarded against stale invocation: if the game was reset or ended
    /// before the deferred callback fired, this is a no-op returning
    /// `None`. A scheduler may therefore always fire the callback and
    /// never needs to cancel it.
    #[instrument(skip(self))]
    pub fn opponent_turn(&mut self) -> Option<MoveOutcome> {
        if !self.game_active || self.to_move != Player::O {
            debug!("stale opponent callback ignored");
            return None;
        }
        let position = match choose_move(&self.board, Player::O, self.difficulty, &mut self.rng) {
            Ok(pos) => pos,
            Err(err) => {
                // Unreachable while a game is active: a filling move ends it.
                warn!(%err, "opponent turn with no legal move");
                return None;
            }
        };
        match self.submit_move(position) {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                warn!(%err, %position, "opponent move rejected");
                None
            }
        }
    }

    /// Board-only reset: clears marks and turn state, keeps game scores,
    /// round tallies, and difficulty.
    #[instrument(skip(self))]
    pub fn new_game(&mut self) {
        self.board.clear();
        self.to_move = Player::X;
        self.game_active = true;
        self.epoch += 1;
        self.emit(SessionEvent::BoardCleared);
        self.emit(SessionEvent::MessageCleared);
    }

    /// Full reset: [`Self::new_game`] plus both game scores wiped.
    ///
    /// Fires on the manual reset action and automatically when a round
    /// completes. Round tallies survive.
    #[instrument(skip(self))]
    pub fn full_reset(&mut self) {
        self.new_game();
        self.scores.reset_scores();
        self.emit_scores();
    }

    /// Changes the opponent policy and starts a fresh game.
    ///
    /// A policy change never takes effect mid-game: the board resets,
    /// scores and rounds stay.
    #[instrument(skip(self))]
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        info!(%difficulty, "difficulty changed");
        self.difficulty = difficulty;
        self.new_game();
    }

    /// Sets the display labels used in score and round events.
    pub fn set_labels(&mut self, label_x: impl Into<String>, label_o: impl Into<String>) {
        self.label_x = label_x.into();
        self.label_o = label_o.into();
    }

    /// Returns the current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the side to move.
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Returns whether a game is currently accepting moves.
    pub fn is_active(&self) -> bool {
        self.game_active
    }

    /// Monotonic count of board resets.
    ///
    /// Every reset - manual, difficulty change, or the automatic one after
    /// a win or draw - bumps this. A scheduler can capture it when a turn
    /// becomes pending and compare before playing the deferred move, so a
    /// callback left over from an earlier game never acts on a later one.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Returns the score state.
    pub fn scores(&self) -> ScoreBoard {
        self.scores
    }

    /// Returns the current difficulty.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    fn finish_win(&mut self, winner: Player, line: [Position; 3]) -> MoveOutcome {
        self.game_active = false;
        info!(%winner, "game won");
        self.emit(SessionEvent::WinHighlight { line });
        let score = self.scores.record_win(winner);
        self.emit_scores();

        if score >= ROUND_LIMIT {
            self.scores.record_round(winner);
            info!(%winner, "round won");
            self.emit_message(format!("{} wins the round!", self.label(winner)));
            self.emit_round_log();
            // Round completion couples with a game-score wipe.
            self.full_reset();
            MoveOutcome::RoundWon(winner)
        } else {
            // Plain win: the board auto-resets but running scores survive.
            self.new_game();
            self.emit_message("Game Over");
            MoveOutcome::GameWon(winner)
        }
    }

    fn finish_draw(&mut self) -> MoveOutcome {
        self.game_active = false;
        info!("game drawn");
        self.emit_message("Draw!");
        self.new_game();
        MoveOutcome::GameDrawn
    }

    fn label(&self, player: Player) -> &str {
        match player {
            Player::X => &self.label_x,
            Player::O => &self.label_o,
        }
    }

    fn emit(&self, event: SessionEvent) {
        // A dropped receiver just means nobody is rendering.
        let _ = self.events.send(event);
    }

    fn emit_message(&self, text: impl Into<String>) {
        self.emit(SessionEvent::Message { text: text.into() });
    }

    fn emit_scores(&self) {
        self.emit(SessionEvent::ScoreUpdate {
            label_x: self.label_x.clone(),
            score_x: self.scores.score_x,
            label_o: self.label_o.clone(),
            score_o: self.scores.score_o,
        });
    }

    fn emit_round_log(&self) {
        self.emit(SessionEvent::RoundLogUpdate {
            label_x: self.label_x.clone(),
            rounds_won_x: self.scores.rounds_won_x,
            label_o: self.label_o.clone(),
            rounds_won_o: self.scores.rounds_won_o,
        });
    }
}
