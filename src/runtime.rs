//! Async wrapper that schedules the computer's deferred turns.
//!
//! The session itself is synchronous; this runtime owns it behind an
//! `Arc<Mutex<_>>` and turns [`MoveOutcome::OpponentPending`] into a
//! single tokio task that sleeps for [`THINKING_DELAY`] before playing.
//! The deferral is unconditional and never cancelled - staleness after a
//! reset is absorbed by [`GameSession::opponent_turn`]'s guard.

use crate::game::{Difficulty, MoveError, Player, Position};
use crate::session::{GameSession, MoveOutcome, ScoreBoard, SessionEvent};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, instrument};

/// Simulated "thinking" pause before the computer moves.
pub const THINKING_DELAY: Duration = Duration::from_secs(1);

/// How long the "Game Over" message stays visible.
pub const GAME_OVER_MESSAGE_DURATION: Duration = Duration::from_secs(2);

/// Drives a [`GameSession`] with deferred computer turns.
#[derive(Clone)]
pub struct MatchRuntime {
    session: Arc<Mutex<GameSession>>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl MatchRuntime {
    /// Creates a runtime and the event stream the presentation consumes.
    pub fn new(difficulty: Difficulty) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = GameSession::new(difficulty, tx.clone());
        (
            Self {
                session: Arc::new(Mutex::new(session)),
                events: tx,
            },
            rx,
        )
    }

    /// Like [`Self::new`] but with a deterministic RNG seed.
    pub fn seeded(
        difficulty: Difficulty,
        seed: u64,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = GameSession::seeded(difficulty, seed, tx.clone());
        (
            Self {
                session: Arc::new(Mutex::new(session)),
                events: tx,
            },
            rx,
        )
    }

    /// Submits a human move and schedules follow-up work.
    ///
    /// # Errors
    ///
    /// Propagates the session's rejection; the caller may treat it as a
    /// no-op.
    #[instrument(skip(self))]
    pub fn human_move(&self, position: Position) -> Result<MoveOutcome, MoveError> {
        let (outcome, epoch) = {
            let mut session = self.session.lock().unwrap();
            let outcome = session.submit_move(position)?;
            (outcome, session.epoch())
        };
        self.react(outcome, epoch);
        Ok(outcome)
    }

    /// Board-only reset; scores and rounds survive.
    pub fn new_game(&self) {
        self.session.lock().unwrap().new_game();
    }

    /// Full reset; game scores are wiped, round tallies survive.
    pub fn full_reset(&self) {
        self.session.lock().unwrap().full_reset();
    }

    /// Changes difficulty, resetting the board.
    pub fn set_difficulty(&self, difficulty: Difficulty) {
        self.session.lock().unwrap().set_difficulty(difficulty);
    }

    /// Snapshot of the board rendered as text.
    pub fn board_text(&self) -> String {
        self.session.lock().unwrap().board().display()
    }

    /// Snapshot of the board.
    pub fn board(&self) -> crate::game::Board {
        self.session.lock().unwrap().board().clone()
    }

    /// Snapshot of the score state.
    pub fn scores(&self) -> ScoreBoard {
        self.session.lock().unwrap().scores()
    }

    /// The side currently to move.
    pub fn to_move(&self) -> Player {
        self.session.lock().unwrap().to_move()
    }

    fn react(&self, outcome: MoveOutcome, epoch: u64) {
        match outcome {
            MoveOutcome::OpponentPending => self.schedule_opponent_turn(epoch),
            MoveOutcome::GameWon(_) => self.schedule_message_clear(),
            _ => {}
        }
    }

    /// Exactly one deferred computer move per pending turn.
    ///
    /// The task carries the session epoch it was scheduled in. A task
    /// surviving a reset could otherwise mature during the *next* game's
    /// pending turn and play it up to a full delay early; the epoch check
    /// pins each callback to the game that requested it.
    fn schedule_opponent_turn(&self, epoch: u64) {
        let runtime = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(THINKING_DELAY).await;
            let (outcome, epoch_now) = {
                let mut session = runtime.session.lock().unwrap();
                if session.epoch() != epoch {
                    debug!("deferred turn from a previous game ignored");
                    return;
                }
                (session.opponent_turn(), session.epoch())
            };
            if let Some(outcome) = outcome {
                runtime.react(outcome, epoch_now);
            }
        });
    }

    fn schedule_message_clear(&self) {
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(GAME_OVER_MESSAGE_DURATION).await;
            let _ = events.send(SessionEvent::MessageCleared);
        });
    }
}
