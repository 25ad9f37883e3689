//! Tests for the round/match controller.

use tictactoe_arena::{
    Difficulty, GameSession, MoveError, MoveOutcome, Player, Position, ROUND_LIMIT, SessionEvent,
};
use tokio::sync::mpsc;

fn session(difficulty: Difficulty) -> (GameSession, mpsc::UnboundedReceiver<SessionEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (GameSession::seeded(difficulty, 7, tx), rx)
}

fn pos(index: usize) -> Position {
    Position::from_index(index).expect("index in range")
}

fn drain(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(event);
    }
    out
}

/// Drives one quick X win: top row against O on the middle row.
fn win_game_for_x(session: &mut GameSession) -> MoveOutcome {
    session.submit_move(pos(0)).unwrap();
    session.submit_move(pos(3)).unwrap();
    session.submit_move(pos(1)).unwrap();
    session.submit_move(pos(4)).unwrap();
    session.submit_move(pos(2)).unwrap()
}

#[test]
fn human_move_then_easy_opponent_reply() {
    let (mut session, _rx) = session(Difficulty::Easy);

    let outcome = session.submit_move(pos(0)).unwrap();
    assert_eq!(outcome, MoveOutcome::OpponentPending);
    assert_eq!(session.to_move(), Player::O);

    let outcome = session.opponent_turn().expect("opponent should move");
    assert_eq!(outcome, MoveOutcome::Continue);
    assert_eq!(session.to_move(), Player::X);
    assert!(session.is_active());
    assert_eq!(session.board().empty_positions().len(), 7);
}

#[test]
fn occupied_square_is_rejected_without_state_change() {
    let (mut session, _rx) = session(Difficulty::Hard);

    session.submit_move(pos(0)).unwrap();
    let before = session.board().clone();

    let result = session.submit_move(pos(0));
    assert_eq!(result, Err(MoveError::SquareOccupied(pos(0))));
    assert_eq!(session.board(), &before);
    assert_eq!(session.to_move(), Player::O);
    assert_eq!(session.scores().score_x, 0);
}

#[test]
fn game_win_scores_and_resets_board_but_not_scores() {
    let (mut session, mut rx) = session(Difficulty::Hard);

    let outcome = win_game_for_x(&mut session);
    assert_eq!(outcome, MoveOutcome::GameWon(Player::X));

    // Marks cleared, scores preserved, next game live with X to move.
    assert_eq!(session.board().empty_positions().len(), 9);
    assert!(session.is_active());
    assert_eq!(session.to_move(), Player::X);
    assert_eq!(session.scores().score_x, 1);
    assert_eq!(session.scores().score_o, 0);
    assert_eq!(session.scores().rounds_won_x, 0);

    let events = drain(&mut rx);
    assert!(events.contains(&SessionEvent::WinHighlight {
        line: [pos(0), pos(1), pos(2)],
    }));
    assert!(events.contains(&SessionEvent::Message {
        text: "Game Over".to_string(),
    }));
    // The win highlight precedes the board reset.
    let highlight = events
        .iter()
        .position(|e| matches!(e, SessionEvent::WinHighlight { .. }))
        .unwrap();
    let cleared = events
        .iter()
        .position(|e| matches!(e, SessionEvent::BoardCleared))
        .unwrap();
    assert!(highlight < cleared);
}

#[test]
fn draw_resets_board_and_leaves_scores_untouched() {
    let (mut session, mut rx) = session(Difficulty::Hard);

    // X O X / X O O / O X X filled with no line for either side.
    for index in [0, 1, 2, 4, 3, 5, 7, 6, 8] {
        let outcome = session.submit_move(pos(index)).unwrap();
        if index == 8 {
            assert_eq!(outcome, MoveOutcome::GameDrawn);
        }
    }

    assert_eq!(session.scores().score_x, 0);
    assert_eq!(session.scores().score_o, 0);
    assert!(session.is_active());
    assert_eq!(session.board().empty_positions().len(), 9);

    let events = drain(&mut rx);
    assert!(events.contains(&SessionEvent::Message {
        text: "Draw!".to_string(),
    }));
    assert!(!events.iter().any(|e| matches!(e, SessionEvent::WinHighlight { .. })));
}

#[test]
fn fifth_game_win_takes_the_round_and_wipes_game_scores() {
    let (mut session, mut rx) = session(Difficulty::Hard);

    for game in 1..=ROUND_LIMIT {
        let outcome = win_game_for_x(&mut session);
        let scores = session.scores();
        assert!(scores.score_x <= ROUND_LIMIT);
        assert!(scores.score_o <= ROUND_LIMIT);

        if game < ROUND_LIMIT {
            assert_eq!(outcome, MoveOutcome::GameWon(Player::X));
            assert_eq!(scores.score_x, game);
            assert_eq!(scores.rounds_won_x, 0);
        } else {
            assert_eq!(outcome, MoveOutcome::RoundWon(Player::X));
            // Round credited once, both game scores wiped.
            assert_eq!(scores.rounds_won_x, 1);
            assert_eq!(scores.rounds_won_o, 0);
            assert_eq!(scores.score_x, 0);
            assert_eq!(scores.score_o, 0);
        }
    }

    let events = drain(&mut rx);
    assert!(events.contains(&SessionEvent::Message {
        text: "Player X wins the round!".to_string(),
    }));
    let round_logs: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, SessionEvent::RoundLogUpdate { .. }))
        .collect();
    assert_eq!(round_logs.len(), 1);
    assert_eq!(
        round_logs[0],
        &SessionEvent::RoundLogUpdate {
            label_x: "Player X".to_string(),
            rounds_won_x: 1,
            label_o: "Player O".to_string(),
            rounds_won_o: 0,
        }
    );
    // The final score update reflects the wipe.
    let last_score = events
        .iter()
        .rev()
        .find(|e| matches!(e, SessionEvent::ScoreUpdate { .. }))
        .unwrap();
    assert_eq!(
        last_score,
        &SessionEvent::ScoreUpdate {
            label_x: "Player X".to_string(),
            score_x: 0,
            label_o: "Player O".to_string(),
            score_o: 0,
        }
    );
}

#[test]
fn new_game_preserves_scores_and_difficulty() {
    let (mut session, _rx) = session(Difficulty::Medium);

    win_game_for_x(&mut session);
    session.submit_move(pos(4)).unwrap();
    session.new_game();

    assert_eq!(session.board().empty_positions().len(), 9);
    assert_eq!(session.scores().score_x, 1);
    assert_eq!(session.difficulty(), Difficulty::Medium);
    assert_eq!(session.to_move(), Player::X);
}

#[test]
fn full_reset_wipes_game_scores_but_keeps_round_tallies() {
    let (mut session, _rx) = session(Difficulty::Hard);

    for _ in 0..ROUND_LIMIT {
        win_game_for_x(&mut session);
    }
    assert_eq!(session.scores().rounds_won_x, 1);

    win_game_for_x(&mut session);
    assert_eq!(session.scores().score_x, 1);

    session.full_reset();
    assert_eq!(session.scores().score_x, 0);
    assert_eq!(session.scores().score_o, 0);
    assert_eq!(session.scores().rounds_won_x, 1);
}

#[test]
fn difficulty_change_resets_the_board_only() {
    let (mut session, _rx) = session(Difficulty::Hard);

    win_game_for_x(&mut session);
    session.submit_move(pos(4)).unwrap();

    session.set_difficulty(Difficulty::Easy);
    assert_eq!(session.difficulty(), Difficulty::Easy);
    assert_eq!(session.board().empty_positions().len(), 9);
    assert_eq!(session.scores().score_x, 1);
    assert_eq!(session.to_move(), Player::X);
}

#[test]
fn stale_opponent_callback_is_a_no_op() {
    let (mut session, _rx) = session(Difficulty::Hard);

    let outcome = session.submit_move(pos(0)).unwrap();
    assert_eq!(outcome, MoveOutcome::OpponentPending);

    // Reset lands before the deferred callback fires.
    session.new_game();
    assert_eq!(session.opponent_turn(), None);
    assert_eq!(session.board().empty_positions().len(), 9);
}

#[test]
fn opponent_turn_on_humans_turn_is_a_no_op() {
    let (mut session, _rx) = session(Difficulty::Easy);
    assert_eq!(session.opponent_turn(), None);
    assert_eq!(session.board().empty_positions().len(), 9);
    assert_eq!(session.to_move(), Player::X);
}

#[test]
fn every_reset_path_bumps_the_epoch() {
    let (mut session, _rx) = session(Difficulty::Hard);
    assert_eq!(session.epoch(), 0);

    session.new_game();
    assert_eq!(session.epoch(), 1);

    session.full_reset();
    assert_eq!(session.epoch(), 2);

    session.set_difficulty(Difficulty::Easy);
    assert_eq!(session.epoch(), 3);

    // The automatic reset after a win counts too.
    win_game_for_x(&mut session);
    assert_eq!(session.epoch(), 4);
}

#[test]
fn session_events_serialize_as_json() {
    let event = SessionEvent::CellFilled {
        position: pos(4),
        player: Player::X,
    };
    let json = serde_json::to_string(&event).unwrap();
    assert_eq!(json, r#"{"CellFilled":{"position":"Center","player":"X"}}"#);

    let event = SessionEvent::WinHighlight {
        line: [pos(0), pos(1), pos(2)],
    };
    let json = serde_json::to_string(&event).unwrap();
    assert_eq!(
        json,
        r#"{"WinHighlight":{"line":["TopLeft","TopCenter","TopRight"]}}"#
    );
}

#[test]
fn custom_labels_flow_through_events() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = GameSession::seeded(Difficulty::Hard, 7, tx);
    session.set_labels("Alice", "Computer");

    win_game_for_x(&mut session);
    let events = drain(&mut rx);
    assert!(events.contains(&SessionEvent::ScoreUpdate {
        label_x: "Alice".to_string(),
        score_x: 1,
        label_o: "Computer".to_string(),
        score_o: 0,
    }));
}
