//! Console demo client for the tic-tac-toe match engine.
//!
//! Thin presentation layer: reads cell indices from stdin, submits them
//! to the engine, and renders the engine's event stream.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use std::time::Duration;
use tictactoe_arena::{
    Difficulty, MatchRuntime, MoveOutcome, Position, SessionEvent, THINKING_DELAY,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let (runtime, mut events) = match cli.seed {
        Some(seed) => MatchRuntime::seeded(cli.difficulty, seed),
        None => MatchRuntime::new(cli.difficulty),
    };

    let json = cli.json;
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if json {
                match serde_json::to_string(&event) {
                    Ok(line) => println!("{line}"),
                    Err(err) => debug!(%err, "event not serializable"),
                }
            } else {
                render(&event);
            }
        }
    });

    println!("You are X; the computer is O. Cells are numbered 0-8.");
    println!("Commands: 0-8, new, reset, easy, medium, hard, exit");
    println!("{}\n", runtime.board_text());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => continue,
            "exit" | "quit" | "q" => break,
            "new" => runtime.new_game(),
            "reset" => runtime.full_reset(),
            "easy" => runtime.set_difficulty(Difficulty::Easy),
            "medium" => runtime.set_difficulty(Difficulty::Medium),
            "hard" => runtime.set_difficulty(Difficulty::Hard),
            input => match input.parse::<usize>().ok().and_then(Position::from_index) {
                Some(position) => {
                    match runtime.human_move(position) {
                        Ok(MoveOutcome::OpponentPending) => {
                            // Let the deferred computer move land before re-prompting.
                            tokio::time::sleep(THINKING_DELAY + Duration::from_millis(100)).await;
                        }
                        Ok(_) => {}
                        Err(err) => debug!(%err, "move ignored"),
                    }
                    println!("{}\n", runtime.board_text());
                }
                None => println!("enter a cell index 0-8, or new/reset/easy/medium/hard/exit"),
            },
        }
    }

    Ok(())
}

/// Prints a session event the way a score display would render it.
fn render(event: &SessionEvent) {
    match event {
        SessionEvent::CellFilled { position, player } => {
            println!("{player} -> {position}");
        }
        SessionEvent::WinHighlight { line } => {
            let cells: Vec<String> = line.iter().map(|p| p.index().to_string()).collect();
            println!("winning line: {}", cells.join(", "));
        }
        SessionEvent::Message { text } => println!("* {text}"),
        SessionEvent::MessageCleared => {}
        SessionEvent::ScoreUpdate {
            label_x,
            score_x,
            label_o,
            score_o,
        } => {
            println!("{label_x}: {score_x} | {label_o}: {score_o}");
        }
        SessionEvent::RoundLogUpdate {
            label_x,
            rounds_won_x,
            label_o,
            rounds_won_o,
        } => {
            println!(
                "Rounds won by {label_x}: {rounds_won_x} - Rounds won by {label_o}: {rounds_won_o}"
            );
        }
        SessionEvent::BoardCleared => {}
    }
}
