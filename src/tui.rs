//! Interactive terminal front end for recording games.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};

use crate::board::Board;
use crate::recorder::Recorder;

/// Runs the interactive recording loop.
pub fn run() -> io::Result<()> {
    let mut recorder = Recorder::start();
    let mut status =
        String::from("Enter moves in Chinese notation (e.g. 炮二平五 or 马8进7).");

    loop {
        execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
        println!("--- chessnote ---");
        println!("{}", recorder.current());
        println!(
            "move {}/{}",
            recorder.history().cursor(),
            recorder.history().move_count()
        );
        println!("{status}");
        print!("token | undo | redo | save <path> | load <path> | exit > ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        status = match input {
            "" => continue,
            "exit" => break,
            "undo" => report(recorder.undo().map(|_| "stepped back".to_string())),
            "redo" => report(recorder.redo().map(|_| "stepped forward".to_string())),
            _ => {
                if let Some(path) = input.strip_prefix("save ") {
                    report(
                        recorder
                            .current()
                            .save_json_file(path.trim())
                            .map(|_| format!("saved to {}", path.trim())),
                    )
                } else if let Some(path) = input.strip_prefix("load ") {
                    match Board::load_json_file(path.trim()) {
                        Ok(board) => {
                            recorder = Recorder::new(board);
                            format!("loaded {}", path.trim())
                        }
                        Err(e) => e.to_string(),
                    }
                } else {
                    report(recorder.play(input).map(|_| format!("played {input}")))
                }
            }
        };
    }
    Ok(())
}

fn report(result: crate::errors::Result<String>) -> String {
    match result {
        Ok(msg) => msg,
        Err(e) => e.to_string(),
    }
}
