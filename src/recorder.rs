//! Session object tying the resolver, the rule checker and the history
//! together: feed it notation text or coordinate pairs, step back and
//! forward, bookmark positions.

use std::collections::HashMap;

use crate::board::{Board, Square};
use crate::constants::Player;
use crate::errors::{ChessError, Result};
use crate::history::History;
use crate::notation;
use crate::rules;

pub struct Recorder {
    history: History,
    checkpoints: HashMap<String, usize>,
}

impl Recorder {
    pub fn new(initial: Board) -> Self {
        Self {
            history: History::new(initial),
            checkpoints: HashMap::new(),
        }
    }

    /// A recorder at the standard opening position.
    pub fn start() -> Self {
        Self::new(Board::start())
    }

    pub fn current(&self) -> &Board {
        self.history.current()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Apply a move given as explicit coordinates. The move is checked
    /// against the piece's rule and the sides must alternate.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Result<()> {
        let side = self
            .current()
            .get(from)
            .player()
            .ok_or(ChessError::EmptyOrigin(from))?;
        self.ensure_turn(side)?;
        rules::check_move(self.current(), from, to)?;
        log::debug!("[{}] {} -> {}", self.history.cursor(), from, to);
        self.history.apply(from, to, None, Some(side))
    }

    /// Resolve and apply a single notation token.
    pub fn play_token(&mut self, token: &str) -> Result<()> {
        let side = notation::detect_side(token)?;
        self.ensure_turn(side)?;
        let (from, to) = notation::resolve(self.current(), side, token)?;
        rules::check_move(self.current(), from, to)?;
        log::debug!("[{}] {} {} -> {}", self.history.cursor(), token, from, to);
        self.history
            .apply(from, to, Some(token.to_string()), Some(side))
    }

    /// Play a whole transcript. Stops at the first failing token, leaving
    /// the moves before it applied.
    pub fn play(&mut self, text: &str) -> Result<()> {
        for token in notation::split_moves(text)? {
            self.play_token(&token)?;
        }
        Ok(())
    }

    /// Resolve every token of a transcript against the current position
    /// without applying anything, for arrow overlays and dry runs.
    pub fn preview(&self, text: &str) -> Result<Vec<(Square, Square)>> {
        notation::split_moves(text)?
            .iter()
            .map(|token| {
                let side = notation::detect_side(token)?;
                notation::resolve(self.current(), side, token)
            })
            .collect()
    }

    pub fn undo(&mut self) -> Result<()> {
        self.history.undo()
    }

    pub fn redo(&mut self) -> Result<()> {
        self.history.redo()
    }

    /// Bookmark the current cursor under a name.
    pub fn set_checkpoint(&mut self, name: &str) {
        self.checkpoints
            .insert(name.to_string(), self.history.cursor());
    }

    /// Move the cursor back to a named bookmark. Fails if the bookmark was
    /// never set or its node has been truncated by a later move.
    pub fn rollback_to_checkpoint(&mut self, name: &str) -> Result<()> {
        let index = *self
            .checkpoints
            .get(name)
            .ok_or_else(|| ChessError::UnknownCheckpoint(name.to_string()))?;
        self.history.seek(index)
    }

    /// A fresh recorder starting from this one's current position.
    pub fn derive(&self) -> Recorder {
        Recorder::new(self.current().clone())
    }

    // The side that moved last is recorded on the node under the cursor, so
    // the alternation rule follows undo and redo.
    fn ensure_turn(&self, side: Player) -> Result<()> {
        if let Some(prev) = self.history.current_node().side() {
            if prev == side {
                return Err(ChessError::OutOfTurn {
                    expected: prev.opponent(),
                    got: side,
                });
            }
        }
        Ok(())
    }
}
