//! Linear, replayable history of board positions.
//!
//! An append-only vector of nodes plus a cursor. Node 0 holds the initial
//! position; applying a move while the cursor sits before the tail discards
//! the forward nodes, so the timeline never branches.

use crate::board::{Board, Square};
use crate::constants::Player;
use crate::errors::{ChessError, Result};

/// One committed position together with the move that produced it.
/// Nodes are owned by the [`History`] and never mutated after creation.
#[derive(Debug, Clone)]
pub struct HistoryNode {
    board: Board,
    trace: Option<(Square, Square)>,
    token: Option<String>,
    side: Option<Player>,
    index: usize,
}

impl HistoryNode {
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The (from, to) pair that produced this position; `None` on the
    /// initial node.
    pub fn trace(&self) -> Option<(Square, Square)> {
        self.trace
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn side(&self) -> Option<Player> {
        self.side
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone)]
pub struct History {
    nodes: Vec<HistoryNode>,
    cursor: usize,
}

impl History {
    pub fn new(initial: Board) -> Self {
        Self {
            nodes: vec![HistoryNode {
                board: initial,
                trace: None,
                token: None,
                side: None,
                index: 0,
            }],
            cursor: 0,
        }
    }

    /// Apply an already-validated move at the cursor: derive the next
    /// position, drop any forward nodes, append, and advance the cursor to
    /// the new tail. Fails if `from` holds no piece.
    pub fn apply(
        &mut self,
        from: Square,
        to: Square,
        token: Option<String>,
        side: Option<Player>,
    ) -> Result<()> {
        let next = self.nodes[self.cursor].board.with_move(from, to)?;
        self.nodes.truncate(self.cursor + 1);
        self.nodes.push(HistoryNode {
            board: next,
            trace: Some((from, to)),
            token,
            side,
            index: self.nodes.len(),
        });
        self.cursor = self.nodes.len() - 1;
        Ok(())
    }

    pub fn undo(&mut self) -> Result<()> {
        if self.cursor == 0 {
            return Err(ChessError::HistoryBoundary("nothing to undo"));
        }
        self.cursor -= 1;
        Ok(())
    }

    pub fn redo(&mut self) -> Result<()> {
        if self.cursor + 1 >= self.nodes.len() {
            return Err(ChessError::HistoryBoundary("nothing to redo"));
        }
        self.cursor += 1;
        Ok(())
    }

    /// Move the cursor to an arbitrary committed node.
    pub fn seek(&mut self, index: usize) -> Result<()> {
        if index >= self.nodes.len() {
            return Err(ChessError::HistoryBoundary(
                "index is past the end of history",
            ));
        }
        self.cursor = index;
        Ok(())
    }

    /// The position at the cursor.
    pub fn current(&self) -> &Board {
        &self.nodes[self.cursor].board
    }

    pub fn current_node(&self) -> &HistoryNode {
        &self.nodes[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of committed moves, not counting the initial position.
    pub fn move_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Walk every committed node from the initial position to the tail,
    /// including nodes ahead of the cursor.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryNode> {
        self.nodes.iter()
    }
}
