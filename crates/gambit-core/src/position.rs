//! The board contract consumed by the search.
//!
//! Search code never names a concrete board type. Everything it needs is on
//! [`Position`]: move enumeration, reversible in-place mutation, terminal
//! detection, a 64-bit fingerprint and the few piece queries the evaluator
//! reads. Mutation happens in strict stack order, which [`MoveGuard`] enforces
//! by undoing on drop.

use std::ops::{Deref, DerefMut};

use crate::chess_move::Move;
use crate::color::Color;
use crate::piece_kind::PieceKind;
use crate::square::{Square, SquareSet};

/// A mutable game position with reversible moves.
pub trait Position {
    /// All legal moves, or only the legal captures when `captures_only` is set.
    ///
    /// Order is unspecified.
    fn legal_moves(&self, captures_only: bool) -> Vec<Move>;

    /// Play `mv` in place. `mv` must come from [`legal_moves`](Self::legal_moves).
    fn apply_move(&mut self, mv: Move);

    /// Revert the most recently applied move, which must be `mv`.
    fn undo_move(&mut self, mv: Move);

    /// `true` if the side to move is in check.
    fn is_in_check(&self) -> bool;

    /// `true` if the side to move is checkmated.
    fn is_checkmate(&self) -> bool;

    /// `true` for stalemate, repetition, insufficient material or the fifty-move rule.
    fn is_draw(&self) -> bool;

    /// Position fingerprint, stable across apply/undo round-trips.
    fn fingerprint(&self) -> u64;

    /// Half-moves played since the start of the game.
    fn ply_count(&self) -> u32;

    fn side_to_move(&self) -> Color;

    /// Squares holding `kind` pieces of `color`.
    fn pieces(&self, kind: PieceKind, color: Color) -> SquareSet;

    fn king_square(&self, color: Color) -> Square;

    fn piece_on(&self, sq: Square) -> Option<(PieceKind, Color)>;

    /// Apply `mv` for the lifetime of the returned guard.
    ///
    /// The move is undone when the guard drops, on every exit path.
    fn play(&mut self, mv: Move) -> MoveGuard<'_, Self>
    where
        Self: Sized,
    {
        MoveGuard::new(self, mv)
    }
}

/// Scoped application of one move; undoes it on drop.
///
/// Dereferences to the underlying position so the child node can be searched
/// through the guard.
pub struct MoveGuard<'a, P: Position> {
    pos: &'a mut P,
    mv: Move,
}

impl<'a, P: Position> MoveGuard<'a, P> {
    pub fn new(pos: &'a mut P, mv: Move) -> Self {
        pos.apply_move(mv);
        Self { pos, mv }
    }
}

impl<P: Position> Deref for MoveGuard<'_, P> {
    type Target = P;

    fn deref(&self) -> &P {
        self.pos
    }
}

impl<P: Position> DerefMut for MoveGuard<'_, P> {
    fn deref_mut(&mut self) -> &mut P {
        self.pos
    }
}

impl<P: Position> Drop for MoveGuard<'_, P> {
    fn drop(&mut self) {
        self.pos.undo_move(self.mv);
    }
}

#[cfg(test)]
mod tests {
    use super::Position;
    use crate::board::Board;

    #[test]
    fn guard_undoes_on_drop() {
        let mut board = Board::starting_position();
        let before = board.fingerprint();
        let mv = board.parse_uci_move("e2e4").unwrap();
        {
            let child = board.play(mv);
            assert_ne!(child.fingerprint(), before);
            assert_eq!(child.ply_count(), 1);
        }
        assert_eq!(board.fingerprint(), before);
        assert_eq!(board.ply_count(), 0);
    }

    #[test]
    fn guard_undoes_on_early_return() {
        fn bail_after_move(board: &mut Board) -> Result<(), ()> {
            let mv = board.parse_uci_move("g1f3").map_err(|_| ())?;
            let mut child = board.play(mv);
            let reply = child.parse_uci_move("g8f6").map_err(|_| ())?;
            let _grandchild = child.play(reply);
            Err(())
        }

        let mut board = Board::starting_position();
        let before = board.fingerprint();
        assert!(bail_after_move(&mut board).is_err());
        assert_eq!(board.fingerprint(), before);
        assert_eq!(board, Board::starting_position());
    }
}
