//! Move descriptors exchanged across the board contract.

use std::fmt;

use crate::piece_kind::PieceKind;
use crate::square::Square;

/// Special-move marker carried by a [`Move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveFlag {
    Normal,
    /// Pawn advancing two squares from its starting rank.
    DoublePush,
    EnPassant,
    /// King move of two files; the rook hop is implied.
    Castle,
}

/// An immutable move descriptor.
///
/// Produced by [`Position::legal_moves`](crate::Position::legal_moves) and handed
/// back to [`Position::apply_move`](crate::Position::apply_move). Besides the
/// squares it records the moving piece, the captured piece (a pawn for en
/// passant) and the promotion piece so that search heuristics never need to
/// look at the board to classify it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    source: Square,
    dest: Square,
    piece: PieceKind,
    captured: Option<PieceKind>,
    promotion: Option<PieceKind>,
    flag: MoveFlag,
}

impl Move {
    /// Create a quiet, non-special move.
    pub const fn new(source: Square, dest: Square, piece: PieceKind) -> Move {
        Move {
            source,
            dest,
            piece,
            captured: None,
            promotion: None,
            flag: MoveFlag::Normal,
        }
    }

    /// Return a copy that captures `victim`.
    pub const fn with_capture(mut self, victim: PieceKind) -> Move {
        self.captured = Some(victim);
        self
    }

    /// Return a copy that promotes to `kind`.
    pub const fn with_promotion(mut self, kind: PieceKind) -> Move {
        self.promotion = Some(kind);
        self
    }

    /// Return a copy carrying `flag`.
    pub const fn with_flag(mut self, flag: MoveFlag) -> Move {
        self.flag = flag;
        self
    }

    #[inline]
    pub const fn source(self) -> Square {
        self.source
    }

    #[inline]
    pub const fn dest(self) -> Square {
        self.dest
    }

    /// Kind of the piece making the move.
    #[inline]
    pub const fn piece(self) -> PieceKind {
        self.piece
    }

    #[inline]
    pub const fn captured(self) -> Option<PieceKind> {
        self.captured
    }

    #[inline]
    pub const fn promotion(self) -> Option<PieceKind> {
        self.promotion
    }

    #[inline]
    pub const fn flag(self) -> MoveFlag {
        self.flag
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.promotion.is_some()
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        matches!(self.flag, MoveFlag::Castle)
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.flag, MoveFlag::EnPassant)
    }

    /// Return the UCI string representation (e.g. `e2e4`, `e7e8q`, `e1g1`).
    pub fn to_uci(self) -> String {
        match self.promotion {
            Some(kind) => format!("{}{}{}", self.source, self.dest, kind.fen_char()),
            None => format!("{}{}", self.source, self.dest),
        }
    }
}

impl From<Move> for chess::ChessMove {
    #[inline]
    fn from(mv: Move) -> chess::ChessMove {
        chess::ChessMove::new(
            mv.source.into(),
            mv.dest.into(),
            mv.promotion.map(Into::into),
        )
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uci())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}", self.to_uci())?;
        if let Some(victim) = self.captured {
            write!(f, " x{victim}")?;
        }
        if self.flag != MoveFlag::Normal {
            write!(f, " {:?}", self.flag)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::{Move, MoveFlag};
    use crate::piece_kind::PieceKind;
    use crate::square::Square;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn quiet_move_uci() {
        let mv = Move::new(sq("e2"), sq("e4"), PieceKind::Pawn).with_flag(MoveFlag::DoublePush);
        assert_eq!(mv.to_uci(), "e2e4");
        assert!(!mv.is_capture());
        assert_eq!(mv.flag(), MoveFlag::DoublePush);
    }

    #[test]
    fn promotion_capture_uci() {
        let mv = Move::new(sq("b7"), sq("a8"), PieceKind::Pawn)
            .with_capture(PieceKind::Rook)
            .with_promotion(PieceKind::Queen);
        assert_eq!(mv.to_uci(), "b7a8q");
        assert!(mv.is_capture());
        assert!(mv.is_promotion());
        assert_eq!(format!("{mv:?}"), "Move(b7a8q xr)");
    }

    #[test]
    fn equality_covers_all_fields() {
        let quiet = Move::new(sq("d1"), sq("d8"), PieceKind::Queen);
        let capture = quiet.with_capture(PieceKind::Queen);
        assert_ne!(quiet, capture);
        assert_eq!(capture, Move::new(sq("d1"), sq("d8"), PieceKind::Queen).with_capture(PieceKind::Queen));
    }
}
