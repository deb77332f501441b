//! The concrete board: a [`Position`] backed by the `chess` crate.
//!
//! The backend board is copy-make; this wrapper turns it into the in-place
//! apply/undo model the search expects by keeping an undo stack. It also
//! tracks what the backend leaves out: the halfmove clock, the game ply and
//! the fingerprint history used for repetition detection.

use std::fmt;
use std::str::FromStr;

use chess::{BoardStatus, MoveGen};

use crate::chess_move::{Move, MoveFlag};
use crate::color::Color;
use crate::error::BoardError;
use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::square::{Square, SquareSet};

#[derive(Clone, Copy)]
struct Undo {
    inner: chess::Board,
    halfmove_clock: u16,
    mv: Move,
}

/// Complete game position with move history.
#[derive(Clone)]
pub struct Board {
    inner: chess::Board,
    /// Plies since the last capture or pawn move.
    halfmove_clock: u16,
    /// Plies since the start of the game.
    ply: u32,
    /// Fingerprints of every earlier position in the game, oldest first.
    history: Vec<u64>,
    undo: Vec<Undo>,
}

impl Board {
    /// Return the standard starting position.
    pub fn starting_position() -> Board {
        Board {
            inner: chess::Board::default(),
            halfmove_clock: 0,
            ply: 0,
            history: Vec::new(),
            undo: Vec::new(),
        }
    }

    /// Return the halfmove clock.
    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    /// Return the fullmove number (starts at 1, incremented after Black moves).
    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.ply / 2 + 1
    }

    /// Resolve a UCI move string (`e2e4`, `e7e8q`) against the legal moves.
    pub fn parse_uci_move(&self, text: &str) -> Result<Move, BoardError> {
        let illegal = || BoardError::IllegalMove {
            uci_move: text.to_string(),
        };
        if !(4..=5).contains(&text.len()) || !text.is_ascii() {
            return Err(illegal());
        }
        let source = Square::from_algebraic(&text[0..2]).ok_or_else(illegal)?;
        let dest = Square::from_algebraic(&text[2..4]).ok_or_else(illegal)?;
        let promotion = match text[4..].chars().next() {
            Some(c) => Some(PieceKind::from_fen_char(c).ok_or_else(illegal)?),
            None => None,
        };

        self.legal_moves(false)
            .into_iter()
            .find(|mv| mv.source() == source && mv.dest() == dest && mv.promotion() == promotion)
            .ok_or_else(illegal)
    }

    /// FEN of the current position.
    pub fn to_fen(&self) -> String {
        let backend = self.inner.to_string();
        let prefix: Vec<&str> = backend.split_whitespace().take(4).collect();
        format!(
            "{} {} {}",
            prefix.join(" "),
            self.halfmove_clock,
            self.fullmove_number()
        )
    }

    /// Describe a backend move with the fields the search reads.
    fn describe(&self, mv: chess::ChessMove) -> Move {
        let source: Square = mv.get_source().into();
        let dest: Square = mv.get_dest().into();
        let piece: PieceKind = self
            .inner
            .piece_on(mv.get_source())
            .map_or(PieceKind::Pawn, PieceKind::from);

        let mut described = Move::new(source, dest, piece);
        if let Some(victim) = self.inner.piece_on(mv.get_dest()) {
            described = described.with_capture(victim.into());
        }
        if let Some(promo) = mv.get_promotion() {
            described = described.with_promotion(promo.into());
        }

        match piece {
            PieceKind::King if source.file().abs_diff(dest.file()) == 2 => {
                described.with_flag(MoveFlag::Castle)
            }
            PieceKind::Pawn if source.file() != dest.file() && !described.is_capture() => described
                .with_capture(PieceKind::Pawn)
                .with_flag(MoveFlag::EnPassant),
            PieceKind::Pawn if source.rank().abs_diff(dest.rank()) == 2 => {
                described.with_flag(MoveFlag::DoublePush)
            }
            _ => described,
        }
    }

    /// `true` if the current position already occurred since the last irreversible move.
    fn is_repetition(&self) -> bool {
        let key = self.fingerprint();
        self.history
            .iter()
            .rev()
            .take(self.halfmove_clock as usize)
            .skip(1)
            .step_by(2)
            .any(|&earlier| earlier == key)
    }

    /// Neither side can deliver mate with the material left.
    fn is_insufficient_material(&self) -> bool {
        let b = &self.inner;
        let heavy = *b.pieces(chess::Piece::Pawn) | *b.pieces(chess::Piece::Rook) | *b.pieces(chess::Piece::Queen);
        if heavy.0 != 0 {
            return false;
        }

        let knights = b.pieces(chess::Piece::Knight).popcnt();
        let bishops = SquareSet::from(*b.pieces(chess::Piece::Bishop));
        if knights + bishops.count() <= 1 {
            return true;
        }

        // Bishops only, all on one square colour.
        knights == 0 && {
            let light = bishops.iter().filter(|sq| sq.is_light()).count() as u32;
            light == 0 || light == bishops.count()
        }
    }
}

impl Position for Board {
    fn legal_moves(&self, captures_only: bool) -> Vec<Move> {
        MoveGen::new_legal(&self.inner)
            .map(|mv| self.describe(mv))
            .filter(|mv| !captures_only || mv.is_capture())
            .collect()
    }

    fn apply_move(&mut self, mv: Move) {
        let irreversible = mv.piece() == PieceKind::Pawn || mv.is_capture();
        self.undo.push(Undo {
            inner: self.inner,
            halfmove_clock: self.halfmove_clock,
            mv,
        });
        self.history.push(self.inner.get_hash());
        self.inner = self.inner.make_move_new(mv.into());
        self.halfmove_clock = if irreversible {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };
        self.ply += 1;
    }

    fn undo_move(&mut self, mv: Move) {
        let undo = self
            .undo
            .pop()
            .expect("undo_move called without a matching apply_move");
        debug_assert_eq!(undo.mv, mv, "undo_move called out of stack order");
        self.history.pop();
        self.inner = undo.inner;
        self.halfmove_clock = undo.halfmove_clock;
        self.ply -= 1;
    }

    #[inline]
    fn is_in_check(&self) -> bool {
        self.inner.checkers().0 != 0
    }

    fn is_checkmate(&self) -> bool {
        matches!(self.inner.status(), BoardStatus::Checkmate)
    }

    fn is_draw(&self) -> bool {
        match self.inner.status() {
            BoardStatus::Stalemate => true,
            BoardStatus::Checkmate => false,
            BoardStatus::Ongoing => {
                self.halfmove_clock >= 100 || self.is_repetition() || self.is_insufficient_material()
            }
        }
    }

    #[inline]
    fn fingerprint(&self) -> u64 {
        self.inner.get_hash()
    }

    #[inline]
    fn ply_count(&self) -> u32 {
        self.ply
    }

    #[inline]
    fn side_to_move(&self) -> Color {
        self.inner.side_to_move().into()
    }

    fn pieces(&self, kind: PieceKind, color: Color) -> SquareSet {
        let bb = *self.inner.pieces(kind.into()) & *self.inner.color_combined(color.into());
        bb.into()
    }

    fn king_square(&self, color: Color) -> Square {
        self.inner.king_square(color.into()).into()
    }

    fn piece_on(&self, sq: Square) -> Option<(PieceKind, Color)> {
        let backend = sq.into();
        let kind = self.inner.piece_on(backend)?;
        let color = self.inner.color_on(backend)?;
        Some((kind.into(), color.into()))
    }
}

impl FromStr for Board {
    type Err = BoardError;

    /// Parse a FEN string. The move counters are optional and default to `0 1`.
    fn from_str(fen: &str) -> Result<Board, BoardError> {
        let invalid = |reason: String| BoardError::InvalidFen {
            fen: fen.to_string(),
            reason,
        };

        let fields: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&fields.len()) {
            return Err(invalid(format!("expected 4 to 6 fields, found {}", fields.len())));
        }

        let inner = chess::Board::from_str(&fields[..4].join(" "))
            .map_err(|e| invalid(format!("{e:?}")))?;

        let halfmove_clock: u16 = match fields.get(4) {
            Some(text) => text
                .parse()
                .map_err(|_| invalid(format!("invalid halfmove clock \"{text}\"")))?,
            None => 0,
        };
        let fullmove_number: u32 = match fields.get(5) {
            Some(text) => text
                .parse()
                .map_err(|_| invalid(format!("invalid fullmove number \"{text}\"")))?,
            None => 1,
        };

        let black_to_move = inner.side_to_move() == chess::Color::Black;
        let ply = fullmove_number.saturating_sub(1) * 2 + u32::from(black_to_move);

        Ok(Board {
            inner,
            halfmove_clock,
            ply,
            history: Vec::new(),
            undo: Vec::new(),
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting_position()
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Board) -> bool {
        self.inner.get_hash() == other.inner.get_hash()
            && self.halfmove_clock == other.halfmove_clock
            && self.ply == other.ply
            && self.history == other.history
    }
}

impl Eq for Board {}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board(\"{}\")", self.to_fen())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}
