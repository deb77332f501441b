//! Board squares and square sets using Little-Endian Rank-File (LERF) encoding.

use std::fmt;

/// A square on the chess board, encoded as a `u8` in LERF format.
///
/// Index = rank * 8 + file, so A1 = 0, B1 = 1, ..., H8 = 63.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Total number of squares.
    pub const COUNT: usize = 64;

    pub const A1: Square = Square(0);
    pub const E1: Square = Square(4);
    pub const H1: Square = Square(7);
    pub const A8: Square = Square(56);
    pub const E8: Square = Square(60);
    pub const H8: Square = Square(63);

    /// Create a square from rank and file indices (both 0..7).
    #[inline]
    pub const fn new(rank: u8, file: u8) -> Square {
        debug_assert!(rank < 8 && file < 8);
        Square(rank * 8 + file)
    }

    /// Create a square from a zero-based index, returning `None` if out of range.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Square> {
        if index < 64 { Some(Square(index)) } else { None }
    }

    /// Parse an algebraic notation string (e.g. "e4") into a square.
    pub fn from_algebraic(s: &str) -> Option<Square> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let (file_byte, rank_byte) = (bytes[0], bytes[1]);
        if !(b'a'..=b'h').contains(&file_byte) || !(b'1'..=b'8').contains(&rank_byte) {
            return None;
        }
        Some(Square::new(rank_byte - b'1', file_byte - b'a'))
    }

    /// Return the zero-based index (0..63).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Rank index, 0 for rank 1 through 7 for rank 8.
    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 / 8
    }

    /// File index, 0 for the a-file through 7 for the h-file.
    #[inline]
    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    /// Manhattan distance between two squares.
    #[inline]
    pub const fn manhattan(self, other: Square) -> u8 {
        self.rank().abs_diff(other.rank()) + self.file().abs_diff(other.file())
    }

    /// Manhattan distance to the nearest of the four centre squares (d4, e4, d5, e5).
    #[inline]
    pub const fn center_distance(self) -> u8 {
        let file = self.file();
        let rank = self.rank();
        let file_dist = if file < 4 { 3 - file } else { file - 4 };
        let rank_dist = if rank < 4 { 3 - rank } else { rank - 4 };
        file_dist + rank_dist
    }

    /// `true` for light squares (h1 is light).
    #[inline]
    pub const fn is_light(self) -> bool {
        (self.rank() + self.file()) % 2 == 1
    }
}

impl From<chess::Square> for Square {
    #[inline]
    fn from(sq: chess::Square) -> Square {
        Square(sq.to_index() as u8)
    }
}

impl From<Square> for chess::Square {
    #[inline]
    fn from(sq: Square) -> chess::Square {
        chess::ALL_SQUARES[sq.index()]
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.file()) as char;
        let rank = (b'1' + self.rank()) as char;
        write!(f, "{file}{rank}")
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// A set of squares packed into a `u64`, bit `i` = square index `i`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SquareSet(u64);

impl SquareSet {
    /// The empty set.
    pub const EMPTY: SquareSet = SquareSet(0);

    /// Wrap raw bits.
    #[inline]
    pub const fn new(bits: u64) -> SquareSet {
        SquareSet(bits)
    }

    /// Raw bits.
    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Number of squares in the set.
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        self.0 & (1u64 << sq.0) != 0
    }

    /// Iterate squares from A1 towards H8.
    pub fn iter(self) -> SquareIter {
        SquareIter(self.0)
    }
}

impl From<chess::BitBoard> for SquareSet {
    #[inline]
    fn from(bb: chess::BitBoard) -> SquareSet {
        SquareSet(bb.0)
    }
}

impl IntoIterator for SquareSet {
    type Item = Square;
    type IntoIter = SquareIter;

    fn into_iter(self) -> SquareIter {
        self.iter()
    }
}

impl fmt::Debug for SquareSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Iterator over the squares of a [`SquareSet`].
pub struct SquareIter(u64);

impl Iterator for SquareIter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        let index = self.0.trailing_zeros() as u8;
        self.0 &= self.0 - 1;
        Some(Square(index))
    }
}

#[cfg(test)]
mod tests {
    use super::{Square, SquareSet};

    #[test]
    fn algebraic_notation() {
        let e4 = Square::from_algebraic("e4").unwrap();
        assert_eq!(e4.rank(), 3);
        assert_eq!(e4.file(), 4);
        assert_eq!(e4.to_string(), "e4");
        assert_eq!(Square::from_algebraic("i9"), None);
        assert_eq!(Square::from_algebraic("e"), None);
    }

    #[test]
    fn center_distance_corners_and_center() {
        assert_eq!(Square::A1.center_distance(), 6);
        assert_eq!(Square::H8.center_distance(), 6);
        assert_eq!(Square::from_algebraic("d4").unwrap().center_distance(), 0);
        assert_eq!(Square::from_algebraic("e5").unwrap().center_distance(), 0);
    }

    #[test]
    fn manhattan_distance() {
        assert_eq!(Square::E1.manhattan(Square::E8), 7);
        assert_eq!(Square::A1.manhattan(Square::H8), 14);
    }

    #[test]
    fn square_colors() {
        assert!(!Square::A1.is_light());
        assert!(Square::H1.is_light());
    }

    #[test]
    fn backend_square_roundtrip() {
        for index in 0..64u8 {
            let sq = Square::from_index(index).unwrap();
            let backend: chess::Square = sq.into();
            assert_eq!(Square::from(backend), sq);
        }
    }

    #[test]
    fn square_set_iterates_in_order() {
        let set = SquareSet::new((1 << 0) | (1 << 4) | (1 << 63));
        let squares: Vec<Square> = set.iter().collect();
        assert_eq!(squares, vec![Square::A1, Square::E1, Square::H8]);
        assert_eq!(set.count(), 3);
        assert!(set.contains(Square::E1));
        assert!(!set.contains(Square::E8));
    }
}
