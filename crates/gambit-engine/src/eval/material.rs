//! Material counting.
//!
//! Scores here are from White's perspective (positive = White ahead).

use gambit_core::{Color, PieceKind, Position};

use crate::eval::Evaluator;

/// Material values indexed by [`PieceKind::index()`].
///
/// | Piece  | Value |
/// |--------|-------|
/// | Pawn   |  150  |
/// | Knight |  300  |
/// | Bishop |  400  |
/// | Rook   |  500  |
/// | Queen  | 1000  |
/// | King   |    0  |
pub const MATERIAL_VALUE: [i32; PieceKind::COUNT] = [150, 300, 400, 500, 1000, 0];

/// Total material of one side under `values`.
pub fn side_material<P: Position>(pos: &P, color: Color, values: &[i32; PieceKind::COUNT]) -> i32 {
    PieceKind::ALL
        .iter()
        .map(|&kind| pos.pieces(kind, color).count() as i32 * values[kind.index()])
        .sum()
}

/// Material balance from White's perspective.
pub fn material<P: Position>(pos: &P, values: &[i32; PieceKind::COUNT]) -> i32 {
    side_material(pos, Color::White, values) - side_material(pos, Color::Black, values)
}

/// Material-only evaluator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Material;

impl Evaluator for Material {
    fn evaluate<P: Position>(&self, pos: &P) -> i32 {
        let score = material(pos, &MATERIAL_VALUE);
        match pos.side_to_move() {
            Color::White => score,
            Color::Black => -score,
        }
    }
}

#[cfg(test)]
mod tests {
    use gambit_core::{Board, Color, Position};

    use super::{material, side_material, Material, MATERIAL_VALUE};
    use crate::eval::Evaluator;

    #[test]
    fn starting_position_is_balanced() {
        let board = Board::starting_position();
        assert_eq!(side_material(&board, Color::White, &MATERIAL_VALUE), 4_600);
        assert_eq!(material(&board, &MATERIAL_VALUE), 0);
        assert_eq!(Material.evaluate(&board), 0);
    }

    #[test]
    fn sign_follows_side_to_move() {
        // White is a queen up.
        let white: Board = "4k3/8/8/8/8/8/8/3QK3 w - - 0 1".parse().unwrap();
        let black: Board = "4k3/8/8/8/8/8/8/3QK3 b - - 0 1".parse().unwrap();
        assert_eq!(Material.evaluate(&white), 1_000);
        assert_eq!(Material.evaluate(&black), -1_000);
        assert_eq!(black.side_to_move(), Color::Black);
    }
}
