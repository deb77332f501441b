//! The default hand-crafted evaluator.

use gambit_core::{Color, PieceKind, Position};

use crate::eval::Evaluator;
use crate::eval::king::evaluate_kings;
use crate::eval::material::{material, MATERIAL_VALUE};
use crate::eval::pawns::evaluate_pawns;

/// Tunable weights for [`Classical`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalWeights {
    /// Piece values indexed by [`PieceKind::index()`].
    pub material: [i32; PieceKind::COUNT],
    /// Per step of the enemy king's distance from the centre, in the endgame.
    pub king_center: i32,
    /// Per step the kings are closer than the maximum distance, in the endgame.
    pub king_proximity: i32,
    /// Penalty per rank the king stands off its back rank while the opponent has
    /// at least `endgame_material`.
    pub back_rank: i32,
    /// Per rank gained by each pawn.
    pub pawn_advance: i32,
    /// Extra per rank gained by a d- or e-file pawn.
    pub center_pawn_advance: i32,
    /// Opponent material below which the king terms switch to endgame mode.
    pub endgame_material: i32,
    /// Penalty to the side to move for standing in check.
    pub in_check: i32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            material: MATERIAL_VALUE,
            king_center: 10,
            king_proximity: 10,
            back_rank: 10,
            pawn_advance: 5,
            center_pawn_advance: 5,
            endgame_material: 2_800,
            in_check: 20,
        }
    }
}

/// Material plus king placement and pawn advancement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classical {
    weights: EvalWeights,
}

impl Classical {
    pub fn new(weights: EvalWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &EvalWeights {
        &self.weights
    }
}

impl Evaluator for Classical {
    fn evaluate<P: Position>(&self, pos: &P) -> i32 {
        let score = material(pos, &self.weights.material)
            + evaluate_kings(pos, &self.weights)
            + evaluate_pawns(
                pos,
                self.weights.pawn_advance,
                self.weights.center_pawn_advance,
            );

        let score = match pos.side_to_move() {
            Color::White => score,
            Color::Black => -score,
        };
        if pos.is_in_check() {
            score - self.weights.in_check
        } else {
            score
        }
    }
}
