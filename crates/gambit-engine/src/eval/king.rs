//! King placement.
//!
//! While the opponent still has plenty of material a king belongs on its back
//! rank. Once the opponent is down to endgame material the stronger side is
//! rewarded for driving the enemy king to the edge and walking its own king
//! up to it.

use gambit_core::{Color, Position};

use crate::eval::classical::EvalWeights;
use crate::eval::material::side_material;

/// Largest Manhattan distance between two squares.
const MAX_DISTANCE: i32 = 14;

/// One side's king term.
fn king_term<P: Position>(pos: &P, color: Color, weights: &EvalWeights) -> i32 {
    let own_king = pos.king_square(color);
    let their_king = pos.king_square(!color);
    let their_material = side_material(pos, !color, &weights.material);

    if their_material >= weights.endgame_material {
        let off_back_rank = own_king.rank().abs_diff(color.back_rank());
        -i32::from(off_back_rank) * weights.back_rank
    } else {
        let cornered = i32::from(their_king.center_distance()) * weights.king_center;
        let proximity = (MAX_DISTANCE - i32::from(own_king.manhattan(their_king))) * weights.king_proximity;
        cornered + proximity
    }
}

/// King placement from White's perspective.
pub fn evaluate_kings<P: Position>(pos: &P, weights: &EvalWeights) -> i32 {
    king_term(pos, Color::White, weights) - king_term(pos, Color::Black, weights)
}
