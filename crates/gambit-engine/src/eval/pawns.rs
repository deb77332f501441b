//! Pawn advancement.
//!
//! Every pawn earns a bonus per rank gained; pawns on the d and e files
//! earn an extra central bonus on top.

use gambit_core::{Color, PieceKind, Position};

/// Ranks a pawn has advanced from its starting rank.
fn advancement(rank: u8, color: Color) -> i32 {
    let relative = match color {
        Color::White => rank,
        Color::Black => 7 - rank,
    };
    i32::from(relative) - 1
}

/// `true` for the d and e files.
fn is_central_file(file: u8) -> bool {
    matches!(file, 3 | 4)
}

/// Pawn advancement from White's perspective.
///
/// `per_rank` is paid for each rank any pawn has gained, `central_per_rank`
/// additionally for pawns on the central files.
pub fn evaluate_pawns<P: Position>(pos: &P, per_rank: i32, central_per_rank: i32) -> i32 {
    let side = |color: Color| -> i32 {
        pos.pieces(PieceKind::Pawn, color)
            .iter()
            .map(|sq| {
                let weight = if is_central_file(sq.file()) {
                    per_rank + central_per_rank
                } else {
                    per_rank
                };
                advancement(sq.rank(), color) * weight
            })
            .sum()
    };
    side(Color::White) - side(Color::Black)
}

#[cfg(test)]
mod tests {
    use gambit_core::Board;

    use super::evaluate_pawns;

    #[test]
    fn unmoved_pawns_score_zero() {
        assert_eq!(evaluate_pawns(&Board::starting_position(), 5, 5), 0);
    }

    #[test]
    fn advanced_pawn_scores_per_rank() {
        // White pawn on e6 (4 ranks gained), black pawn on d7 (none).
        let board: Board = "4k3/3p4/4P3/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        assert_eq!(evaluate_pawns(&board, 5, 0), 20);
    }

    #[test]
    fn black_advancement_is_negative() {
        // Black pawn on d2 (5 ranks gained).
        let board: Board = "4k3/8/8/8/8/8/3p4/K7 w - - 0 1".parse().unwrap();
        assert_eq!(evaluate_pawns(&board, 3, 0), -15);
    }

    #[test]
    fn central_pawns_earn_more() {
        // White pawns on e4 and a4, two ranks gained each.
        let board: Board = "4k3/8/8/8/P3P3/8/8/4K3 w - - 0 1".parse().unwrap();
        assert_eq!(evaluate_pawns(&board, 5, 0), 20);
        assert_eq!(evaluate_pawns(&board, 5, 5), 30);
    }
}
