//! Perft: leaf counts used to validate a [`Position`] implementation.
//!
//! Runs entirely through the position contract, so it also exercises
//! apply/undo ordering: every node is reached through a [`MoveGuard`](crate::MoveGuard).

use crate::position::Position;

/// Count leaf nodes `depth` plies below `pos`.
///
/// Depth 0 counts the position itself. The last ply is bulk-counted.
pub fn perft<P: Position>(pos: &mut P, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = pos.legal_moves(false);
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .into_iter()
        .map(|mv| perft(&mut *pos.play(mv), depth - 1))
        .sum()
}

/// Per-root-move leaf counts, sorted by UCI string.
pub fn divide<P: Position>(pos: &mut P, depth: usize) -> Vec<(String, u64)> {
    let mut results: Vec<(String, u64)> = pos
        .legal_moves(false)
        .into_iter()
        .map(|mv| {
            let count = perft(&mut *pos.play(mv), depth.saturating_sub(1));
            (mv.to_uci(), count)
        })
        .collect();
    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
