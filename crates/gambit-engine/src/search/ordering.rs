//! Move ordering.
//!
//! Moves are sorted by a per-move key, highest first. The sort is stable, so
//! equal keys keep the position's enumeration order. The hinted move, when
//! legal here, always leads regardless of the orderer.

use std::cmp::Reverse;

use gambit_core::{Move, PieceKind, Position};

/// Per-node inputs to ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderingHints {
    /// Move to search first: the table's remembered move, or at the root the
    /// previous iteration's best move.
    pub tt_move: Option<Move>,
    /// Whether the side to move is in check.
    pub in_check: bool,
}

/// Assigns sort keys to moves.
///
/// `pos` is mutable so an orderer can look one ply ahead; it must be left
/// as it was found.
pub trait MoveOrderer {
    fn score_move<P: Position>(&self, pos: &mut P, mv: Move, hints: &OrderingHints) -> i32;
}

/// Sort `moves` in place, best first.
pub fn order_moves<O: MoveOrderer, P: Position>(
    orderer: &O,
    pos: &mut P,
    moves: &mut [Move],
    hints: &OrderingHints,
) {
    moves.sort_by_cached_key(|&mv| Reverse(orderer.score_move(pos, mv, hints)));
    if let Some(hinted) = hints.tt_move
        && let Some(index) = moves.iter().position(|&mv| mv == hinted)
    {
        moves[..=index].rotate_right(1);
    }
}

/// Base key for any capture, keeping captures ahead of quiet moves.
pub const CAPTURE_BASE: i32 = 10_000;

/// Bonus for a move that gives check when the mover is itself in check.
pub const CHECK_EVASION_BONUS: i32 = 500;

/// Ordering values, Pawn through King.
const ORDER_VALUE: [i32; PieceKind::COUNT] = [100, 300, 320, 500, 900, 2_000];

/// Victim-minus-attacker ordering with promotion and check bonuses.
///
/// | Move                       | Key                                   |
/// |----------------------------|---------------------------------------|
/// | Capture                    | [`CAPTURE_BASE`] + victim - attacker  |
/// | Promotion                  | + promoted value / 10                 |
/// | Checking reply (in check)  | + [`CHECK_EVASION_BONUS`]             |
/// | Quiet                      | 0                                     |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MvvLva;

impl MoveOrderer for MvvLva {
    fn score_move<P: Position>(&self, pos: &mut P, mv: Move, hints: &OrderingHints) -> i32 {
        let mut score = 0;
        if let Some(victim) = mv.captured() {
            score += CAPTURE_BASE + ORDER_VALUE[victim.index()] - ORDER_VALUE[mv.piece().index()];
        }
        if let Some(promoted) = mv.promotion() {
            score += ORDER_VALUE[promoted.index()] / 10;
        }
        if hints.in_check && pos.play(mv).is_in_check() {
            score += CHECK_EVASION_BONUS;
        }
        score
    }
}

/// Penalty per capture the opponent has after a move.
pub const DANGER_PER_ATTACK: i32 = 50;

/// Ordering by what a move exposes, one ply deep.
///
/// Each move is played and the opponent's replies are generated. The key is
/// the captured value minus the dearest piece the opponent could then take,
/// [`DANGER_PER_ATTACK`] for every capture on offer and one point per reply.
/// Promotion and checking-reply bonuses are as for [`MvvLva`].
///
/// Slower than [`MvvLva`] by a move generation per move, but it ranks a
/// pawn grab that hangs the queen below a quiet retreat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DangerAware;

impl MoveOrderer for DangerAware {
    fn score_move<P: Position>(&self, pos: &mut P, mv: Move, hints: &OrderingHints) -> i32 {
        let mut score = mv.captured().map_or(0, |victim| ORDER_VALUE[victim.index()]);
        if let Some(promoted) = mv.promotion() {
            score += ORDER_VALUE[promoted.index()] / 10;
        }

        let child = pos.play(mv);
        let replies = child.legal_moves(false);
        let mut dearest = 0;
        let mut attacks = 0;
        for victim in replies.iter().filter_map(|reply| reply.captured()) {
            dearest = dearest.max(ORDER_VALUE[victim.index()]);
            attacks += 1;
        }
        score -= dearest + attacks * DANGER_PER_ATTACK + replies.len() as i32;

        if hints.in_check && child.is_in_check() {
            score += CHECK_EVASION_BONUS;
        }
        score
    }
}

/// Move orderer chosen at runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderStrategy {
    #[default]
    MvvLva,
    DangerAware,
}

impl OrderStrategy {
    /// Names accepted by [`from_name`](Self::from_name).
    pub const NAMES: [&'static str; 2] = ["MvvLva", "DangerAware"];

    /// Look up a strategy by name, ignoring case.
    pub fn from_name(name: &str) -> Option<OrderStrategy> {
        if name.eq_ignore_ascii_case("mvvlva") {
            Some(OrderStrategy::MvvLva)
        } else if name.eq_ignore_ascii_case("dangeraware") {
            Some(OrderStrategy::DangerAware)
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OrderStrategy::MvvLva => "MvvLva",
            OrderStrategy::DangerAware => "DangerAware",
        }
    }
}

impl MoveOrderer for OrderStrategy {
    fn score_move<P: Position>(&self, pos: &mut P, mv: Move, hints: &OrderingHints) -> i32 {
        match self {
            OrderStrategy::MvvLva => MvvLva.score_move(pos, mv, hints),
            OrderStrategy::DangerAware => DangerAware.score_move(pos, mv, hints),
        }
    }
}

/// Leaves moves in enumeration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unordered;

impl MoveOrderer for Unordered {
    fn score_move<P: Position>(&self, _pos: &mut P, _mv: Move, _hints: &OrderingHints) -> i32 {
        0
    }
}
