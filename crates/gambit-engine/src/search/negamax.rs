//! Negamax alpha-beta search with quiescence.

use gambit_core::{Move, Position};
use tracing::trace;

use crate::eval::{evaluate_leaf, Evaluator};
use crate::search::SearchConfig;
use crate::search::control::TimeGovernor;
use crate::search::ordering::{order_moves, MoveOrderer, OrderingHints};
use crate::search::tt::{Bound, TranspositionTable};

/// Score representing an unreachable upper/lower bound.
pub const INF: i32 = 30_000;

/// Base score for checkmate (adjusted by ply for mate distance).
pub const MATE_SCORE: i32 = 29_000;

/// Scores above this threshold indicate a forced mate.
pub const MATE_THRESHOLD: i32 = 28_000;

/// Maximum search depth (in plies) for array sizing and recursion limits.
pub const MAX_PLY: usize = 128;

/// The time governor stopped the search.
///
/// Carried through `Err` so it can never be compared against a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("search aborted: time budget exhausted")]
pub struct SearchAborted;

/// Negamax alpha-beta search.
///
/// Returns the score of `pos` for the side to move, or [`SearchAborted`] if
/// the governor expired before the node was fully expanded. Every move is
/// applied through a guard, so `pos` is restored on both paths. The
/// principal variation is collected into `ctx.pv`.
pub fn negamax<P, E, O>(
    pos: &mut P,
    depth: u8,
    ply: usize,
    mut alpha: i32,
    beta: i32,
    ctx: &mut SearchContext<'_, '_, E, O>,
) -> Result<i32, SearchAborted>
where
    P: Position,
    E: Evaluator,
    O: MoveOrderer,
{
    ctx.pv.clear_ply(ply);

    if depth == 0 || ply >= MAX_PLY {
        return if ctx.config.quiescence && ply < MAX_PLY {
            quiescence(pos, ply, alpha, beta, ctx)
        } else {
            ctx.nodes += 1;
            Ok(evaluate_leaf(ctx.evaluator, pos, ply))
        };
    }

    ctx.nodes += 1;

    // The root always searches, even in a position that already repeated.
    if ply > 0 && pos.is_draw() {
        return Ok(0);
    }

    let in_check = pos.is_in_check();
    let mut moves = pos.legal_moves(false);
    if moves.is_empty() {
        return Ok(if in_check { -(MATE_SCORE - ply as i32) } else { 0 });
    }

    let fingerprint = pos.fingerprint();
    let mut tt_move = None;
    if ctx.config.use_tt
        && let Some(entry) = ctx.tt.probe(fingerprint, ply)
    {
        tt_move = Some(entry.best_move);
        if ply > 0
            && let Some(score) = entry.cutoff(depth, alpha, beta)
        {
            return Ok(score);
        }
    }

    if ply == 0 && ctx.root_hint.is_some() {
        tt_move = ctx.root_hint;
    }

    let hints = OrderingHints { tt_move, in_check };
    order_moves(ctx.orderer, pos, &mut moves, &hints);

    let original_alpha = alpha;
    let mut best_score = -INF;
    let mut best_move = None;

    for mv in moves {
        if ctx.governor.check() {
            trace!(ply, depth, nodes = ctx.nodes, "time budget exhausted");
            return Err(SearchAborted);
        }

        let score = -negamax(&mut *pos.play(mv), depth - 1, ply + 1, -beta, -alpha, ctx)?;

        if ply == 0 {
            ctx.record_root_move(mv, score);
        }

        if score > best_score {
            best_score = score;
            best_move = Some(mv);
        }
        if score > alpha {
            alpha = score;
            ctx.pv.update(ply, mv);
        }
        if alpha >= beta {
            break;
        }
    }

    if ctx.config.use_tt
        && let Some(mv) = best_move
    {
        let bound = if best_score <= original_alpha {
            Bound::UpperBound
        } else if best_score >= beta {
            Bound::LowerBound
        } else {
            Bound::Exact
        };
        ctx.tt.store(fingerprint, mv, depth, best_score, bound, ply);
    }

    Ok(best_score)
}

/// Quiescence search: resolve captures before trusting the static score.
fn quiescence<P, E, O>(
    pos: &mut P,
    ply: usize,
    mut alpha: i32,
    beta: i32,
    ctx: &mut SearchContext<'_, '_, E, O>,
) -> Result<i32, SearchAborted>
where
    P: Position,
    E: Evaluator,
    O: MoveOrderer,
{
    ctx.nodes += 1;

    if pos.is_checkmate() {
        return Ok(-(MATE_SCORE - ply as i32));
    }
    if pos.is_draw() {
        return Ok(0);
    }

    // Stand-pat: the side to move can choose not to capture
    let stand_pat = ctx.evaluator.evaluate(pos);
    if stand_pat >= beta || ply >= MAX_PLY {
        return Ok(stand_pat);
    }
    alpha = alpha.max(stand_pat);

    let mut captures = pos.legal_moves(true);
    let hints = OrderingHints::default();
    order_moves(ctx.orderer, pos, &mut captures, &hints);

    for mv in captures {
        if ctx.governor.check() {
            trace!(ply, nodes = ctx.nodes, "time budget exhausted in quiescence");
            return Err(SearchAborted);
        }

        let score = -quiescence(&mut *pos.play(mv), ply + 1, -beta, -alpha, ctx)?;

        if score >= beta {
            return Ok(score);
        }
        alpha = alpha.max(score);
    }

    Ok(alpha)
}

/// Triangular PV table for collecting principal variation lines.
///
/// Row `ply` holds the best line found from that ply onward.
#[derive(Debug, Clone)]
pub struct PvTable {
    lines: Vec<Vec<Move>>,
}

impl PvTable {
    pub fn new() -> Self {
        Self {
            lines: vec![Vec::new(); MAX_PLY + 1],
        }
    }

    /// Clear the PV line at `ply` (called at the top of each node).
    pub fn clear_ply(&mut self, ply: usize) {
        if let Some(line) = self.lines.get_mut(ply) {
            line.clear();
        }
    }

    /// Set the line at `ply` to `mv` followed by the line at `ply + 1`.
    pub fn update(&mut self, ply: usize, mv: Move) {
        if ply >= MAX_PLY {
            return;
        }
        let (head, tail) = self.lines.split_at_mut(ply + 1);
        let line = &mut head[ply];
        line.clear();
        line.push(mv);
        line.extend_from_slice(&tail[0]);
    }

    /// The principal variation from the root.
    pub fn root_pv(&self) -> &[Move] {
        &self.lines[0]
    }
}

impl Default for PvTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Search state threaded through negamax calls.
pub struct SearchContext<'a, 'g, E, O> {
    pub evaluator: &'a E,
    pub orderer: &'a O,
    pub tt: &'a mut TranspositionTable,
    pub config: SearchConfig,
    pub governor: &'a mut TimeGovernor<'g>,
    /// Total nodes visited.
    pub nodes: u64,
    pub pv: PvTable,
    /// Move searched first at the root: the last completed iteration's best.
    pub root_hint: Option<Move>,
    /// Best fully searched root move of the current iteration.
    pub root_best: Option<(Move, i32)>,
    /// Whether `root_hint` was fully searched in the current iteration.
    pub root_hint_searched: bool,
}

impl<'a, 'g, E, O> SearchContext<'a, 'g, E, O> {
    pub fn new(
        evaluator: &'a E,
        orderer: &'a O,
        tt: &'a mut TranspositionTable,
        config: SearchConfig,
        governor: &'a mut TimeGovernor<'g>,
    ) -> Self {
        Self {
            evaluator,
            orderer,
            tt,
            config,
            governor,
            nodes: 0,
            pv: PvTable::new(),
            root_hint: None,
            root_best: None,
            root_hint_searched: false,
        }
    }

    /// Forget the previous iteration's root moves and search `hint` first.
    pub fn start_iteration(&mut self, hint: Option<Move>) {
        self.root_hint = hint;
        self.root_best = None;
        self.root_hint_searched = false;
    }

    fn record_root_move(&mut self, mv: Move, score: i32) {
        if self.root_hint == Some(mv) {
            self.root_hint_searched = true;
        }
        if self.root_best.is_none_or(|(_, best)| score > best) {
            self.root_best = Some((mv, score));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use gambit_core::Board;

    use super::*;
    use crate::eval::Material;
    use crate::search::control::tests::ManualClock;
    use crate::search::ordering::MvvLva;
    use crate::time::TimeBudget;

    fn run(board: &mut Board, depth: u8, config: SearchConfig) -> (i32, Vec<Move>) {
        let mut tt = TranspositionTable::new(1 << 12);
        let mut governor = TimeGovernor::unlimited();
        let mut ctx = SearchContext::new(&Material, &MvvLva, &mut tt, config, &mut governor);
        let score = negamax(board, depth, 0, -INF, INF, &mut ctx).unwrap();
        (score, ctx.pv.root_pv().to_vec())
    }

    #[test]
    fn pv_update_copies_child_line() {
        let board = Board::starting_position();
        let e4 = board.parse_uci_move("e2e4").unwrap();
        let d4 = board.parse_uci_move("d2d4").unwrap();
        let mut pv = PvTable::new();
        pv.update(1, d4);
        pv.update(0, e4);
        assert_eq!(pv.root_pv(), &[e4, d4]);
        pv.clear_ply(0);
        assert!(pv.root_pv().is_empty());
    }

    #[test]
    fn mate_in_one_is_found() {
        let mut board: Board = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1".parse().unwrap();
        let (score, pv) = run(&mut board, 2, SearchConfig::default());
        assert_eq!(score, MATE_SCORE - 1);
        assert_eq!(pv[0].to_uci(), "a1a8");
    }

    #[test]
    fn stalemate_scores_zero() {
        let mut board: Board = "k7/2K5/1Q6/8/8/8/8/8 b - - 0 1".parse().unwrap();
        let (score, pv) = run(&mut board, 3, SearchConfig::default());
        assert_eq!(score, 0);
        assert!(pv.is_empty());
    }

    #[test]
    fn quiescence_sees_the_recapture() {
        // Qxd5 wins a pawn but loses the queen to exd5.
        let mut board: Board = "4k3/8/4p3/3p4/8/8/3Q4/4K3 w - - 0 1".parse().unwrap();
        let quiet = SearchConfig {
            quiescence: false,
            ..SearchConfig::default()
        };
        let (_, pv) = run(&mut board, 1, SearchConfig::default());
        assert_ne!(pv[0].to_uci(), "d2d5", "quiescence should refuse the poisoned pawn");
        let (_, pv) = run(&mut board, 1, quiet);
        assert_eq!(pv[0].to_uci(), "d2d5", "a bare horizon grabs it");
    }

    #[test]
    fn abort_restores_the_board() {
        let mut board = Board::starting_position();
        let clock = ManualClock::new(Duration::from_secs(1));
        let mut governor = TimeGovernor::with_budget(&clock, TimeBudget::fixed(Duration::ZERO));
        let mut tt = TranspositionTable::new(1 << 10);
        let mut ctx = SearchContext::new(
            &Material,
            &MvvLva,
            &mut tt,
            SearchConfig::default(),
            &mut governor,
        );
        assert_eq!(negamax(&mut board, 4, 0, -INF, INF, &mut ctx), Err(SearchAborted));
        assert!(ctx.root_best.is_none());
        assert_eq!(board, Board::starting_position());
    }

    #[test]
    fn root_hint_is_searched_first_without_a_table() {
        let mut board: Board = "4k3/8/4p3/3p4/8/8/3Q4/4K3 w - - 0 1".parse().unwrap();
        let hint = board.parse_uci_move("d2c1").unwrap();
        let mut tt = TranspositionTable::new(1 << 10);
        let mut governor = TimeGovernor::unlimited();
        let config = SearchConfig {
            use_tt: false,
            ..SearchConfig::default()
        };
        let mut ctx = SearchContext::new(&Material, &MvvLva, &mut tt, config, &mut governor);
        ctx.start_iteration(Some(hint));

        negamax(&mut board, 1, 0, -INF, INF, &mut ctx).unwrap();
        assert!(ctx.root_hint_searched);
        // Every other root move scores at most as well as the hinted one here.
        assert_eq!(ctx.root_best.map(|(mv, _)| mv), Some(hint));
    }
}
