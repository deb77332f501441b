//! Search algorithms and move ordering.

pub mod control;
pub mod negamax;
pub mod ordering;
pub mod tt;

use std::time::Duration;

use gambit_core::{Move, Position};
use tracing::{debug, trace};

use crate::eval::{EvalStrategy, Evaluator};
use crate::time::Timer;
use control::TimeGovernor;
use negamax::{INF, MATE_SCORE, SearchAborted, SearchContext, negamax};
use ordering::{MoveOrderer, OrderStrategy, OrderingHints, order_moves};
use tt::TranspositionTable;

/// Deepest iteration the driver will start.
pub const MAX_DEPTH: u8 = 64;

/// Switches for the searcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Probe and populate the transposition table.
    pub use_tt: bool,
    /// Extend the horizon with a capture-only search.
    pub quiescence: bool,
    /// Upper bound on iterative-deepening depth.
    pub max_depth: u8,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            use_tt: true,
            quiescence: true,
            max_depth: MAX_DEPTH,
        }
    }
}

/// Progress report for one completed iteration.
#[derive(Debug, Clone, Copy)]
pub struct IterationInfo<'a> {
    pub depth: u8,
    /// Score in centipawns from the mover's perspective.
    pub score: i32,
    pub nodes: u64,
    pub elapsed: Duration,
    pub pv: &'a [Move],
    /// Transposition table occupancy in per-mille.
    pub hashfull: u32,
}

/// Result of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Move to play; `None` only when the root has no legal moves.
    pub best_move: Option<Move>,
    /// Score of `best_move` from the mover's perspective.
    pub score: i32,
    /// Deepest fully completed iteration (0 if none completed).
    pub depth: u8,
    /// Total nodes visited.
    pub nodes: u64,
    /// Principal variation, starting with `best_move`.
    pub pv: Vec<Move>,
    /// `false` if `best_move` comes from an interrupted iteration or is the
    /// unsearched fallback.
    pub completed: bool,
}

/// Iterative-deepening searcher.
///
/// Owns its transposition table, which persists across searches until
/// cleared or resized.
pub struct Searcher<E = EvalStrategy, O = OrderStrategy> {
    evaluator: E,
    orderer: O,
    tt: TranspositionTable,
    config: SearchConfig,
}

impl Searcher {
    /// Classical evaluation, MVV-LVA ordering and a default-sized table.
    pub fn with_defaults() -> Self {
        Self::new(EvalStrategy::default(), OrderStrategy::default())
    }
}

impl<E: Evaluator, O: MoveOrderer> Searcher<E, O> {
    pub fn new(evaluator: E, orderer: O) -> Self {
        Self {
            evaluator,
            orderer,
            tt: TranspositionTable::default(),
            config: SearchConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the transposition table.
    pub fn with_tt(mut self, tt: TranspositionTable) -> Self {
        self.tt = tt;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SearchConfig {
        &mut self.config
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn set_evaluator(&mut self, evaluator: E) {
        self.evaluator = evaluator;
    }

    pub fn orderer(&self) -> &O {
        &self.orderer
    }

    pub fn set_orderer(&mut self, orderer: O) {
        self.orderer = orderer;
    }

    pub fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    /// Clear the transposition table (preserving the allocation).
    pub fn clear_tt(&mut self) {
        self.tt.clear();
    }

    /// Resize the transposition table to the given size in megabytes.
    pub fn resize_tt(&mut self, mb: usize) {
        self.tt = TranspositionTable::with_megabytes(mb);
    }

    /// Search until `timer`'s budget for this move runs out.
    pub fn think<P: Position>(&mut self, pos: &mut P, timer: &dyn Timer) -> SearchResult {
        let mut governor = TimeGovernor::new(timer);
        let max_depth = self.config.max_depth;
        self.search(pos, max_depth, &mut governor, |_| {})
    }

    /// Search to exactly `depth` with no time limit.
    pub fn search_depth<P: Position>(&mut self, pos: &mut P, depth: u8) -> SearchResult {
        let mut governor = TimeGovernor::unlimited();
        self.search(pos, depth, &mut governor, |_| {})
    }

    /// Run iterative deepening from depth 1 up to `max_depth`.
    ///
    /// Calls `on_iter` after each completed iteration. Stops early once the
    /// governor's soft limit passes between iterations or its hard limit
    /// interrupts one. Each iteration searches the previous best move first.
    /// An interrupted iteration replaces it only after re-searching it, with
    /// the best root move it fully searched.
    pub fn search<P, F>(
        &mut self,
        pos: &mut P,
        max_depth: u8,
        governor: &mut TimeGovernor<'_>,
        mut on_iter: F,
    ) -> SearchResult
    where
        P: Position,
        F: FnMut(&IterationInfo<'_>),
    {
        let max_depth = max_depth.min(self.config.max_depth);
        let mut result = self.fallback(pos);
        if result.best_move.is_none() {
            return result;
        }

        let mut ctx = SearchContext::new(
            &self.evaluator,
            &self.orderer,
            &mut self.tt,
            self.config,
            governor,
        );

        for depth in 1..=max_depth {
            ctx.start_iteration(result.best_move);

            match negamax(pos, depth, 0, -INF, INF, &mut ctx) {
                Ok(score) => {
                    let pv = ctx.pv.root_pv();
                    result.best_move = pv.first().copied().or(result.best_move);
                    result.score = score;
                    result.depth = depth;
                    result.pv = pv.to_vec();
                    result.completed = true;

                    let info = IterationInfo {
                        depth,
                        score,
                        nodes: ctx.nodes,
                        elapsed: ctx.governor.elapsed(),
                        pv,
                        hashfull: ctx.tt.hashfull(),
                    };
                    debug!(
                        depth,
                        score,
                        nodes = ctx.nodes,
                        elapsed_ms = info.elapsed.as_millis() as u64,
                        best = %result.pv.first().map_or_else(String::new, |mv| mv.to_uci()),
                        "iteration complete"
                    );
                    on_iter(&info);

                    if ctx.governor.should_stop_iterating() {
                        break;
                    }
                }
                Err(SearchAborted) => {
                    trace!(depth, nodes = ctx.nodes, "iteration interrupted");
                    if let Some((mv, score)) = ctx.root_best
                        && (result.depth == 0 || ctx.root_hint_searched)
                    {
                        let pv = ctx.pv.root_pv();
                        result.best_move = Some(mv);
                        result.score = score;
                        result.pv = if pv.first() == Some(&mv) { pv.to_vec() } else { vec![mv] };
                        result.completed = false;
                    }
                    break;
                }
            }
        }

        result.nodes = ctx.nodes;
        result
    }

    /// Result used until an iteration produces something better: the first
    /// root move in search order, or no move when the root is terminal.
    fn fallback<P: Position>(&self, pos: &mut P) -> SearchResult {
        let mut moves = pos.legal_moves(false);
        let in_check = pos.is_in_check();
        let tt_move = self
            .config
            .use_tt
            .then(|| self.tt.probe(pos.fingerprint(), 0))
            .flatten()
            .map(|entry| entry.best_move);
        order_moves(&self.orderer, pos, &mut moves, &OrderingHints { tt_move, in_check });

        let best_move = moves.first().copied();
        let score = match best_move {
            Some(_) => 0,
            None if in_check => -MATE_SCORE,
            None => 0,
        };
        SearchResult {
            best_move,
            score,
            depth: 0,
            nodes: 0,
            pv: best_move.into_iter().collect(),
            completed: false,
        }
    }
}

impl<E, O> std::fmt::Debug for Searcher<E, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Searcher")
            .field("tt", &self.tt)
            .field("config", &self.config)
            .finish()
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use gambit_core::{Board, Position};

    use super::*;
    use crate::eval::Material;
    use crate::search::control::tests::ManualClock;
    use crate::search::ordering::{DangerAware, MvvLva};
    use crate::search::negamax::MATE_THRESHOLD;
    use crate::time::TimeBudget;

    #[test]
    fn depth_1_returns_legal_move() {
        let mut board = Board::starting_position();
        let result = Searcher::with_defaults().search_depth(&mut board, 1);
        let best = result.best_move.expect("should find a move at depth 1");
        assert!(board.legal_moves(false).contains(&best));
        assert!(result.completed);
        assert_eq!(result.depth, 1);
    }

    #[test]
    fn finds_mate_in_one() {
        // Scholar's mate: Qxf7#
        let mut board: Board = "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4"
            .parse()
            .unwrap();
        let result = Searcher::with_defaults().search_depth(&mut board, 2);
        assert_eq!(result.best_move.map(|mv| mv.to_uci()).as_deref(), Some("h5f7"));
        assert!(
            result.score > MATE_THRESHOLD,
            "score {} should indicate mate",
            result.score
        );
    }

    #[test]
    fn mated_root_has_no_move() {
        let mut board: Board = "7k/6Q1/5K2/8/8/8/8/8 b - - 0 1".parse().unwrap();
        let result = Searcher::with_defaults().search_depth(&mut board, 3);
        assert_eq!(result.best_move, None);
        assert!(result.score < -MATE_THRESHOLD);
        assert!(result.pv.is_empty());
    }

    #[test]
    fn iterative_deepening_calls_callback() {
        let mut board = Board::starting_position();
        let mut searcher = Searcher::with_defaults();
        let mut governor = TimeGovernor::unlimited();
        let mut depths_seen = Vec::new();
        searcher.search(&mut board, 3, &mut governor, |info| {
            assert!(!info.pv.is_empty(), "every iteration reports a PV");
            depths_seen.push(info.depth);
        });
        assert_eq!(depths_seen, vec![1, 2, 3]);
    }

    #[test]
    fn config_caps_the_depth() {
        let mut board = Board::starting_position();
        let mut searcher = Searcher::new(Material, MvvLva).with_config(SearchConfig {
            max_depth: 2,
            ..SearchConfig::default()
        });
        let result = searcher.search_depth(&mut board, 5);
        assert_eq!(result.depth, 2);
    }

    #[test]
    fn expired_budget_falls_back_to_first_ordered_move() {
        let mut board: Board = "4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1".parse().unwrap();
        let clock = ManualClock::new(Duration::from_secs(1));
        let mut governor = TimeGovernor::with_budget(&clock, TimeBudget::fixed(Duration::ZERO));
        let mut searcher = Searcher::new(Material, MvvLva);
        let result = searcher.search(&mut board, 5, &mut governor, |_| {
            panic!("no iteration can complete");
        });
        assert_eq!(result.best_move.map(|mv| mv.to_uci()).as_deref(), Some("d1d5"));
        assert!(!result.completed);
        assert_eq!(result.depth, 0);
        assert_eq!(board.ply_count(), 0);
    }

    #[test]
    fn danger_aware_ordering_finds_the_same_mate() {
        let mut board: Board = "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4"
            .parse()
            .unwrap();
        let mut searcher = Searcher::with_defaults();
        searcher.set_orderer(OrderStrategy::DangerAware);
        let result = searcher.search_depth(&mut board, 2);
        assert_eq!(result.best_move.map(|mv| mv.to_uci()).as_deref(), Some("h5f7"));
        assert_eq!(searcher.orderer(), &OrderStrategy::DangerAware);

        let mut plain = Searcher::new(Material, DangerAware);
        let hanging: Board = "4k3/8/4p3/3p4/8/8/3Q4/4K3 w - - 0 1".parse().unwrap();
        let mut board = hanging.clone();
        let result = plain.search_depth(&mut board, 2);
        assert_ne!(result.best_move.map(|mv| mv.to_uci()).as_deref(), Some("d2d5"));
        assert_eq!(board, hanging);
    }

    #[test]
    fn repeated_search_reuses_table() {
        let mut board = Board::starting_position();
        let mut searcher = Searcher::with_defaults();
        searcher.search_depth(&mut board, 3);
        assert!(searcher.tt().hashfull() > 0);

        let second = searcher.search_depth(&mut board, 3);
        assert!(second.completed);
        assert_eq!(second.depth, 3);
        let best = second.best_move.expect("warm table still yields a move");
        assert!(board.legal_moves(false).contains(&best));

        searcher.clear_tt();
        assert_eq!(searcher.tt().hashfull(), 0);
    }
}
