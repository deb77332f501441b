//! Search and evaluation for gambit.

pub mod eval;
pub mod search;
pub mod time;

pub use eval::{Classical, EvalStrategy, EvalWeights, Evaluator, Material, evaluate_leaf};
pub use search::control::TimeGovernor;
pub use search::negamax::{INF, MATE_SCORE, MATE_THRESHOLD, MAX_PLY, SearchAborted};
pub use search::ordering::{
    DangerAware, MoveOrderer, MvvLva, OrderStrategy, OrderingHints, Unordered,
};
pub use search::tt::{Bound, TranspositionTable, TtEntry};
pub use search::{IterationInfo, MAX_DEPTH, SearchConfig, SearchResult, Searcher};
pub use time::{FixedTimer, GameClock, TimeBudget, Timer};
