//! Static evaluation.
//!
//! Every score is from the side to move's perspective; the searcher negates
//! it for the opponent.

pub mod classical;
pub mod king;
pub mod material;
pub mod pawns;

use gambit_core::Position;

pub use classical::{Classical, EvalWeights};
pub use material::Material;

use crate::search::negamax::MATE_SCORE;

/// Heuristic score of a non-terminal position.
pub trait Evaluator {
    fn evaluate<P: Position>(&self, pos: &P) -> i32;
}

/// Score a leaf `ply` plies below the root.
///
/// Checkmate scores `-(MATE_SCORE - ply)` so shorter mates outrank longer
/// ones; a drawn position scores exactly 0. Anything else goes to `evaluator`.
pub fn evaluate_leaf<E: Evaluator, P: Position>(evaluator: &E, pos: &P, ply: usize) -> i32 {
    if pos.is_checkmate() {
        return -(MATE_SCORE - ply as i32);
    }
    if pos.is_draw() {
        return 0;
    }
    evaluator.evaluate(pos)
}

/// Evaluator chosen at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalStrategy {
    Classical(Classical),
    Material(Material),
}

impl EvalStrategy {
    /// Names accepted by [`from_name`](Self::from_name).
    pub const NAMES: [&'static str; 2] = ["Classical", "Material"];

    /// Look up a strategy by name, ignoring case.
    pub fn from_name(name: &str) -> Option<EvalStrategy> {
        if name.eq_ignore_ascii_case("classical") {
            Some(EvalStrategy::Classical(Classical::default()))
        } else if name.eq_ignore_ascii_case("material") {
            Some(EvalStrategy::Material(Material))
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EvalStrategy::Classical(_) => "Classical",
            EvalStrategy::Material(_) => "Material",
        }
    }
}

impl Default for EvalStrategy {
    fn default() -> Self {
        EvalStrategy::Classical(Classical::default())
    }
}

impl Evaluator for EvalStrategy {
    fn evaluate<P: Position>(&self, pos: &P) -> i32 {
        match self {
            EvalStrategy::Classical(eval) => eval.evaluate(pos),
            EvalStrategy::Material(eval) => eval.evaluate(pos),
        }
    }
}
