//! Synchronous UCI engine loop.
//!
//! Commands are read one line at a time and handled to completion before the
//! next is read, so `go` blocks until the search returns and `stop` has
//! nothing to interrupt.

use std::io::{BufRead, Write};
use std::time::Duration;

use tracing::{debug, info, warn};

use gambit_core::{Board, Color, Position};
use gambit_engine::{
    EvalStrategy, FixedTimer, GameClock, IterationInfo, MATE_SCORE, MATE_THRESHOLD, MAX_DEPTH,
    OrderStrategy, SearchResult, Searcher, TimeGovernor, Timer,
};

use crate::command::{
    Command, GoParams, MAX_HASH_MB, MAX_MOVE_OVERHEAD_MS, UciOption, parse_command,
};
use crate::error::UciError;

/// Thinking time for a `go` with neither a clock nor a depth.
pub const DEFAULT_MOVE_TIME: Duration = Duration::from_secs(1);

/// Configuration knobs adjustable via `setoption`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Transposition table size in megabytes.
    pub hash_mb: usize,
    /// Static evaluator used by the search.
    pub evaluator: EvalStrategy,
    /// Move orderer used by the search.
    pub ordering: OrderStrategy,
    /// Time held back from every move for communication lag.
    pub move_overhead: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            hash_mb: 16,
            evaluator: EvalStrategy::default(),
            ordering: OrderStrategy::default(),
            move_overhead: Duration::from_millis(10),
        }
    }
}

/// The UCI engine, holding the current board and the searcher.
pub struct UciEngine {
    board: Board,
    searcher: Searcher,
    options: EngineOptions,
}

impl UciEngine {
    /// Create a new engine with the starting position.
    pub fn new() -> Self {
        let options = EngineOptions::default();
        let mut searcher = Searcher::new(options.evaluator, options.ordering);
        searcher.resize_tt(options.hash_mb);
        Self {
            board: Board::starting_position(),
            searcher,
            options,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Run the UCI loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<(), UciError> {
        for line in input.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            debug!(cmd = %trimmed, "received UCI command");

            match parse_command(trimmed) {
                Ok(Command::Quit) => break,
                Ok(cmd) => self.handle(cmd, out)?,
                Err(e) => warn!(error = %e, "UCI parse error"),
            }
        }

        info!("gambit shutting down");
        Ok(())
    }

    fn handle<W: Write>(&mut self, cmd: Command, out: &mut W) -> Result<(), UciError> {
        match cmd {
            Command::Uci => self.handle_uci(out)?,
            Command::IsReady => writeln!(out, "readyok")?,
            Command::UciNewGame => self.handle_ucinewgame(),
            Command::Position(board) => self.board = board,
            Command::Go(params) => self.handle_go(&params, out)?,
            Command::SetOption(option) => self.handle_setoption(option),
            // The search has already finished by the time `stop` is read.
            Command::Stop | Command::Quit | Command::Unknown(_) => {}
        }
        out.flush()?;
        Ok(())
    }

    fn handle_uci<W: Write>(&self, out: &mut W) -> Result<(), UciError> {
        let defaults = EngineOptions::default();
        writeln!(out, "id name gambit")?;
        writeln!(out, "id author the gambit developers")?;
        writeln!(
            out,
            "option name Hash type spin default {} min 1 max {MAX_HASH_MB}",
            defaults.hash_mb
        )?;
        let vars: String = EvalStrategy::NAMES
            .iter()
            .map(|name| format!(" var {name}"))
            .collect();
        writeln!(
            out,
            "option name Evaluator type combo default {}{vars}",
            defaults.evaluator.name()
        )?;
        let vars: String = OrderStrategy::NAMES
            .iter()
            .map(|name| format!(" var {name}"))
            .collect();
        writeln!(
            out,
            "option name Ordering type combo default {}{vars}",
            defaults.ordering.name()
        )?;
        writeln!(
            out,
            "option name MoveOverhead type spin default {} min 0 max {MAX_MOVE_OVERHEAD_MS}",
            defaults.move_overhead.as_millis()
        )?;
        writeln!(out, "uciok")?;
        Ok(())
    }

    fn handle_ucinewgame(&mut self) {
        self.board = Board::starting_position();
        self.searcher.clear_tt();
    }

    fn handle_setoption(&mut self, option: UciOption) {
        match option {
            UciOption::Hash(mb) => {
                self.options.hash_mb = mb;
                self.searcher.resize_tt(mb);
                info!(hash_mb = mb, "resized transposition table");
            }
            UciOption::Evaluator(evaluator) => {
                self.options.evaluator = evaluator;
                self.searcher.set_evaluator(evaluator);
                info!(evaluator = evaluator.name(), "switched evaluator");
            }
            UciOption::Ordering(ordering) => {
                self.options.ordering = ordering;
                self.searcher.set_orderer(ordering);
                info!(ordering = ordering.name(), "switched move ordering");
            }
            UciOption::MoveOverhead(overhead) => {
                self.options.move_overhead = overhead;
                info!(overhead_ms = overhead.as_millis() as u64, "set move overhead");
            }
        }
    }

    fn handle_go<W: Write>(&mut self, params: &GoParams, out: &mut W) -> Result<(), UciError> {
        let timer = self.timer_for(params);
        let mut governor = match timer.as_deref() {
            Some(timer) => TimeGovernor::new(timer),
            None => TimeGovernor::unlimited(),
        };
        let max_depth = params.depth.unwrap_or(MAX_DEPTH);

        let mut written = Ok(());
        let result = self
            .searcher
            .search(&mut self.board, max_depth, &mut governor, |iter| {
                if written.is_ok() {
                    written = writeln!(out, "{}", format_info(iter)).and_then(|()| out.flush());
                }
            });
        written?;

        debug!(
            depth = result.depth,
            score = result.score,
            nodes = result.nodes,
            completed = result.completed,
            "search finished"
        );
        writeln!(out, "bestmove {}", bestmove(&result))?;
        Ok(())
    }

    /// Pick the clock for a `go`: `movetime` wins, then the mover's game
    /// clock. A bare `depth` searches without a clock.
    fn timer_for(&self, params: &GoParams) -> Option<Box<dyn Timer>> {
        let (remaining, increment) = match self.board.side_to_move() {
            Color::White => (params.wtime, params.winc),
            Color::Black => (params.btime, params.binc),
        };

        if let Some(movetime) = params.movetime {
            let limit = movetime.saturating_sub(self.options.move_overhead);
            return Some(Box::new(FixedTimer::start(limit)));
        }
        if let Some(remaining) = remaining {
            let clock = GameClock::start(remaining, increment.unwrap_or_default(), params.movestogo)
                .with_overhead(self.options.move_overhead);
            return Some(Box::new(clock));
        }
        if params.depth.is_some() {
            return None;
        }
        Some(Box::new(FixedTimer::start(DEFAULT_MOVE_TIME)))
    }
}

impl Default for UciEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// `cp <n>` or `mate <moves>`, negative when the engine is being mated.
fn format_score(score: i32) -> String {
    if score.abs() > MATE_THRESHOLD {
        let plies = MATE_SCORE - score.abs();
        let moves = (plies + 1) / 2;
        if score > 0 {
            format!("mate {moves}")
        } else {
            format!("mate -{moves}")
        }
    } else {
        format!("cp {score}")
    }
}

fn format_info(iter: &IterationInfo<'_>) -> String {
    let elapsed_ms = iter.elapsed.as_millis().max(1);
    let nps = u128::from(iter.nodes) * 1000 / elapsed_ms;
    let pv: Vec<String> = iter.pv.iter().map(|mv| mv.to_uci()).collect();
    format!(
        "info depth {} score {} nodes {} nps {} time {} hashfull {} pv {}",
        iter.depth,
        format_score(iter.score),
        iter.nodes,
        nps,
        iter.elapsed.as_millis(),
        iter.hashfull,
        pv.join(" ")
    )
}

fn bestmove(result: &SearchResult) -> String {
    result
        .best_move
        .map_or_else(|| "0000".to_string(), |mv| mv.to_uci())
}
