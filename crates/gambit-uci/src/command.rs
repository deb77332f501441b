//! UCI command parsing.

use std::time::Duration;

use gambit_core::{Board, Position};
use gambit_engine::{EvalStrategy, OrderStrategy};

use crate::error::UciError;

/// Largest accepted `Hash` value in megabytes.
pub const MAX_HASH_MB: usize = 65_536;

/// Largest accepted `MoveOverhead` value in milliseconds.
pub const MAX_MOVE_OVERHEAD_MS: u64 = 5_000;

/// Parameters for the `go` command.
///
/// All fields are optional; a bare `go` uses defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    /// White's remaining time.
    pub wtime: Option<Duration>,
    /// Black's remaining time.
    pub btime: Option<Duration>,
    /// White's increment per move.
    pub winc: Option<Duration>,
    /// Black's increment per move.
    pub binc: Option<Duration>,
    /// Moves until next time control.
    pub movestogo: Option<u32>,
    /// Search to this depth only.
    pub depth: Option<u8>,
    /// Search for exactly this duration.
    pub movetime: Option<Duration>,
}

/// An option set through `setoption`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciOption {
    /// Transposition table size in megabytes.
    Hash(usize),
    /// Static evaluator used by the search.
    Evaluator(EvalStrategy),
    /// Move orderer used by the search.
    Ordering(OrderStrategy),
    /// Time reserved per move for communication lag.
    MoveOverhead(Duration),
}

/// A parsed UCI command.
#[derive(Debug)]
pub enum Command {
    /// `uci` -- identify the engine.
    Uci,
    /// `isready` -- synchronization ping.
    IsReady,
    /// `ucinewgame` -- reset engine state.
    UciNewGame,
    /// `position` -- set up a board position with optional moves applied.
    Position(Board),
    /// `go` -- start searching with given parameters.
    Go(GoParams),
    /// `setoption name <name> value <value>`.
    SetOption(UciOption),
    /// `stop` -- halt the current search.
    Stop,
    /// `quit` -- exit the engine.
    Quit,
    /// Unrecognized command (silently ignored, as UCI requires).
    Unknown(String),
}

/// Parse a single line of UCI input into a [`Command`].
pub fn parse_command(line: &str) -> Result<Command, UciError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        return Ok(Command::Unknown(String::new()));
    }

    match tokens[0] {
        "uci" => Ok(Command::Uci),
        "isready" => Ok(Command::IsReady),
        "ucinewgame" => Ok(Command::UciNewGame),
        "stop" => Ok(Command::Stop),
        "quit" => Ok(Command::Quit),
        "position" => parse_position(&tokens[1..]),
        "go" => parse_go(&tokens[1..]),
        "setoption" => parse_setoption(&tokens[1..]),
        _ => Ok(Command::Unknown(tokens[0].to_string())),
    }
}

/// Parse the `position` command arguments.
///
/// Supports:
/// - `position startpos [moves e2e4 d7d5 ...]`
/// - `position fen <fen-string> [moves e2e4 d7d5 ...]`
///
/// The FEN move counters may be omitted.
fn parse_position(tokens: &[&str]) -> Result<Command, UciError> {
    let (mut board, rest) = match tokens.first() {
        Some(&"startpos") => (Board::starting_position(), &tokens[1..]),
        Some(&"fen") => {
            let fen_len = tokens[1..]
                .iter()
                .position(|&t| t == "moves")
                .unwrap_or(tokens.len() - 1);
            let fen = tokens[1..=fen_len].join(" ");
            let board = fen
                .parse::<Board>()
                .map_err(|source| UciError::InvalidFen {
                    fen: fen.clone(),
                    source,
                })?;
            (board, &tokens[fen_len + 1..])
        }
        _ => return Err(UciError::MalformedPosition),
    };

    // Apply moves if present: "moves e2e4 d7d5 ..."
    if rest.first() == Some(&"moves") {
        for uci_str in &rest[1..] {
            let mv = board
                .parse_uci_move(uci_str)
                .map_err(|_| UciError::InvalidMove {
                    uci_move: uci_str.to_string(),
                })?;
            board.apply_move(mv);
        }
    }

    Ok(Command::Position(board))
}

/// Parse the `go` command arguments.
///
/// Supports: wtime, btime, winc, binc, movestogo, depth, movetime.
/// Unknown tokens are silently skipped.
fn parse_go(tokens: &[&str]) -> Result<Command, UciError> {
    let mut params = GoParams::default();

    let mut i = 0;
    while i < tokens.len() {
        let value = tokens.get(i + 1);
        match tokens[i] {
            "wtime" => params.wtime = Some(parse_millis(value, "wtime")?),
            "btime" => params.btime = Some(parse_millis(value, "btime")?),
            "winc" => params.winc = Some(parse_millis(value, "winc")?),
            "binc" => params.binc = Some(parse_millis(value, "binc")?),
            "movestogo" => params.movestogo = Some(parse_int(value, "movestogo")?),
            "depth" => params.depth = Some(parse_int(value, "depth")?),
            "movetime" => params.movetime = Some(parse_millis(value, "movetime")?),
            _ => {
                // Unknown token -- skip per UCI convention
                i += 1;
                continue;
            }
        }
        i += 2;
    }

    Ok(Command::Go(params))
}

/// Parse `setoption name <name...> value <value...>`.
fn parse_setoption(tokens: &[&str]) -> Result<Command, UciError> {
    let name_start = tokens.iter().position(|&t| t == "name").map(|i| i + 1);
    let value_start = tokens.iter().position(|&t| t == "value");

    let name = match (name_start, value_start) {
        (Some(start), Some(end)) if start <= end => tokens[start..end].join(" "),
        (Some(start), None) => tokens[start..].join(" "),
        _ => String::new(),
    };
    let value = value_start
        .map(|i| tokens[i + 1..].join(" "))
        .unwrap_or_default();

    let invalid = || UciError::InvalidOption {
        name: name.clone(),
        value: value.clone(),
    };

    let option = if name.eq_ignore_ascii_case("hash") {
        let mb: usize = value.parse().map_err(|_| invalid())?;
        if !(1..=MAX_HASH_MB).contains(&mb) {
            return Err(invalid());
        }
        UciOption::Hash(mb)
    } else if name.eq_ignore_ascii_case("evaluator") {
        UciOption::Evaluator(EvalStrategy::from_name(&value).ok_or_else(invalid)?)
    } else if name.eq_ignore_ascii_case("ordering") {
        UciOption::Ordering(OrderStrategy::from_name(&value).ok_or_else(invalid)?)
    } else if name.eq_ignore_ascii_case("moveoverhead") {
        let ms: u64 = value.parse().map_err(|_| invalid())?;
        if ms > MAX_MOVE_OVERHEAD_MS {
            return Err(invalid());
        }
        UciOption::MoveOverhead(Duration::from_millis(ms))
    } else {
        return Err(invalid());
    };

    Ok(Command::SetOption(option))
}

/// Parse a millisecond value from a token.
fn parse_millis(token: Option<&&str>, param: &str) -> Result<Duration, UciError> {
    // Some GUIs send negative clock values once a flag falls.
    let ms: i64 = parse_int(token, param)?;
    Ok(Duration::from_millis(ms.max(0) as u64))
}

/// Parse an integer value from a token.
fn parse_int<T: std::str::FromStr>(token: Option<&&str>, param: &str) -> Result<T, UciError> {
    let value = token.ok_or_else(|| UciError::MissingGoValue {
        param: param.to_string(),
    })?;
    value.parse().map_err(|_| UciError::InvalidGoValue {
        param: param.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use gambit_core::{Board, Position};
    use gambit_engine::{EvalStrategy, Material};

    use super::*;

    fn go(line: &str) -> GoParams {
        match parse_command(line).unwrap() {
            Command::Go(params) => params,
            other => panic!("expected Go, got {other:?}"),
        }
    }

    fn position(line: &str) -> Board {
        match parse_command(line).unwrap() {
            Command::Position(board) => board,
            other => panic!("expected Position, got {other:?}"),
        }
    }

    fn option(line: &str) -> UciOption {
        match parse_command(line).unwrap() {
            Command::SetOption(option) => option,
            other => panic!("expected SetOption, got {other:?}"),
        }
    }

    #[test]
    fn parse_simple_commands() {
        assert!(matches!(parse_command("uci").unwrap(), Command::Uci));
        assert!(matches!(parse_command("isready").unwrap(), Command::IsReady));
        assert!(matches!(parse_command("ucinewgame").unwrap(), Command::UciNewGame));
        assert!(matches!(parse_command("stop").unwrap(), Command::Stop));
        assert!(matches!(parse_command("quit").unwrap(), Command::Quit));
    }

    #[test]
    fn parse_position_startpos() {
        assert_eq!(position("position startpos"), Board::starting_position());
    }

    #[test]
    fn parse_position_startpos_with_moves() {
        let board = position("position startpos moves e2e4 e7e5");
        assert_eq!(board.ply_count(), 2);
        let fen = board.to_fen();
        assert!(
            fen.starts_with("rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq"),
            "unexpected FEN {fen}"
        );
        assert!(fen.ends_with(" 0 2"), "unexpected counters in {fen}");
    }

    #[test]
    fn parse_position_fen() {
        let board = position(
            "position fen rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
        );
        assert_eq!(board.ply_count(), 1);
    }

    #[test]
    fn parse_position_fen_without_counters_and_with_moves() {
        let board = position("position fen 6k1/5ppp/8/8/8/8/8/R5K1 w - - moves a1a8");
        assert!(board.is_checkmate());
    }

    #[test]
    fn parse_position_missing_keyword() {
        assert!(matches!(
            parse_command("position"),
            Err(UciError::MalformedPosition)
        ));
        assert!(matches!(
            parse_command("position somewhere"),
            Err(UciError::MalformedPosition)
        ));
    }

    #[test]
    fn parse_position_invalid_fen() {
        assert!(matches!(
            parse_command("position fen invalid"),
            Err(UciError::InvalidFen { .. })
        ));
    }

    #[test]
    fn parse_position_illegal_move() {
        let err = parse_command("position startpos moves e2e5").unwrap_err();
        assert!(matches!(err, UciError::InvalidMove { ref uci_move } if uci_move == "e2e5"));
    }

    #[test]
    fn parse_go_depth() {
        assert_eq!(go("go depth 6").depth, Some(6));
    }

    #[test]
    fn parse_go_bare_defaults() {
        assert_eq!(go("go"), GoParams::default());
    }

    #[test]
    fn parse_go_clock() {
        let params = go("go wtime 300000 btime 299000 winc 2000 binc 1000 movestogo 20");
        assert_eq!(params.wtime, Some(Duration::from_millis(300_000)));
        assert_eq!(params.btime, Some(Duration::from_millis(299_000)));
        assert_eq!(params.winc, Some(Duration::from_millis(2_000)));
        assert_eq!(params.binc, Some(Duration::from_millis(1_000)));
        assert_eq!(params.movestogo, Some(20));
    }

    #[test]
    fn parse_go_movetime() {
        assert_eq!(go("go movetime 5000").movetime, Some(Duration::from_millis(5_000)));
    }

    #[test]
    fn parse_go_negative_time_is_zero() {
        assert_eq!(go("go wtime -150 btime 1000").wtime, Some(Duration::ZERO));
    }

    #[test]
    fn parse_go_skips_unknown_tokens() {
        let params = go("go infinite depth 3 ponder");
        assert_eq!(params.depth, Some(3));
    }

    #[test]
    fn parse_go_missing_value() {
        assert!(matches!(
            parse_command("go wtime"),
            Err(UciError::MissingGoValue { .. })
        ));
    }

    #[test]
    fn parse_go_invalid_value() {
        assert!(matches!(
            parse_command("go depth abc"),
            Err(UciError::InvalidGoValue { .. })
        ));
        assert!(parse_command("go depth 300").is_err(), "depth must fit in u8");
    }

    #[test]
    fn parse_setoption_hash() {
        assert_eq!(option("setoption name Hash value 64"), UciOption::Hash(64));
        assert!(parse_command("setoption name Hash value 0").is_err());
        assert!(parse_command("setoption name Hash value lots").is_err());
    }

    #[test]
    fn parse_setoption_evaluator() {
        assert_eq!(
            option("setoption name Evaluator value material"),
            UciOption::Evaluator(EvalStrategy::Material(Material))
        );
        assert!(parse_command("setoption name Evaluator value Neural").is_err());
    }

    #[test]
    fn parse_setoption_ordering() {
        assert_eq!(
            option("setoption name Ordering value DangerAware"),
            UciOption::Ordering(OrderStrategy::DangerAware)
        );
        assert!(parse_command("setoption name Ordering value History").is_err());
    }

    #[test]
    fn parse_setoption_move_overhead() {
        assert_eq!(
            option("setoption name MoveOverhead value 50"),
            UciOption::MoveOverhead(Duration::from_millis(50))
        );
    }

    #[test]
    fn parse_setoption_unknown_name() {
        let err = parse_command("setoption name Skill Level value 3").unwrap_err();
        assert!(
            matches!(err, UciError::InvalidOption { ref name, ref value } if name == "Skill Level" && value == "3")
        );
    }

    #[test]
    fn parse_unknown_command() {
        assert!(matches!(parse_command("foobar").unwrap(), Command::Unknown(_)));
    }

    #[test]
    fn parse_empty_line() {
        assert!(matches!(parse_command("").unwrap(), Command::Unknown(_)));
    }
}
