//! Error types for board construction and move parsing.

/// Errors raised while building a [`Board`](crate::Board) or reading moves for it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// The FEN string was rejected by the position parser.
    #[error("invalid FEN \"{fen}\": {reason}")]
    InvalidFen {
        /// The offending FEN string.
        fen: String,
        /// Parser diagnostic.
        reason: String,
    },
    /// A UCI move string is malformed or not legal in the current position.
    #[error("illegal move: {uci_move}")]
    IllegalMove {
        /// The move text as received.
        uci_move: String,
    },
}

#[cfg(test)]
mod tests {
    use super::BoardError;

    #[test]
    fn board_error_display() {
        let err = BoardError::IllegalMove {
            uci_move: "e2e5".to_string(),
        };
        assert_eq!(format!("{err}"), "illegal move: e2e5");
    }

    #[test]
    fn invalid_fen_display_includes_reason() {
        let err = BoardError::InvalidFen {
            fen: "8/8 w".to_string(),
            reason: "bad placement".to_string(),
        };
        assert_eq!(format!("{err}"), "invalid FEN \"8/8 w\": bad placement");
    }
}
