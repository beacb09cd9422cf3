//! Commands accepted by the rules engine.
//!
//! The whole protocol is two verbs: roll the dice, move a piece. The
//! acting seat is established out-of-band (locally by the UI, remotely by
//! connection identity) and passed alongside the command, never inside it.

use serde::{Deserialize, Serialize};

use super::piece::PieceId;

/// A player command, matched exhaustively by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Roll the dice to open the decision point.
    RollDice,
    /// Move the given piece by the rolled value.
    MovePiece { piece: PieceId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_equality() {
        assert_eq!(Command::RollDice, Command::RollDice);
        assert_eq!(
            Command::MovePiece {
                piece: PieceId::new(1)
            },
            Command::MovePiece {
                piece: PieceId::new(1)
            }
        );
        assert_ne!(
            Command::MovePiece {
                piece: PieceId::new(1)
            },
            Command::MovePiece {
                piece: PieceId::new(2)
            }
        );
    }

    #[test]
    fn test_command_serialization() {
        let cmd = Command::MovePiece {
            piece: PieceId::new(3),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        let deserialized: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, deserialized);
    }
}
