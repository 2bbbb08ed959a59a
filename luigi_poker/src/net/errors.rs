//! Peer session error types.

use thiserror::Error;

use super::session::SessionState;
use crate::game::RoundError;

#[derive(Debug, Eq, Error, PartialEq)]
pub enum SessionError {
    /// The peer sent something that makes no sense right now. The message
    /// is dropped and the session carries on.
    #[error("unexpected {message} while {state}")]
    ProtocolDesync {
        message: String,
        state: SessionState,
    },
    #[error("connection lost: {0}")]
    ConnectionLost(String),
    #[error("only the host starts rounds")]
    NotHost,
    #[error("no round in progress")]
    NoRound,
    #[error("a round is already in progress")]
    RoundInProgress,
    #[error("final hand already sent")]
    HandAlreadySent,
    #[error(transparent)]
    Round(#[from] RoundError),
}
