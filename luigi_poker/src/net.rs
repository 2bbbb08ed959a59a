//! Networking layer for two-peer play.
//!
//! Peers exchange length-prefixed bincode frames over one TCP connection.
//! The session logic is kept apart from the socket so it can be driven
//! and tested without any I/O.

/// Session error types.
pub mod errors;

/// Message types exchanged between peers.
pub mod messages;

/// Blocking TCP link with a background receive loop.
pub mod peer;

/// The round protocol state machine.
pub mod session;

/// Utilities for binary message serialization and framing.
pub mod utils;

pub use errors::SessionError;
pub use messages::PeerMessage;
pub use peer::{PeerEvent, PeerLink};
pub use session::{PeerSession, Role, SessionState, Step};
