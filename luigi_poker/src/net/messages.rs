use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::entities::{Card, Coins, HAND_SIZE, Hand};

/// Everything two peers ever say to each other.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum PeerMessage {
    /// Host to client: a round begins at this wager and these are your
    /// five cards. The host's wager is the one both sides settle with.
    Start {
        cards: [Card; HAND_SIZE],
        wager: Coins,
    },
    /// Either way: my exchange is done and this is my final hand.
    HandFinal { cards: [Card; HAND_SIZE] },
}

impl PeerMessage {
    #[must_use]
    pub fn start(hand: &Hand, wager: Coins) -> Self {
        Self::Start {
            cards: *hand.cards(),
            wager,
        }
    }

    #[must_use]
    pub fn hand_final(hand: &Hand) -> Self {
        Self::HandFinal {
            cards: *hand.cards(),
        }
    }
}

impl fmt::Display for PeerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start { wager, .. } => write!(f, "start at ${wager}"),
            Self::HandFinal { .. } => write!(f, "final hand"),
        }
    }
}
