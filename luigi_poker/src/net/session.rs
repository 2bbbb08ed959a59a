//! The two-peer round protocol, without any I/O.
//!
//! A [`PeerSession`] consumes local intents (start, exchange, stand) and
//! peer messages, and answers with the messages to send back plus the
//! outcome once both final hands are known. The host deals and sets the
//! wager; the client plays the hand it's given at that wager. Each side
//! settles on its own using the same arithmetic, so both agree on the
//! result whichever final hand arrives first.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt};

use super::{errors::SessionError, messages::PeerMessage};
use crate::{
    config::GameConfig,
    game::{
        DealOrder, Outcome, Round, RoundError, RoundPhase,
        entities::{Balances, Coins, Deck, Hand, Player},
    },
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Role {
    Host,
    Client,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Host => "host",
            Self::Client => "client",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum SessionState {
    AwaitingStart,
    HandInProgress,
    Resolved,
    Dead,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::AwaitingStart => "awaiting a round",
            Self::HandInProgress => "playing a hand",
            Self::Resolved => "between rounds",
            Self::Dead => "disconnected",
        };
        write!(f, "{repr}")
    }
}

/// What the caller should do after feeding the session.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Step {
    /// Send this to the peer.
    pub send: Option<PeerMessage>,
    /// The round just resolved, seen from the local seat.
    pub outcome: Option<Outcome>,
}

#[derive(Debug)]
pub struct PeerSession {
    role: Role,
    state: SessionState,
    /// `player` is the local seat and `opponent` the remote one.
    round: Round,
    wager: Coins,
    local_final: bool,
    last_outcome: Option<Outcome>,
}

impl PeerSession {
    #[must_use]
    pub fn new(role: Role, starting_balance: Coins, wager: Coins) -> Self {
        Self::with_deck(role, starting_balance, wager, Deck::new())
    }

    #[must_use]
    pub fn from_config(role: Role, config: &GameConfig) -> Self {
        Self::new(role, config.starting_balance, config.network_wager)
    }

    #[must_use]
    pub fn with_deck(role: Role, starting_balance: Coins, wager: Coins, deck: Deck) -> Self {
        let (local, remote) = match role {
            Role::Host => ("Host", "Client"),
            Role::Client => ("Client", "Host"),
        };
        Self {
            role,
            state: SessionState::AwaitingStart,
            round: Round::new(
                Player::new(local, starting_balance),
                Player::new(remote, starting_balance),
                deck,
            ),
            wager,
            local_final: false,
            last_outcome: None,
        }
    }

    /// Host only: deal a new round and produce the `Start` message for
    /// the client.
    ///
    /// # Errors
    ///
    /// Fails for the client, while a round is in progress, on a dead
    /// session, or when either side can't cover the wager.
    pub fn begin_round(&mut self) -> Result<PeerMessage, SessionError> {
        self.require_alive()?;
        if self.role != Role::Host {
            return Err(SessionError::NotHost);
        }
        if self.state == SessionState::HandInProgress {
            return Err(SessionError::RoundInProgress);
        }
        let balances = self.balances();
        let available = balances.player.min(balances.opponent);
        if available < self.wager {
            return Err(RoundError::InsufficientBalance {
                available,
                required: self.wager,
            }
            .into());
        }

        if self.round.phase() != RoundPhase::Created {
            self.round.reset();
        }
        self.round.deal_in(DealOrder::Blocks)?;
        let Some(remote_hand) = self.round.opponent().hand.as_ref() else {
            return Err(SessionError::NoRound);
        };
        let start = PeerMessage::start(remote_hand, self.wager);
        self.local_final = false;
        self.state = SessionState::HandInProgress;
        info!("dealt a new round (balances {balances})");
        Ok(start)
    }

    /// Finish the local exchange by replacing `slots`, then send the final
    /// hand. An empty set stands pat.
    ///
    /// # Errors
    ///
    /// Fails without a round in progress, if the final hand was already
    /// sent, or for a slot past the hand.
    pub fn exchange(&mut self, slots: &BTreeSet<usize>) -> Result<Step, SessionError> {
        self.require_alive()?;
        if self.state != SessionState::HandInProgress {
            return Err(SessionError::NoRound);
        }
        if self.local_final {
            return Err(SessionError::HandAlreadySent);
        }
        self.round.exchange_player_cards(slots)?;
        self.local_final = true;

        let Some(local_hand) = self.round.player().hand.as_ref() else {
            return Err(SessionError::NoRound);
        };
        let send = Some(PeerMessage::hand_final(local_hand));
        let outcome = self.try_resolve()?;
        Ok(Step { send, outcome })
    }

    /// # Errors
    ///
    /// Same as [`PeerSession::exchange`].
    pub fn stand(&mut self) -> Result<Step, SessionError> {
        self.exchange(&BTreeSet::new())
    }

    /// Feed one message from the peer.
    ///
    /// # Errors
    ///
    /// A message that doesn't fit the current state is logged and
    /// reported as [`SessionError::ProtocolDesync`]; nothing changes.
    pub fn handle_message(&mut self, message: PeerMessage) -> Result<Step, SessionError> {
        self.require_alive()?;
        match (message, self.state) {
            (
                PeerMessage::Start { cards, wager },
                SessionState::AwaitingStart | SessionState::Resolved,
            ) if self.role == Role::Client && wager > 0 => {
                if self.round.phase() != RoundPhase::Created {
                    self.round.reset();
                }
                self.round.take_dealt_hand(Hand::new(cards))?;
                if wager != self.wager {
                    info!("host set the wager to ${wager} (was ${})", self.wager);
                    self.wager = wager;
                }
                self.local_final = false;
                self.state = SessionState::HandInProgress;
                debug!("host started a round");
                Ok(Step::default())
            }
            (PeerMessage::HandFinal { cards }, SessionState::HandInProgress)
                if !self.round.opponent_final() =>
            {
                self.round.accept_opponent_hand(Hand::new(cards))?;
                debug!("peer's final hand arrived");
                let outcome = self.try_resolve()?;
                Ok(Step {
                    send: None,
                    outcome,
                })
            }
            (message, state) => {
                warn!("dropping {message} from the peer while {state}");
                Err(SessionError::ProtocolDesync {
                    message: message.to_string(),
                    state,
                })
            }
        }
    }

    /// The link is gone. The session can't be used anymore.
    pub fn connection_lost(&mut self, reason: &str) {
        if self.state != SessionState::Dead {
            warn!("{} lost the connection: {reason}", self.role);
            self.state = SessionState::Dead;
        }
    }

    fn require_alive(&self) -> Result<(), SessionError> {
        if self.state == SessionState::Dead {
            Err(SessionError::ConnectionLost("session is closed".to_string()))
        } else {
            Ok(())
        }
    }

    fn try_resolve(&mut self) -> Result<Option<Outcome>, SessionError> {
        if !self.local_final || !self.round.opponent_final() {
            return Ok(None);
        }
        let outcome = self.round.settle(self.wager)?;
        self.state = SessionState::Resolved;
        self.local_final = false;
        self.last_outcome = Some(outcome.clone());
        Ok(Some(outcome))
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn wager(&self) -> Coins {
        self.wager
    }

    /// Local balance as `player`, the peer's as `opponent`.
    #[must_use]
    pub fn balances(&self) -> Balances {
        Balances::new(self.round.player().balance, self.round.opponent().balance)
    }

    /// The local hand, if a round was dealt.
    #[must_use]
    pub fn hand(&self) -> Option<&Hand> {
        self.round.player().hand.as_ref()
    }

    /// The peer's final hand. Only revealed once the round resolves.
    #[must_use]
    pub fn peer_hand(&self) -> Option<&Hand> {
        self.round
            .opponent()
            .hand
            .as_ref()
            .filter(|hand| !hand.is_face_down())
    }

    #[must_use]
    pub fn round(&self) -> &Round {
        &self.round
    }

    #[must_use]
    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.last_outcome.as_ref()
    }

    /// Whether our final hand went out and we're waiting on the peer's.
    #[must_use]
    pub fn awaiting_peer(&self) -> bool {
        self.state == SessionState::HandInProgress && self.local_final
    }

    /// No further round can be played at this wager.
    #[must_use]
    pub fn is_over(&self) -> bool {
        let balances = self.balances();
        balances.player.min(balances.opponent) < self.wager
    }
}
