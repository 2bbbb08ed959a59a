//! The round engine: one deck, two players, one hand of five-card draw.
//!
//! A round moves through `Created -> Dealt -> ExchangeApplied -> Settled`.
//! Every operation checks the phase first and refuses to touch anything
//! when called at the wrong time.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt};
use thiserror::Error;

use super::{
    entities::{Card, Coins, Deck, DeckExhausted, HAND_SIZE, Hand, Player, Suit, Value},
    functional::{HandRank, Seat, eval, payout},
};
use crate::bot::{DiscardPolicy, ThresholdPolicy};

/// Errors from calling into a round.
#[derive(Debug, Eq, Error, PartialEq)]
pub enum RoundError {
    #[error("need ${required} to wager, only have ${available}")]
    InsufficientBalance { available: Coins, required: Coins },
    #[error("deck exhausted")]
    DeckExhausted,
    #[error("can't {action} while the round is {phase}")]
    InvalidPhase {
        action: &'static str,
        phase: RoundPhase,
    },
    #[error("card slot {0} doesn't exist")]
    InvalidCardIndex(usize),
    #[error("wager must be positive")]
    InvalidWager,
    #[error("opponent already played this round")]
    OpponentAlreadyFinal,
    #[error("still waiting on the opponent's hand")]
    OpponentPending,
}

impl From<DeckExhausted> for RoundError {
    fn from(_: DeckExhausted) -> Self {
        Self::DeckExhausted
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum RoundPhase {
    Created,
    Dealt,
    ExchangeApplied,
    Settled,
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Created => "waiting for the deal",
            Self::Dealt => "dealt",
            Self::ExchangeApplied => "past the exchange",
            Self::Settled => "settled",
        };
        write!(f, "{repr}")
    }
}

/// How the ten opening cards leave the deck.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DealOrder {
    /// Player, opponent, player, opponent, ...
    #[default]
    Alternating,
    /// The player's five, then the opponent's five. The network host
    /// deals this way.
    Blocks,
}

/// How a settled round came out, seen from the player's seat.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Outcome {
    /// `None` for an exact tie.
    pub winner: Option<Seat>,
    pub player_rank: HandRank,
    pub opponent_rank: HandRank,
    pub wager: Coins,
    /// Coins moved from the loser to the winner.
    pub amount: Coins,
}

impl Outcome {
    /// The same outcome seen from the other seat.
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            winner: self.winner.map(Seat::other),
            player_rank: self.opponent_rank.clone(),
            opponent_rank: self.player_rank.clone(),
            wager: self.wager,
            amount: self.amount,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (mine, theirs) = (&self.player_rank, &self.opponent_rank);
        match self.winner {
            Some(Seat::Player) => write!(f, "you win ({mine} vs {theirs}), +{}", self.amount),
            Some(Seat::Opponent) => write!(f, "you lose ({theirs} vs {mine}), -{}", self.amount),
            None => write!(f, "perfect tie ({mine}), wager returned"),
        }
    }
}

#[derive(Debug)]
pub struct Round<P = ThresholdPolicy> {
    deck: Deck,
    player: Player,
    opponent: Player,
    phase: RoundPhase,
    opponent_final: bool,
    policy: P,
    outcome: Option<Outcome>,
}

impl Round {
    /// A round with the default opponent policy.
    #[must_use]
    pub fn new(player: Player, opponent: Player, deck: Deck) -> Self {
        Self::with_policy(player, opponent, deck, ThresholdPolicy::default())
    }

    /// A round that starts already dealt, holding `hand` for the player.
    /// The opponent's hand arrives later through
    /// [`Round::accept_opponent_hand`].
    #[must_use]
    pub fn from_dealt(player: Player, opponent: Player, deck: Deck, hand: Hand) -> Self {
        let mut round = Self::new(player, opponent, deck);
        round.install_dealt(hand);
        round
    }
}

impl<P: DiscardPolicy> Round<P> {
    pub fn with_policy(mut player: Player, mut opponent: Player, deck: Deck, policy: P) -> Self {
        player.hand = None;
        opponent.hand = None;
        Self {
            deck,
            player,
            opponent,
            phase: RoundPhase::Created,
            opponent_final: false,
            policy,
            outcome: None,
        }
    }

    fn require(&self, action: &'static str, allowed: &[RoundPhase]) -> Result<(), RoundError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(RoundError::InvalidPhase {
                action,
                phase: self.phase,
            })
        }
    }

    /// Deal five cards to each player, alternating.
    ///
    /// # Errors
    ///
    /// Fails unless the round was just created.
    pub fn deal(&mut self) -> Result<(), RoundError> {
        self.deal_in(DealOrder::Alternating)
    }

    /// Reshuffle and deal five cards to each player in the given order.
    /// The opponent's cards are dealt face down.
    ///
    /// # Errors
    ///
    /// Fails unless the round was just created.
    pub fn deal_in(&mut self, order: DealOrder) -> Result<(), RoundError> {
        self.require("deal", &[RoundPhase::Created])?;
        self.deck.reshuffle();

        let placeholder = Card(Value::Seven, Suit::Heart);
        let mut player_cards = [placeholder; HAND_SIZE];
        let mut opponent_cards = [placeholder; HAND_SIZE];
        match order {
            DealOrder::Alternating => {
                for slot in 0..HAND_SIZE {
                    player_cards[slot] = self.deck.draw()?;
                    opponent_cards[slot] = self.deck.draw()?;
                }
            }
            DealOrder::Blocks => {
                for card in &mut player_cards {
                    *card = self.deck.draw()?;
                }
                for card in &mut opponent_cards {
                    *card = self.deck.draw()?;
                }
            }
        }

        self.player.hand = Some(Hand::new(player_cards));
        self.opponent.hand = Some(Hand::face_down(opponent_cards));
        self.phase = RoundPhase::Dealt;
        debug!("dealt {} to {}", Hand::new(player_cards), self.player.name);
        Ok(())
    }

    /// Take a hand dealt somewhere else instead of dealing here. The deck
    /// is rebuilt without the cards in `hand`, and the opponent's hand
    /// stays empty until [`Round::accept_opponent_hand`].
    ///
    /// # Errors
    ///
    /// Fails unless the round was just created.
    pub fn take_dealt_hand(&mut self, hand: Hand) -> Result<(), RoundError> {
        self.require("take a dealt hand", &[RoundPhase::Created])?;
        self.install_dealt(hand);
        Ok(())
    }

    fn install_dealt(&mut self, mut hand: Hand) {
        self.deck.reshuffle_without(hand.cards());
        hand.reveal();
        debug!("{} was dealt {hand}", self.player.name);
        self.player.hand = Some(hand);
        self.opponent.hand = None;
        self.phase = RoundPhase::Dealt;
    }

    /// Replace each listed slot of the player's hand with a fresh card.
    /// An empty set stands pat. Allowed once per round.
    ///
    /// # Errors
    ///
    /// Fails if the round isn't freshly dealt, if a slot is out of range
    /// (checked before anything changes), or if the deck runs dry.
    pub fn exchange_player_cards(&mut self, slots: &BTreeSet<usize>) -> Result<(), RoundError> {
        self.require("exchange cards", &[RoundPhase::Dealt])?;
        if let Some(&slot) = slots.iter().find(|&&slot| slot >= HAND_SIZE) {
            return Err(RoundError::InvalidCardIndex(slot));
        }
        let Some(hand) = self.player.hand.as_mut() else {
            return Err(RoundError::InvalidPhase {
                action: "exchange cards",
                phase: self.phase,
            });
        };
        for &slot in slots {
            hand.replace(slot, self.deck.draw()?);
        }
        self.phase = RoundPhase::ExchangeApplied;
        debug!("{} exchanged {} card(s)", self.player.name, slots.len());
        Ok(())
    }

    /// Keep the current hand.
    ///
    /// # Errors
    ///
    /// Same as [`Round::exchange_player_cards`].
    pub fn stand(&mut self) -> Result<(), RoundError> {
        self.exchange_player_cards(&BTreeSet::new())
    }

    fn check_opponent_turn(&self, action: &'static str) -> Result<(), RoundError> {
        self.require(action, &[RoundPhase::Dealt, RoundPhase::ExchangeApplied])?;
        if self.opponent_final {
            return Err(RoundError::OpponentAlreadyFinal);
        }
        Ok(())
    }

    /// Let the opponent policy redraw the opponent's hand. Returns the
    /// slots that were replaced.
    ///
    /// # Errors
    ///
    /// Fails outside the exchange phase, if the opponent already played,
    /// or if the deck runs dry.
    pub fn run_opponent_policy(&mut self) -> Result<BTreeSet<usize>, RoundError> {
        self.check_opponent_turn("run the opponent")?;
        let Some(hand) = self.opponent.hand.as_mut() else {
            return Err(RoundError::OpponentPending);
        };
        let discards = self.policy.choose_discards(hand);
        for &slot in &discards {
            hand.replace(slot, self.deck.draw()?);
        }
        self.opponent_final = true;
        debug!("{} exchanged {} card(s)", self.opponent.name, discards.len());
        Ok(discards)
    }

    /// Take the opponent's final hand from outside, in place of running
    /// the policy. The hand stays face down until settlement.
    ///
    /// # Errors
    ///
    /// Fails outside the exchange phase or if the opponent already played.
    pub fn accept_opponent_hand(&mut self, mut hand: Hand) -> Result<(), RoundError> {
        self.check_opponent_turn("accept the opponent's hand")?;
        hand.conceal();
        self.opponent.hand = Some(hand);
        self.opponent_final = true;
        Ok(())
    }

    /// Compare both hands and move coins. The player's balance is checked
    /// against the wager before anything changes. A win moves
    /// `wager x multiplier` of the winning category, capped at what the
    /// loser has left. A tie moves nothing.
    ///
    /// # Errors
    ///
    /// Fails unless both hands are final, on a zero wager, or when the
    /// wager exceeds the player's balance. Nothing changes on failure.
    pub fn settle(&mut self, wager: Coins) -> Result<Outcome, RoundError> {
        self.require("settle", &[RoundPhase::ExchangeApplied])?;
        if !self.opponent_final {
            return Err(RoundError::OpponentPending);
        }
        if wager == 0 {
            return Err(RoundError::InvalidWager);
        }
        if wager > self.player.balance {
            return Err(RoundError::InsufficientBalance {
                available: self.player.balance,
                required: wager,
            });
        }
        let (Some(player_hand), Some(opponent_hand)) =
            (self.player.hand.as_ref(), self.opponent.hand.as_mut())
        else {
            return Err(RoundError::OpponentPending);
        };

        let player_rank = eval(player_hand);
        let opponent_rank = eval(opponent_hand);
        opponent_hand.reveal();

        let (winner, amount) = match payout(wager, &player_rank, &opponent_rank) {
            Some((Seat::Player, amount)) => {
                let amount = amount.min(self.opponent.balance);
                self.opponent.balance -= amount;
                self.player.balance += amount;
                (Some(Seat::Player), amount)
            }
            Some((Seat::Opponent, amount)) => {
                let amount = amount.min(self.player.balance);
                self.player.balance -= amount;
                self.opponent.balance += amount;
                (Some(Seat::Opponent), amount)
            }
            None => (None, 0),
        };

        let outcome = Outcome {
            winner,
            player_rank,
            opponent_rank,
            wager,
            amount,
        };
        info!(
            "{} vs {}: {outcome} (balances {} / {})",
            self.player.name, self.opponent.name, self.player.balance, self.opponent.balance
        );
        self.phase = RoundPhase::Settled;
        self.outcome = Some(outcome.clone());
        Ok(outcome)
    }

    #[must_use]
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[must_use]
    pub fn opponent(&self) -> &Player {
        &self.opponent
    }

    #[must_use]
    pub fn opponent_final(&self) -> bool {
        self.opponent_final
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// The player's current rank. Never computed for the opponent, whose
    /// hand is hidden until settlement.
    #[must_use]
    pub fn player_rank(&self) -> Option<HandRank> {
        self.player.hand.as_ref().map(eval)
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[cfg(test)]
    pub(crate) fn deck_mut(&mut self) -> &mut Deck {
        &mut self.deck
    }

    /// Clear both hands and go back to `Created`, keeping balances, deck
    /// and policy for the next round.
    pub fn reset(&mut self) {
        self.player.hand = None;
        self.opponent.hand = None;
        self.phase = RoundPhase::Created;
        self.opponent_final = false;
        self.outcome = None;
    }

    /// Hand back both players so their balances carry into the next round.
    #[must_use]
    pub fn into_players(self) -> (Player, Player) {
        (self.player, self.opponent)
    }
}
