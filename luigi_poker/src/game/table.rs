//! A solo table: you against Luigi, with a wager, a card selection and
//! balances that survive between sessions.
//!
//! The table is the boundary a front-end talks to. It takes intents
//! (deal, toggle a card, exchange, raise, validate, ...), refuses the
//! ones that don't make sense right now, and reports what happened as
//! [`TableEvent`]s. Front-ends render [`TableView`]s and never see the
//! opponent's cards before the round is settled.

use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeSet, VecDeque},
    fmt,
    time::Duration,
};
use thiserror::Error;

use super::{
    entities::{Balances, Card, Coins, Deck, HAND_SIZE, Hand, Player, Visibility},
    functional::{HandRank, Seat, eval},
    round::{Outcome, Round, RoundError, RoundPhase},
};
use crate::{config::GameConfig, store::BalanceStore};

pub const PLAYER_NAME: &str = "You";
pub const OPPONENT_NAME: &str = "Luigi";

#[derive(Debug, Eq, Error, PartialEq)]
pub enum TableError {
    #[error("the exchange is over for this round")]
    ExchangeClosed,
    #[error("the wager can't change now")]
    WagerLocked,
    #[error("the wager can't go above ${max}")]
    WagerAboveMaximum { max: Coins },
    #[error("the wager can't go below ${min}")]
    WagerBelowMinimum { min: Coins },
    #[error("not enough coins to wager ${wager}")]
    InsufficientFunds { wager: Coins },
    #[error("game over")]
    GameOver,
    #[error(transparent)]
    Round(#[from] RoundError),
}

/// Things that happened at the table, oldest first.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum TableEvent {
    Dealt,
    /// The player replaced this many cards.
    CardsExchanged(usize),
    /// Luigi replaced this many cards.
    OpponentDrew(usize),
    Settled(Outcome),
    /// One side ran out of coins. `winner` took everything.
    GameOver { winner: Seat },
}

impl fmt::Display for TableEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dealt => write!(f, "new round, pick the cards to exchange"),
            Self::CardsExchanged(n) => write!(f, "you exchanged {n} card(s)"),
            Self::OpponentDrew(0) => write!(f, "{OPPONENT_NAME} stands pat"),
            Self::OpponentDrew(n) => write!(f, "{OPPONENT_NAME} draws {n}"),
            Self::Settled(outcome) => write!(f, "{outcome}"),
            Self::GameOver {
                winner: Seat::Player,
            } => write!(f, "victory, {OPPONENT_NAME} is broke"),
            Self::GameOver {
                winner: Seat::Opponent,
            } => write!(f, "game over, {OPPONENT_NAME} took all your coins"),
        }
    }
}

/// A hand as a front-end may show it. Face-down cards and the rank of a
/// face-down hand are withheld.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HandView {
    pub cards: Vec<Option<Card>>,
    pub visibility: Visibility,
    pub rank: Option<HandRank>,
}

impl From<&Hand> for HandView {
    fn from(hand: &Hand) -> Self {
        if hand.is_face_down() {
            Self {
                cards: vec![None; HAND_SIZE],
                visibility: Visibility::FaceDown,
                rank: None,
            }
        } else {
            Self {
                cards: hand.cards().iter().copied().map(Some).collect(),
                visibility: Visibility::FaceUp,
                rank: Some(eval(hand)),
            }
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SeatView {
    pub name: String,
    pub balance: Coins,
    pub hand: Option<HandView>,
}

impl From<&Player> for SeatView {
    fn from(player: &Player) -> Self {
        Self {
            name: player.name.clone(),
            balance: player.balance,
            hand: player.hand.as_ref().map(HandView::from),
        }
    }
}

/// Everything a front-end needs to draw the table.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TableView {
    pub player: SeatView,
    pub opponent: SeatView,
    pub wager: Coins,
    pub selection: BTreeSet<usize>,
    pub phase: RoundPhase,
    pub outcome: Option<Outcome>,
    pub game_over: bool,
}

#[derive(Debug)]
pub struct SoloTable<S> {
    config: GameConfig,
    store: S,
    round: Round,
    wager: Coins,
    selection: BTreeSet<usize>,
    events: VecDeque<TableEvent>,
    game_over: bool,
}

impl<S: BalanceStore> SoloTable<S> {
    /// Open a table with balances loaded from `store`.
    #[must_use]
    pub fn new(config: GameConfig, store: S) -> Self {
        Self::with_deck(config, store, Deck::new())
    }

    /// Same as [`SoloTable::new`] with a specific deck, usually a seeded
    /// one.
    #[must_use]
    pub fn with_deck(config: GameConfig, store: S, deck: Deck) -> Self {
        let mut balances = store.load();
        if balances.player == 0 || balances.opponent == 0 {
            info!("saved game ({balances}) was over, starting a new one");
            balances = Balances::new(config.starting_balance, config.starting_balance);
        }
        let round = Round::new(
            Player::new(PLAYER_NAME, balances.player),
            Player::new(OPPONENT_NAME, balances.opponent),
            deck,
        );
        Self {
            wager: config.initial_wager,
            config,
            store,
            round,
            selection: BTreeSet::new(),
            events: VecDeque::new(),
            game_over: false,
        }
    }

    /// Deal a new round. A settled round is cleared first.
    ///
    /// # Errors
    ///
    /// Fails once the game is over or while a round is in progress.
    pub fn deal_round(&mut self) -> Result<(), TableError> {
        if self.game_over {
            return Err(TableError::GameOver);
        }
        if self.round.phase() == RoundPhase::Settled {
            self.round.reset();
        }
        self.round.deal()?;
        self.selection.clear();

        // Carry the wager over, but never above what the player holds.
        let balance = self.round.player().balance;
        self.wager = self.wager.min(balance);
        self.events.push_back(TableEvent::Dealt);
        Ok(())
    }

    /// Select the card in `slot` for exchange, or unselect it.
    ///
    /// # Errors
    ///
    /// Fails outside the exchange phase or for a slot past the hand.
    pub fn toggle_selection(&mut self, slot: usize) -> Result<(), TableError> {
        self.require_exchange_open()?;
        if slot >= HAND_SIZE {
            return Err(RoundError::InvalidCardIndex(slot).into());
        }
        if !self.selection.remove(&slot) {
            self.selection.insert(slot);
        }
        Ok(())
    }

    /// Exchange the selected cards. Nothing selected means standing pat.
    ///
    /// # Errors
    ///
    /// Fails outside the exchange phase. A dry deck abandons the round.
    pub fn commit_exchange(&mut self) -> Result<(), TableError> {
        self.require_exchange_open()?;
        if let Err(error) = self.round.exchange_player_cards(&self.selection) {
            return Err(self.abandon_on_dry_deck(error));
        }
        let exchanged = self.selection.len();
        self.selection.clear();
        self.events.push_back(TableEvent::CardsExchanged(exchanged));
        Ok(())
    }

    /// Keep the hand as dealt.
    ///
    /// # Errors
    ///
    /// Fails outside the exchange phase.
    pub fn commit_stand(&mut self) -> Result<(), TableError> {
        self.require_exchange_open()?;
        self.selection.clear();
        self.commit_exchange()
    }

    /// Raise the wager by one step. Only before the exchange.
    ///
    /// # Errors
    ///
    /// Fails after the exchange, above the maximum wager, or above the
    /// player's balance.
    pub fn raise_wager(&mut self) -> Result<Coins, TableError> {
        if self.round.phase() != RoundPhase::Dealt {
            return Err(TableError::WagerLocked);
        }
        let raised = self.wager.saturating_add(self.config.wager_step);
        if raised > self.config.max_wager {
            return Err(TableError::WagerAboveMaximum {
                max: self.config.max_wager,
            });
        }
        if raised > self.round.player().balance {
            return Err(TableError::InsufficientFunds { wager: raised });
        }
        self.wager = raised;
        Ok(raised)
    }

    /// Lower the wager by one step. Only before the exchange.
    ///
    /// # Errors
    ///
    /// Fails after the exchange or below the minimum wager.
    pub fn lower_wager(&mut self) -> Result<Coins, TableError> {
        if self.round.phase() != RoundPhase::Dealt {
            return Err(TableError::WagerLocked);
        }
        let floor = self.wager_floor();
        let lowered = self.wager.saturating_sub(self.config.wager_step).max(floor);
        if lowered == self.wager {
            return Err(TableError::WagerBelowMinimum { min: floor });
        }
        self.wager = lowered;
        Ok(lowered)
    }

    /// Finish the round: stand if the player hasn't exchanged, let Luigi
    /// play, settle, and save the balances.
    ///
    /// # Errors
    ///
    /// Fails before the deal, after settlement, or when the wager exceeds
    /// the player's balance. The balance is checked before standing, so
    /// lowering the wager and validating again works.
    pub fn validate(&mut self) -> Result<Outcome, TableError> {
        if self.game_over {
            return Err(TableError::GameOver);
        }
        if self.round.phase() == RoundPhase::Dealt {
            if self.wager > self.round.player().balance {
                warn!("wager ${} is above the player's balance", self.wager);
                return Err(TableError::InsufficientFunds { wager: self.wager });
            }
            self.commit_stand()?;
        }
        if !self.round.opponent_final() {
            let drawn = match self.round.run_opponent_policy() {
                Ok(drawn) => drawn,
                Err(error) => return Err(self.abandon_on_dry_deck(error)),
            };
            self.events.push_back(TableEvent::OpponentDrew(drawn.len()));
        }
        let outcome = match self.round.settle(self.wager) {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!("can't settle: {error}");
                return Err(error.into());
            }
        };

        self.store.save(self.balances());
        self.events.push_back(TableEvent::Settled(outcome.clone()));

        let balances = self.balances();
        let broke = if balances.player == 0 {
            Some(Seat::Opponent)
        } else if balances.opponent == 0 {
            Some(Seat::Player)
        } else {
            None
        };
        if let Some(winner) = broke {
            info!("game over ({balances})");
            self.game_over = true;
            self.events.push_back(TableEvent::GameOver { winner });
        }
        Ok(outcome)
    }

    fn require_exchange_open(&self) -> Result<(), TableError> {
        match self.round.phase() {
            RoundPhase::Dealt => Ok(()),
            RoundPhase::ExchangeApplied | RoundPhase::Settled => Err(TableError::ExchangeClosed),
            phase @ RoundPhase::Created => Err(RoundError::InvalidPhase {
                action: "exchange cards",
                phase,
            }
            .into()),
        }
    }

    /// A dry deck leaves the round unplayable. Drop it without moving
    /// coins so the next deal starts clean.
    fn abandon_on_dry_deck(&mut self, error: RoundError) -> TableError {
        if matches!(error, RoundError::DeckExhausted) {
            error!("deck ran dry mid-round, abandoning it");
            self.round.reset();
            self.selection.clear();
        }
        error.into()
    }

    fn wager_floor(&self) -> Coins {
        self.config
            .min_wager
            .min(self.round.player().balance)
            .max(1)
    }

    pub fn drain_events(&mut self) -> VecDeque<TableEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn view(&self) -> TableView {
        TableView {
            player: SeatView::from(self.round.player()),
            opponent: SeatView::from(self.round.opponent()),
            wager: self.wager,
            selection: self.selection.clone(),
            phase: self.round.phase(),
            outcome: self.round.outcome().cloned(),
            game_over: self.game_over,
        }
    }

    #[must_use]
    pub fn balances(&self) -> Balances {
        Balances::new(self.round.player().balance, self.round.opponent().balance)
    }

    #[must_use]
    pub fn wager(&self) -> Coins {
        self.wager
    }

    #[must_use]
    pub fn phase(&self) -> RoundPhase {
        self.round.phase()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// How long a front-end waits after settlement before dealing again.
    #[must_use]
    pub fn next_round_delay(&self) -> Duration {
        self.config.next_round_delay()
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}
