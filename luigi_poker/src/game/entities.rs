use log::error;
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of cards in a hand.
pub const HAND_SIZE: usize = 5;

/// Number of cards in a full deck (8 values x 4 suits).
pub const DECK_SIZE: usize = 32;

/// Both players start with this many coins when nothing was saved.
pub const DEFAULT_BALANCE: Coins = 100;

/// Type alias for whole coins. Balances, wagers, and payouts are all
/// represented as whole coins.
pub type Coins = u32;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Heart,
    Diamond,
    Club,
    Spade,
}

impl Suit {
    pub const ALL: [Self; 4] = [Self::Heart, Self::Diamond, Self::Club, Self::Spade];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Heart => "♥",
            Self::Diamond => "♦",
            Self::Club => "♣",
            Self::Spade => "♠",
        };
        write!(f, "{repr}")
    }
}

/// Card values of the short deck, lowest first. The deck starts at 7, so
/// the rank index runs 0 (seven) through 7 (ace) without gaps.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Value {
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Value {
    pub const ALL: [Self; 8] = [
        Self::Seven,
        Self::Eight,
        Self::Nine,
        Self::Ten,
        Self::Jack,
        Self::Queen,
        Self::King,
        Self::Ace,
    ];

    /// Ascending rank index, 0 for a seven and 7 for an ace.
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::Ten => "10",
            Self::Jack => "J",
            Self::Queen => "Q",
            Self::King => "K",
            Self::Ace => "A",
        };
        write!(f, "{repr}")
    }
}

/// A card is a value and a suit. Cards are plain values; two cards with
/// the same value and suit are the same card.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Value, pub Suit);

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = format!("{}{}", self.0, self.1);
        write!(f, "{repr:>3}")
    }
}

#[derive(Debug, Error, Eq, PartialEq)]
#[error("deck exhausted")]
pub struct DeckExhausted;

/// The 32-card deck. Cards are drawn from the back.
#[derive(Clone, Debug)]
pub struct Deck {
    cards: Vec<Card>,
    rng: StdRng,
}

impl Deck {
    /// Every card in canonical order: value-major, suits in
    /// heart/diamond/club/spade order.
    fn canonical() -> Vec<Card> {
        Value::ALL
            .into_iter()
            .flat_map(|value| Suit::ALL.into_iter().map(move |suit| Card(value, suit)))
            .collect()
    }

    /// A fresh, shuffled deck.
    #[must_use]
    pub fn new() -> Self {
        let mut deck = Self::unshuffled();
        deck.shuffle();
        deck
    }

    /// A fresh deck whose shuffles are driven by a seeded RNG so
    /// deals can be replayed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        let mut deck = Self {
            cards: Self::canonical(),
            rng: StdRng::seed_from_u64(seed),
        };
        deck.shuffle();
        deck
    }

    /// A deck left in canonical order.
    #[must_use]
    pub fn unshuffled() -> Self {
        Self {
            cards: Self::canonical(),
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut self.rng);
    }

    /// Rebuild all 32 cards and shuffle them so nothing leaks from the
    /// previous round.
    pub fn reshuffle(&mut self) {
        self.cards = Self::canonical();
        self.shuffle();
    }

    /// Rebuild the deck minus the cards someone is already holding, then
    /// shuffle.
    pub fn reshuffle_without(&mut self, held: &[Card]) {
        self.cards = Self::canonical();
        self.cards.retain(|card| !held.contains(card));
        self.shuffle();
    }

    /// Remove and return the card at the back of the deck.
    ///
    /// # Errors
    ///
    /// Returns [`DeckExhausted`] if there are no cards left. A round never
    /// draws more than 20 cards, so this points at a bug or a desync.
    pub fn draw(&mut self) -> Result<Card, DeckExhausted> {
        self.cards.pop().ok_or_else(|| {
            error!("drew from an exhausted deck; the round can't continue");
            DeckExhausted
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a hand's cards may be shown. The opponent's hand stays face
/// down until the round is settled.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Visibility {
    #[default]
    FaceUp,
    FaceDown,
}

/// Five cards owned by one player. Slots are replaced individually
/// during an exchange.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Hand {
    cards: [Card; HAND_SIZE],
    pub visibility: Visibility,
}

impl Hand {
    #[must_use]
    pub fn new(cards: [Card; HAND_SIZE]) -> Self {
        Self {
            cards,
            visibility: Visibility::FaceUp,
        }
    }

    #[must_use]
    pub fn face_down(cards: [Card; HAND_SIZE]) -> Self {
        Self {
            cards,
            visibility: Visibility::FaceDown,
        }
    }

    #[must_use]
    pub fn cards(&self) -> &[Card; HAND_SIZE] {
        &self.cards
    }

    #[must_use]
    pub fn card(&self, slot: usize) -> Option<Card> {
        self.cards.get(slot).copied()
    }

    /// Put `card` in `slot`, returning the card that was there.
    pub fn replace(&mut self, slot: usize, card: Card) -> Option<Card> {
        self.cards
            .get_mut(slot)
            .map(|current| std::mem::replace(current, card))
    }

    #[must_use]
    pub fn is_face_down(&self) -> bool {
        self.visibility == Visibility::FaceDown
    }

    pub fn reveal(&mut self) {
        self.visibility = Visibility::FaceUp;
    }

    pub fn conceal(&mut self) {
        self.visibility = Visibility::FaceDown;
    }
}

impl From<[Card; HAND_SIZE]> for Hand {
    fn from(value: [Card; HAND_SIZE]) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = self
            .cards
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{repr}")
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Player {
    pub name: String,
    pub balance: Coins,
    /// Empty until the round deals.
    pub hand: Option<Hand>,
}

impl Player {
    #[must_use]
    pub fn new(name: &str, balance: Coins) -> Self {
        Self {
            name: name.to_string(),
            balance,
            hand: None,
        }
    }
}

/// The two balances carried from one round to the next.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Balances {
    pub player: Coins,
    pub opponent: Coins,
}

impl Balances {
    #[must_use]
    pub const fn new(player: Coins, opponent: Coins) -> Self {
        Self { player, opponent }
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        u64::from(self.player) + u64::from(self.opponent)
    }
}

impl Default for Balances {
    fn default() -> Self {
        Self::new(DEFAULT_BALANCE, DEFAULT_BALANCE)
    }
}

impl fmt::Display for Balances {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.player, self.opponent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    // === Card Tests ===

    #[test]
    fn test_value_indices_are_dense() {
        for (i, value) in Value::ALL.into_iter().enumerate() {
            assert_eq!(value.index() as usize, i);
        }
        assert!(Value::Ace > Value::King);
        assert!(Value::Seven < Value::Eight);
    }

    #[test]
    fn test_card_display() {
        assert_eq!(Card(Value::Ace, Suit::Spade).to_string(), " A♠");
        assert_eq!(Card(Value::Ten, Suit::Heart).to_string(), "10♥");
        assert_eq!(Card(Value::Seven, Suit::Club).to_string(), " 7♣");
    }

    #[test]
    fn test_card_equality() {
        assert_eq!(Card(Value::Jack, Suit::Diamond), Card(Value::Jack, Suit::Diamond));
        assert_ne!(Card(Value::Jack, Suit::Diamond), Card(Value::Jack, Suit::Heart));
    }

    // === Deck Tests ===

    #[test]
    fn test_deck_initialization() {
        let deck = Deck::new();
        assert_eq!(deck.len(), DECK_SIZE);
    }

    #[test]
    fn test_unshuffled_deck_draws_canonical_order_from_the_back() {
        let mut deck = Deck::unshuffled();
        assert_eq!(deck.draw(), Ok(Card(Value::Ace, Suit::Spade)));
        assert_eq!(deck.draw(), Ok(Card(Value::Ace, Suit::Club)));
        assert_eq!(deck.len(), DECK_SIZE - 2);
    }

    #[test]
    fn test_deck_deal_all_unique_then_exhausted() {
        let mut deck = Deck::unshuffled();
        let mut seen = HashSet::new();
        for _ in 0..DECK_SIZE {
            assert!(seen.insert(deck.draw().unwrap()));
        }
        assert_eq!(seen.len(), DECK_SIZE);
        for value in Value::ALL {
            for suit in Suit::ALL {
                assert!(seen.contains(&Card(value, suit)));
            }
        }
        assert!(deck.is_empty());
        assert_eq!(deck.draw(), Err(DeckExhausted));
    }

    #[test]
    fn test_reshuffle_restores_full_deck() {
        let mut deck = Deck::new();
        for _ in 0..20 {
            deck.draw().unwrap();
        }
        deck.reshuffle();
        assert_eq!(deck.len(), DECK_SIZE);
        let unique: HashSet<_> = (0..DECK_SIZE).map(|_| deck.draw().unwrap()).collect();
        assert_eq!(unique.len(), DECK_SIZE);
    }

    #[test]
    fn test_reshuffle_without_held_cards() {
        let held = [
            Card(Value::Ace, Suit::Spade),
            Card(Value::Seven, Suit::Heart),
            Card(Value::Ten, Suit::Club),
        ];
        let mut deck = Deck::seeded(3);
        deck.reshuffle_without(&held);
        assert_eq!(deck.len(), DECK_SIZE - held.len());
        while let Ok(card) = deck.draw() {
            assert!(!held.contains(&card));
        }
    }

    #[test]
    fn test_seeded_decks_shuffle_identically() {
        let mut a = Deck::seeded(42);
        let mut b = Deck::seeded(42);
        for _ in 0..DECK_SIZE {
            assert_eq!(a.draw(), b.draw());
        }
    }

    // === Hand Tests ===

    fn sample_hand() -> Hand {
        Hand::new([
            Card(Value::Seven, Suit::Heart),
            Card(Value::Eight, Suit::Heart),
            Card(Value::Nine, Suit::Heart),
            Card(Value::Ten, Suit::Heart),
            Card(Value::Jack, Suit::Heart),
        ])
    }

    #[test]
    fn test_hand_replace_slot() {
        let mut hand = sample_hand();
        let old = hand.replace(2, Card(Value::Ace, Suit::Club));
        assert_eq!(old, Some(Card(Value::Nine, Suit::Heart)));
        assert_eq!(hand.card(2), Some(Card(Value::Ace, Suit::Club)));
        assert_eq!(hand.replace(5, Card(Value::Ace, Suit::Club)), None);
    }

    #[test]
    fn test_hand_visibility() {
        let mut hand = Hand::face_down(*sample_hand().cards());
        assert!(hand.is_face_down());
        hand.reveal();
        assert!(!hand.is_face_down());
        hand.conceal();
        assert_eq!(hand.visibility, Visibility::FaceDown);
    }

    #[test]
    fn test_hand_display() {
        assert_eq!(sample_hand().to_string(), " 7♥  8♥  9♥ 10♥  J♥");
    }

    // === Balance Tests ===

    #[test]
    fn test_balances_default() {
        let balances = Balances::default();
        assert_eq!(balances, Balances::new(100, 100));
        assert_eq!(balances.total(), 200);
    }

    #[test]
    fn test_player_new_has_no_hand() {
        let player = Player::new("You", 50);
        assert_eq!(player.balance, 50);
        assert!(player.hand.is_none());
    }
}
