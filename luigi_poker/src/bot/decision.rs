//! Discard decisions for the scripted opponent.

use std::collections::BTreeSet;

use crate::game::{
    entities::{HAND_SIZE, Hand},
    functional::{Category, eval},
};

/// Decides which hand slots an automated player throws away during the
/// exchange phase.
pub trait DiscardPolicy {
    /// Slot indices (0..5) to replace with fresh draws.
    fn choose_discards(&self, hand: &Hand) -> BTreeSet<usize>;
}

/// Luigi's heuristic: keep anything at or above a threshold category,
/// otherwise throw away a fixed number of the lowest cards.
///
/// # Examples
///
/// ```
/// use luigi_poker::bot::decision::{DiscardPolicy, ThresholdPolicy};
/// use luigi_poker::game::entities::{Card, Hand, Suit, Value};
///
/// let hand = Hand::new([
///     Card(Value::Ace, Suit::Spade),
///     Card(Value::Seven, Suit::Heart),
///     Card(Value::King, Suit::Club),
///     Card(Value::Eight, Suit::Diamond),
///     Card(Value::Ten, Suit::Spade),
/// ]);
/// let discards = ThresholdPolicy::default().choose_discards(&hand);
/// assert_eq!(discards.into_iter().collect::<Vec<_>>(), vec![1, 3, 4]);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ThresholdPolicy {
    /// Hands of this category or better are kept whole.
    pub threshold: Category,

    /// How many of the lowest cards to throw away from a weaker hand.
    pub discards: usize,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            threshold: Category::Straight,
            discards: 3,
        }
    }
}

impl DiscardPolicy for ThresholdPolicy {
    fn choose_discards(&self, hand: &Hand) -> BTreeSet<usize> {
        if eval(hand).category >= self.threshold {
            return BTreeSet::new();
        }
        let cards = hand.cards();
        let mut slots: Vec<usize> = (0..HAND_SIZE).collect();
        // Stable sort, so equal values keep slot order.
        slots.sort_by_key(|&slot| cards[slot].0);
        slots.into_iter().take(self.discards).collect()
    }
}

/// Slots the default opponent discards from `hand`.
#[must_use]
pub fn choose_discards(hand: &Hand) -> BTreeSet<usize> {
    ThresholdPolicy::default().choose_discards(hand)
}
