//! Pure hand evaluation and payout math.

use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

use super::entities::{Card, Coins, HAND_SIZE, Hand, Value};

/// The nine hand categories, weakest first.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Category {
    HighCard,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl Category {
    pub const ALL: [Self; 9] = [
        Self::HighCard,
        Self::Pair,
        Self::TwoPair,
        Self::ThreeOfAKind,
        Self::Straight,
        Self::Flush,
        Self::FullHouse,
        Self::FourOfAKind,
        Self::StraightFlush,
    ];

    /// Category ordinal, 0 for a high card through 8 for a straight flush.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// What a winning hand of this category multiplies the wager by.
    #[must_use]
    pub const fn multiplier(self) -> Coins {
        match self {
            Self::HighCard => 1,
            Self::Pair => 2,
            Self::TwoPair => 3,
            Self::ThreeOfAKind => 4,
            Self::Straight => 5,
            Self::Flush => 6,
            Self::FullHouse => 8,
            Self::FourOfAKind => 10,
            Self::StraightFlush => 20,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::HighCard => "High Card",
            Self::Pair => "Pair",
            Self::TwoPair => "Two Pair",
            Self::ThreeOfAKind => "Three of a Kind",
            Self::Straight => "Straight",
            Self::Flush => "Flush",
            Self::FullHouse => "Full House",
            Self::FourOfAKind => "Four of a Kind",
            Self::StraightFlush => "Straight Flush",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Result of evaluating a hand. Ordering compares the category first,
/// then the tie-break key lexicographically.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct HandRank {
    pub category: Category,
    /// Rank indices of each distinct value in the hand, most frequent
    /// first, higher value first among equal counts.
    pub key: Vec<u8>,
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category)
    }
}

/// Evaluate a hand.
#[must_use]
pub fn eval(hand: &Hand) -> HandRank {
    eval_cards(hand.cards())
}

/// Evaluate five cards. The result doesn't depend on card order.
#[must_use]
pub fn eval_cards(cards: &[Card; HAND_SIZE]) -> HandRank {
    let mut counts = [0u8; Value::ALL.len()];
    for card in cards {
        counts[card.0.index() as usize] += 1;
    }

    let mut indices: Vec<u8> = cards.iter().map(|card| card.0.index()).collect();
    indices.sort_unstable();
    let is_straight = indices.windows(2).all(|w| w[0] + 1 == w[1]);
    let is_flush = cards.iter().all(|card| card.1 == cards[0].1);

    // (count, rank index) for every value present, strongest first.
    let mut groups: Vec<(u8, u8)> = counts
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(idx, count)| (*count, idx as u8))
        .collect();
    groups.sort_unstable_by(|a, b| b.cmp(a));

    let has_count = |n: u8| groups.iter().any(|(count, _)| *count == n);
    let num_pairs = groups.iter().filter(|(count, _)| *count == 2).count();

    let category = if is_flush && is_straight {
        Category::StraightFlush
    } else if groups.len() == 2 {
        // Only 4+1 or 3+2 are possible here; check the quad first.
        if has_count(4) {
            Category::FourOfAKind
        } else {
            Category::FullHouse
        }
    } else if is_flush {
        Category::Flush
    } else if is_straight {
        Category::Straight
    } else if has_count(3) {
        Category::ThreeOfAKind
    } else if num_pairs == 2 {
        Category::TwoPair
    } else if has_count(2) {
        Category::Pair
    } else {
        Category::HighCard
    };

    HandRank {
        category,
        key: groups.into_iter().map(|(_, idx)| idx).collect(),
    }
}

/// Which side of a two-hand comparison came out ahead.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Seat {
    Player,
    Opponent,
}

impl Seat {
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Player => Self::Opponent,
            Self::Opponent => Self::Player,
        }
    }
}

/// Compare two ranks, returning the winning seat or `None` for an exact
/// tie (same category and same tie-break key).
#[must_use]
pub fn winner(player: &HandRank, opponent: &HandRank) -> Option<Seat> {
    match player.cmp(opponent) {
        Ordering::Greater => Some(Seat::Player),
        Ordering::Less => Some(Seat::Opponent),
        Ordering::Equal => None,
    }
}

/// The uncapped amount a win moves from loser to winner. Only the
/// winning hand's multiplier applies. Ties move nothing.
#[must_use]
pub fn payout(wager: Coins, player: &HandRank, opponent: &HandRank) -> Option<(Seat, Coins)> {
    winner(player, opponent).map(|seat| {
        let category = match seat {
            Seat::Player => player.category,
            Seat::Opponent => opponent.category,
        };
        (seat, wager.saturating_mul(category.multiplier()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::{Suit, Value::*};

    fn hand(cards: [(Value, Suit); 5]) -> [Card; 5] {
        cards.map(|(value, suit)| Card(value, suit))
    }

    #[test]
    fn test_straight_flush() {
        use Suit::Heart;
        let cards = hand([(Seven, Heart), (Eight, Heart), (Nine, Heart), (Ten, Heart), (Jack, Heart)]);
        let rank = eval_cards(&cards);
        assert_eq!(rank.category, Category::StraightFlush);
        assert_eq!(rank.category.ordinal(), 8);
    }

    #[test]
    fn test_four_of_a_kind() {
        use Suit::*;
        let cards = hand([(Ace, Spade), (Ace, Heart), (Ace, Diamond), (Ace, Club), (Seven, Spade)]);
        let rank = eval_cards(&cards);
        assert_eq!(rank.category, Category::FourOfAKind);
        assert_eq!(rank.key, vec![7, 0]);
    }

    #[test]
    fn test_full_house() {
        use Suit::*;
        let cards = hand([(Ace, Spade), (Ace, Heart), (Seven, Diamond), (Seven, Club), (Seven, Spade)]);
        let rank = eval_cards(&cards);
        assert_eq!(rank.category, Category::FullHouse);
        // The trips lead the key even though the pair is higher.
        assert_eq!(rank.key, vec![0, 7]);
    }

    #[test]
    fn test_flush_not_straight() {
        use Suit::Spade;
        let cards = hand([(Seven, Spade), (Nine, Spade), (Jack, Spade), (Queen, Spade), (Ace, Spade)]);
        assert_eq!(eval_cards(&cards).category, Category::Flush);
    }

    #[test]
    fn test_straight() {
        use Suit::*;
        let cards = hand([(Ten, Spade), (Jack, Heart), (Queen, Club), (King, Spade), (Ace, Diamond)]);
        let rank = eval_cards(&cards);
        assert_eq!(rank.category, Category::Straight);
        assert_eq!(rank.key, vec![7, 6, 5, 4, 3]);
    }

    #[test]
    fn test_no_wraparound_straight() {
        use Suit::*;
        let cards = hand([(Ace, Spade), (Seven, Heart), (Eight, Club), (Nine, Spade), (Ten, Diamond)]);
        assert_eq!(eval_cards(&cards).category, Category::HighCard);
    }

    #[test]
    fn test_three_of_a_kind() {
        use Suit::*;
        let cards = hand([(Nine, Spade), (Nine, Heart), (Nine, Club), (King, Spade), (Seven, Diamond)]);
        let rank = eval_cards(&cards);
        assert_eq!(rank.category, Category::ThreeOfAKind);
        assert_eq!(rank.key, vec![2, 6, 0]);
    }

    #[test]
    fn test_two_pair() {
        use Suit::*;
        let cards = hand([(Nine, Spade), (Nine, Heart), (King, Club), (King, Spade), (Seven, Diamond)]);
        let rank = eval_cards(&cards);
        assert_eq!(rank.category, Category::TwoPair);
        assert_eq!(rank.key, vec![6, 2, 0]);
    }

    #[test]
    fn test_pair() {
        use Suit::*;
        let cards = hand([(Queen, Spade), (Queen, Heart), (Seven, Club), (Ace, Spade), (Nine, Diamond)]);
        let rank = eval_cards(&cards);
        assert_eq!(rank.category, Category::Pair);
        assert_eq!(rank.key, vec![5, 7, 2, 0]);
    }

    #[test]
    fn test_high_card() {
        use Suit::*;
        let cards = hand([(Queen, Spade), (Ten, Heart), (Seven, Club), (Ace, Spade), (Nine, Diamond)]);
        assert_eq!(eval_cards(&cards).category, Category::HighCard);
    }

    #[test]
    fn test_order_independence() {
        use Suit::*;
        let mut cards = hand([(Ace, Spade), (Ace, Heart), (Seven, Diamond), (Seven, Club), (Seven, Spade)]);
        let expected = eval_cards(&cards);
        cards.reverse();
        assert_eq!(eval_cards(&cards), expected);
        cards.rotate_left(2);
        assert_eq!(eval_cards(&cards), expected);
    }

    #[test]
    fn test_rank_ordering_category_first() {
        let pair_of_aces = HandRank { category: Category::Pair, key: vec![7, 6, 5, 4] };
        let two_pair = HandRank { category: Category::TwoPair, key: vec![1, 0, 2] };
        assert!(two_pair > pair_of_aces);
    }

    #[test]
    fn test_rank_ordering_within_category() {
        let kings = HandRank { category: Category::Pair, key: vec![6, 7, 2, 0] };
        let queens = HandRank { category: Category::Pair, key: vec![5, 7, 6, 4] };
        assert_eq!(winner(&kings, &queens), Some(Seat::Player));
        assert_eq!(winner(&queens, &kings), Some(Seat::Opponent));
        assert_eq!(winner(&kings, &kings.clone()), None);
    }

    #[test]
    fn test_multiplier_table() {
        let multipliers: Vec<Coins> = Category::ALL.iter().map(|c| c.multiplier()).collect();
        assert_eq!(multipliers, vec![1, 2, 3, 4, 5, 6, 8, 10, 20]);
    }

    #[test]
    fn test_payout_uses_winner_multiplier() {
        let flush = HandRank { category: Category::Flush, key: vec![7, 5, 4, 2, 0] };
        let pair = HandRank { category: Category::Pair, key: vec![5, 7, 2, 0] };
        assert_eq!(payout(10, &flush, &pair), Some((Seat::Player, 60)));
        assert_eq!(payout(10, &pair, &flush), Some((Seat::Opponent, 60)));
        assert_eq!(payout(10, &pair, &pair.clone()), None);
    }

    #[test]
    fn test_category_display() {
        assert_eq!(Category::ThreeOfAKind.to_string(), "Three of a Kind");
        assert_eq!(Seat::Player.other(), Seat::Opponent);
    }
}
