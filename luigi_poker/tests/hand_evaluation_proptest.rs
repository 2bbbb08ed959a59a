//! Property-based tests for hand evaluation and the opponent policy.
//!
//! These check the evaluator and Luigi's discard rule across randomly
//! generated hands drawn from the 32-card deck.

use luigi_poker::{
    bot::{DiscardPolicy, ThresholdPolicy, choose_discards},
    game::{
        entities::{Card, HAND_SIZE, Hand, Suit, Value},
        functional::{Category, Seat, eval_cards, payout, winner},
    },
};
use proptest::prelude::*;

fn full_deck() -> Vec<Card> {
    Value::ALL
        .into_iter()
        .flat_map(|value| Suit::ALL.into_iter().map(move |suit| Card(value, suit)))
        .collect()
}

/// The first `n` cards of a shuffled deck, so cards never repeat.
fn unique_cards_strategy(n: usize) -> impl Strategy<Value = Vec<Card>> {
    Just(full_deck())
        .prop_shuffle()
        .prop_map(move |deck| deck[..n].to_vec())
}

fn five_card_hand_strategy() -> impl Strategy<Value = [Card; HAND_SIZE]> {
    unique_cards_strategy(HAND_SIZE).prop_map(|cards| [cards[0], cards[1], cards[2], cards[3], cards[4]])
}

/// Two hands that share no card, as a real deal would produce.
fn two_hands_strategy() -> impl Strategy<Value = ([Card; HAND_SIZE], [Card; HAND_SIZE])> {
    unique_cards_strategy(2 * HAND_SIZE).prop_map(|cards| {
        (
            [cards[0], cards[1], cards[2], cards[3], cards[4]],
            [cards[5], cards[6], cards[7], cards[8], cards[9]],
        )
    })
}

proptest! {
    #[test]
    fn test_category_in_range(cards in five_card_hand_strategy()) {
        let rank = eval_cards(&cards);
        prop_assert!(rank.category.ordinal() <= 8);
        prop_assert!(Category::ALL.contains(&rank.category));
        prop_assert!(!rank.key.is_empty() && rank.key.len() <= HAND_SIZE);
    }

    #[test]
    fn test_eval_order_independent(
        (cards, permuted) in five_card_hand_strategy()
            .prop_flat_map(|cards| (Just(cards), Just(cards.to_vec()).prop_shuffle())),
    ) {
        let permuted: [Card; HAND_SIZE] = [permuted[0], permuted[1], permuted[2], permuted[3], permuted[4]];
        prop_assert_eq!(eval_cards(&cards), eval_cards(&permuted));

        let mut reversed = cards;
        reversed.reverse();
        prop_assert_eq!(eval_cards(&cards), eval_cards(&reversed));
    }

    #[test]
    fn test_eval_deterministic(cards in five_card_hand_strategy()) {
        prop_assert_eq!(eval_cards(&cards), eval_cards(&cards));
    }

    #[test]
    fn test_winner_antisymmetric((a, b) in two_hands_strategy()) {
        let (ra, rb) = (eval_cards(&a), eval_cards(&b));
        prop_assert_eq!(winner(&ra, &rb).map(Seat::other), winner(&rb, &ra));
    }

    #[test]
    fn test_payout_uses_winning_category((a, b) in two_hands_strategy(), wager in 1u32..=30) {
        let (ra, rb) = (eval_cards(&a), eval_cards(&b));
        match payout(wager, &ra, &rb) {
            Some((Seat::Player, amount)) => prop_assert_eq!(amount, wager * ra.category.multiplier()),
            Some((Seat::Opponent, amount)) => prop_assert_eq!(amount, wager * rb.category.multiplier()),
            None => prop_assert_eq!(ra, rb),
        }
    }

    #[test]
    fn test_policy_deterministic(cards in five_card_hand_strategy()) {
        let hand = Hand::new(cards);
        prop_assert_eq!(choose_discards(&hand), choose_discards(&hand));
    }

    #[test]
    fn test_policy_shape(cards in five_card_hand_strategy()) {
        let hand = Hand::new(cards);
        let discards = ThresholdPolicy::default().choose_discards(&hand);
        if eval_cards(&cards).category >= Category::Straight {
            prop_assert!(discards.is_empty());
        } else {
            prop_assert_eq!(discards.len(), 3);
            prop_assert!(discards.iter().all(|&slot| slot < HAND_SIZE));

            // Every discarded card is no higher than every kept card.
            let highest_discarded = discards.iter().map(|&slot| cards[slot].0).max();
            let lowest_kept = (0..HAND_SIZE)
                .filter(|slot| !discards.contains(slot))
                .map(|slot| cards[slot].0)
                .min();
            prop_assert!(highest_discarded <= lowest_kept);
        }
    }
}

#[test]
fn test_known_hands() {
    use Suit::*;
    use Value::*;

    let cases = [
        ([(Seven, Heart), (Eight, Heart), (Nine, Heart), (Ten, Heart), (Jack, Heart)], Category::StraightFlush),
        ([(Ace, Spade), (Ace, Heart), (Ace, Diamond), (Ace, Club), (Seven, Spade)], Category::FourOfAKind),
        ([(Ace, Spade), (Ace, Heart), (Seven, Diamond), (Seven, Club), (Seven, Spade)], Category::FullHouse),
        ([(Seven, Spade), (Nine, Spade), (Jack, Spade), (Queen, Spade), (Ace, Spade)], Category::Flush),
    ];
    for (cards, expected) in cases {
        let cards = cards.map(|(value, suit)| Card(value, suit));
        assert_eq!(eval_cards(&cards).category, expected, "{}", Hand::new(cards));
    }
}
