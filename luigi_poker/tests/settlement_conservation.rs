//! Settlement conservation tests.
//!
//! Coins only ever move between the two players: the total never changes,
//! a tie moves nothing, and the loser never goes below zero.

use luigi_poker::{
    Round, RoundError,
    game::{
        entities::{Card, Coins, Deck, HAND_SIZE, Hand, Player, Suit, Value},
        functional::{Seat, eval_cards},
    },
};
use proptest::prelude::*;

fn two_hands_strategy() -> impl Strategy<Value = ([Card; HAND_SIZE], [Card; HAND_SIZE])> {
    let deck: Vec<Card> = Value::ALL
        .into_iter()
        .flat_map(|value| Suit::ALL.into_iter().map(move |suit| Card(value, suit)))
        .collect();
    Just(deck).prop_shuffle().prop_map(|cards| {
        (
            [cards[0], cards[1], cards[2], cards[3], cards[4]],
            [cards[5], cards[6], cards[7], cards[8], cards[9]],
        )
    })
}

fn settle(
    mine: [Card; HAND_SIZE],
    theirs: [Card; HAND_SIZE],
    balances: (Coins, Coins),
    wager: Coins,
) -> (Result<Coins, RoundError>, Option<Seat>, Coins, Coins) {
    let mut round = Round::from_dealt(
        Player::new("You", balances.0),
        Player::new("Luigi", balances.1),
        Deck::seeded(0),
        Hand::new(mine),
    );
    round.stand().unwrap();
    round.accept_opponent_hand(Hand::new(theirs)).unwrap();
    let result = round.settle(wager);
    let winner = result.as_ref().ok().and_then(|outcome| outcome.winner);
    let amount = result.map(|outcome| outcome.amount);
    (amount, winner, round.player().balance, round.opponent().balance)
}

proptest! {
    #[test]
    fn test_total_is_conserved(
        (mine, theirs) in two_hands_strategy(),
        player in 1u32..=500,
        opponent in 1u32..=500,
        wager in 1u32..=30,
    ) {
        prop_assume!(wager <= player);
        let (amount, winner, after_player, after_opponent) = settle(mine, theirs, (player, opponent), wager);
        let amount = amount.unwrap();
        prop_assert_eq!(u64::from(after_player) + u64::from(after_opponent), u64::from(player) + u64::from(opponent));

        match winner {
            Some(Seat::Player) => {
                let expected = (wager * eval_cards(&mine).category.multiplier()).min(opponent);
                prop_assert_eq!(amount, expected);
                prop_assert_eq!(after_player - player, amount);
                prop_assert_eq!(opponent - after_opponent, amount);
            }
            Some(Seat::Opponent) => {
                let expected = (wager * eval_cards(&theirs).category.multiplier()).min(player);
                prop_assert_eq!(amount, expected);
                prop_assert_eq!(player - after_player, amount);
                prop_assert_eq!(after_opponent - opponent, amount);
            }
            None => {
                prop_assert_eq!(amount, 0);
                prop_assert_eq!((after_player, after_opponent), (player, opponent));
            }
        }
    }

    #[test]
    fn test_overdrawn_wager_changes_nothing(
        (mine, theirs) in two_hands_strategy(),
        player in 0u32..10,
        wager in 10u32..=30,
    ) {
        let (amount, _, after_player, after_opponent) = settle(mine, theirs, (player, 100), wager);
        prop_assert_eq!(amount, Err(RoundError::InsufficientBalance { available: player, required: wager }));
        prop_assert_eq!((after_player, after_opponent), (player, 100));
    }
}

#[test]
fn test_tie_leaves_balances_unchanged() {
    use Suit::*;
    use Value::*;
    let mine = [(King, Spade), (King, Club), (Seven, Club), (Nine, Spade), (Queen, Diamond)]
        .map(|(v, s)| Card(v, s));
    let theirs = [(King, Heart), (King, Diamond), (Seven, Spade), (Nine, Club), (Queen, Spade)]
        .map(|(v, s)| Card(v, s));
    let (amount, winner, player, opponent) = settle(mine, theirs, (100, 100), 30);
    assert_eq!(amount, Ok(0));
    assert_eq!(winner, None);
    assert_eq!((player, opponent), (100, 100));
}
