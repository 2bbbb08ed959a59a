use criterion::{Criterion, criterion_group, criterion_main};
use luigi_poker::{
    GameConfig, MemoryStore, PeerMessage, SoloTable,
    bot::choose_discards,
    entities::{Card, Deck, Hand, Player, Suit, Value},
    functional::{eval_cards, winner},
    game::Round,
    utils::{read_prefixed, write_prefixed},
};
use std::{collections::BTreeSet, io::Cursor};

fn straight_flush() -> [Card; 5] {
    [
        Card(Value::Seven, Suit::Heart),
        Card(Value::Eight, Suit::Heart),
        Card(Value::Nine, Suit::Heart),
        Card(Value::Ten, Suit::Heart),
        Card(Value::Jack, Suit::Heart),
    ]
}

fn two_pair() -> [Card; 5] {
    [
        Card(Value::King, Suit::Spade),
        Card(Value::King, Suit::Club),
        Card(Value::Nine, Suit::Diamond),
        Card(Value::Nine, Suit::Spade),
        Card(Value::Ace, Suit::Heart),
    ]
}

/// Benchmark evaluating a single hand
fn bench_hand_eval(c: &mut Criterion) {
    let cards = straight_flush();
    c.bench_function("hand_eval_straight_flush", |b| {
        b.iter(|| eval_cards(&cards));
    });

    let cards = two_pair();
    c.bench_function("hand_eval_two_pair", |b| {
        b.iter(|| eval_cards(&cards));
    });
}

/// Benchmark comparing two hands, evaluation included
fn bench_hand_comparison(c: &mut Criterion) {
    let (a, b_cards) = (straight_flush(), two_pair());
    c.bench_function("hand_comparison", |b| {
        b.iter(|| winner(&eval_cards(&a), &eval_cards(&b_cards)));
    });
}

/// Benchmark Luigi's discard decision
fn bench_policy(c: &mut Criterion) {
    let hand = Hand::new(two_pair());
    c.bench_function("opponent_policy", |b| {
        b.iter(|| choose_discards(&hand));
    });
}

/// Benchmark a whole round from deal to settlement
fn bench_full_round(c: &mut Criterion) {
    c.bench_function("full_round", |b| {
        b.iter_batched(
            || {
                Round::new(
                    Player::new("You", 100),
                    Player::new("Luigi", 100),
                    Deck::seeded(1),
                )
            },
            |mut round| {
                round.deal().unwrap();
                round.exchange_player_cards(&BTreeSet::from([0, 1])).unwrap();
                round.run_opponent_policy().unwrap();
                round.settle(10).unwrap()
            },
            criterion::BatchSize::SmallInput,
        );
    });

    c.bench_function("solo_table_round", |b| {
        b.iter_batched(
            || SoloTable::new(GameConfig::default(), MemoryStore::new()),
            |mut table| {
                table.deal_round().unwrap();
                table.validate().unwrap();
                table.drain_events()
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

/// Benchmark framing a peer message and reading it back
fn bench_framing(c: &mut Criterion) {
    let message = PeerMessage::HandFinal {
        cards: straight_flush(),
    };
    c.bench_function("frame_hand_final", |b| {
        b.iter(|| {
            let mut buf = Vec::new();
            write_prefixed(&mut buf, &message).unwrap();
            read_prefixed::<PeerMessage, _>(&mut Cursor::new(buf)).unwrap()
        });
    });
}

criterion_group!(
    hand_evaluation,
    bench_hand_eval,
    bench_hand_comparison,
    bench_policy,
);

criterion_group!(game_operations, bench_full_round, bench_framing);

criterion_main!(hand_evaluation, game_operations);
