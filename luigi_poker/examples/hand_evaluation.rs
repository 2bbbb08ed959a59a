//! Hand Evaluation Example
//!
//! Ranks a few short-deck hands, compares them, and shows what each
//! category pays on a winning wager.

use luigi_poker::{
    Category, Hand,
    bot::choose_discards,
    entities::{Card, Suit, Value},
    functional::{eval, payout, winner},
};

fn main() {
    println!("=== Short Deck Hand Evaluation ===\n");

    // Example 1: Evaluate a single hand
    let straight = Hand::new([
        Card(Value::Seven, Suit::Heart),
        Card(Value::Eight, Suit::Club),
        Card(Value::Nine, Suit::Heart),
        Card(Value::Ten, Suit::Diamond),
        Card(Value::Jack, Suit::Spade),
    ]);
    println!("{straight} -> {}\n", eval(&straight));

    // Example 2: Same category, decided by the tie-break key
    let aces = Hand::new([
        Card(Value::Ace, Suit::Spade),
        Card(Value::Ace, Suit::Heart),
        Card(Value::Ten, Suit::Club),
        Card(Value::Nine, Suit::Diamond),
        Card(Value::Seven, Suit::Spade),
    ]);
    let kings = Hand::new([
        Card(Value::King, Suit::Spade),
        Card(Value::King, Suit::Heart),
        Card(Value::Ten, Suit::Diamond),
        Card(Value::Nine, Suit::Club),
        Card(Value::Seven, Suit::Club),
    ]);
    let (a, b) = (eval(&aces), eval(&kings));
    println!("A: {aces} -> {a}");
    println!("B: {kings} -> {b}");
    match winner(&a, &b) {
        Some(seat) => println!("winner: {seat:?}"),
        None => println!("perfect tie"),
    }
    if let Some((seat, amount)) = payout(10, &a, &b) {
        println!("a $10 wager moves ${amount} to {seat:?}\n");
    }

    // Example 3: What Luigi would throw away
    let discards = choose_discards(&kings);
    println!("Luigi holding {kings} discards slots {discards:?}\n");

    // Example 4: Payout table
    for category in Category::ALL {
        println!("{:<16} x{}", category.name(), category.multiplier());
    }
}
