//! Plain-text rendering of the table.

use std::{collections::BTreeSet, fmt::Write};

use luigi_poker::{
    Balances, Coins, Hand, Outcome, Seat, TableView,
    entities::HAND_SIZE,
    functional::eval,
    game::{HandView, SeatView},
};

const FACE_DOWN: &str = " ##";

/// One line of cards with their numbers underneath, selected cards marked.
#[must_use]
pub fn render_cards(cards: &[Option<String>], selection: &BTreeSet<usize>) -> String {
    let mut faces = String::new();
    let mut labels = String::new();
    for (slot, card) in cards.iter().enumerate() {
        let face = card.as_deref().unwrap_or(FACE_DOWN);
        let mark = if selection.contains(&slot) { '*' } else { ' ' };
        let _ = write!(faces, "[{face}]{mark}");
        let _ = write!(labels, "  {}   ", slot + 1);
    }
    format!("{}\n{}", faces.trim_end(), labels.trim_end())
}

fn render_hand_view(hand: &HandView, selection: &BTreeSet<usize>) -> String {
    let cards: Vec<Option<String>> = hand
        .cards
        .iter()
        .map(|card| card.map(|card| card.to_string()))
        .collect();
    let mut out = render_cards(&cards, selection);
    if let Some(rank) = &hand.rank {
        let _ = write!(out, "\n  {rank}");
    }
    out
}

fn render_seat(seat: &SeatView, selection: &BTreeSet<usize>) -> String {
    let mut out = format!("{} (${})", seat.name, seat.balance);
    match &seat.hand {
        Some(hand) => {
            let _ = write!(out, "\n{}", render_hand_view(hand, selection));
        }
        None => out.push_str("\n  no cards yet"),
    }
    out
}

/// The whole solo table, opponent on top.
#[must_use]
pub fn render_table(view: &TableView) -> String {
    let none = BTreeSet::new();
    let mut out = String::new();
    let _ = writeln!(out, "{}", render_seat(&view.opponent, &none));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", render_seat(&view.player, &view.selection));
    let _ = write!(out, "wager ${} | round {}", view.wager, view.phase);
    out
}

/// A local hand in a network game.
#[must_use]
pub fn render_hand(hand: &Hand, selection: &BTreeSet<usize>) -> String {
    let cards: Vec<Option<String>> = hand
        .cards()
        .iter()
        .map(|card| Some(card.to_string()))
        .collect();
    format!("{}\n  {}", render_cards(&cards, selection), eval(hand))
}

/// The peer's hand before it's revealed.
#[must_use]
pub fn render_hidden_hand() -> String {
    render_cards(&vec![None; HAND_SIZE], &BTreeSet::new())
}

#[must_use]
pub fn render_outcome(outcome: &Outcome, balances: Balances) -> String {
    let banner = match outcome.winner {
        Some(Seat::Player) => "YOU WIN",
        Some(Seat::Opponent) => "YOU LOSE",
        None => "DRAW",
    };
    format!(
        "*** {banner} *** {outcome}\nbalances: you ${} / them ${}",
        balances.player, balances.opponent
    )
}

#[must_use]
pub fn render_wager(wager: Coins) -> String {
    format!("wager is now ${wager}")
}
