//! Event loops for solo and network play.
//!
//! Input lines and peer messages arrive over one channel so a single loop
//! owns all game state. The pause between rounds is a deadline on that
//! loop, not a sleep, so the player can still type while it runs.

use anyhow::{Result, bail};
use log::{debug, info, warn};
use std::{
    collections::BTreeSet,
    io::{self, BufRead},
    sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel},
    thread,
    time::Instant,
};

use luigi_poker::{
    GameConfig, JsonFileStore, PeerEvent, PeerLink, PeerMessage, PeerSession, Role, SessionError,
    SoloTable, TableError, TableEvent, net::SessionState,
};

use crate::{
    commands::{Command, HELP, parse_command},
    render,
};

/// Everything the loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    Input(String),
    InputClosed,
    Peer(PeerEvent),
}

impl From<PeerEvent> for AppEvent {
    fn from(value: PeerEvent) -> Self {
        Self::Peer(value)
    }
}

/// Forward stdin lines to the loop from a background thread.
fn spawn_stdin(tx: Sender<AppEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(AppEvent::Input(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(AppEvent::InputClosed);
    });
}

/// Wait for the next event, or `None` once `deadline` passes first.
fn next_event(rx: &Receiver<AppEvent>, deadline: Option<Instant>) -> Result<Option<AppEvent>> {
    match deadline {
        Some(deadline) => {
            match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                Ok(event) => Ok(Some(event)),
                Err(RecvTimeoutError::Timeout) => Ok(None),
                Err(RecvTimeoutError::Disconnected) => bail!("event channel closed"),
            }
        }
        None => Ok(Some(rx.recv()?)),
    }
}

/// Play against Luigi until someone is broke or the player quits.
///
/// # Errors
///
/// Returns an error if the event channel breaks.
pub fn run_solo(config: GameConfig) -> Result<()> {
    let store =
        JsonFileStore::new(config.save_path.clone()).with_starting_balance(config.starting_balance);
    info!("saving balances to {}", store.path().display());
    let mut table = SoloTable::new(config, store);

    let (tx, rx) = channel();
    spawn_stdin(tx);

    println!("{HELP}\n");
    let mut next_deal = deal_solo(&mut table);

    while !table.is_game_over() {
        let Some(event) = next_event(&rx, next_deal)? else {
            next_deal = deal_solo(&mut table);
            continue;
        };
        let line = match event {
            AppEvent::Input(line) => line,
            AppEvent::InputClosed => break,
            AppEvent::Peer(_) => continue,
        };
        let command = match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => command,
            Err(error) => {
                println!("{error}");
                continue;
            }
        };

        let result = match command {
            Command::Deal => {
                next_deal = deal_solo(&mut table);
                continue;
            }
            Command::Select(slots) => slots
                .into_iter()
                .try_for_each(|slot| table.toggle_selection(slot)),
            Command::Exchange => table.commit_exchange(),
            Command::Stand => table.commit_stand(),
            Command::Raise => table
                .raise_wager()
                .map(|wager| println!("{}", render::render_wager(wager))),
            Command::Lower => table
                .lower_wager()
                .map(|wager| println!("{}", render::render_wager(wager))),
            Command::Validate => {
                let delay = table.next_round_delay();
                table
                    .validate()
                    .map(|_| next_deal = Some(Instant::now() + delay))
            }
            Command::Help => {
                println!("{HELP}");
                Ok(())
            }
            Command::Quit => break,
        };
        match result {
            Ok(()) => show_solo(&mut table),
            Err(error) => println!("can't do that: {error}"),
        }
    }

    println!("thanks for playing ({})", table.balances());
    Ok(())
}

/// Deal the next solo round. Returns no deadline; the next one is set
/// after validation.
fn deal_solo(table: &mut SoloTable<JsonFileStore>) -> Option<Instant> {
    match table.deal_round() {
        Ok(()) => show_solo(table),
        Err(TableError::GameOver) => {}
        Err(error) => println!("can't deal: {error}"),
    }
    None
}

fn show_solo(table: &mut SoloTable<JsonFileStore>) {
    for event in table.drain_events() {
        match event {
            TableEvent::Settled(outcome) => {
                println!("{}", render::render_outcome(&outcome, table.balances()));
            }
            event => println!("> {event}"),
        }
    }
    println!("\n{}\n", render::render_table(&table.view()));
}

/// Play one peer over `link` until someone is broke, the link drops, or
/// the player quits.
///
/// # Errors
///
/// Returns an error if a frame can't be sent or the event channel breaks.
pub fn run_network(config: &GameConfig, role: Role, mut link: PeerLink) -> Result<()> {
    let (tx, rx) = channel::<AppEvent>();
    link.spawn_receiver(tx.clone())?;
    spawn_stdin(tx);

    let mut session = PeerSession::from_config(role, config);
    let mut selection = BTreeSet::new();
    let mut next_deal = None;
    println!(
        "playing against {} for ${} a round\n{HELP}\n",
        link.peer_addr(),
        session.wager()
    );

    if role == Role::Host {
        start_network_round(&mut session, &mut link)?;
    } else {
        println!("waiting for the host to deal...");
    }

    loop {
        let Some(event) = next_event(&rx, next_deal)? else {
            next_deal = None;
            start_network_round(&mut session, &mut link)?;
            continue;
        };

        let step = match event {
            AppEvent::Input(line) => match parse_command(&line) {
                Ok(Command::Select(slots)) => {
                    if session.state() != SessionState::HandInProgress || session.awaiting_peer() {
                        println!("nothing to select right now");
                    } else {
                        for slot in slots {
                            if !selection.remove(&slot) {
                                selection.insert(slot);
                            }
                        }
                        show_local_hand(&session, &selection);
                    }
                    continue;
                }
                Ok(Command::Exchange) => session.exchange(&selection),
                Ok(Command::Stand | Command::Validate) => session.stand(),
                Ok(Command::Deal) => {
                    next_deal = None;
                    start_network_round(&mut session, &mut link)?;
                    continue;
                }
                Ok(Command::Raise | Command::Lower) => {
                    println!("the wager is fixed at ${} in network games", session.wager());
                    continue;
                }
                Ok(Command::Help) => {
                    println!("{HELP}");
                    continue;
                }
                Ok(Command::Quit) => break,
                Err(error) => {
                    println!("{error}");
                    continue;
                }
            },
            AppEvent::InputClosed => break,
            AppEvent::Peer(PeerEvent::Message(message)) => {
                let starting = matches!(message, PeerMessage::Start { .. });
                let step = session.handle_message(message);
                if starting && step.is_ok() {
                    selection.clear();
                    println!("> new round, pick the cards to exchange");
                    show_local_hand(&session, &selection);
                }
                step
            }
            AppEvent::Peer(PeerEvent::Disconnected(reason)) => {
                session.connection_lost(&reason);
                println!("the other player left ({reason})");
                break;
            }
        };

        match step {
            Ok(step) => {
                if let Some(message) = step.send {
                    link.send(&message)?;
                    selection.clear();
                    if step.outcome.is_none() {
                        println!("waiting for the other player...");
                    }
                }
                if let Some(outcome) = step.outcome {
                    if let Some(peer_hand) = session.peer_hand() {
                        println!(
                            "their hand:\n{}",
                            render::render_hand(peer_hand, &BTreeSet::new())
                        );
                    }
                    println!("{}", render::render_outcome(&outcome, session.balances()));
                    if session.is_over() {
                        println!("game over");
                        break;
                    }
                    if role == Role::Host {
                        next_deal = Some(Instant::now() + config.next_round_delay());
                    }
                }
            }
            // Already logged by the session.
            Err(SessionError::ProtocolDesync { .. }) => debug!("ignored a desynced message"),
            Err(error) => println!("can't do that: {error}"),
        }
    }

    link.shutdown();
    let balances = session.balances();
    println!(
        "final balances: you ${} / them ${}",
        balances.player, balances.opponent
    );
    Ok(())
}

fn start_network_round(session: &mut PeerSession, link: &mut PeerLink) -> Result<()> {
    match session.begin_round() {
        Ok(start) => {
            link.send(&start)?;
            println!("> new round, pick the cards to exchange");
            show_local_hand(session, &BTreeSet::new());
        }
        Err(SessionError::NotHost) => println!("the host deals"),
        Err(error) => {
            warn!("can't start a round: {error}");
            println!("can't start a round: {error}");
        }
    }
    Ok(())
}

fn show_local_hand(session: &PeerSession, selection: &BTreeSet<usize>) {
    if let Some(hand) = session.hand() {
        println!("them\n{}\n", render::render_hidden_hand());
        println!(
            "you (${})\n{}\n",
            session.balances().player,
            render::render_hand(hand, selection)
        );
    }
}
