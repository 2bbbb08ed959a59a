//! # Luigi Poker
//!
//! Two-player five-card draw on a 32-card deck (sevens through aces).
//!
//! Each round deals five cards to both players, lets each one exchange any
//! subset of their cards once, then compares hands. The winner takes the
//! wager times the multiplier of their winning category from the loser;
//! an exact tie moves nothing.
//!
//! ## Core Modules
//!
//! - [`game`]: cards, the hand evaluator, the round state machine, and the
//!   solo table front-ends talk to
//! - [`bot`]: Luigi, the scripted opponent
//! - [`net`]: two-peer play over TCP
//! - [`store`]: balances saved between sessions
//! - [`config`]: tunable settings with environment overrides
//!
//! ## Example
//!
//! ```
//! use luigi_poker::{GameConfig, MemoryStore, SoloTable};
//!
//! let mut table = SoloTable::new(GameConfig::default(), MemoryStore::new());
//! table.deal_round().unwrap();
//! table.toggle_selection(0).unwrap();
//! table.commit_exchange().unwrap();
//! let outcome = table.validate().unwrap();
//! assert_eq!(table.balances().total(), 200);
//! println!("{outcome}");
//! ```

/// Scripted opponent policy.
pub mod bot;

/// Game settings.
pub mod config;

/// Core game logic and entities.
pub mod game;
pub use game::{
    DealOrder, Outcome, Round, RoundError, RoundPhase, SoloTable, TableError, TableEvent,
    TableView,
    entities::{self, Balances, Card, Coins, Deck, Hand, Player, Suit, Value},
    functional::{self, Category, HandRank, Seat},
};

/// Peer-to-peer networking.
pub mod net;
pub use net::{PeerEvent, PeerLink, PeerMessage, PeerSession, Role, SessionError, utils};

/// Balance persistence.
pub mod store;
pub use config::{ConfigError, GameConfig};
pub use store::{BalanceStore, JsonFileStore, MemoryStore};
