//! The scripted opponent.
//!
//! Luigi doesn't count cards or weigh odds. When his hand is weaker than a
//! straight he throws away his three lowest cards, otherwise he stands pat.
//! The rule is deterministic so rounds replay identically in tests.
//!
//! ## Example
//!
//! ```
//! use luigi_poker::bot::choose_discards;
//! use luigi_poker::game::entities::{Card, Hand, Suit, Value};
//!
//! let straight = Hand::new([
//!     Card(Value::Seven, Suit::Spade),
//!     Card(Value::Eight, Suit::Heart),
//!     Card(Value::Nine, Suit::Club),
//!     Card(Value::Ten, Suit::Heart),
//!     Card(Value::Jack, Suit::Diamond),
//! ]);
//! assert!(choose_discards(&straight).is_empty());
//! ```

pub mod decision;

pub use decision::{DiscardPolicy, ThresholdPolicy, choose_discards};
