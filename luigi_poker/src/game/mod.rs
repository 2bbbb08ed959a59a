//! Game engine: cards, hand evaluation, the round state machine and the
//! solo table built on top of it.

pub mod entities;
pub mod functional;
pub mod round;
pub mod table;

pub use round::{DealOrder, Outcome, Round, RoundError, RoundPhase};
pub use table::{HandView, SeatView, SoloTable, TableError, TableEvent, TableView};
