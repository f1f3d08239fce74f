//! Game domain: cards, patterns, the called-number ledger, and the pure
//! generation/calling/verification operations over them.

pub mod caller;
pub mod card;
pub mod evaluator;
pub mod generator;
pub mod ledger;
pub mod pattern;

pub use caller::NumberCaller;
pub use card::{CardLayout, Cell, Column};
pub use generator::CardGenerator;
pub use ledger::{CalledNumber, CalledNumberLedger};
pub use pattern::{Pattern, PatternMask};
