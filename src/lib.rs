pub mod clock;
pub mod engine;
pub mod history;
pub mod json;
pub mod model;

pub use engine::{Account, Authorization, Engine};
pub use history::TransactionHistory;
pub use model::{Event, Transaction, Violation};
