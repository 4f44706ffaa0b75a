//! Record shapes for clients, sessions and expenses. No behaviour beyond constructors,
//! lookups and field-level helpers.

pub mod client;
pub mod common;
pub mod expense;
pub mod ledger;
pub mod session;

pub use client::Client;
pub use common::{new_id, Displayable, Identifiable, NamedEntity};
pub use expense::{Expense, ExpenseCategory};
pub use ledger::{Ledger, UNKNOWN_CLIENT};
pub use session::{Session, SessionType};
