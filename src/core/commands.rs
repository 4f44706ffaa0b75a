//! Ledger mutations as data.
//!
//! A [`Command`] describes one user action. [`Ledger::apply`] validates it and returns the next
//! snapshot, leaving `self` untouched, so callers swap snapshots atomically.

use chrono::NaiveDate;
use tracing::debug;

use crate::core::services::{
    ClientService, ExpenseService, ImportService, ServiceResult, SessionInput, SessionService,
};
use crate::domain::{Client, Expense, Ledger};
use crate::import::ImportBatch;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddClient(Client),
    UpdateClient { id: String, client: Client },
    /// Refused while sessions reference the client unless `orphan_sessions` is set.
    DeleteClient { id: String, orphan_sessions: bool },
    LogSession(SessionInput),
    UpdateSession { id: String, input: SessionInput },
    TogglePaid { id: String, today: NaiveDate },
    DeleteSession { id: String },
    AddExpense(Expense),
    UpdateExpense { id: String, expense: Expense },
    DeleteExpense { id: String },
    CommitImport(ImportBatch),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddClient(_) => "add-client",
            Command::UpdateClient { .. } => "update-client",
            Command::DeleteClient { .. } => "delete-client",
            Command::LogSession(_) => "log-session",
            Command::UpdateSession { .. } => "update-session",
            Command::TogglePaid { .. } => "toggle-paid",
            Command::DeleteSession { .. } => "delete-session",
            Command::AddExpense(_) => "add-expense",
            Command::UpdateExpense { .. } => "update-expense",
            Command::DeleteExpense { .. } => "delete-expense",
            Command::CommitImport(_) => "commit-import",
        }
    }
}

impl Ledger {
    /// Applies `command` to this snapshot and returns the result.
    pub fn apply(&self, command: Command) -> ServiceResult<Ledger> {
        debug!(command = command.name(), "applying command");
        match command {
            Command::AddClient(client) => ClientService::add(self, client),
            Command::UpdateClient { id, client } => ClientService::update(self, &id, client),
            Command::DeleteClient {
                id,
                orphan_sessions,
            } => ClientService::remove(self, &id, orphan_sessions),
            Command::LogSession(input) => SessionService::log(self, input),
            Command::UpdateSession { id, input } => SessionService::update(self, &id, input),
            Command::TogglePaid { id, today } => SessionService::toggle_paid(self, &id, today),
            Command::DeleteSession { id } => SessionService::remove(self, &id),
            Command::AddExpense(expense) => ExpenseService::add(self, expense),
            Command::UpdateExpense { id, expense } => ExpenseService::update(self, &id, expense),
            Command::DeleteExpense { id } => ExpenseService::remove(self, &id),
            Command::CommitImport(batch) => Ok(ImportService::commit(self, &batch)),
        }
    }
}
