use serde::{Deserialize, Serialize};

use crate::domain::{
    client::Client,
    common::find_by_id,
    expense::Expense,
    session::Session,
};

/// Display name used wherever a session's client reference cannot be resolved.
pub const UNKNOWN_CLIENT: &str = "Unknown Client";

/// Snapshot of the three record collections owned by the calling application.
///
/// Report and export functions only ever read a `Ledger`; mutations go through
/// [`crate::core::commands::Command`] and produce a new snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Ledger {
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        clients: Vec<Client>,
        sessions: Vec<Session>,
        expenses: Vec<Expense>,
    ) -> Self {
        Self {
            clients,
            sessions,
            expenses,
        }
    }

    pub fn client(&self, id: &str) -> Option<&Client> {
        find_by_id(&self.clients, id)
    }

    /// Resolves a client display name, degrading to [`UNKNOWN_CLIENT`] for dangling references.
    pub fn client_name(&self, id: &str) -> &str {
        self.client(id)
            .map(|client| client.name.as_str())
            .unwrap_or(UNKNOWN_CLIENT)
    }

    pub fn session(&self, id: &str) -> Option<&Session> {
        find_by_id(&self.sessions, id)
    }

    pub fn expense(&self, id: &str) -> Option<&Expense> {
        find_by_id(&self.expenses, id)
    }

    pub fn sessions_for_client(&self, client_id: &str) -> impl Iterator<Item = &Session> {
        let client_id = client_id.to_string();
        self.sessions
            .iter()
            .filter(move |session| session.client_id == client_id)
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty() && self.sessions.is_empty() && self.expenses.is_empty()
    }
}
