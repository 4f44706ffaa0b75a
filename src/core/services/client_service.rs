//! Business logic helpers for managing clients.

use tracing::{info, warn};

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{Client, Ledger};

/// Validated client mutations. Every operation returns the next ledger snapshot.
pub struct ClientService;

impl ClientService {
    /// Appends a new client.
    pub fn add(ledger: &Ledger, client: Client) -> ServiceResult<Ledger> {
        validate(&client)?;
        if ledger.client(&client.id).is_some() {
            return Err(ServiceError::Invalid(format!(
                "Client id {} already exists",
                client.id
            )));
        }
        let mut next = ledger.clone();
        info!(client = %client.name, "client added");
        next.clients.push(client);
        Ok(next)
    }

    /// Replaces the client identified by `id` in place. The identifier is preserved.
    ///
    /// Existing sessions keep their snapshot rate; only future sessions see the new rate.
    pub fn update(ledger: &Ledger, id: &str, mut client: Client) -> ServiceResult<Ledger> {
        validate(&client)?;
        let mut next = ledger.clone();
        let slot = next
            .clients
            .iter_mut()
            .find(|existing| existing.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("Client {id}")))?;
        client.id = slot.id.clone();
        *slot = client;
        Ok(next)
    }

    /// Removes a client. Sessions referencing it are left in place (and render as
    /// "Unknown Client") only when `orphan_sessions` is set.
    pub fn remove(ledger: &Ledger, id: &str, orphan_sessions: bool) -> ServiceResult<Ledger> {
        if ledger.client(id).is_none() {
            return Err(ServiceError::NotFound(format!("Client {id}")));
        }
        let referencing = ledger.sessions_for_client(id).count();
        if referencing > 0 && !orphan_sessions {
            return Err(ServiceError::Invalid(format!(
                "Client has {referencing} logged session(s); deleting would orphan them"
            )));
        }
        if referencing > 0 {
            warn!(client_id = id, sessions = referencing, "orphaning sessions");
        }
        let mut next = ledger.clone();
        next.clients.retain(|client| client.id != id);
        Ok(next)
    }
}

fn validate(client: &Client) -> ServiceResult<()> {
    if client.name.trim().is_empty() {
        return Err(ServiceError::Invalid("Client name is required".into()));
    }
    if client.hourly_rate.is_nan() || client.hourly_rate < 0.0 {
        return Err(ServiceError::Invalid(
            "Hourly rate must be zero or greater".into(),
        ));
    }
    if client.distance_from_home.is_nan() || client.distance_from_home < 0.0 {
        return Err(ServiceError::Invalid(
            "Distance from home must be zero or greater".into(),
        ));
    }
    Ok(())
}
