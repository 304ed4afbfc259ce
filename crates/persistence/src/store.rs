//! Ticket store trait and the in-memory implementation

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use intake_core::Ticket;

use crate::PersistenceError;

/// Pluggable ticket storage
///
/// `upsert` must overwrite on a repeated ticket id rather than duplicate.
/// Writes are fire-and-forget from the dialogue core's point of view: a
/// failed write is the store's problem and never blocks a reply.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Insert or overwrite a ticket by id
    async fn upsert(&self, ticket: &Ticket) -> Result<(), PersistenceError>;

    /// Whether a ticket id already exists
    async fn contains(&self, ticket_id: &str) -> Result<bool, PersistenceError>;

    /// Fetch one ticket
    async fn get(&self, ticket_id: &str) -> Result<Option<Ticket>, PersistenceError>;

    /// All tickets in insertion order
    async fn list(&self) -> Result<Vec<Ticket>, PersistenceError>;
}

#[derive(Default)]
struct StoreInner {
    by_id: HashMap<String, Ticket>,
    order: Vec<String>,
}

/// In-memory ticket store
///
/// Sessions are serially processed, so a plain `RwLock` over the maps is
/// enough; no persistence across restarts.
#[derive(Default)]
pub struct InMemoryTicketStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryTicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tickets
    pub fn len(&self) -> usize {
        self.inner.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn upsert(&self, ticket: &Ticket) -> Result<(), PersistenceError> {
        let mut inner = self.inner.write();
        if inner
            .by_id
            .insert(ticket.ticket_id.clone(), ticket.clone())
            .is_none()
        {
            inner.order.push(ticket.ticket_id.clone());
        } else {
            tracing::debug!(ticket_id = %ticket.ticket_id, "overwriting existing ticket");
        }
        Ok(())
    }

    async fn contains(&self, ticket_id: &str) -> Result<bool, PersistenceError> {
        Ok(self.inner.read().by_id.contains_key(ticket_id))
    }

    async fn get(&self, ticket_id: &str) -> Result<Option<Ticket>, PersistenceError> {
        Ok(self.inner.read().by_id.get(ticket_id).cloned())
    }

    async fn list(&self) -> Result<Vec<Ticket>, PersistenceError> {
        let inner = self.inner.read();
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.by_id.get(id).cloned())
            .collect())
    }
}
