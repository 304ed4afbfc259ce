//! Ticket persistence for the 311 intake agent
//!
//! Durable storage is an external collaborator behind the [`TicketStore`]
//! trait; the shipped implementation is an in-memory store with upsert
//! semantics. Export produces one CSV row per ticket.

pub mod export;
pub mod store;

pub use export::export_csv;
pub use store::{InMemoryTicketStore, TicketStore};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
