//! Core types for the 311 intake agent
//!
//! This crate provides the foundational types shared by every other crate:
//! - Conversation turns and transcripts
//! - City profiles and service descriptors
//! - Field values, tickets, and address records

pub mod address;
pub mod conversation;
pub mod profile;
pub mod ticket;

pub use address::AddressRecord;
pub use conversation::{Turn, TurnRole};
pub use profile::{is_optional_field, CityProfile, FaqEntry, ServiceDescriptor, OPTIONAL_SUFFIX};
pub use ticket::{FieldValue, Ticket};
