//! Dialogue state machine for the 311 intake agent
//!
//! The controller receives one utterance at a time and returns the ordered
//! reply sequence, mutating the caller-owned [`Session`] as it goes:
//!
//! - `Idle`: classify the utterance and either show the menu, adapt the
//!   city profile, or open a service request.
//! - `Collecting`: treat the utterance as the answer to the head pending
//!   field, unless it is a reserved control keyword (`menu` preserves the
//!   form, `cancel` and the reset set abandon it).
//!
//! Address-typed answers trigger verification as a side effect, which can
//! re-route the active city profile when the resolved jurisdiction differs.

pub mod controller;
pub mod finalizer;
pub mod session;
pub mod slots;

pub use controller::DialogueController;
pub use session::Session;
