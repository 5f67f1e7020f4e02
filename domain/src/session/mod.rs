//! Chat session domain.
//!
//! - [`entities::Message`]: a role-tagged message sent to the model service
//! - [`entities::ConversationTurn`]: one side of a completed exchange
//! - [`entities::ConversationHistory`]: append-only exchange log of a session

pub mod entities;
