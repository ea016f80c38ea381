//! Application layer use cases for the dialogue assistant.
//!
//! Use cases in this layer orchestrate the domain types from `dialogue-core`
//! and talk to the outside world only through the [`DialogueHost`] and
//! [`KeyValueStore`] traits, so every one of them runs against
//! [`MockHost`] and an in-memory store in tests.
//!
//! # Sub-modules
//!
//! - **`resolve_identity`** – Decides which conversation target the dialogue
//!   on screen belongs to, from NPC interactions and classified menu clicks.
//!
//! - **`decorate_options`** – Paints highlighted and locked options, adds the
//!   Highlight / Lock / Reset menu entries, and applies the player's choices.
//!
//! - **`scheduler`** – The FIFO of work deferred to the end of the host tick.
//!
//! - **`dispatch`** – [`DialogueAssistant`], the single entry point that routes
//!   host events to the use cases above and persists the store after changes.
//!
//! [`DialogueHost`]: crate::infrastructure::host::DialogueHost
//! [`KeyValueStore`]: crate::infrastructure::storage::KeyValueStore
//! [`MockHost`]: crate::infrastructure::host::mock::MockHost
//! [`DialogueAssistant`]: dispatch::DialogueAssistant

pub mod decorate_options;
pub mod dispatch;
pub mod resolve_identity;
pub mod scheduler;
