//! Domain entities for Dialogue Assistant.
//!
//! Pure rules with no host, widget or storage dependencies.  Everything here
//! can be unit-tested without a running client.
//!
//! - **`option_state`** – the per-target option status store.
//! - **`identity`** – fallback identity hashing and click-origin classification.
//! - **`colour`** – decoration colours.

pub mod colour;
pub mod identity;
pub mod option_state;
