//! Infrastructure adapters: everything that touches the host client or the
//! file system.
//!
//! - **`host`** – The [`host::DialogueHost`] port the host client implements,
//!   its event and menu types, and an in-memory mock.
//! - **`storage`** – Key-value persistence of the option store and the TOML
//!   settings file.

pub mod host;
pub mod storage;
