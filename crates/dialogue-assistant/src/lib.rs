//! dialogue-assistant library entry point.
//!
//! Lets the player highlight or lock individual dialogue options and
//! re-applies those choices whenever the same conversation comes back.
//!
//! A host embeds the assistant like this:
//!
//! ```no_run
//! use dialogue_assistant::infrastructure::host::{mock::MockHost, HostEvent};
//! use dialogue_assistant::infrastructure::storage::{
//!     settings, FileKeyValueStore, OptionStateRepository,
//! };
//! use dialogue_assistant::DialogueAssistant;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut host = MockHost::new();
//! let settings = settings::load_settings()?;
//! let repository = OptionStateRepository::new(FileKeyValueStore::in_config_dir()?);
//!
//! let mut assistant = DialogueAssistant::new(settings, repository);
//! assistant.start_up(&host);
//!
//! // Once per host callback, then once at the end of the tick.
//! assistant.handle(&mut host, HostEvent::ClientTick);
//! assistant.run_deferred(&mut host);
//!
//! assistant.shut_down(&mut host);
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod infrastructure;

pub use application::dispatch::DialogueAssistant;
