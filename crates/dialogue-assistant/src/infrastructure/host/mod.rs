//! Host client port: the widget tree, menu system and scene queries that the
//! assistant drives but does not own.
//!
//! The host renders the conversation UI, decides dialogue content, and calls
//! back into the assistant through [`HostEvent`]s.  Everything the assistant
//! needs to read or change in return goes through the [`DialogueHost`] trait.
//!
//! # Testability
//!
//! [`mock::MockHost`] is a small in-memory widget tree and menu model that
//! implements the trait, so the whole engine can be driven from tests without
//! a running client.

use serde::{Deserialize, Serialize};

use dialogue_core::{Colour, MenuAction, TargetId};

pub mod mock;

/// Opaque handle of a live host widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WidgetId(pub u32);

/// Logical name of a host UI container, resolved to a [`WidgetId`] on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKey {
    /// The container whose children are the clickable dialogue choices.
    DialogueOptions,
    /// The chatbox region that hosts every conversation interface.
    Chatbox,
    /// The 3-D game viewport.
    Viewport,
    /// Any other interface group, by host group id.
    Other(u32),
}

/// Something the local player can interact with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    /// A non-player character.  `type_id` is the durable NPC definition id,
    /// not the per-spawn instance index.
    Npc { type_id: i32, name: String },
    /// Another player.
    Player { name: String },
}

/// Which of the assistant's actions a synthesised menu entry performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Highlight,
    Lock,
    Reset,
}

impl CommandKind {
    /// Menu label shown to the player.
    pub fn label(self) -> &'static str {
        match self {
            Self::Highlight => "Highlight Option",
            Self::Lock => "Lock Option",
            Self::Reset => "Reset Option",
        }
    }
}

/// The payload carried by a synthesised menu entry.
///
/// The target is captured when the entry is created, so a click still applies
/// to the conversation the player was looking at even if identity changes
/// before the deferred command runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionCommand {
    pub kind: CommandKind,
    pub target: TargetId,
    pub option: String,
    pub widget: WidgetId,
}

/// Who created a menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySource {
    /// A native host entry.
    Host,
    /// An entry synthesised by the assistant.  The tag is how the assistant
    /// recognises its own entries without comparing label strings.
    Assistant(OptionCommand),
}

/// One right-click menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub option: String,
    pub target: String,
    pub action: MenuAction,
    /// The widget the entry acts on, for interface entries.
    pub widget: Option<WidgetId>,
    pub source: EntrySource,
}

impl MenuEntry {
    /// A native host entry.
    pub fn host(
        option: impl Into<String>,
        target: impl Into<String>,
        action: MenuAction,
        widget: Option<WidgetId>,
    ) -> Self {
        Self {
            option: option.into(),
            target: target.into(),
            action,
            widget,
            source: EntrySource::Host,
        }
    }

    /// A synthesised entry for `command`.
    pub fn synthesised(command: OptionCommand) -> Self {
        Self {
            option: command.kind.label().to_string(),
            target: String::new(),
            action: MenuAction::Custom,
            widget: None,
            source: EntrySource::Assistant(command),
        }
    }

    /// The command carried by an assistant entry.
    pub fn command(&self) -> Option<&OptionCommand> {
        match &self.source {
            EntrySource::Assistant(command) => Some(command),
            EntrySource::Host => None,
        }
    }

    pub fn is_synthesised(&self) -> bool {
        self.command().is_some()
    }
}

/// Callbacks delivered by the host, in the order they happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// Once per client frame, after the host has proposed this frame's menu entries.
    ClientTick,
    /// An interface group finished loading.
    WidgetLoaded(ContainerKey),
    /// An interface group was closed.
    WidgetClosed(ContainerKey),
    /// The player picked a menu entry.  The host applies it unless the
    /// assistant calls [`DialogueHost::consume_click`] while handling this event.
    MenuOptionClicked(MenuEntry),
    /// An actor's interaction target changed.
    InteractingChanged {
        /// `true` when the actor that changed target is the local player.
        from_local_player: bool,
        target: Option<Actor>,
    },
    /// The player logged out or hopped worlds.  Host widget ids are no longer valid.
    SessionEnded,
}

/// Host capabilities used by the assistant.
///
/// All calls happen on the host's UI thread, from inside a host callback or
/// from [`crate::application::dispatch::DialogueAssistant::run_deferred`].
/// Queries on widgets that no longer exist return `None` / empty; setters on
/// them are ignored.
pub trait DialogueHost {
    /// `true` while the player is logged in.
    fn is_logged_in(&self) -> bool;
    /// Who the local player is interacting with right now.
    fn local_interaction(&self) -> Option<Actor>;

    /// `true` while a right-click menu is open.
    fn is_menu_open(&self) -> bool;
    /// Menu entries proposed for the current frame.
    fn menu_entries(&self) -> Vec<MenuEntry>;
    /// Appends an entry to the current frame's menu.
    fn append_menu_entry(&mut self, entry: MenuEntry);
    /// Stops the host from applying the menu click currently being dispatched.
    fn consume_click(&mut self);

    /// Finds a container by logical name, if it is currently rendered.
    fn find_container(&self, key: ContainerKey) -> Option<WidgetId>;
    fn children(&self, widget: WidgetId) -> Vec<WidgetId>;
    fn parent(&self, widget: WidgetId) -> Option<WidgetId>;
    fn text(&self, widget: WidgetId) -> Option<String>;
    /// `true` when the widget reacts to clicks.
    fn has_listener(&self, widget: WidgetId) -> bool;

    fn set_text_colour(&mut self, widget: WidgetId, colour: Colour);
    fn set_hidden(&mut self, widget: WidgetId, hidden: bool);
    fn set_click_enabled(&mut self, widget: WidgetId, enabled: bool);
    /// Colour the host restores when the pointer leaves the widget, replacing
    /// its own hover-out colour.
    fn set_pointer_leave_colour(&mut self, widget: WidgetId, colour: Colour);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(kind: CommandKind) -> OptionCommand {
        OptionCommand {
            kind,
            target: TargetId::new(5).expect("non-reserved"),
            option: "Ask about quest".to_string(),
            widget: WidgetId(1),
        }
    }

    #[test]
    fn test_synthesised_entry_uses_command_label() {
        let entry = MenuEntry::synthesised(command(CommandKind::Lock));

        assert_eq!(entry.option, "Lock Option");
        assert_eq!(entry.action, MenuAction::Custom);
        assert!(entry.is_synthesised());
    }

    #[test]
    fn test_host_entry_is_not_synthesised() {
        let entry = MenuEntry::host("Talk-to", "Hans", MenuAction::NpcOption(1), None);
        assert!(!entry.is_synthesised());
        assert!(entry.command().is_none());
    }

    #[test]
    fn test_host_entry_with_assistant_label_is_still_host() {
        // Recognition is by tag, never by label text.
        let entry = MenuEntry::host("Lock Option", "", MenuAction::Custom, None);
        assert!(!entry.is_synthesised());
    }

    #[test]
    fn test_command_labels() {
        assert_eq!(CommandKind::Highlight.label(), "Highlight Option");
        assert_eq!(CommandKind::Reset.label(), "Reset Option");
    }

    #[test]
    fn test_container_key_serialises_as_snake_case() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            keys: Vec<ContainerKey>,
        }
        let text = toml::to_string(&Wrapper {
            keys: vec![ContainerKey::Viewport, ContainerKey::DialogueOptions],
        })
        .expect("serialise");

        assert!(text.contains("\"viewport\""), "got {text}");
        assert!(text.contains("\"dialogue_options\""), "got {text}");
    }
}
