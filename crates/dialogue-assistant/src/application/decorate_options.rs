//! DecorationEngine: keeps the live dialogue option widgets in step with the
//! saved option states.
//!
//! # Lifecycle
//!
//! ```text
//!  Closed ──open──►  Opening ──deferred decorate──►  Decorated
//!    ▲                 │  ▲                              │
//!    │                 │  └── no options yet: retry ─────┤ open (new generation)
//!    └──── close ──────┴─────────────────────────────────┘
//! ```
//!
//! Every open bumps a generation counter.  A deferred decorate task carries
//! the generation it was queued for and aborts if a later open or a close has
//! happened since, so a stale task can never paint a newer dialogue.
//!
//! # What a decoration is
//!
//! | Status        | Text colour       | Clickable | Pointer-leave colour |
//! |---------------|-------------------|-----------|----------------------|
//! | `Highlighted` | highlight colour  | yes       | highlight colour     |
//! | `Locked`      | locked colour     | no        | locked colour        |
//! | reverted      | idle colour       | yes       | idle colour          |
//!
//! Setting the pointer-leave colour stops the host's hover effect from
//! painting over the decoration when the pointer moves away.

use std::collections::BTreeSet;

use dialogue_core::{Colour, ConfigStore, OptionStatus, TargetId};
use tracing::{debug, trace, warn};

use crate::application::resolve_identity::ContainerCache;
use crate::application::scheduler::DeferredQueue;
use crate::infrastructure::host::{
    CommandKind, ContainerKey, DialogueHost, MenuEntry, OptionCommand, WidgetId,
};
use crate::infrastructure::storage::AssistantSettings;

/// Work the engine performs after the host has finished its update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredTask {
    /// Decorate the options of the dialogue opened at `generation`.
    DecorateOpen { generation: u64 },
    /// Apply a command the player picked from a synthesised menu entry.
    Apply(OptionCommand),
}

/// Where the engine is in the open/close cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationPhase {
    Closed,
    /// Waiting for the deferred decorate task.  `attempts` counts the passes
    /// that found no options yet.
    Opening { generation: u64, attempts: u32 },
    Decorated,
}

/// Colours used to paint decorations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecorationStyle {
    pub highlight: Colour,
    pub locked: Colour,
    pub idle: Colour,
}

impl From<&AssistantSettings> for DecorationStyle {
    fn from(settings: &AssistantSettings) -> Self {
        Self {
            highlight: settings.highlight_colour,
            locked: settings.locked_colour,
            idle: settings.idle_colour,
        }
    }
}

/// The decoration state machine.
#[derive(Debug)]
pub struct DecorationEngine {
    style: DecorationStyle,
    populate_retry_limit: u32,
    phase: DecorationPhase,
    generation: u64,
    decorated: BTreeSet<WidgetId>,
    hidden: Option<WidgetId>,
}

impl DecorationEngine {
    pub fn new(settings: &AssistantSettings) -> Self {
        Self {
            style: DecorationStyle::from(settings),
            // A limit of zero would never look at the options at all.
            populate_retry_limit: settings.populate_retry_limit.max(1),
            phase: DecorationPhase::Closed,
            generation: 0,
            decorated: BTreeSet::new(),
            hidden: None,
        }
    }

    pub fn phase(&self) -> DecorationPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Widgets currently carrying a decoration.
    pub fn decorated(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.decorated.iter().copied()
    }

    pub fn is_decorated(&self, widget: WidgetId) -> bool {
        self.decorated.contains(&widget)
    }

    // ── Per tick ─────────────────────────────────────────────────────────────

    /// Appends Reset / Lock / Highlight entries for each dialogue option in
    /// this frame's menu.
    pub fn add_menu_entries<H: DialogueHost + ?Sized>(
        &self,
        host: &mut H,
        containers: &mut ContainerCache,
        store: &ConfigStore,
        target: Option<TargetId>,
    ) {
        if !host.is_logged_in() || host.is_menu_open() {
            return;
        }
        let Some(target) = target else { return };

        let entries = host.menu_entries();
        let candidates: Vec<WidgetId> = entries
            .iter()
            .filter(|e| !e.is_synthesised())
            .filter_map(|e| e.widget)
            .collect();
        if candidates.is_empty() {
            return;
        }
        let Some(container) = containers.get(&*host, ContainerKey::DialogueOptions) else {
            return;
        };

        let mut seen = BTreeSet::new();
        for widget in candidates {
            if host.parent(widget) != Some(container) || !seen.insert(widget) {
                continue;
            }
            // Called twice in one frame: the entries are already there.
            let already_added = entries
                .iter()
                .filter_map(MenuEntry::command)
                .any(|c| c.widget == widget);
            if already_added {
                continue;
            }
            let Some(option) = host.text(widget) else { continue };

            let status = store.status(target, &option);
            let kinds = [
                (CommandKind::Reset, status != OptionStatus::None),
                (CommandKind::Lock, status != OptionStatus::Locked),
                (CommandKind::Highlight, status != OptionStatus::Highlighted),
            ];
            for (kind, wanted) in kinds {
                if wanted {
                    host.append_menu_entry(MenuEntry::synthesised(OptionCommand {
                        kind,
                        target,
                        option: option.clone(),
                        widget,
                    }));
                }
            }
        }
    }

    // ── Open / close ─────────────────────────────────────────────────────────

    /// Starts a new open cycle and queues its decorate task.
    pub fn on_open<H: DialogueHost + ?Sized>(
        &mut self,
        host: &mut H,
        containers: &mut ContainerCache,
        store: &ConfigStore,
        target: Option<TargetId>,
        queue: &mut DeferredQueue<DeferredTask>,
    ) {
        self.revert_all(host);
        self.unhide(host);

        self.generation += 1;
        self.phase = DecorationPhase::Opening {
            generation: self.generation,
            attempts: 0,
        };

        // Keep the options out of reach until their locks are painted.
        if target.is_some_and(|t| store.get(t).is_some()) {
            if let Some(container) = containers.get(&*host, ContainerKey::DialogueOptions) {
                host.set_hidden(container, true);
                self.hidden = Some(container);
            }
        }

        drop_pending_decorates(queue);
        queue.defer(DeferredTask::DecorateOpen {
            generation: self.generation,
        });
        trace!(generation = self.generation, "dialogue opened; decoration queued");
    }

    /// Runs a deferred decorate task.
    pub fn run_decorate<H: DialogueHost + ?Sized>(
        &mut self,
        host: &mut H,
        containers: &mut ContainerCache,
        store: &ConfigStore,
        target: Option<TargetId>,
        generation: u64,
        queue: &mut DeferredQueue<DeferredTask>,
    ) {
        let attempts = match self.phase {
            DecorationPhase::Opening {
                generation: current,
                attempts,
            } if current == generation => attempts,
            _ => {
                trace!(generation, "stale decorate task dropped");
                return;
            }
        };

        let Some(target) = target else {
            debug!("no conversation identity; dialogue left undecorated");
            self.unhide(host);
            self.phase = DecorationPhase::Closed;
            return;
        };

        let options: Vec<WidgetId> = containers
            .get(&*host, ContainerKey::DialogueOptions)
            .map(|container| host.children(container))
            .unwrap_or_default()
            .into_iter()
            .filter(|w| host.has_listener(*w))
            .collect();

        if options.is_empty() {
            let attempts = attempts + 1;
            if attempts >= self.populate_retry_limit {
                warn!(attempts, "dialogue options never appeared; giving up on decoration");
                self.unhide(host);
                self.phase = DecorationPhase::Closed;
            } else {
                trace!(attempts, "dialogue options not populated yet; retrying");
                self.phase = DecorationPhase::Opening {
                    generation,
                    attempts,
                };
                queue.defer(DeferredTask::DecorateOpen { generation });
            }
            return;
        }

        for widget in options {
            let Some(text) = host.text(widget) else { continue };
            let status = store.status(target, &text);
            if status != OptionStatus::None {
                self.refresh(host, widget, status);
            }
        }
        self.unhide(host);
        self.phase = DecorationPhase::Decorated;
        debug!(target_id = %target, decorated = self.decorated.len(), "dialogue options decorated");
    }

    /// Reverts every decoration and closes the cycle.
    pub fn on_close<H: DialogueHost + ?Sized>(
        &mut self,
        host: &mut H,
        queue: &mut DeferredQueue<DeferredTask>,
    ) {
        drop_pending_decorates(queue);
        self.revert_all(host);
        self.unhide(host);
        self.generation += 1;
        self.phase = DecorationPhase::Closed;
    }

    /// Forgets all widget state without touching the host, whose widgets are
    /// already gone.
    pub fn end_session(&mut self) {
        self.decorated.clear();
        self.hidden = None;
        self.generation += 1;
        self.phase = DecorationPhase::Closed;
    }

    // ── User actions ─────────────────────────────────────────────────────────

    /// Applies a command to the store and repaints its widget.
    ///
    /// Returns `true` when the store changed and must be persisted.
    pub fn apply_command<H: DialogueHost + ?Sized>(
        &mut self,
        host: &mut H,
        store: &mut ConfigStore,
        command: &OptionCommand,
        npc_name: Option<&str>,
    ) -> bool {
        let status = match command.kind {
            CommandKind::Highlight | CommandKind::Lock => {
                let config = store.get_or_create(command.target);
                if let Some(name) = npc_name {
                    config.remember_npc_name(name);
                }
                if command.kind == CommandKind::Lock {
                    config.set_locked(&command.option);
                } else {
                    config.set_highlighted(&command.option);
                }
                config.status(&command.option)
            }
            CommandKind::Reset => match store.get_mut(command.target) {
                Some(config) => {
                    config.reset(&command.option);
                    OptionStatus::None
                }
                None => {
                    trace!(target_id = %command.target, "reset on a target with no saved options");
                    return false;
                }
            },
        };
        debug!(target_id = %command.target, option = %command.option, ?status, "option status changed");

        // The host may have reused the widget for another line since the click.
        if host.text(command.widget).as_deref() == Some(command.option.as_str()) {
            self.refresh(host, command.widget, status);
        }
        true
    }

    /// `true` when `entry` clicks a dialogue option that is locked for `target`.
    pub fn is_locked_click<H: DialogueHost + ?Sized>(
        &self,
        host: &H,
        containers: &mut ContainerCache,
        store: &ConfigStore,
        target: Option<TargetId>,
        entry: &MenuEntry,
    ) -> bool {
        if entry.is_synthesised() {
            return false;
        }
        let (Some(target), Some(widget)) = (target, entry.widget) else {
            return false;
        };
        let Some(container) = containers.get(host, ContainerKey::DialogueOptions) else {
            return false;
        };
        if host.parent(widget) != Some(container) {
            return false;
        }
        host.text(widget)
            .is_some_and(|text| store.is_locked(target, &text))
    }

    // ── Painting ─────────────────────────────────────────────────────────────

    /// Revert, then paint `status`.
    fn refresh<H: DialogueHost + ?Sized>(&mut self, host: &mut H, widget: WidgetId, status: OptionStatus) {
        self.revert(host, widget);
        let colour = match status {
            OptionStatus::None => return,
            OptionStatus::Highlighted => self.style.highlight,
            OptionStatus::Locked => {
                host.set_click_enabled(widget, false);
                self.style.locked
            }
        };
        host.set_text_colour(widget, colour);
        host.set_pointer_leave_colour(widget, colour);
        self.decorated.insert(widget);
    }

    fn revert<H: DialogueHost + ?Sized>(&mut self, host: &mut H, widget: WidgetId) {
        host.set_click_enabled(widget, true);
        host.set_text_colour(widget, self.style.idle);
        host.set_pointer_leave_colour(widget, self.style.idle);
        self.decorated.remove(&widget);
    }

    fn revert_all<H: DialogueHost + ?Sized>(&mut self, host: &mut H) {
        let widgets = std::mem::take(&mut self.decorated);
        if !widgets.is_empty() {
            trace!(count = widgets.len(), "reverting decorations");
        }
        for widget in widgets {
            self.revert(host, widget);
        }
    }

    fn unhide<H: DialogueHost + ?Sized>(&mut self, host: &mut H) {
        if let Some(container) = self.hidden.take() {
            host.set_hidden(container, false);
        }
    }
}

/// Removes queued decorate tasks so at most one is ever outstanding.
fn drop_pending_decorates(queue: &mut DeferredQueue<DeferredTask>) {
    queue.retain(|task| !matches!(task, DeferredTask::DecorateOpen { .. }));
}
