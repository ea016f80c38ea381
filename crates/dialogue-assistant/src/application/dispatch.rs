//! DialogueAssistant: the single entry point the host calls into.
//!
//! The host delivers every callback through [`DialogueAssistant::handle`] and
//! calls [`DialogueAssistant::run_deferred`] once at the end of each tick.
//! Everything runs on the host's UI thread, one call at a time, so the
//! assistant owns its state outright and needs no locking.
//!
//! # Event routing
//!
//! | Event                              | Effect                                         |
//! |------------------------------------|------------------------------------------------|
//! | `ClientTick`                       | add Reset / Lock / Highlight menu entries      |
//! | `WidgetLoaded(DialogueOptions)`    | start an open cycle, queue decoration          |
//! | `WidgetClosed(DialogueOptions)`    | revert decorations                             |
//! | `MenuOptionClicked`                | classify for identity, consume locked clicks, queue commands |
//! | `InteractingChanged`               | entity identity                                |
//! | `SessionEnded`                     | drop cached widget ids and pending work        |

use dialogue_core::{ConfigStore, TargetId};
use tracing::{debug, info, trace, warn};

use crate::application::decorate_options::{DecorationEngine, DeferredTask};
use crate::application::resolve_identity::{ContainerCache, IdentityResolver};
use crate::application::scheduler::DeferredQueue;
use crate::infrastructure::host::{ContainerKey, DialogueHost, HostEvent};
use crate::infrastructure::storage::{AssistantSettings, KeyValueStore, OptionStateRepository};

/// Owns the option store and every component that reads or writes it.
pub struct DialogueAssistant<S> {
    settings: AssistantSettings,
    store: ConfigStore,
    repository: OptionStateRepository<S>,
    resolver: IdentityResolver,
    containers: ContainerCache,
    engine: DecorationEngine,
    queue: DeferredQueue<DeferredTask>,
}

impl<S: KeyValueStore> DialogueAssistant<S> {
    /// Creates an assistant with an empty store.  Call
    /// [`DialogueAssistant::start_up`] to load saved options.
    pub fn new(settings: AssistantSettings, repository: OptionStateRepository<S>) -> Self {
        let engine = DecorationEngine::new(&settings);
        Self {
            settings,
            store: ConfigStore::new(),
            repository,
            resolver: IdentityResolver::new(),
            containers: ContainerCache::new(),
            engine,
            queue: DeferredQueue::new(),
        }
    }

    /// Loads the saved store and picks up a conversation already in progress.
    pub fn start_up<H: DialogueHost + ?Sized>(&mut self, host: &H) {
        self.store = self.repository.load();
        if let Some(actor) = host.local_interaction() {
            self.resolver.on_interacting_changed(true, Some(&actor));
        }
        info!(targets = self.store.len(), "dialogue assistant started");
    }

    /// Handles one host callback.
    pub fn handle<H: DialogueHost + ?Sized>(&mut self, host: &mut H, event: HostEvent) {
        match event {
            HostEvent::ClientTick => {
                self.engine.add_menu_entries(
                    host,
                    &mut self.containers,
                    &self.store,
                    self.resolver.current(),
                );
            }
            HostEvent::WidgetLoaded(ContainerKey::DialogueOptions) => {
                // The host rebuilds the options container on every open.
                self.containers.forget(ContainerKey::DialogueOptions);
                self.engine.on_open(
                    host,
                    &mut self.containers,
                    &self.store,
                    self.resolver.current(),
                    &mut self.queue,
                );
            }
            HostEvent::WidgetClosed(ContainerKey::DialogueOptions) => {
                self.engine.on_close(host, &mut self.queue);
                trace!("dialogue closed");
            }
            HostEvent::WidgetLoaded(_) | HostEvent::WidgetClosed(_) => {}
            HostEvent::MenuOptionClicked(entry) => {
                self.resolver.on_menu_click(
                    &*host,
                    &mut self.containers,
                    &entry,
                    &self.settings.launcher_regions,
                );

                if let Some(command) = entry.command() {
                    self.queue.defer(DeferredTask::Apply(command.clone()));
                } else if self.engine.is_locked_click(
                    &*host,
                    &mut self.containers,
                    &self.store,
                    self.resolver.current(),
                    &entry,
                ) {
                    host.consume_click();
                    debug!(option = %entry.option, "click on locked option consumed");
                }
            }
            HostEvent::InteractingChanged {
                from_local_player,
                target,
            } => {
                self.resolver
                    .on_interacting_changed(from_local_player, target.as_ref());
            }
            HostEvent::SessionEnded => {
                self.containers.invalidate();
                self.resolver.end_session();
                self.engine.end_session();
                self.queue.clear();
                debug!("session ended; cached widget state dropped");
            }
        }
    }

    /// Runs the work queued before this call.  Work queued while it runs waits
    /// for the next call.
    pub fn run_deferred<H: DialogueHost + ?Sized>(&mut self, host: &mut H) {
        for task in self.queue.take_due() {
            match task {
                DeferredTask::DecorateOpen { generation } => {
                    self.engine.run_decorate(
                        host,
                        &mut self.containers,
                        &self.store,
                        self.resolver.current(),
                        generation,
                        &mut self.queue,
                    );
                }
                DeferredTask::Apply(command) => {
                    let npc_name = self.resolver.npc_name_for(command.target);
                    let changed =
                        self.engine
                            .apply_command(host, &mut self.store, &command, npc_name);
                    if changed {
                        self.persist();
                    }
                }
            }
        }
    }

    /// Reverts every live decoration and releases all state.
    pub fn shut_down<H: DialogueHost + ?Sized>(&mut self, host: &mut H) {
        self.engine.on_close(host, &mut self.queue);
        self.queue.clear();
        self.containers.invalidate();
        self.resolver.end_session();
        self.store.clear();
        info!("dialogue assistant shut down");
    }

    fn persist(&mut self) {
        match self.repository.save(&self.store) {
            Ok(()) => trace!(targets = self.store.len(), "option store saved"),
            // Not retried: the next change writes the whole store again.
            Err(e) => warn!(error = %e, "could not save dialogue options"),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn current_target(&self) -> Option<TargetId> {
        self.resolver.current()
    }

    pub fn engine(&self) -> &DecorationEngine {
        &self.engine
    }

    pub fn settings(&self) -> &AssistantSettings {
        &self.settings
    }

    pub fn repository(&self) -> &OptionStateRepository<S> {
        &self.repository
    }

    /// Number of tasks waiting for the next [`DialogueAssistant::run_deferred`].
    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::host::mock::MockHost;
    use crate::infrastructure::host::{Actor, CommandKind, MenuEntry, OptionCommand, WidgetId};
    use crate::infrastructure::storage::kv::{MemoryKeyValueStore, MockKeyValueStore, StorageError};
    use crate::infrastructure::storage::{CONFIG_GROUP, STORE_KEY};
    use dialogue_core::{Colour, MenuAction};

    fn hans() -> HostEvent {
        HostEvent::InteractingChanged {
            from_local_player: true,
            target: Some(Actor::Npc {
                type_id: 5,
                name: "Hans".to_string(),
            }),
        }
    }

    fn target(raw: i32) -> TargetId {
        TargetId::new(raw).expect("non-reserved id")
    }

    fn scene() -> (MockHost, WidgetId) {
        let mut host = MockHost::new();
        let chatbox = host.add_container(ContainerKey::Chatbox, None);
        let options = host.add_container(ContainerKey::DialogueOptions, Some(chatbox));
        host.add_container(ContainerKey::Viewport, None);
        (host, options)
    }

    fn assistant() -> DialogueAssistant<MemoryKeyValueStore> {
        DialogueAssistant::new(
            AssistantSettings::default(),
            OptionStateRepository::new(MemoryKeyValueStore::new()),
        )
    }

    fn click(widget: WidgetId, kind: CommandKind, option: &str) -> HostEvent {
        HostEvent::MenuOptionClicked(MenuEntry::synthesised(OptionCommand {
            kind,
            target: target(5),
            option: option.to_string(),
            widget,
        }))
    }

    #[test]
    fn test_start_up_seeds_identity_from_current_interaction() {
        // Arrange
        let (mut host, _) = scene();
        host.set_local_interaction(Some(Actor::Npc {
            type_id: 5,
            name: "Hans".to_string(),
        }));
        let mut assistant = assistant();

        // Act
        assistant.start_up(&host);

        // Assert
        assert_eq!(assistant.current_target(), Some(target(5)));
    }

    #[test]
    fn test_command_is_deferred_then_applied_and_persisted() {
        // Arrange
        let (mut host, options) = scene();
        let ask = host.add_option(options, "Ask about quest");
        let mut assistant = assistant();
        assistant.start_up(&host);
        assistant.handle(&mut host, hans());

        // Act
        assistant.handle(&mut host, click(ask, CommandKind::Lock, "Ask about quest"));
        assert_eq!(assistant.pending_tasks(), 1);
        assert!(assistant.store().is_empty(), "commands never run inside the callback");
        assistant.run_deferred(&mut host);

        // Assert
        assert!(assistant.store().is_locked(target(5), "Ask about quest"));
        assert!(!host.is_click_enabled(ask));
        assert_eq!(host.text_colour(ask), Some(Colour::LOCKED));
        let saved = assistant
            .repository()
            .backend()
            .get(CONFIG_GROUP, STORE_KEY)
            .expect("store written through");
        assert!(saved.contains("\"npcName\":\"Hans\""), "got {saved}");
    }

    #[test]
    fn test_locked_click_is_consumed_and_unlocked_is_not() {
        let (mut host, options) = scene();
        let yes = host.add_option(options, "Yes");
        let no = host.add_option(options, "No");
        let mut assistant = assistant();
        assistant.handle(&mut host, hans());
        assistant.handle(&mut host, click(yes, CommandKind::Lock, "Yes"));
        assistant.run_deferred(&mut host);

        let resume = |w| HostEvent::MenuOptionClicked(MenuEntry::host("Continue", "", MenuAction::ResumeDialogue, Some(w)));
        assistant.handle(&mut host, resume(yes));
        assert_eq!(host.consumed_clicks(), 1);
        assistant.handle(&mut host, resume(no));
        assert_eq!(host.consumed_clicks(), 1);
    }

    #[test]
    fn test_save_failure_is_logged_and_state_kept() {
        // Arrange
        let (mut host, options) = scene();
        let yes = host.add_option(options, "Yes");
        let mut backend = MockKeyValueStore::new();
        backend.expect_load().returning(|_, _| Ok(None));
        backend
            .expect_save()
            .times(1)
            .returning(|_, _, _| Err(StorageError::NoPlatformConfigDir));
        let mut assistant =
            DialogueAssistant::new(AssistantSettings::default(), OptionStateRepository::new(backend));
        assistant.start_up(&host);
        assistant.handle(&mut host, hans());

        // Act
        assistant.handle(&mut host, click(yes, CommandKind::Highlight, "Yes"));
        assistant.run_deferred(&mut host);

        // Assert
        assert!(assistant.store().is_highlighted(target(5), "Yes"));
    }

    #[test]
    fn test_unrelated_widget_events_are_ignored() {
        let (mut host, _) = scene();
        let mut assistant = assistant();

        assistant.handle(&mut host, HostEvent::WidgetLoaded(ContainerKey::Other(231)));
        assistant.handle(&mut host, HostEvent::WidgetClosed(ContainerKey::Chatbox));

        assert_eq!(assistant.pending_tasks(), 0);
    }

    #[test]
    fn test_session_end_drops_pending_work_and_identity() {
        let (mut host, _) = scene();
        let mut assistant = assistant();
        assistant.handle(&mut host, hans());
        assistant.handle(&mut host, HostEvent::WidgetLoaded(ContainerKey::DialogueOptions));

        assistant.handle(&mut host, HostEvent::SessionEnded);

        assert_eq!(assistant.pending_tasks(), 0);
        assert_eq!(assistant.current_target(), None);
    }

    #[test]
    fn test_shut_down_reverts_and_clears_store() {
        // Arrange
        let (mut host, options) = scene();
        let yes = host.add_option(options, "Yes");
        let mut assistant = assistant();
        assistant.handle(&mut host, hans());
        assistant.handle(&mut host, click(yes, CommandKind::Lock, "Yes"));
        assistant.run_deferred(&mut host);

        // Act
        assistant.shut_down(&mut host);

        // Assert
        assert!(host.is_click_enabled(yes));
        assert_eq!(host.text_colour(yes), Some(Colour::IDLE));
        assert!(assistant.store().is_empty());
        assert!(
            assistant.repository().backend().get(CONFIG_GROUP, STORE_KEY).is_some(),
            "shutdown clears memory, not the saved copy"
        );
    }
}
