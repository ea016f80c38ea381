//! Mock host client for unit and integration testing.
//!
//! Models just enough of a real client to drive the assistant: a widget tree
//! with named containers, the per-frame menu, the local player's interaction
//! target, and the click-consumption flag.

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};

use dialogue_core::Colour;

use super::{Actor, ContainerKey, DialogueHost, MenuEntry, WidgetId};

/// State of a single mock widget.
#[derive(Debug, Clone)]
struct MockWidget {
    parent: Option<WidgetId>,
    children: Vec<WidgetId>,
    text: Option<String>,
    has_listener: bool,
    text_colour: Colour,
    hidden: bool,
    click_enabled: bool,
    pointer_leave_colour: Option<Colour>,
}

/// An in-memory implementation of [`DialogueHost`].
pub struct MockHost {
    widgets: BTreeMap<WidgetId, MockWidget>,
    containers: HashMap<ContainerKey, WidgetId>,
    next_id: u32,
    logged_in: bool,
    menu_open: bool,
    interaction: Option<Actor>,
    proposed: Vec<MenuEntry>,
    appended: Vec<MenuEntry>,
    consumed: u32,
    container_lookups: Cell<u32>,
}

impl MockHost {
    /// Creates a logged-in host with an empty widget tree.
    pub fn new() -> Self {
        Self {
            widgets: BTreeMap::new(),
            containers: HashMap::new(),
            next_id: 1,
            logged_in: true,
            menu_open: false,
            interaction: None,
            proposed: Vec::new(),
            appended: Vec::new(),
            consumed: 0,
            container_lookups: Cell::new(0),
        }
    }

    // ── Scene ────────────────────────────────────────────────────────────────

    pub fn set_logged_in(&mut self, logged_in: bool) {
        self.logged_in = logged_in;
    }

    pub fn set_local_interaction(&mut self, actor: Option<Actor>) {
        self.interaction = actor;
    }

    // ── Widget tree ──────────────────────────────────────────────────────────

    /// Adds a widget under `parent` and returns its id.
    pub fn add_widget(
        &mut self,
        parent: Option<WidgetId>,
        text: Option<&str>,
        has_listener: bool,
    ) -> WidgetId {
        let id = WidgetId(self.next_id);
        self.next_id += 1;
        self.widgets.insert(
            id,
            MockWidget {
                parent,
                children: Vec::new(),
                text: text.map(str::to_string),
                has_listener,
                text_colour: Colour::IDLE,
                hidden: false,
                click_enabled: true,
                pointer_leave_colour: None,
            },
        );
        if let Some(parent) = parent.and_then(|p| self.widgets.get_mut(&p)) {
            parent.children.push(id);
        }
        id
    }

    /// Adds a widget and registers it as the container for `key`.
    pub fn add_container(&mut self, key: ContainerKey, parent: Option<WidgetId>) -> WidgetId {
        let id = self.add_widget(parent, None, false);
        self.containers.insert(key, id);
        id
    }

    /// Adds a clickable dialogue choice under `container`.
    pub fn add_option(&mut self, container: WidgetId, text: &str) -> WidgetId {
        self.add_widget(Some(container), Some(text), true)
    }

    /// Adds a non-clickable text line (such as a "Select an option" title).
    pub fn add_label(&mut self, container: WidgetId, text: &str) -> WidgetId {
        self.add_widget(Some(container), Some(text), false)
    }

    pub fn set_text(&mut self, widget: WidgetId, text: &str) {
        if let Some(w) = self.widgets.get_mut(&widget) {
            w.text = Some(text.to_string());
        }
    }

    /// Removes every child of `widget`, recursively.
    pub fn clear_children(&mut self, widget: WidgetId) {
        let children = self
            .widgets
            .get_mut(&widget)
            .map(|w| std::mem::take(&mut w.children))
            .unwrap_or_default();
        for child in children {
            self.clear_children(child);
            self.widgets.remove(&child);
        }
    }

    /// Removes a container and everything under it.
    pub fn remove_container(&mut self, key: ContainerKey) {
        if let Some(id) = self.containers.remove(&key) {
            self.clear_children(id);
            if let Some(parent) = self.widgets.remove(&id).and_then(|w| w.parent) {
                if let Some(p) = self.widgets.get_mut(&parent) {
                    p.children.retain(|c| *c != id);
                }
            }
        }
    }

    // ── Widget observations ──────────────────────────────────────────────────

    pub fn text_colour(&self, widget: WidgetId) -> Option<Colour> {
        self.widgets.get(&widget).map(|w| w.text_colour)
    }

    pub fn is_hidden(&self, widget: WidgetId) -> bool {
        self.widgets.get(&widget).is_some_and(|w| w.hidden)
    }

    pub fn is_click_enabled(&self, widget: WidgetId) -> bool {
        self.widgets.get(&widget).is_some_and(|w| w.click_enabled)
    }

    pub fn pointer_leave_colour(&self, widget: WidgetId) -> Option<Colour> {
        self.widgets.get(&widget).and_then(|w| w.pointer_leave_colour)
    }

    /// Simulates the pointer leaving `widget`: the host restores the colour
    /// registered for that moment, if any.
    pub fn pointer_leave(&mut self, widget: WidgetId) {
        if let Some(w) = self.widgets.get_mut(&widget) {
            if let Some(colour) = w.pointer_leave_colour {
                w.text_colour = colour;
            }
        }
    }

    /// Simulates a host hover effect repainting the widget.
    pub fn hover(&mut self, widget: WidgetId, colour: Colour) {
        if let Some(w) = self.widgets.get_mut(&widget) {
            w.text_colour = colour;
        }
    }

    /// Number of `find_container` calls made so far.
    pub fn container_lookups(&self) -> u32 {
        self.container_lookups.get()
    }

    // ── Menu ─────────────────────────────────────────────────────────────────

    pub fn set_menu_open(&mut self, open: bool) {
        self.menu_open = open;
    }

    /// Proposes a native entry for the current frame.
    pub fn propose_menu_entry(&mut self, entry: MenuEntry) {
        self.proposed.push(entry);
    }

    /// Starts a new frame: the host rebuilds its menu from scratch.
    pub fn new_frame(&mut self) {
        self.proposed.clear();
        self.appended.clear();
    }

    /// Entries appended by the assistant this frame.
    pub fn appended_entries(&self) -> &[MenuEntry] {
        &self.appended
    }

    /// Number of clicks the assistant has consumed.
    pub fn consumed_clicks(&self) -> u32 {
        self.consumed
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogueHost for MockHost {
    fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    fn local_interaction(&self) -> Option<Actor> {
        self.interaction.clone()
    }

    fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    fn menu_entries(&self) -> Vec<MenuEntry> {
        self.proposed.iter().chain(&self.appended).cloned().collect()
    }

    fn append_menu_entry(&mut self, entry: MenuEntry) {
        self.appended.push(entry);
    }

    fn consume_click(&mut self) {
        self.consumed += 1;
    }

    fn find_container(&self, key: ContainerKey) -> Option<WidgetId> {
        self.container_lookups.set(self.container_lookups.get() + 1);
        self.containers.get(&key).copied()
    }

    fn children(&self, widget: WidgetId) -> Vec<WidgetId> {
        self.widgets
            .get(&widget)
            .map(|w| w.children.clone())
            .unwrap_or_default()
    }

    fn parent(&self, widget: WidgetId) -> Option<WidgetId> {
        self.widgets.get(&widget).and_then(|w| w.parent)
    }

    fn text(&self, widget: WidgetId) -> Option<String> {
        self.widgets.get(&widget).and_then(|w| w.text.clone())
    }

    fn has_listener(&self, widget: WidgetId) -> bool {
        self.widgets.get(&widget).is_some_and(|w| w.has_listener)
    }

    fn set_text_colour(&mut self, widget: WidgetId, colour: Colour) {
        if let Some(w) = self.widgets.get_mut(&widget) {
            w.text_colour = colour;
        }
    }

    fn set_hidden(&mut self, widget: WidgetId, hidden: bool) {
        if let Some(w) = self.widgets.get_mut(&widget) {
            w.hidden = hidden;
        }
    }

    fn set_click_enabled(&mut self, widget: WidgetId, enabled: bool) {
        if let Some(w) = self.widgets.get_mut(&widget) {
            w.click_enabled = enabled;
        }
    }

    fn set_pointer_leave_colour(&mut self, widget: WidgetId, colour: Colour) {
        if let Some(w) = self.widgets.get_mut(&widget) {
            w.pointer_leave_colour = Some(colour);
        }
    }
}
