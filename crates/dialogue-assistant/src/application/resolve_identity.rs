//! IdentityResolver: which saved configuration applies to the dialogue on screen.
//!
//! Two sources feed the current [`TargetId`]:
//!
//! 1. **Entity identity.**  When the local player starts interacting with an
//!    NPC, the NPC's durable type id becomes the identity and an NPC
//!    conversation is marked active.  While it is active no menu click can
//!    replace the identity.
//! 2. **Fallback textual identity.**  Otherwise a menu click that
//!    [`ClickOrigin::starts_conversation`] replaces the identity with
//!    [`menu_identity`] of the clicked entry.
//!
//! Whether a click is allowed to start a conversation depends on where it came
//! from, which needs the host widget tree.  [`ContainerCache`] memoises the
//! container lookups so the tree is not searched on every click.

use std::collections::HashMap;

use dialogue_core::{classify_click, menu_identity, ClickOrigin, RegionHit, TargetId};
use tracing::{debug, trace};

use crate::infrastructure::host::{Actor, ContainerKey, DialogueHost, MenuEntry, WidgetId};

/// How many widgets are inspected for region membership, counting the clicked
/// widget itself.
pub const MAX_ANCESTOR_DEPTH: usize = 10;

/// Containers that make up the conversation's own interface.
const DIALOGUE_REGIONS: [ContainerKey; 2] = [ContainerKey::Chatbox, ContainerKey::DialogueOptions];

// ── Container cache ───────────────────────────────────────────────────────────

/// Memoised [`ContainerKey`] → [`WidgetId`] lookups.
///
/// Only hits are cached.  A container that is not rendered yet is looked up
/// again on the next query.  Widget ids do not survive the session, so the
/// owner must call [`ContainerCache::invalidate`] when it ends.
#[derive(Debug, Default)]
pub struct ContainerCache {
    ids: HashMap<ContainerKey, WidgetId>,
}

impl ContainerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the container's widget id, asking the host only on a miss.
    pub fn get<H: DialogueHost + ?Sized>(&mut self, host: &H, key: ContainerKey) -> Option<WidgetId> {
        if let Some(id) = self.ids.get(&key) {
            return Some(*id);
        }
        let id = host.find_container(key)?;
        trace!(?key, widget = id.0, "discovered container");
        self.ids.insert(key, id);
        Some(id)
    }

    /// Returns the cached id without asking the host.
    pub fn peek(&self, key: ContainerKey) -> Option<WidgetId> {
        self.ids.get(&key).copied()
    }

    /// Forgets one container, e.g. because the host has just rebuilt it.
    pub fn forget(&mut self, key: ContainerKey) {
        self.ids.remove(&key);
    }

    /// Forgets every container.
    pub fn invalidate(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Finds which known region, if any, `widget` sits under.
///
/// Dialogue regions win over launcher regions when a widget is under both.
pub fn locate_region<H: DialogueHost + ?Sized>(
    host: &H,
    containers: &mut ContainerCache,
    widget: Option<WidgetId>,
    launcher_regions: &[ContainerKey],
) -> RegionHit {
    let Some(widget) = widget else {
        return RegionHit::Outside;
    };

    let dialogue: Vec<WidgetId> = DIALOGUE_REGIONS
        .iter()
        .filter_map(|key| containers.get(host, *key))
        .collect();
    let launchers: Vec<WidgetId> = launcher_regions
        .iter()
        .filter_map(|key| containers.get(host, *key))
        .collect();
    if dialogue.is_empty() && launchers.is_empty() {
        return RegionHit::Undiscovered;
    }

    let mut launcher_hit = false;
    let mut current = Some(widget);
    for _ in 0..MAX_ANCESTOR_DEPTH {
        let Some(id) = current else { break };
        if dialogue.contains(&id) {
            return RegionHit::Dialogue;
        }
        launcher_hit |= launchers.contains(&id);
        current = host.parent(id);
    }

    if launcher_hit {
        RegionHit::Launcher
    } else {
        RegionHit::Outside
    }
}

// ── Resolver ──────────────────────────────────────────────────────────────────

/// Tracks the identity of the conversation the player is in.
#[derive(Debug, Default)]
pub struct IdentityResolver {
    current: Option<TargetId>,
    npc_active: bool,
    npc_name: Option<String>,
}

impl IdentityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The resolved identity, if any conversation has been seen.
    pub fn current(&self) -> Option<TargetId> {
        self.current
    }

    /// `true` while the local player is interacting with an NPC.
    pub fn npc_active(&self) -> bool {
        self.npc_active
    }

    /// The NPC's display name, when `target` is the identity of the NPC the
    /// player last interacted with.
    pub fn npc_name_for(&self, target: TargetId) -> Option<&str> {
        if self.current == Some(target) {
            self.npc_name.as_deref()
        } else {
            None
        }
    }

    /// Applies a change of interaction target.
    pub fn on_interacting_changed(&mut self, from_local_player: bool, target: Option<&Actor>) {
        if !from_local_player {
            return;
        }

        match target {
            Some(Actor::Npc { type_id, name }) => {
                self.npc_active = true;
                match TargetId::new(*type_id) {
                    Some(id) => {
                        if self.current != Some(id) {
                            debug!(target_id = %id, npc = %name, "conversation identity set from NPC");
                        }
                        self.current = Some(id);
                        self.npc_name = Some(name.clone());
                    }
                    None => {
                        debug!(type_id, "NPC has a reserved type id; identity unresolved");
                        self.current = None;
                        self.npc_name = None;
                    }
                }
            }
            Some(Actor::Player { .. }) => {}
            None => {
                if self.npc_active {
                    trace!("NPC interaction ended; keeping last identity");
                }
                self.npc_active = false;
            }
        }
    }

    /// Classifies a menu click and, if it may start a conversation and no NPC
    /// conversation is active, replaces the identity.
    pub fn on_menu_click<H: DialogueHost + ?Sized>(
        &mut self,
        host: &H,
        containers: &mut ContainerCache,
        entry: &MenuEntry,
        launcher_regions: &[ContainerKey],
    ) -> ClickOrigin {
        let synthesised = entry.is_synthesised();
        // The region only matters for clicks the whitelist does not settle.
        let region = if synthesised || entry.action.is_world_interaction() {
            RegionHit::Outside
        } else {
            locate_region(host, containers, entry.widget, launcher_regions)
        };
        let origin = classify_click(entry.action, synthesised, region);
        trace!(action = %entry.action, ?origin, "classified menu click");

        if origin.starts_conversation() && !self.npc_active {
            let id = menu_identity(&entry.option, &entry.target);
            if self.current != Some(id) {
                debug!(target_id = %id, option = %entry.option, label = %entry.target, "conversation identity set from menu click");
            }
            self.current = Some(id);
            self.npc_name = None;
        }
        origin
    }

    /// Forgets everything about the current conversation.
    pub fn end_session(&mut self) {
        self.current = None;
        self.npc_active = false;
        self.npc_name = None;
    }
}
