//! Per-target dialogue option state.
//!
//! The [`ConfigStore`] maps a conversation target to a [`TargetConfig`], and
//! each `TargetConfig` maps an option's display text to an [`OptionStatus`].
//!
//! Option text is the key rather than a positional index: the same NPC can
//! offer a different number of choices, in a different order, depending on
//! quest progress or dialogue branch.
//!
//! # Absence is `None`
//!
//! `OptionStatus::None` is never stored.  Resetting an option removes its map
//! entry, so a config only ever holds `Highlighted` or `Locked` values.

use std::collections::{btree_map, BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stand-in for hash values that collide with the reserved "no target" ids.
const RESERVED_HASH_FALLBACK: i32 = 0x5bd1_e995;

/// Stable identity of a conversation target.
///
/// Either an NPC's durable type id or a synthetic id hashed from menu text
/// (see [`crate::domain::identity::menu_identity`]).  The raw values `0` and
/// `-1` mean "no target" and can never be held by a `TargetId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct TargetId(i32);

impl TargetId {
    /// Wraps `raw`, or returns `None` for the reserved "no target" values.
    pub fn new(raw: i32) -> Option<Self> {
        if Self::is_reserved(raw) {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// Wraps a hash value, folding the reserved values onto a fixed id.
    pub fn from_hash(hash: i32) -> Self {
        if Self::is_reserved(hash) {
            Self(RESERVED_HASH_FALLBACK)
        } else {
            Self(hash)
        }
    }

    /// Returns the raw integer used as the persisted map key.
    pub fn value(self) -> i32 {
        self.0
    }

    /// `true` for the values that mean "no target".
    pub fn is_reserved(raw: i32) -> bool {
        raw == 0 || raw == -1
    }
}

impl TryFrom<i32> for TargetId {
    type Error = ReservedTargetId;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        Self::new(raw).ok_or(ReservedTargetId(raw))
    }
}

impl From<TargetId> for i32 {
    fn from(id: TargetId) -> Self {
        id.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returned when a reserved raw value is converted into a [`TargetId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("target id {0} is reserved for \"no target\"")]
pub struct ReservedTargetId(pub i32);

/// Status of a single dialogue option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionStatus {
    /// No decoration.  Represented by the absence of a map entry.
    #[default]
    None,
    /// Drawn in the highlight colour.
    Highlighted,
    /// Drawn in the locked colour with click handling disabled.
    Locked,
}

/// Option statuses for one conversation target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetConfig {
    #[serde(alias = "npcId")]
    target_id: TargetId,
    /// Display name of the NPC this config was created for, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    npc_name: Option<String>,
    #[serde(default)]
    option_map: HashMap<String, OptionStatus>,
}

impl TargetConfig {
    /// Creates an empty config for `target_id`.
    pub fn new(target_id: TargetId) -> Self {
        Self {
            target_id,
            npc_name: None,
            option_map: HashMap::new(),
        }
    }

    /// Creates an empty config that remembers the NPC's display name.
    pub fn with_npc_name(target_id: TargetId, npc_name: impl Into<String>) -> Self {
        Self {
            npc_name: Some(npc_name.into()),
            ..Self::new(target_id)
        }
    }

    pub fn target_id(&self) -> TargetId {
        self.target_id
    }

    pub fn npc_name(&self) -> Option<&str> {
        self.npc_name.as_deref()
    }

    /// Records the NPC display name if none is known yet.
    pub fn remember_npc_name(&mut self, name: &str) {
        if self.npc_name.is_none() && !name.is_empty() {
            self.npc_name = Some(name.to_string());
        }
    }

    pub fn status(&self, option: &str) -> OptionStatus {
        self.option_map.get(option).copied().unwrap_or_default()
    }

    pub fn is_highlighted(&self, option: &str) -> bool {
        self.status(option) == OptionStatus::Highlighted
    }

    pub fn is_locked(&self, option: &str) -> bool {
        self.status(option) == OptionStatus::Locked
    }

    pub fn set_highlighted(&mut self, option: &str) {
        self.set_status(option, OptionStatus::Highlighted);
    }

    pub fn set_locked(&mut self, option: &str) {
        self.set_status(option, OptionStatus::Locked);
    }

    pub fn reset(&mut self, option: &str) {
        self.option_map.remove(option);
    }

    /// Overwrites the status of `option`.  `OptionStatus::None` removes it.
    pub fn set_status(&mut self, option: &str, status: OptionStatus) {
        match status {
            OptionStatus::None => {
                self.option_map.remove(option);
            }
            other => {
                self.option_map.insert(option.to_string(), other);
            }
        }
    }

    /// Number of decorated options.
    pub fn option_count(&self) -> usize {
        self.option_map.len()
    }

    /// Drops any stored `None` tags.  Only decoded data can contain them.
    pub(crate) fn prune_none(&mut self) {
        self.option_map.retain(|_, status| *status != OptionStatus::None);
    }

    /// Forces the embedded id to match the key the config is stored under.
    pub(crate) fn rekey(&mut self, target_id: TargetId) {
        self.target_id = target_id;
    }
}

/// Every known [`TargetConfig`], keyed by target identity.
///
/// The store exclusively owns its configs and creates them itself, so the
/// key of every entry always equals the entry's `target_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigStore {
    targets: BTreeMap<TargetId, TargetConfig>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, target: TargetId) -> Option<&TargetConfig> {
        self.targets.get(&target)
    }

    pub fn get_mut(&mut self, target: TargetId) -> Option<&mut TargetConfig> {
        self.targets.get_mut(&target)
    }

    /// Returns the config for `target`, creating an empty one if needed.
    pub fn get_or_create(&mut self, target: TargetId) -> &mut TargetConfig {
        self.targets
            .entry(target)
            .or_insert_with(|| TargetConfig::new(target))
    }

    /// Inserts a config under its own id, replacing any previous config.
    pub fn insert(&mut self, config: TargetConfig) {
        self.targets.insert(config.target_id(), config);
    }

    pub fn status(&self, target: TargetId, option: &str) -> OptionStatus {
        self.get(target)
            .map(|config| config.status(option))
            .unwrap_or_default()
    }

    pub fn is_highlighted(&self, target: TargetId, option: &str) -> bool {
        self.status(target, option) == OptionStatus::Highlighted
    }

    pub fn is_locked(&self, target: TargetId, option: &str) -> bool {
        self.status(target, option) == OptionStatus::Locked
    }

    pub fn set_highlighted(&mut self, target: TargetId, option: &str) {
        self.get_or_create(target).set_highlighted(option);
    }

    pub fn set_locked(&mut self, target: TargetId, option: &str) {
        self.get_or_create(target).set_locked(option);
    }

    /// Clears the status of `option`.  Never creates a config.
    pub fn reset(&mut self, target: TargetId, option: &str) {
        if let Some(config) = self.targets.get_mut(&target) {
            config.reset(option);
        }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, TargetId, TargetConfig> {
        self.targets.iter()
    }

    /// Drops every config.
    pub fn clear(&mut self) {
        self.targets.clear();
    }
}
