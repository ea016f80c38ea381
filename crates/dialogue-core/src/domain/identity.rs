//! Conversation identity rules that need no host access.
//!
//! Two things live here:
//!
//! - [`menu_identity`]: the fallback identity used when the player is not
//!   talking to an NPC entity, derived from the text of the clicked menu entry.
//! - [`classify_click`]: the gate that decides whether a menu click may start
//!   a new conversation (and therefore replace the current identity) or
//!   belongs to something that must leave it alone.
//!
//! # The world whitelist
//!
//! [`MenuAction`] is a closed list of the host action types this crate knows
//! about.  Only the object and NPC option slots 1–5 count as "the player did
//! something in the world".  When the host adds new action types, this enum
//! and [`MenuAction::is_world_interaction`] are the places to extend.

use std::fmt;

use crate::domain::option_state::TargetId;

/// Substring marking a menu target that proxies a remote conversation with an
/// NPC (for example the NPC Contact spell).
pub const PROXY_CHANNEL_MARKER: &str = "NPC Contact";

/// Host menu action types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    /// Option slot 1–5 on a scene object ("Search", "Open", ...).
    ObjectOption(u8),
    /// Option slot 1–5 on an NPC ("Talk-to", "Trade", ...).
    NpcOption(u8),
    /// Option slot 1–5 on another player.
    PlayerOption(u8),
    /// Option slot 1–5 on a ground item.
    GroundItemOption(u8),
    /// A click on an interface widget (chatbox, spellbook, inventory, ...).
    WidgetOption,
    /// "Click here to continue" style dialogue advancement.
    ResumeDialogue,
    ExamineObject,
    ExamineNpc,
    WalkHere,
    Cancel,
    /// An entry created by a client-side extension rather than the game.
    Custom,
}

impl MenuAction {
    /// Valid option slots for the world-option action types.
    pub const OPTION_SLOTS: std::ops::RangeInclusive<u8> = 1..=5;

    /// `true` for object and NPC option slots 1–5.
    pub fn is_world_interaction(self) -> bool {
        match self {
            Self::ObjectOption(slot) | Self::NpcOption(slot) => Self::OPTION_SLOTS.contains(&slot),
            _ => false,
        }
    }
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ObjectOption(slot) => write!(f, "object option {slot}"),
            Self::NpcOption(slot) => write!(f, "npc option {slot}"),
            Self::PlayerOption(slot) => write!(f, "player option {slot}"),
            Self::GroundItemOption(slot) => write!(f, "ground item option {slot}"),
            Self::WidgetOption => f.write_str("widget option"),
            Self::ResumeDialogue => f.write_str("resume dialogue"),
            Self::ExamineObject => f.write_str("examine object"),
            Self::ExamineNpc => f.write_str("examine npc"),
            Self::WalkHere => f.write_str("walk here"),
            Self::Cancel => f.write_str("cancel"),
            Self::Custom => f.write_str("custom"),
        }
    }
}

/// Which known UI region, if any, a clicked widget sits under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionHit {
    /// Under the chatbox / dialogue region.
    Dialogue,
    /// Under a region whose clicks may open a conversation (the viewport by default).
    Launcher,
    /// Under neither, or the click carried no widget.
    Outside,
    /// The regions have not been rendered yet this session.
    Undiscovered,
}

/// Where a menu click came from, as far as conversation identity is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOrigin {
    /// One of the entries this crate synthesised.
    Assistant,
    /// A whitelisted world action.
    World,
    /// A click inside a launcher region.
    Launcher,
    /// A click inside the conversation's own interface.
    DialogueInterface,
    /// Any other interface click.
    Interface,
}

impl ClickOrigin {
    /// `true` when a click of this origin may replace the fallback identity.
    pub fn starts_conversation(self) -> bool {
        matches!(self, Self::World | Self::Launcher)
    }
}

/// Classifies a menu click.
///
/// Synthesised entries come first so they can never reclassify the identity,
/// whatever their action type.  An undiscovered region is treated like
/// [`RegionHit::Outside`].
pub fn classify_click(action: MenuAction, synthesised: bool, region: RegionHit) -> ClickOrigin {
    if synthesised {
        return ClickOrigin::Assistant;
    }
    if action.is_world_interaction() {
        return ClickOrigin::World;
    }
    match region {
        RegionHit::Dialogue => ClickOrigin::DialogueInterface,
        RegionHit::Launcher => ClickOrigin::Launcher,
        RegionHit::Outside | RegionHit::Undiscovered => ClickOrigin::Interface,
    }
}

/// Order-sensitive 32-bit polynomial hash over UTF-16 code units.
///
/// `h = h * 31 + unit`, wrapping.  Stable across platforms and releases, which
/// matters because the result is persisted as a store key.
pub fn text_hash(text: &str) -> i32 {
    text.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Removes the proxy-channel marker from a menu target label.
///
/// `"NPC Contact Hans"` becomes `"Hans"` and a bare `"NPC Contact"` becomes
/// `""`, so a proxied conversation lands on the same identity as the direct one.
pub fn normalise_target(target: &str) -> &str {
    match target.find(PROXY_CHANNEL_MARKER) {
        Some(start) => {
            let before = target[..start].trim();
            let after = target[start + PROXY_CHANNEL_MARKER.len()..].trim();
            if before.is_empty() {
                after
            } else if after.is_empty() {
                before
            } else {
                // Marker in the middle of a label: nothing sensible to keep.
                ""
            }
        }
        None => target,
    }
}

/// Fallback identity for a conversation started from a menu click.
pub fn menu_identity(option: &str, target: &str) -> TargetId {
    let mut label = String::with_capacity(option.len() + target.len());
    label.push_str(option);
    label.push_str(normalise_target(target));

    TargetId::from_hash(text_hash(&label))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Hashing ───────────────────────────────────────────────────────────────

    #[test]
    fn test_text_hash_of_empty_string_is_zero() {
        assert_eq!(text_hash(""), 0);
    }

    #[test]
    fn test_text_hash_matches_polynomial_definition() {
        // "ab" = 'a' * 31 + 'b' = 97 * 31 + 98
        assert_eq!(text_hash("ab"), 97 * 31 + 98);
    }

    #[test]
    fn test_text_hash_is_order_sensitive() {
        assert_ne!(text_hash("ab"), text_hash("ba"));
    }

    #[test]
    fn test_menu_identity_is_deterministic() {
        assert_eq!(
            menu_identity("Search", "Bookcase"),
            menu_identity("Search", "Bookcase")
        );
    }

    #[test]
    fn test_menu_identity_never_returns_reserved_value() {
        // The empty label hashes to 0, which is reserved.
        let id = menu_identity("", "");
        assert!(!TargetId::is_reserved(id.value()));
    }

    // ── Proxy normalisation ───────────────────────────────────────────────────

    #[test]
    fn test_proxy_target_collides_with_direct_target() {
        assert_eq!(
            menu_identity("Talk-to", "Hans"),
            menu_identity("Talk-to", "NPC Contact Hans")
        );
    }

    #[test]
    fn test_bare_proxy_marker_normalises_to_empty() {
        assert_eq!(normalise_target("NPC Contact"), "");
        assert_eq!(menu_identity("Honest Jimmy", "NPC Contact"), menu_identity("Honest Jimmy", ""));
    }

    #[test]
    fn test_trailing_marker_keeps_leading_text() {
        assert_eq!(normalise_target("Hans NPC Contact"), "Hans");
    }

    #[test]
    fn test_target_without_marker_is_unchanged() {
        assert_eq!(normalise_target("Bookcase"), "Bookcase");
    }

    // ── Whitelist ─────────────────────────────────────────────────────────────

    #[test]
    fn test_world_whitelist_is_object_and_npc_slots_one_to_five() {
        for slot in 1..=5 {
            assert!(MenuAction::ObjectOption(slot).is_world_interaction());
            assert!(MenuAction::NpcOption(slot).is_world_interaction());
        }
        assert!(!MenuAction::ObjectOption(0).is_world_interaction());
        assert!(!MenuAction::ObjectOption(6).is_world_interaction());
        assert!(!MenuAction::NpcOption(6).is_world_interaction());
    }

    #[test]
    fn test_other_actions_are_not_world_interactions() {
        let others = [
            MenuAction::PlayerOption(1),
            MenuAction::GroundItemOption(1),
            MenuAction::WidgetOption,
            MenuAction::ResumeDialogue,
            MenuAction::ExamineObject,
            MenuAction::ExamineNpc,
            MenuAction::WalkHere,
            MenuAction::Cancel,
            MenuAction::Custom,
        ];
        for action in others {
            assert!(!action.is_world_interaction(), "{action} must not be whitelisted");
        }
    }

    // ── Classification ────────────────────────────────────────────────────────

    #[test]
    fn test_synthesised_entries_never_start_conversations() {
        let origin = classify_click(MenuAction::NpcOption(1), true, RegionHit::Launcher);
        assert_eq!(origin, ClickOrigin::Assistant);
        assert!(!origin.starts_conversation());
    }

    #[test]
    fn test_whitelisted_action_is_world() {
        let origin = classify_click(MenuAction::ObjectOption(1), false, RegionHit::Outside);
        assert_eq!(origin, ClickOrigin::World);
        assert!(origin.starts_conversation());
    }

    #[test]
    fn test_dialogue_region_click_keeps_identity() {
        let origin = classify_click(MenuAction::WidgetOption, false, RegionHit::Dialogue);
        assert_eq!(origin, ClickOrigin::DialogueInterface);
        assert!(!origin.starts_conversation());
    }

    #[test]
    fn test_launcher_region_click_starts_conversation() {
        let origin = classify_click(MenuAction::WidgetOption, false, RegionHit::Launcher);
        assert_eq!(origin, ClickOrigin::Launcher);
        assert!(origin.starts_conversation());
    }

    #[test]
    fn test_undiscovered_region_is_conservative() {
        let origin = classify_click(MenuAction::WidgetOption, false, RegionHit::Undiscovered);
        assert_eq!(origin, ClickOrigin::Interface);
        assert!(!origin.starts_conversation());
    }
}
