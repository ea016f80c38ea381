//! # dialogue-core
//!
//! Shared domain library for Dialogue Assistant: the option state store, the
//! conversation identity rules, decoration colours and the codec for the
//! persisted store.
//!
//! This crate has no dependency on a host client, a widget tree or a storage
//! backend.  The `dialogue-assistant` crate supplies those through traits.
//!
//! # Architecture overview
//!
//! Dialogue Assistant lets a player mark individual dialogue choices as
//! *highlighted* or *locked*, remembers the choice per conversation target,
//! and re-applies it every time the same conversation comes back.
//!
//! - **`domain::option_state`** – [`ConfigStore`] / [`TargetConfig`]: which
//!   option text has which [`OptionStatus`] for which [`TargetId`].
//! - **`domain::identity`** – how a conversation is named when no NPC entity
//!   is available ([`menu_identity`]) and which menu clicks are allowed to
//!   start a new conversation ([`classify_click`]).
//! - **`domain::colour`** – [`Colour`] values used by the decorations.
//! - **`codec`** – JSON encoding of the whole store ([`encode_store`] /
//!   [`decode_store`]).

pub mod codec;
pub mod domain;

pub use codec::{decode_store, encode_store, CodecError};
pub use domain::colour::{Colour, ColourParseError};
pub use domain::identity::{
    classify_click, menu_identity, normalise_target, text_hash, ClickOrigin, MenuAction,
    RegionHit, PROXY_CHANNEL_MARKER,
};
pub use domain::option_state::{ConfigStore, OptionStatus, ReservedTargetId, TargetConfig, TargetId};
