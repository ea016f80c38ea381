//! JSON codec for [`ConfigStore`].
//!
//! Document format (one object, keyed by the target id as a string):
//!
//! ```text
//! {
//!   "5":      { "targetId": 5, "npcName": "Hans",
//!               "optionMap": { "Ask about quest": "LOCKED" } },
//!   "-81322": { "targetId": -81322, "optionMap": { "Yes": "HIGHLIGHTED" } }
//! }
//! ```
//!
//! `npcId` is accepted as an older spelling of `targetId`.  There is no schema
//! version field.
//!
//! Decoding is lenient per entry: a record that cannot be read, or that sits
//! under a reserved key, is skipped with a warning instead of failing the whole
//! document.  Inside a readable record an option with an unknown status tag is
//! dropped on its own and the rest of the record is kept.  A record whose embedded id disagrees with its key is re-keyed to
//! the key, since the key is what every lookup uses.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::warn;

use crate::domain::option_state::{ConfigStore, OptionStatus, TargetConfig, TargetId};

/// Errors raised while encoding or decoding the persisted store.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The document is not a JSON object of target records.
    #[error("malformed option store document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The document is empty or whitespace.
    #[error("option store document is empty")]
    Empty,
}

/// Serialises the whole store into its persisted JSON form.
///
/// # Errors
///
/// Returns [`CodecError::Malformed`] if serialisation fails.
pub fn encode_store(store: &ConfigStore) -> Result<String, CodecError> {
    let records: BTreeMap<i32, &TargetConfig> =
        store.iter().map(|(id, config)| (id.value(), config)).collect();
    Ok(serde_json::to_string(&records)?)
}

/// Parses a persisted JSON document back into a store.
///
/// # Errors
///
/// Returns [`CodecError::Empty`] for blank input and [`CodecError::Malformed`]
/// when the document is not a JSON object keyed by integers.
pub fn decode_store(json: &str) -> Result<ConfigStore, CodecError> {
    if json.trim().is_empty() {
        return Err(CodecError::Empty);
    }

    let raw: BTreeMap<i32, serde_json::Value> = serde_json::from_str(json)?;
    let mut store = ConfigStore::new();

    for (key, mut value) in raw {
        let Some(target) = TargetId::new(key) else {
            warn!(key, "skipping option store record under a reserved key");
            continue;
        };
        drop_unreadable_options(key, &mut value);

        let mut config: TargetConfig = match serde_json::from_value(value) {
            Ok(config) => config,
            Err(e) => {
                warn!(key, error = %e, "skipping unreadable option store record");
                continue;
            }
        };

        if config.target_id() != target {
            warn!(
                key,
                embedded = config.target_id().value(),
                "option store record id disagrees with its key; re-keying"
            );
            config.rekey(target);
        }
        config.prune_none();
        store.insert(config);
    }

    Ok(store)
}

/// Removes `optionMap` entries whose status tag is not a known [`OptionStatus`].
fn drop_unreadable_options(key: i32, record: &mut serde_json::Value) {
    let Some(options) = record
        .get_mut("optionMap")
        .and_then(serde_json::Value::as_object_mut)
    else {
        return;
    };
    options.retain(|option, status| {
        let readable = serde_json::from_value::<OptionStatus>(status.clone()).is_ok();
        if !readable {
            warn!(key, option = %option, status = %status, "skipping unreadable option status");
        }
        readable
    });
}
