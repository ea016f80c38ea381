//! Codec for the persisted option store.

pub mod store;

pub use store::{decode_store, encode_store, CodecError};
