//! Core type definitions for the sound record distributor.
//!
//! This crate defines the small, host-agnostic value types shared by the
//! model and the override engine:
//! - Runtime form handles and form kinds
//! - Textual form identifiers (`Plugin.esp|1A2B` or an editor ID)
//! - Region sound flags and their token codec
//! - Magic effect sound slots and item reference fields
//!
//! Nothing here touches a registry. Resolution of identifiers into forms
//! lives in `srd-engine`.

mod fields;
mod flags;
mod identifier;
mod ids;

pub use fields::{ReferenceField, SoundSlot};
pub use flags::{decode_flag_string, decode_flags, SoundFlags};
pub use identifier::{plugin_prefix, Identifier, PLUGIN_EXTENSIONS};
pub use ids::{FormId, FormType};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while interpreting identifiers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("identifier is empty")]
    EmptyIdentifier,

    #[error("invalid local form ID in '{identifier}': {source}")]
    InvalidLocalId {
        identifier: String,
        #[source]
        source: std::num::ParseIntError,
    },
}
