//! Host form registry boundary for the sound record distributor.
//!
//! Defines what the override engine needs from the host application:
//! - [`FormRegistry`]: lookups, load order and typed mutators on forms
//! - [`FormRemapper`]: optional address translation for merged plugins
//! - [`RegionSound`] / [`EffectSound`]: repeatable sub-records on forms
//! - [`find_or_create`]: keyed find-or-create over a live sub-record list
//!
//! [`MemoryRegistry`] is a complete in-process host used by tests and the
//! command-line runner.

mod entity;
mod error;
mod memory;
mod registry;
mod remap;
mod subrecord;

pub use entity::{format_identifier, Form};
pub use error::{ModelError, ModelResult};
pub use memory::{FormSnapshot, MemoryRegistry, RegistrySnapshot};
pub use registry::FormRegistry;
pub use remap::{FormRemapper, RemapEntry, RemapTable};
pub use subrecord::{find_or_create, update_all_or_create, EffectSound, RegionSound, SubRecord};
