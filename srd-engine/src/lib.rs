//! Layered override-merge engine for the sound record distributor.
//!
//! Applies third-party override documents to forms owned by a host registry
//! and records which document last wrote each field.
//!
//! # Architecture
//!
//! Data flows one way:
//!
//! 1. **Discovery**: [`DocumentSource`] lists candidate documents; they are
//!    ordered plugin-scoped first (in load order), global last
//! 2. **Parse**: each document becomes a generic tree ([`Document`]), JSON or YAML
//! 3. **Gate**: the document's requirement list must hold in full
//! 4. **Apply**: [`OverrideEngine`] validates each record against its
//!    [`SectionSchema`], resolves identifiers through the [`Resolver`] and
//!    writes the fields on the host forms
//! 5. **Record**: every written field is appended to the [`Ledger`], which
//!    is dumped once the batch completes
//!
//! Errors below batch scope never escape [`Pipeline::run`]; they are logged,
//! surfaced through the [`Notifier`] and returned in the [`BatchReport`].
//!
//! # Example
//!
//! ```
//! use srd_engine::{Document, Ledger, OverrideEngine};
//! use srd_model::{FormRegistry, MemoryRegistry};
//! use srd_types::{FormType, ReferenceField};
//!
//! let mut registry = MemoryRegistry::new();
//! registry.add_plugin("Skyrim.esm");
//! let sword = registry.insert(FormType::Weapon, "Skyrim.esm", 0x12EB7, Some("IronSword"));
//! let sound = registry.insert(FormType::SoundDescriptor, "Skyrim.esm", 0x3C7F0, Some("WPNEquip"));
//!
//! let document = Document::from_json_str(
//!     "Example_SRD.json",
//!     r#"{"Weapon": [{"Form": "Skyrim.esm|12EB7", "Equip": "WPNEquip"}]}"#,
//! )
//! .unwrap();
//!
//! let mut ledger = Ledger::new();
//! OverrideEngine::new(&mut registry).apply(&document, &mut ledger);
//!
//! assert_eq!(registry.reference(sword, ReferenceField::Equip), Some(sound));
//! ```

mod config;
mod diagnostics;
mod discovery;
mod document;
mod engine;
mod error;
mod ledger;
mod pipeline;
mod resolver;
pub mod schema;

pub use config::{ConfigError, EngineConfig};
pub use diagnostics::{LogOnly, Notifier};
pub use discovery::{order_documents, DirectorySource, DocumentHandle, DocumentSource, Scope};
pub use document::{parse_tree, strip_json_comments, Document, DocumentFormat, Requirement, Section};
pub use engine::{ApplyOutcome, OverrideEngine};
pub use error::{EngineResult, OverrideError, Severity};
pub use ledger::{Ledger, LedgerEntry, LedgerKey};
pub use pipeline::{BatchReport, DocumentOutcome, DocumentReport, Pipeline};
pub use resolver::{ResolveError, Resolver};
pub use schema::SectionSchema;
