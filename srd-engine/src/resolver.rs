//! Identifier resolution against the host registry.

use srd_model::{FormRegistry, FormRemapper};
use srd_types::{FormId, FormType, Identifier};
use thiserror::Error;
use tracing::debug;

/// Why an identifier did not yield a form of the expected kind.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("malformed identifier: {0}")]
    Malformed(#[from] srd_types::Error),

    #[error("no such form")]
    NotFound,

    #[error("form is a {found}")]
    WrongType { found: FormType },
}

/// Turns textual identifiers into form handles.
///
/// Plugin-scoped addresses go through the optional remapper before lookup;
/// editor IDs are looked up directly. A form of the wrong kind is reported
/// as a failure, never handed out.
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    registry: &'a dyn FormRegistry,
    remapper: Option<&'a dyn FormRemapper>,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a dyn FormRegistry, remapper: Option<&'a dyn FormRemapper>) -> Self {
        Self { registry, remapper }
    }

    /// Resolves `identifier` to a form of kind `expected`.
    pub fn resolve(&self, identifier: &str, expected: FormType) -> Result<FormId, ResolveError> {
        let form = match Identifier::parse(identifier)? {
            Identifier::Address { file, local_id } => {
                let (file, local_id) = self.translate(file, local_id);
                self.registry.lookup_by_address(&file, local_id)
            }
            Identifier::EditorId(editor_id) => self.registry.lookup_by_editor_id(&editor_id),
        }
        .ok_or(ResolveError::NotFound)?;

        match self.registry.form_type(form) {
            Some(found) if found == expected => Ok(form),
            Some(found) => Err(ResolveError::WrongType { found }),
            None => Err(ResolveError::NotFound),
        }
    }

    /// Applies the remapper to an address.
    ///
    /// The local ID is replaced only if both IDs are non-zero and differ; the
    /// plugin only if both names are non-empty and differ. Without a
    /// remapper the address is returned unchanged.
    pub fn translate(&self, file: String, local_id: u32) -> (String, u32) {
        let Some(remapper) = self.remapper else {
            return (file, local_id);
        };

        let (merged_file, merged_id) = remapper.remap(&file, local_id);
        let mut conversions = Vec::new();

        let local_id = if local_id != 0 && merged_id != 0 && local_id != merged_id {
            conversions.push(format!("0x{:x}->0x{:x}", local_id, merged_id));
            merged_id
        } else {
            local_id
        };

        let file = if !file.is_empty() && !merged_file.is_empty() && file != merged_file {
            conversions.push(format!("{}->{}", file, merged_file));
            merged_file
        } else {
            file
        };

        if !conversions.is_empty() {
            debug!("\t\tFound merged: {}", conversions.join("~"));
        }
        (file, local_id)
    }
}
