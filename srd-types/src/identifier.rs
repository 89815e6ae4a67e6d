//! Textual form identifiers as written in override documents.
//!
//! Two addressing schemes are accepted:
//! - `Plugin.esp|1A2B`: a local form ID (hex) scoped to the plugin that defines it
//! - `IronSword`: a globally unique editor ID

use crate::{Error, Result};
use std::fmt;

/// File extensions that mark a string as a plugin filename.
pub const PLUGIN_EXTENSIONS: [&str; 3] = [".esp", ".esm", ".esl"];

/// A parsed form identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    /// Absolute address: local form ID within its origin plugin.
    Address { file: String, local_id: u32 },
    /// Editor ID lookup.
    EditorId(String),
}

impl Identifier {
    /// Parses an identifier.
    ///
    /// A string is an address only if it contains `|` and the part before it
    /// is a plugin filename. The local ID is hexadecimal, with or without a
    /// `0x` prefix. Everything else is taken verbatim as an editor ID.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyIdentifier);
        }

        if let Some((file, id)) = trimmed.split_once('|') {
            let file = file.trim();
            if is_plugin_name(file) {
                let digits = id.trim();
                let digits = digits
                    .strip_prefix("0x")
                    .or_else(|| digits.strip_prefix("0X"))
                    .unwrap_or(digits);
                let local_id = u32::from_str_radix(digits, 16).map_err(|source| Error::InvalidLocalId {
                    identifier: trimmed.to_string(),
                    source,
                })?;
                return Ok(Self::Address {
                    file: file.to_string(),
                    local_id,
                });
            }
        }

        Ok(Self::EditorId(trimmed.to_string()))
    }

    /// Returns true for the plugin-scoped addressing scheme.
    pub fn is_address(&self) -> bool {
        matches!(self, Self::Address { .. })
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address { file, local_id } => write!(f, "{}|{:X}", file, local_id),
            Self::EditorId(name) => f.write_str(name),
        }
    }
}

fn is_plugin_name(name: &str) -> bool {
    plugin_prefix(name).is_some_and(|prefix| prefix.len() == name.len())
}

/// Returns the leading plugin filename of `name`, if it contains one.
///
/// `"Dawnguard.esm_SRD"` yields `Some("Dawnguard.esm")`. Matching of the
/// extension is ASCII case-insensitive.
pub fn plugin_prefix(name: &str) -> Option<&str> {
    let lower = name.to_ascii_lowercase();
    PLUGIN_EXTENSIONS
        .iter()
        .filter_map(|ext| lower.find(ext).map(|at| at + ext.len()))
        .min()
        .filter(|&end| end > 4)
        .map(|end| &name[..end])
}
