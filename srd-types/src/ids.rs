//! Runtime handles and kinds for forms owned by the host.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to a form in the host registry.
///
/// Two handles are equal only if they refer to the same form. The engine
/// never fabricates handles; it only receives them from registry lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(u32);

impl FormId {
    /// Wraps a raw runtime form ID.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw runtime form ID.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.0)
    }
}

/// The kind of a form. Lookups that find a form of another kind fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormType {
    Region,
    Weapon,
    MagicEffect,
    ArmorAddon,
    Armor,
    MiscItem,
    SoulGem,
    SoundDescriptor,
    ImpactDataSet,
    FootstepSet,
    /// Any form kind the engine never patches or references.
    Other,
}

impl FormType {
    /// Human-readable name used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Region => "Region",
            Self::Weapon => "Weapon",
            Self::MagicEffect => "Magic Effect",
            Self::ArmorAddon => "Armor Addon",
            Self::Armor => "Armor",
            Self::MiscItem => "Misc. Item",
            Self::SoulGem => "Soul Gem",
            Self::SoundDescriptor => "Sound Descriptor",
            Self::ImpactDataSet => "Impact Data Set",
            Self::FootstepSet => "Footstep Set",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
