//! Named attributes the engine can write on host forms.

use crate::FormType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single form-reference attribute on an item-like form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReferenceField {
    PickUp,
    PutDown,
    ImpactDataSet,
    Attack,
    Attack2D,
    AttackLoop,
    AttackFail,
    Idle,
    Equip,
    Unequip,
    Footstep,
}

impl ReferenceField {
    pub const ALL: [Self; 11] = [
        Self::PickUp,
        Self::PutDown,
        Self::ImpactDataSet,
        Self::Attack,
        Self::Attack2D,
        Self::AttackLoop,
        Self::AttackFail,
        Self::Idle,
        Self::Equip,
        Self::Unequip,
        Self::Footstep,
    ];

    /// The document key for this field.
    pub const fn key(self) -> &'static str {
        match self {
            Self::PickUp => "Pick Up",
            Self::PutDown => "Put Down",
            Self::ImpactDataSet => "Impact Data Set",
            Self::Attack => "Attack",
            Self::Attack2D => "Attack 2D",
            Self::AttackLoop => "Attack Loop",
            Self::AttackFail => "Attack Fail",
            Self::Idle => "Idle",
            Self::Equip => "Equip",
            Self::Unequip => "Unequip",
            Self::Footstep => "Footstep",
        }
    }

    /// The form kind a value of this field must resolve to.
    pub const fn target_type(self) -> FormType {
        match self {
            Self::ImpactDataSet => FormType::ImpactDataSet,
            Self::Footstep => FormType::FootstepSet,
            _ => FormType::SoundDescriptor,
        }
    }

    /// Returns true if forms of `owner` carry this field.
    pub const fn applies_to(self, owner: FormType) -> bool {
        match owner {
            FormType::Weapon => !matches!(self, Self::Footstep),
            FormType::Armor | FormType::MiscItem | FormType::SoulGem => {
                matches!(self, Self::PickUp | Self::PutDown)
            }
            FormType::ArmorAddon => matches!(self, Self::Footstep),
            _ => false,
        }
    }
}

impl fmt::Display for ReferenceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Sound slots of a magic effect, in slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SoundSlot {
    DrawSheatheLpm,
    Charge,
    Ready,
    Release,
    CastLoop,
    OnHit,
}

impl SoundSlot {
    pub const ALL: [Self; 6] = [
        Self::DrawSheatheLpm,
        Self::Charge,
        Self::Ready,
        Self::Release,
        Self::CastLoop,
        Self::OnHit,
    ];

    /// The document key for this slot.
    pub const fn key(self) -> &'static str {
        match self {
            Self::DrawSheatheLpm => "DrawSheatheLPM",
            Self::Charge => "Charge",
            Self::Ready => "Ready",
            Self::Release => "Release",
            Self::CastLoop => "CastLoop",
            Self::OnHit => "OnHit",
        }
    }
}

impl fmt::Display for SoundSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
