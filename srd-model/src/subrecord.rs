//! Repeatable child records and keyed find-or-create.

use serde::{Deserialize, Serialize};
use srd_types::{FormId, SoundFlags, SoundSlot};

/// A child record matched by a foreign identity.
pub trait SubRecord {
    type Key: PartialEq + Copy;

    fn key(&self) -> Self::Key;
}

/// One ambient sound entry (RDSA) of a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSound {
    pub sound: FormId,
    pub flags: SoundFlags,
    pub chance: f32,
}

impl RegionSound {
    /// A fresh entry with no flags and zero chance.
    pub fn new(sound: FormId) -> Self {
        Self {
            sound,
            flags: SoundFlags::empty(),
            chance: 0.0,
        }
    }
}

impl SubRecord for RegionSound {
    type Key = FormId;

    fn key(&self) -> FormId {
        self.sound
    }
}

/// One sound slot assignment of a magic effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectSound {
    pub slot: SoundSlot,
    pub sound: FormId,
}

impl SubRecord for EffectSound {
    type Key = SoundSlot;

    fn key(&self) -> SoundSlot {
        self.slot
    }
}

/// Finds the first record in `collection` whose key equals `key`, or appends
/// the record built by `create`.
///
/// Returns the record and whether it was created. The collection is mutated
/// in place; an appended record is inserted exactly once.
pub fn find_or_create<R, F>(collection: &mut Vec<R>, key: R::Key, create: F) -> (&mut R, bool)
where
    R: SubRecord,
    F: FnOnce(R::Key) -> R,
{
    match collection.iter().position(|record| record.key() == key) {
        Some(index) => (&mut collection[index], false),
        None => {
            collection.push(create(key));
            let last = collection.len() - 1;
            (&mut collection[last], true)
        }
    }
}

/// Applies `update` to every record in `collection` whose key equals `key`,
/// or appends the record built by `create` when none matches.
///
/// Returns whether a record was created. A created record is not passed to
/// `update`.
pub fn update_all_or_create<R, C, U>(collection: &mut Vec<R>, key: R::Key, create: C, mut update: U) -> bool
where
    R: SubRecord,
    C: FnOnce(R::Key) -> R,
    U: FnMut(&mut R),
{
    let mut matched = false;
    for record in collection.iter_mut().filter(|record| record.key() == key) {
        update(record);
        matched = true;
    }
    if !matched {
        collection.push(create(key));
    }
    !matched
}
