use crate::{EffectSound, ModelResult, RegionSound};
use srd_types::{FormId, FormType, ReferenceField};

/// The host application's form storage, as seen by the override engine.
///
/// The engine never creates or destroys forms. It looks them up, reads their
/// kind and writes the attributes exposed here. Sub-record collections are
/// handed out as live mutable references so that appended entries stay on
/// the form.
pub trait FormRegistry {
    /// Looks up a form by local ID within the plugin that defines it.
    fn lookup_by_address(&self, file: &str, local_id: u32) -> Option<FormId>;

    /// Looks up a form by its editor ID.
    fn lookup_by_editor_id(&self, editor_id: &str) -> Option<FormId>;

    /// Returns the kind of a form, or `None` if the handle is unknown.
    fn form_type(&self, form: FormId) -> Option<FormType>;

    /// Human-readable identifier used in diagnostics and the ledger dump.
    fn describe(&self, form: FormId) -> String;

    /// Returns true if the named plugin is active in the current load order.
    fn is_source_loaded(&self, name: &str) -> bool;

    /// Active plugins in the order the host loaded them.
    fn load_order(&self) -> Vec<String>;

    /// Current value of a reference attribute.
    fn reference(&self, form: FormId, field: ReferenceField) -> Option<FormId>;

    /// Overwrites a reference attribute.
    fn set_reference(&mut self, form: FormId, field: ReferenceField, value: FormId) -> ModelResult<()>;

    /// The sound sub-records of a region, if the region has a sound data block.
    fn region_sounds(&self, region: FormId) -> Option<&[RegionSound]>;

    /// Live sound sub-record list of a region, if it has a sound data block.
    fn region_sounds_mut(&mut self, region: FormId) -> Option<&mut Vec<RegionSound>>;

    /// The sound slot entries of a magic effect.
    fn effect_sounds(&self, effect: FormId) -> Option<&[EffectSound]>;

    /// Live sound slot list of a magic effect.
    fn effect_sounds_mut(&mut self, effect: FormId) -> Option<&mut Vec<EffectSound>>;
}
