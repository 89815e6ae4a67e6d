//! In-process [`FormRegistry`] backed by plain collections.

use crate::{EffectSound, Form, FormRegistry, ModelError, ModelResult, RegionSound};
use serde::Deserialize;
use srd_types::{FormId, FormType, ReferenceField};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// JSON description of a registry: the load order and the forms it defines.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrySnapshot {
    #[serde(default)]
    pub load_order: Vec<String>,
    #[serde(default)]
    pub forms: Vec<FormSnapshot>,
}

/// One form in a [`RegistrySnapshot`].
#[derive(Debug, Clone, Deserialize)]
pub struct FormSnapshot {
    #[serde(rename = "type")]
    pub form_type: FormType,
    #[serde(default)]
    pub file: Option<String>,
    pub local_id: u32,
    #[serde(default)]
    pub editor_id: Option<String>,
    /// Regions only: whether the region carries a sound data block.
    #[serde(default)]
    pub sound_data: bool,
}

/// A host registry living entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    forms: Vec<Form>,
    by_address: HashMap<(String, u32), FormId>,
    by_editor_id: HashMap<String, FormId>,
    load_order: Vec<String>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from a snapshot.
    pub fn from_snapshot(snapshot: RegistrySnapshot) -> ModelResult<Self> {
        let mut registry = Self::new();
        for plugin in snapshot.load_order {
            registry.add_plugin(&plugin);
        }
        for form in snapshot.forms {
            let id = match form.file.as_deref() {
                Some(file) => registry.insert(form.form_type, file, form.local_id, form.editor_id.as_deref()),
                None => registry.insert_generated(form.form_type, form.local_id, form.editor_id.as_deref()),
            };
            if form.sound_data {
                registry.attach_sound_data(id)?;
            }
        }
        debug!("Built registry with {} forms", registry.len());
        Ok(registry)
    }

    pub fn from_json_str(json: &str) -> ModelResult<Self> {
        let snapshot: RegistrySnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }

    /// Reads a JSON snapshot file.
    pub fn load(path: &Path) -> ModelResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Appends a plugin to the load order.
    pub fn add_plugin(&mut self, name: &str) {
        if !self.is_source_loaded(name) {
            self.load_order.push(name.to_string());
        }
    }

    /// Adds a form defined by `file`.
    pub fn insert(&mut self, form_type: FormType, file: &str, local_id: u32, editor_id: Option<&str>) -> FormId {
        let id = self.push(form_type, Some(file.to_string()), local_id, editor_id);
        self.by_address.insert((file.to_ascii_lowercase(), local_id), id);
        id
    }

    /// Adds a runtime-generated form with no origin plugin.
    pub fn insert_generated(&mut self, form_type: FormType, local_id: u32, editor_id: Option<&str>) -> FormId {
        self.push(form_type, None, local_id, editor_id)
    }

    /// Gives a region an (empty) sound data block.
    pub fn attach_sound_data(&mut self, region: FormId) -> ModelResult<()> {
        let form = self.form_mut(region)?;
        if form.form_type != FormType::Region {
            return Err(ModelError::NotARegion(region));
        }
        form.region_sounds.get_or_insert_with(Vec::new);
        Ok(())
    }

    pub fn form(&self, id: FormId) -> Option<&Form> {
        self.forms.get(id.raw() as usize)
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    fn form_mut(&mut self, id: FormId) -> ModelResult<&mut Form> {
        self.forms.get_mut(id.raw() as usize).ok_or(ModelError::FormNotFound(id))
    }

    fn push(&mut self, form_type: FormType, file: Option<String>, local_id: u32, editor_id: Option<&str>) -> FormId {
        let id = FormId::new(self.forms.len() as u32);
        if let Some(editor_id) = editor_id {
            self.by_editor_id.insert(editor_id.to_string(), id);
        }
        self.forms
            .push(Form::new(id, form_type, file, local_id, editor_id.map(str::to_string)));
        id
    }
}

impl FormRegistry for MemoryRegistry {
    fn lookup_by_address(&self, file: &str, local_id: u32) -> Option<FormId> {
        self.by_address.get(&(file.to_ascii_lowercase(), local_id)).copied()
    }

    fn lookup_by_editor_id(&self, editor_id: &str) -> Option<FormId> {
        self.by_editor_id.get(editor_id).copied()
    }

    fn form_type(&self, form: FormId) -> Option<FormType> {
        self.form(form).map(|f| f.form_type)
    }

    fn describe(&self, form: FormId) -> String {
        self.form(form)
            .map(Form::identifier)
            .unwrap_or_else(|| format!("<unknown {}>", form))
    }

    fn is_source_loaded(&self, name: &str) -> bool {
        self.load_order.iter().any(|p| p.eq_ignore_ascii_case(name))
    }

    fn load_order(&self) -> Vec<String> {
        self.load_order.clone()
    }

    fn reference(&self, form: FormId, field: ReferenceField) -> Option<FormId> {
        self.form(form).and_then(|f| f.references.get(&field).copied())
    }

    fn set_reference(&mut self, form: FormId, field: ReferenceField, value: FormId) -> ModelResult<()> {
        let target = self.form_mut(form)?;
        if !field.applies_to(target.form_type) {
            return Err(ModelError::FieldNotApplicable {
                form,
                form_type: target.form_type,
                field,
            });
        }
        target.references.insert(field, value);
        Ok(())
    }

    fn region_sounds(&self, region: FormId) -> Option<&[RegionSound]> {
        self.form(region).and_then(|f| f.region_sounds.as_deref())
    }

    fn region_sounds_mut(&mut self, region: FormId) -> Option<&mut Vec<RegionSound>> {
        self.forms
            .get_mut(region.raw() as usize)
            .and_then(|f| f.region_sounds.as_mut())
    }

    fn effect_sounds(&self, effect: FormId) -> Option<&[EffectSound]> {
        self.form(effect)
            .filter(|f| f.form_type == FormType::MagicEffect)
            .map(|f| f.effect_sounds.as_slice())
    }

    fn effect_sounds_mut(&mut self, effect: FormId) -> Option<&mut Vec<EffectSound>> {
        self.forms
            .get_mut(effect.raw() as usize)
            .filter(|f| f.form_type == FormType::MagicEffect)
            .map(|f| &mut f.effect_sounds)
    }
}
