//! Override engine - applies one document's records to the host registry.
//!
//! Each record is validated against its section schema, its target form is
//! resolved, and only then are fields written. Failures are scoped: a bad
//! record costs that record, a bad field value costs that field.

use crate::document::Document;
use crate::ledger::{Ledger, LedgerKey};
use crate::resolver::{ResolveError, Resolver};
use crate::schema::{self, FieldTarget, FieldValue, FieldValues, SectionSchema, SubRecordSpec, ValidatedSubRecord, FORM_KEY};
use crate::{EngineResult, OverrideError, Requirement};
use serde_json::Value;
use srd_model::{find_or_create, update_all_or_create, EffectSound, FormRegistry, FormRemapper, RegionSound};
use srd_types::{FormId, FormType, ReferenceField, SoundSlot};
use std::collections::BTreeMap;
use tracing::debug;

/// What happened to a document handed to [`OverrideEngine::apply`].
#[derive(Debug)]
pub enum ApplyOutcome {
    /// The requirement list did not hold; nothing was written.
    GatedOut(Vec<Requirement>),
    /// Sections were applied. Carries record and field diagnostics.
    Applied(Vec<OverrideError>),
}

/// Applies override documents to a host registry.
pub struct OverrideEngine<'a> {
    registry: &'a mut dyn FormRegistry,
    remapper: Option<&'a dyn FormRemapper>,
}

impl<'a> OverrideEngine<'a> {
    pub fn new(registry: &'a mut dyn FormRegistry) -> Self {
        Self {
            registry,
            remapper: None,
        }
    }

    /// Routes plugin-scoped addresses through `remapper` before lookup.
    pub fn with_remapper(mut self, remapper: &'a dyn FormRemapper) -> Self {
        self.remapper = Some(remapper);
        self
    }

    /// Applies `document`, appending every write to `ledger`.
    ///
    /// The requirement list gates the whole document. Sections and records
    /// are applied in document order.
    pub fn apply(&mut self, document: &Document, ledger: &mut Ledger) -> ApplyOutcome {
        let missing = document.unsatisfied_requirements(&*self.registry);
        if !missing.is_empty() {
            return ApplyOutcome::GatedOut(missing);
        }

        let mut diagnostics = Vec::new();
        for section in &document.sections {
            let Some(schema) = schema::section(&section.name) else {
                debug!("Ignoring unknown section {} in {}", section.name, document.name);
                continue;
            };
            let records = match &section.body {
                Value::Null => continue,
                Value::Array(records) => records,
                _ => {
                    diagnostics.push(OverrideError::Schema {
                        document: document.name.clone(),
                        section: section.name.clone(),
                        message: "expected a list of records".into(),
                    });
                    continue;
                }
            };
            for record in records {
                if let Err(e) = self.apply_record(document, schema, record, ledger, &mut diagnostics) {
                    diagnostics.push(e);
                }
            }
        }
        ApplyOutcome::Applied(diagnostics)
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&*self.registry, self.remapper)
    }

    /// Applies one record. An `Err` means the record was skipped entirely;
    /// field-level failures go to `diagnostics`.
    fn apply_record(
        &mut self,
        document: &Document,
        schema: &'static SectionSchema,
        raw: &Value,
        ledger: &mut Ledger,
        diagnostics: &mut Vec<OverrideError>,
    ) -> EngineResult<()> {
        let record = schema.validate(raw).map_err(|violation| OverrideError::Schema {
            document: document.name.clone(),
            section: schema.name.to_string(),
            message: violation.to_string(),
        })?;

        let form = self
            .resolver()
            .resolve(&record.form, schema.form_type)
            .map_err(|reason| resolution(document, schema, FORM_KEY, &record.form, schema.form_type, reason))?;

        let changed = self.apply_fields(document, schema, form, &record.values, diagnostics);
        if !changed.is_empty() {
            ledger.record_fields(LedgerKey::Form(form), changed, &document.name);
        }

        if let Some(spec) = schema.sub_records {
            self.apply_region_sounds(document, schema, spec, form, &record.sub_records, ledger, diagnostics)?;
        }
        Ok(())
    }

    /// Writes the scalar fields of a record. Returns the keys actually written.
    fn apply_fields(
        &mut self,
        document: &Document,
        schema: &SectionSchema,
        form: FormId,
        values: &FieldValues,
        diagnostics: &mut Vec<OverrideError>,
    ) -> Vec<&'static str> {
        let mut references: Vec<(&'static str, ReferenceField, FormId)> = Vec::new();
        let mut slots: BTreeMap<SoundSlot, (&'static str, FormId)> = BTreeMap::new();

        let resolver = self.resolver();
        for (spec, value) in values {
            let FieldValue::Identifier(identifier) = value else {
                continue;
            };
            let expected = match spec.target {
                FieldTarget::Reference(field) => field.target_type(),
                FieldTarget::EffectSlot(_) => FormType::SoundDescriptor,
                _ => continue,
            };
            let target = match resolver.resolve(identifier, expected) {
                Ok(target) => target,
                Err(reason) => {
                    diagnostics.push(resolution(document, schema, spec.key, identifier, expected, reason));
                    continue;
                }
            };
            match spec.target {
                FieldTarget::Reference(field) => references.push((spec.key, field, target)),
                FieldTarget::EffectSlot(slot) => {
                    slots.insert(slot, (spec.key, target));
                }
                _ => {}
            }
        }

        let mut changed = Vec::new();
        for (key, field, target) in references {
            match self.registry.set_reference(form, field, target) {
                Ok(()) => changed.push(key),
                Err(source) => diagnostics.push(OverrideError::Host {
                    document: document.name.clone(),
                    form: self.registry.describe(form),
                    field: key.to_string(),
                    source,
                }),
            }
        }

        if slots.is_empty() {
            return changed;
        }
        let Some(effect_sounds) = self.registry.effect_sounds_mut(form) else {
            diagnostics.push(OverrideError::MissingSoundData {
                document: document.name.clone(),
                form: self.registry.describe(form),
                block: "sound slot",
            });
            return changed;
        };
        // duplicate entries for a slot are all overwritten
        for (slot, (key, sound)) in slots {
            update_all_or_create(effect_sounds, slot, |slot| EffectSound { slot, sound }, |entry| {
                entry.sound = sound
            });
            changed.push(key);
        }
        changed
    }

    #[allow(clippy::too_many_arguments)]
    fn apply_region_sounds(
        &mut self,
        document: &Document,
        schema: &SectionSchema,
        spec: &SubRecordSpec,
        region: FormId,
        entries: &[ValidatedSubRecord],
        ledger: &mut Ledger,
        diagnostics: &mut Vec<OverrideError>,
    ) -> EngineResult<()> {
        let missing_block = |registry: &dyn FormRegistry| OverrideError::MissingSoundData {
            document: document.name.clone(),
            form: registry.describe(region),
            block: spec.key,
        };
        if self.registry.region_sounds(region).is_none() {
            return Err(missing_block(&*self.registry));
        }

        for entry in entries {
            let Some(identity) = entry.identity.as_deref() else {
                diagnostics.push(OverrideError::MissingIdentity {
                    document: document.name.clone(),
                    section: schema.name.to_string(),
                    field: spec.identity.key.to_string(),
                });
                continue;
            };
            let sound = match self.resolver().resolve(identity, FormType::SoundDescriptor) {
                Ok(sound) => sound,
                Err(reason) => {
                    diagnostics.push(resolution(
                        document,
                        schema,
                        spec.identity.key,
                        identity,
                        FormType::SoundDescriptor,
                        reason,
                    ));
                    continue;
                }
            };

            let changed = match self.registry.region_sounds_mut(region) {
                Some(sounds) => write_region_sound(sounds, sound, spec, entry),
                None => return Err(missing_block(&*self.registry)),
            };
            if !changed.is_empty() {
                ledger.record_fields(LedgerKey::SubRecord { parent: region, child: sound }, changed, &document.name);
            }
        }
        Ok(())
    }
}

/// Finds or creates the entry for `sound` and writes the entry's fields.
/// A newly created entry gets the schema defaults for omitted fields.
fn write_region_sound(
    sounds: &mut Vec<RegionSound>,
    sound: FormId,
    spec: &SubRecordSpec,
    entry: &ValidatedSubRecord,
) -> Vec<&'static str> {
    let (record, created) = find_or_create(sounds, sound, RegionSound::new);
    let mut changed = Vec::new();
    for field in spec.fields {
        let value = match (entry.value(field.key), field.on_create) {
            (Some(value), _) => value.clone(),
            (None, Some(default)) if created => default.value(),
            _ => continue,
        };
        match (field.target, value) {
            (FieldTarget::RegionFlags, FieldValue::Flags(flags)) => record.flags = flags,
            (FieldTarget::RegionChance, FieldValue::Number(chance)) => record.chance = chance as f32,
            _ => continue,
        }
        changed.push(field.key);
    }
    changed
}

fn resolution(
    document: &Document,
    schema: &SectionSchema,
    field: &str,
    identifier: &str,
    expected: FormType,
    reason: ResolveError,
) -> OverrideError {
    OverrideError::Resolution {
        document: document.name.clone(),
        section: schema.name.to_string(),
        field: field.to_string(),
        identifier: identifier.to_string(),
        expected,
        reason,
    }
}
