//! Per-section field schemas and record validation.
//!
//! Each section a document may contain is described once, statically: the
//! form kind it targets, the fields it accepts, the shape each field's value
//! must have, the attribute it writes, and what a newly created sub-record
//! gets when the field is absent. Records are validated against this table
//! before anything is written, yielding typed values.

use serde_json::Value;
use srd_types::{decode_flag_string, decode_flags, FormType, ReferenceField, SoundFlags, SoundSlot};
use thiserror::Error;

/// Key naming the target form of every record.
pub const FORM_KEY: &str = "Form";

/// Reserved top-level key holding the requirement list.
pub const REQUIREMENTS_KEY: &str = "Requirements";

/// Expected JSON shape of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// A form identifier string.
    Identifier,
    /// A list of flag tokens, or one whitespace-delimited string.
    FlagTokens,
    Number,
}

/// The attribute a field writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTarget {
    Reference(ReferenceField),
    EffectSlot(SoundSlot),
    /// Identity of a region sound sub-record.
    RegionSound,
    RegionFlags,
    RegionChance,
}

/// Value written to a newly created sub-record when the document omits the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CreateDefault {
    Flags(SoundFlags),
    Chance(f32),
}

impl CreateDefault {
    pub fn value(self) -> FieldValue {
        match self {
            Self::Flags(flags) => FieldValue::Flags(flags),
            Self::Chance(chance) => FieldValue::Number(f64::from(chance)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub shape: FieldShape,
    pub target: FieldTarget,
    pub on_create: Option<CreateDefault>,
}

impl FieldSpec {
    const fn reference(field: ReferenceField) -> Self {
        Self {
            key: field.key(),
            shape: FieldShape::Identifier,
            target: FieldTarget::Reference(field),
            on_create: None,
        }
    }

    const fn slot(slot: SoundSlot) -> Self {
        Self {
            key: slot.key(),
            shape: FieldShape::Identifier,
            target: FieldTarget::EffectSlot(slot),
            on_create: None,
        }
    }
}

/// Repeatable sub-records nested under a section's records.
#[derive(Debug)]
pub struct SubRecordSpec {
    /// Key of the list inside the record.
    pub key: &'static str,
    /// Foreign identity field matched against existing sub-records.
    pub identity: FieldSpec,
    pub fields: &'static [FieldSpec],
}

/// Schema of one document section.
#[derive(Debug)]
pub struct SectionSchema {
    pub name: &'static str,
    pub form_type: FormType,
    pub fields: &'static [FieldSpec],
    pub sub_records: Option<&'static SubRecordSpec>,
}

static REGION_SOUNDS: SubRecordSpec = SubRecordSpec {
    key: "RDSA",
    identity: FieldSpec {
        key: "Sound",
        shape: FieldShape::Identifier,
        target: FieldTarget::RegionSound,
        on_create: None,
    },
    fields: &[
        FieldSpec {
            key: "Flags",
            shape: FieldShape::FlagTokens,
            target: FieldTarget::RegionFlags,
            on_create: Some(CreateDefault::Flags(SoundFlags::ALL_WEATHER)),
        },
        FieldSpec {
            key: "Chance",
            shape: FieldShape::Number,
            target: FieldTarget::RegionChance,
            on_create: Some(CreateDefault::Chance(0.05)),
        },
    ],
};

static WEAPON_FIELDS: [FieldSpec; 10] = [
    FieldSpec::reference(ReferenceField::PickUp),
    FieldSpec::reference(ReferenceField::PutDown),
    FieldSpec::reference(ReferenceField::ImpactDataSet),
    FieldSpec::reference(ReferenceField::Attack),
    FieldSpec::reference(ReferenceField::Attack2D),
    FieldSpec::reference(ReferenceField::AttackLoop),
    FieldSpec::reference(ReferenceField::AttackFail),
    FieldSpec::reference(ReferenceField::Idle),
    FieldSpec::reference(ReferenceField::Equip),
    FieldSpec::reference(ReferenceField::Unequip),
];

static EFFECT_FIELDS: [FieldSpec; 6] = [
    FieldSpec::slot(SoundSlot::DrawSheatheLpm),
    FieldSpec::slot(SoundSlot::Charge),
    FieldSpec::slot(SoundSlot::Ready),
    FieldSpec::slot(SoundSlot::Release),
    FieldSpec::slot(SoundSlot::CastLoop),
    FieldSpec::slot(SoundSlot::OnHit),
];

static ITEM_FIELDS: [FieldSpec; 2] = [
    FieldSpec::reference(ReferenceField::PickUp),
    FieldSpec::reference(ReferenceField::PutDown),
];

static ADDON_FIELDS: [FieldSpec; 1] = [FieldSpec::reference(ReferenceField::Footstep)];

/// Every section the engine understands.
pub static SECTIONS: [SectionSchema; 7] = [
    SectionSchema {
        name: "Region",
        form_type: FormType::Region,
        fields: &[],
        sub_records: Some(&REGION_SOUNDS),
    },
    SectionSchema {
        name: "Weapon",
        form_type: FormType::Weapon,
        fields: &WEAPON_FIELDS,
        sub_records: None,
    },
    SectionSchema {
        name: "Magic Effect",
        form_type: FormType::MagicEffect,
        fields: &EFFECT_FIELDS,
        sub_records: None,
    },
    SectionSchema {
        name: "Armor Addon",
        form_type: FormType::ArmorAddon,
        fields: &ADDON_FIELDS,
        sub_records: None,
    },
    SectionSchema {
        name: "Armor",
        form_type: FormType::Armor,
        fields: &ITEM_FIELDS,
        sub_records: None,
    },
    SectionSchema {
        name: "Misc. Item",
        form_type: FormType::MiscItem,
        fields: &ITEM_FIELDS,
        sub_records: None,
    },
    SectionSchema {
        name: "Soul Gem",
        form_type: FormType::SoulGem,
        fields: &ITEM_FIELDS,
        sub_records: None,
    },
];

/// Looks up a section schema by its document key.
pub fn section(name: &str) -> Option<&'static SectionSchema> {
    SECTIONS.iter().find(|schema| schema.name == name)
}

/// A record field that does not have the shape its schema requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct SchemaViolation {
    pub field: String,
    pub message: String,
}

impl SchemaViolation {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }

    fn shape(field: &str, expected: &str, found: &Value) -> Self {
        Self::new(field, format!("expected {}, found {}", expected, kind(found)))
    }
}

/// A typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Identifier(String),
    Flags(SoundFlags),
    Number(f64),
}

/// Fields present in a record, in schema order.
pub type FieldValues = Vec<(&'static FieldSpec, FieldValue)>;

/// A record that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord {
    pub form: String,
    pub values: FieldValues,
    pub sub_records: Vec<ValidatedSubRecord>,
}

/// A sub-record entry that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSubRecord {
    /// `None` if the entry lacks its identity field.
    pub identity: Option<String>,
    pub values: FieldValues,
}

impl ValidatedSubRecord {
    pub fn value(&self, key: &str) -> Option<&FieldValue> {
        self.values
            .iter()
            .find(|(spec, _)| spec.key == key)
            .map(|(_, value)| value)
    }
}

impl SectionSchema {
    /// Validates a raw record. Absent and `null` fields are treated alike.
    pub fn validate(&self, record: &Value) -> Result<ValidatedRecord, SchemaViolation> {
        let object = record
            .as_object()
            .ok_or_else(|| SchemaViolation::shape("record", "a mapping", record))?;

        let form = match object.get(FORM_KEY) {
            Some(Value::String(form)) => form.clone(),
            None | Some(Value::Null) => return Err(SchemaViolation::new(FORM_KEY, "required field is missing")),
            Some(other) => return Err(SchemaViolation::shape(FORM_KEY, "a string", other)),
        };

        let values = read_fields(self.fields, record)?;

        let sub_records: Vec<ValidatedSubRecord> = match self.sub_records {
            Some(spec) => match object.get(spec.key) {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(entries)) => entries
                    .iter()
                    .map(|entry| spec.validate(entry))
                    .collect::<Result<_, _>>()?,
                Some(other) => return Err(SchemaViolation::shape(spec.key, "a list", other)),
            },
            None => Vec::new(),
        };

        Ok(ValidatedRecord {
            form,
            values,
            sub_records,
        })
    }
}

impl SubRecordSpec {
    fn validate(&self, entry: &Value) -> Result<ValidatedSubRecord, SchemaViolation> {
        if !entry.is_object() {
            return Err(SchemaViolation::shape(self.key, "a list of mappings", entry));
        }
        let identity = match read_value(&self.identity, entry.get(self.identity.key))? {
            Some(FieldValue::Identifier(identity)) => Some(identity),
            _ => None,
        };
        Ok(ValidatedSubRecord {
            identity,
            values: read_fields(self.fields, entry)?,
        })
    }
}

fn read_fields(specs: &'static [FieldSpec], object: &Value) -> Result<FieldValues, SchemaViolation> {
    let mut values = Vec::new();
    for spec in specs {
        if let Some(value) = read_value(spec, object.get(spec.key))? {
            values.push((spec, value));
        }
    }
    Ok(values)
}

fn read_value(spec: &FieldSpec, raw: Option<&Value>) -> Result<Option<FieldValue>, SchemaViolation> {
    let raw = match raw {
        None | Some(Value::Null) => return Ok(None),
        Some(raw) => raw,
    };

    let value = match (spec.shape, raw) {
        (FieldShape::Identifier, Value::String(identifier)) => FieldValue::Identifier(identifier.clone()),
        (FieldShape::Identifier, other) => return Err(SchemaViolation::shape(spec.key, "a form identifier", other)),
        (FieldShape::FlagTokens, Value::String(tokens)) => FieldValue::Flags(decode_flag_string(tokens)),
        (FieldShape::FlagTokens, Value::Array(items)) => {
            let tokens = items
                .iter()
                .map(|item| {
                    item.as_str()
                        .ok_or_else(|| SchemaViolation::shape(spec.key, "a list of strings", item))
                })
                .collect::<Result<Vec<_>, _>>()?;
            FieldValue::Flags(decode_flags(tokens))
        }
        (FieldShape::FlagTokens, other) => return Err(SchemaViolation::shape(spec.key, "a list of flags", other)),
        (FieldShape::Number, Value::Number(number)) => match number.as_f64() {
            Some(number) => FieldValue::Number(number),
            None => return Err(SchemaViolation::shape(spec.key, "a finite number", raw)),
        },
        (FieldShape::Number, other) => return Err(SchemaViolation::shape(spec.key, "a number", other)),
    };
    Ok(Some(value))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_section_is_found_by_name() {
        for schema in &SECTIONS {
            assert!(std::ptr::eq(section(schema.name).unwrap(), schema));
        }
        assert!(section("Regions").is_none());
    }

    #[test]
    fn reference_fields_match_their_owners() {
        for schema in &SECTIONS {
            for spec in schema.fields {
                if let FieldTarget::Reference(field) = spec.target {
                    assert!(field.applies_to(schema.form_type), "{} on {}", field, schema.name);
                }
            }
        }
    }

    #[test]
    fn validate_weapon_record() {
        let schema = section("Weapon").unwrap();
        let record = schema
            .validate(&json!({"Form": "IronSword", "Equip": "WPNEquip", "Idle": null, "Unknown": 3}))
            .unwrap();
        assert_eq!(record.form, "IronSword");
        assert_eq!(record.values.len(), 1);
        assert_eq!(record.values[0].0.key, "Equip");
        assert_eq!(record.values[0].1, FieldValue::Identifier("WPNEquip".into()));
    }

    #[test]
    fn validate_rejects_wrong_shape() {
        let schema = section("Weapon").unwrap();
        let err = schema.validate(&json!({"Form": "IronSword", "Equip": 5})).unwrap_err();
        assert_eq!(err.field, "Equip");
        assert_eq!(err.message, "expected a form identifier, found a number");
    }

    #[test]
    fn validate_requires_form() {
        let schema = section("Armor").unwrap();
        assert_eq!(schema.validate(&json!({"Pick Up": "X"})).unwrap_err().field, "Form");
        assert_eq!(schema.validate(&json!({"Form": ["X"]})).unwrap_err().field, "Form");
        assert_eq!(schema.validate(&json!("IronSword")).unwrap_err().field, "record");
    }

    #[test]
    fn validate_region_sub_records() {
        let schema = section("Region").unwrap();
        let record = schema
            .validate(&json!({
                "Form": "FalkreathRegion",
                "RDSA": [
                    {"Sound": "AMBWind", "Flags": "Pleasant Snowy", "Chance": 0.5},
                    {"Flags": ["Cloudy"]}
                ]
            }))
            .unwrap();
        assert_eq!(record.sub_records.len(), 2);
        let first = &record.sub_records[0];
        assert_eq!(first.identity.as_deref(), Some("AMBWind"));
        assert_eq!(
            first.value("Flags"),
            Some(&FieldValue::Flags(SoundFlags::PLEASANT | SoundFlags::SNOWY))
        );
        assert_eq!(first.value("Chance"), Some(&FieldValue::Number(0.5)));
        assert_eq!(record.sub_records[1].identity, None);
    }

    #[test]
    fn validate_region_rejects_scalar_list() {
        let schema = section("Region").unwrap();
        let err = schema.validate(&json!({"Form": "R", "RDSA": "AMBWind"})).unwrap_err();
        assert_eq!(err.field, "RDSA");
        let err = schema
            .validate(&json!({"Form": "R", "RDSA": [{"Sound": "S", "Flags": [1]}]}))
            .unwrap_err();
        assert_eq!(err.field, "Flags");
    }

    #[test]
    fn create_defaults() {
        let flags = REGION_SOUNDS.fields[0].on_create.unwrap().value();
        let chance = REGION_SOUNDS.fields[1].on_create.unwrap().value();
        assert_eq!(flags, FieldValue::Flags(SoundFlags::ALL_WEATHER));
        assert_eq!(chance, FieldValue::Number(f64::from(0.05f32)));
    }
}
