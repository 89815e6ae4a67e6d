use srd_model::{
    format_identifier, FormRegistry, FormRemapper, MemoryRegistry, ModelError, RemapEntry, RemapTable,
};
use srd_types::{FormType, ReferenceField};
use std::io::Write;

fn make_registry() -> MemoryRegistry {
    let mut registry = MemoryRegistry::new();
    registry.add_plugin("Skyrim.esm");
    registry.add_plugin("Dawnguard.esm");
    registry
}

// ── Lookups ──────────────────────────────────────────────────────

#[test]
fn lookup_by_address_is_case_insensitive_on_file() {
    let mut registry = make_registry();
    let id = registry.insert(FormType::Weapon, "Skyrim.esm", 0x12EB7, Some("IronSword"));
    assert_eq!(registry.lookup_by_address("skyrim.ESM", 0x12EB7), Some(id));
    assert_eq!(registry.lookup_by_address("Skyrim.esm", 0x12EB8), None);
}

#[test]
fn lookup_by_editor_id() {
    let mut registry = make_registry();
    let id = registry.insert(FormType::SoundDescriptor, "Skyrim.esm", 0x100, Some("WPNEquip"));
    assert_eq!(registry.lookup_by_editor_id("WPNEquip"), Some(id));
    assert_eq!(registry.lookup_by_editor_id("Missing"), None);
    assert_eq!(registry.form_type(id), Some(FormType::SoundDescriptor));
}

#[test]
fn load_order_is_preserved_and_deduplicated() {
    let mut registry = make_registry();
    registry.add_plugin("skyrim.esm");
    assert_eq!(registry.load_order(), vec!["Skyrim.esm", "Dawnguard.esm"]);
    assert!(registry.is_source_loaded("DAWNGUARD.ESM"));
    assert!(!registry.is_source_loaded("Hearthfires.esm"));
}

// ── Mutators ─────────────────────────────────────────────────────

#[test]
fn set_reference_on_weapon() {
    let mut registry = make_registry();
    let weapon = registry.insert(FormType::Weapon, "Skyrim.esm", 1, None);
    let sound = registry.insert(FormType::SoundDescriptor, "Skyrim.esm", 2, None);

    registry.set_reference(weapon, ReferenceField::Equip, sound).unwrap();
    assert_eq!(registry.reference(weapon, ReferenceField::Equip), Some(sound));
    assert_eq!(registry.reference(weapon, ReferenceField::Unequip), None);
}

#[test]
fn set_reference_rejects_foreign_field() {
    let mut registry = make_registry();
    let armor = registry.insert(FormType::Armor, "Skyrim.esm", 1, None);
    let sound = registry.insert(FormType::SoundDescriptor, "Skyrim.esm", 2, None);

    let err = registry.set_reference(armor, ReferenceField::Equip, sound).unwrap_err();
    assert!(matches!(err, ModelError::FieldNotApplicable { .. }));
}

#[test]
fn region_sound_data_only_when_attached() {
    let mut registry = make_registry();
    let bare = registry.insert(FormType::Region, "Skyrim.esm", 1, None);
    let with_data = registry.insert(FormType::Region, "Skyrim.esm", 2, None);
    registry.attach_sound_data(with_data).unwrap();

    assert!(registry.region_sounds_mut(bare).is_none());
    assert_eq!(registry.region_sounds(with_data).map(<[_]>::len), Some(0));
}

#[test]
fn attach_sound_data_rejects_non_region() {
    let mut registry = make_registry();
    let weapon = registry.insert(FormType::Weapon, "Skyrim.esm", 1, None);
    assert!(matches!(registry.attach_sound_data(weapon), Err(ModelError::NotARegion(_))));
}

#[test]
fn effect_sounds_only_on_magic_effects() {
    let mut registry = make_registry();
    let effect = registry.insert(FormType::MagicEffect, "Skyrim.esm", 1, None);
    let weapon = registry.insert(FormType::Weapon, "Skyrim.esm", 2, None);
    assert!(registry.effect_sounds_mut(effect).is_some());
    assert!(registry.effect_sounds_mut(weapon).is_none());
}

// ── Identifiers ──────────────────────────────────────────────────

#[test]
fn describe_prefers_editor_id() {
    let mut registry = make_registry();
    let named = registry.insert(FormType::Weapon, "Skyrim.esm", 0x12EB7, Some("IronSword"));
    let short = registry.insert(FormType::Weapon, "Skyrim.esm", 0xAB, Some("X"));
    let generated = registry.insert_generated(FormType::Weapon, 0xFF01, None);

    assert_eq!(registry.describe(named), "IronSword");
    assert_eq!(registry.describe(short), "Skyrim.esm|AB");
    assert_eq!(registry.describe(generated), "Generated|FF01");
}

#[test]
fn format_identifier_fallbacks() {
    assert_eq!(format_identifier(None, Some("A.esp"), 0x10), "A.esp|10");
    assert_eq!(format_identifier(Some(""), None, 0x10), "Generated|10");
}

// ── Snapshot ─────────────────────────────────────────────────────

#[test]
fn snapshot_from_json() {
    let json = r#"{
        "load_order": ["Skyrim.esm"],
        "forms": [
            {"type": "region", "file": "Skyrim.esm", "local_id": 16, "editor_id": "FalkreathRegion", "sound_data": true},
            {"type": "sound_descriptor", "file": "Skyrim.esm", "local_id": 32, "editor_id": "AMBWind"}
        ]
    }"#;
    let registry = MemoryRegistry::from_json_str(json).unwrap();
    let region = registry.lookup_by_editor_id("FalkreathRegion").unwrap();
    assert!(registry.region_sounds(region).is_some());
    assert_eq!(registry.lookup_by_address("Skyrim.esm", 32), registry.lookup_by_editor_id("AMBWind"));
    assert_eq!(registry.len(), 2);
}

#[test]
fn snapshot_sound_data_on_weapon_is_error() {
    let json = r#"{"forms": [{"type": "weapon", "file": "Skyrim.esm", "local_id": 1, "sound_data": true}]}"#;
    assert!(MemoryRegistry::from_json_str(json).is_err());
}

#[test]
fn snapshot_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"load_order": ["Skyrim.esm"], "forms": []}}"#).unwrap();
    let registry = MemoryRegistry::load(file.path()).unwrap();
    assert!(registry.is_empty());
    assert!(registry.is_source_loaded("Skyrim.esm"));
}

// ── RemapTable ───────────────────────────────────────────────────

#[test]
fn remap_table_translates_known_addresses() {
    let table: RemapTable = vec![RemapEntry {
        file: "Small.esp".into(),
        local_id: 0x801,
        to_file: "Merged.esp".into(),
        to_local_id: 0x1234,
    }]
    .into_iter()
    .collect();

    assert_eq!(table.remap("small.esp", 0x801), ("Merged.esp".to_string(), 0x1234));
    assert_eq!(table.remap("Small.esp", 0x802), ("Small.esp".to_string(), 0x802));
    assert_eq!(table.len(), 1);
}

#[test]
fn remap_table_from_json() {
    let table = RemapTable::from_json_str(
        r#"[{"file": "A.esp", "local_id": 1, "to_file": "B.esp", "to_local_id": 2}]"#,
    )
    .unwrap();
    assert_eq!(table.remap("A.esp", 1), ("B.esp".to_string(), 2));
}
