use proptest::prelude::*;
use srd_types::{plugin_prefix, Error, FormId, FormType, Identifier};
use std::collections::HashSet;

// ── FormId ────────────────────────────────────────────────────────

#[test]
fn form_id_raw_roundtrip() {
    let id = FormId::new(0x0001_2EB7);
    assert_eq!(id.raw(), 0x0001_2EB7);
}

#[test]
fn form_id_display_is_padded_hex() {
    assert_eq!(FormId::new(0x12EB7).to_string(), "00012EB7");
}

#[test]
fn form_id_hash_and_eq() {
    let mut set = HashSet::new();
    set.insert(FormId::new(7));
    set.insert(FormId::new(7));
    set.insert(FormId::new(8));
    assert_eq!(set.len(), 2);
}

#[test]
fn form_id_serializes_transparently() {
    let json = serde_json::to_string(&FormId::new(42)).unwrap();
    assert_eq!(json, "42");
}

#[test]
fn form_type_names() {
    assert_eq!(FormType::MiscItem.to_string(), "Misc. Item");
    assert_eq!(FormType::SoundDescriptor.name(), "Sound Descriptor");
}

#[test]
fn form_type_serde_snake_case() {
    let parsed: FormType = serde_json::from_str("\"magic_effect\"").unwrap();
    assert_eq!(parsed, FormType::MagicEffect);
}

// ── Identifier ────────────────────────────────────────────────────

#[test]
fn parse_address_form() {
    let id = Identifier::parse("Skyrim.esm|12EB7").unwrap();
    assert_eq!(
        id,
        Identifier::Address {
            file: "Skyrim.esm".into(),
            local_id: 0x12EB7,
        }
    );
    assert!(id.is_address());
}

#[test]
fn parse_address_with_hex_prefix() {
    let id = Identifier::parse("Dawnguard.esm|0x00ABCD").unwrap();
    assert_eq!(
        id,
        Identifier::Address {
            file: "Dawnguard.esm".into(),
            local_id: 0xABCD,
        }
    );
}

#[test]
fn parse_address_light_plugin_uppercase_extension() {
    let id = Identifier::parse("Tiny.ESL|800").unwrap();
    assert!(id.is_address());
}

#[test]
fn parse_editor_id() {
    let id = Identifier::parse("WPNSwordIronEquip").unwrap();
    assert_eq!(id, Identifier::EditorId("WPNSwordIronEquip".into()));
    assert!(!id.is_address());
}

#[test]
fn pipe_without_plugin_is_editor_id() {
    let id = Identifier::parse("Not|APlugin").unwrap();
    assert_eq!(id, Identifier::EditorId("Not|APlugin".into()));
}

#[test]
fn parse_bad_hex_is_error() {
    let err = Identifier::parse("Skyrim.esm|XYZ").unwrap_err();
    assert!(matches!(err, Error::InvalidLocalId { .. }));
}

#[test]
fn parse_empty_is_error() {
    assert!(matches!(Identifier::parse("  "), Err(Error::EmptyIdentifier)));
}

#[test]
fn identifier_display() {
    let id = Identifier::Address {
        file: "Skyrim.esm".into(),
        local_id: 0x12EB7,
    };
    assert_eq!(id.to_string(), "Skyrim.esm|12EB7");
    assert_eq!(Identifier::EditorId("Foo".into()).to_string(), "Foo");
}

// ── plugin_prefix ─────────────────────────────────────────────────

#[test]
fn plugin_prefix_of_scoped_stem() {
    assert_eq!(plugin_prefix("Dawnguard.esm_SRD"), Some("Dawnguard.esm"));
    assert_eq!(plugin_prefix("My Mod.esp_extra_SRD"), Some("My Mod.esp"));
}

#[test]
fn plugin_prefix_absent() {
    assert_eq!(plugin_prefix("Global_SRD"), None);
    assert_eq!(plugin_prefix(".esp"), None);
}

proptest! {
    #[test]
    fn address_identifiers_parse_back(file in "[A-Za-z][A-Za-z0-9 ]{0,12}", ext in "(esp|esm|esl)", local_id in any::<u32>()) {
        let text = format!("{}.{}|{:X}", file, ext, local_id);
        let parsed = Identifier::parse(&text).unwrap();
        prop_assert_eq!(parsed, Identifier::Address { file: format!("{}.{}", file, ext), local_id });
    }
}
