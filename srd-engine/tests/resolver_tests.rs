use srd_engine::{ResolveError, Resolver};
use srd_model::{FormRemapper, MemoryRegistry};
use srd_types::FormType;

/// Returns a fixed address for everything.
struct Fixed(&'static str, u32);

impl FormRemapper for Fixed {
    fn remap(&self, _file: &str, _local_id: u32) -> (String, u32) {
        (self.0.to_string(), self.1)
    }
}

fn make_registry() -> MemoryRegistry {
    let mut registry = MemoryRegistry::new();
    registry.add_plugin("Skyrim.esm");
    registry.insert(FormType::SoundDescriptor, "Skyrim.esm", 0x100, Some("WPNEquip"));
    registry.insert(FormType::Weapon, "Skyrim.esm", 0x200, Some("IronSword"));
    registry
}

// ── Lookup ──────────────────────────────────────────────────────

#[test]
fn resolves_both_addressing_schemes() {
    let registry = make_registry();
    let resolver = Resolver::new(&registry, None);
    let by_address = resolver.resolve("Skyrim.esm|0x100", FormType::SoundDescriptor).unwrap();
    let by_name = resolver.resolve("WPNEquip", FormType::SoundDescriptor).unwrap();
    assert_eq!(by_address, by_name);
}

#[test]
fn wrong_kind_and_unknown_fail() {
    let registry = make_registry();
    let resolver = Resolver::new(&registry, None);
    assert!(matches!(
        resolver.resolve("IronSword", FormType::SoundDescriptor),
        Err(ResolveError::WrongType {
            found: FormType::Weapon
        })
    ));
    assert!(matches!(
        resolver.resolve("Nothing", FormType::Weapon),
        Err(ResolveError::NotFound)
    ));
    assert!(matches!(
        resolver.resolve("Skyrim.esm|XYZ", FormType::Weapon),
        Err(ResolveError::Malformed(_))
    ));
}

// ── Remapping ───────────────────────────────────────────────────

#[test]
fn translate_without_remapper_is_identity() {
    let registry = make_registry();
    let resolver = Resolver::new(&registry, None);
    assert_eq!(resolver.translate("A.esp".into(), 7), ("A.esp".to_string(), 7));
}

#[test]
fn translate_replaces_both_parts_when_they_differ() {
    let registry = make_registry();
    let remapper = Fixed("Merged.esp", 0x800);
    let resolver = Resolver::new(&registry, Some(&remapper));
    assert_eq!(resolver.translate("A.esp".into(), 7), ("Merged.esp".to_string(), 0x800));
}

#[test]
fn translate_ignores_zero_ids_and_empty_names() {
    let registry = make_registry();

    let zero = Fixed("Merged.esp", 0);
    let resolver = Resolver::new(&registry, Some(&zero));
    assert_eq!(resolver.translate("A.esp".into(), 7), ("Merged.esp".to_string(), 7));

    let empty = Fixed("", 0x800);
    let resolver = Resolver::new(&registry, Some(&empty));
    assert_eq!(resolver.translate("A.esp".into(), 7), ("A.esp".to_string(), 0x800));
    assert_eq!(resolver.translate("A.esp".into(), 0), ("A.esp".to_string(), 0));
}

#[test]
fn remapped_lookup_finds_merged_form() {
    let registry = make_registry();
    let remapper = Fixed("Skyrim.esm", 0x100);
    let resolver = Resolver::new(&registry, Some(&remapper));
    let merged = resolver.resolve("Gone.esp|0x5", FormType::SoundDescriptor).unwrap();
    assert_eq!(merged, resolver.resolve("WPNEquip", FormType::SoundDescriptor).unwrap());
}
