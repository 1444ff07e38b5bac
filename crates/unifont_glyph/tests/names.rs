use std::thread;

use unifont_glyph::{AttributeName, NameCategory, NameRegistry, TagName};

#[test]
fn test_same_name_same_identity() {
    let registry = NameRegistry::new();
    let a = registry.attribute("foundry");
    let b = registry.attribute("foundry");
    assert_eq!(a, b);
    assert_ne!(a, registry.attribute("Foundry"));
    assert_ne!(a, AttributeName::NAME);
    assert_eq!(registry.attribute_name(a).as_deref(), Some("foundry"));

    assert_eq!(registry.tag("np"), TagName::NON_PRINTING);
    assert_ne!(registry.tag("np2"), TagName::NON_PRINTING);
}

#[test]
fn test_lookup_does_not_intern() {
    let registry = NameRegistry::new();
    let before = registry.len(NameCategory::Tag);
    assert_eq!(registry.lookup(NameCategory::Tag, "wide"), None);
    assert_eq!(registry.len(NameCategory::Tag), before);

    let id = registry.intern(NameCategory::Tag, "wide");
    assert_eq!(registry.lookup(NameCategory::Tag, "wide"), Some(id));
    assert_eq!(registry.lookup(NameCategory::Attribute, "wide"), None);
    assert_eq!(registry.len(NameCategory::Tag), before + 1);
}

#[test]
fn test_concurrent_interning_converges() {
    let registry = NameRegistry::new();
    let results: Vec<Vec<AttributeName>> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| (0..100).map(|i| registry.attribute(&format!("attr_{i}"))).collect::<Vec<_>>()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for other in &results[1..] {
        assert_eq!(&results[0], other);
    }
    // 4 well known names plus 100 new ones
    assert_eq!(registry.len(NameCategory::Attribute), 104);
}

#[test]
fn test_global_registry_is_shared() {
    let a = NameRegistry::global().tag("shared_tag");
    let b = NameRegistry::global().tag("shared_tag");
    assert_eq!(a, b);
    assert_eq!(NameRegistry::global().tag_name(a).as_deref(), Some("shared_tag"));
}

#[test]
fn test_ids_are_scoped_to_their_registry() {
    let global = NameRegistry::global();
    let shared = global.tag("scoped_shared_one");
    let local = NameRegistry::new();
    let wide = local.tag("wide");

    assert_ne!(wide, shared);
    assert_eq!(global.tag_name(wide), None);
    assert_eq!(local.tag_name(wide).as_deref(), Some("wide"));
    assert_eq!(local.tag_name(shared), None);

    // well known names resolve everywhere
    assert_eq!(local.attribute_name(AttributeName::NAME).as_deref(), Some("name"));
    assert_eq!(global.tag_name(TagName::NON_PRINTING).as_deref(), Some("np"));
    assert_eq!(local.attribute("name"), global.attribute("name"));
}
