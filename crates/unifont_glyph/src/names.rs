//! Interned attribute and tag names.
//!
//! Glyph records never store name strings. Attribute and tag names are
//! interned once per registry and compared by identity afterwards.
//! Every registry interns the well known names first and in a fixed order,
//! so their identities are the same constants in all registries. Any other
//! identity carries the registry that issued it.
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::RwLock;
use string_interner::{backend::StringBackend, StringInterner, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameSymbol(u32);

impl Symbol for NameSymbol {
    fn try_from_usize(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(NameSymbol)
    }

    fn to_usize(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameCategory {
    Attribute,
    Tag,
}

/// Registry stamp of the well known names, valid in every registry.
const ANY_REGISTRY: u32 = 0;

static NEXT_REGISTRY: AtomicU32 = AtomicU32::new(ANY_REGISTRY + 1);

/// Identity of an interned name, unique per `(registry, category, name)`.
///
/// Ids of the well known names are shared by all registries, every other id
/// only resolves in the registry that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NameId {
    pub category: NameCategory,
    pub registry: u32,
    pub symbol: NameSymbol,
}

/// Name of a `key=value` glyph attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeName {
    registry: u32,
    symbol: NameSymbol,
}

impl AttributeName {
    pub const BLANK_WIDTH: AttributeName = AttributeName::well_known(0);
    pub const COMBINING: AttributeName = AttributeName::well_known(1);
    pub const WIDTH_OVERRIDE: AttributeName = AttributeName::well_known(2);
    pub const NAME: AttributeName = AttributeName::well_known(3);

    const fn well_known(index: u32) -> Self {
        Self {
            registry: ANY_REGISTRY,
            symbol: NameSymbol(index),
        }
    }

    pub fn id(self) -> NameId {
        NameId {
            category: NameCategory::Attribute,
            registry: self.registry,
            symbol: self.symbol,
        }
    }
}

/// Name of a presence only glyph tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagName {
    registry: u32,
    symbol: NameSymbol,
}

impl TagName {
    /// `np`: the glyph does not print.
    pub const NON_PRINTING: TagName = TagName::well_known(0);
    pub const IGNORE_EMPTY: TagName = TagName::well_known(1);

    const fn well_known(index: u32) -> Self {
        Self {
            registry: ANY_REGISTRY,
            symbol: NameSymbol(index),
        }
    }

    pub fn id(self) -> NameId {
        NameId {
            category: NameCategory::Tag,
            registry: self.registry,
            symbol: self.symbol,
        }
    }
}

const WELL_KNOWN_ATTRIBUTES: [&str; 4] = ["blank_width", "combining", "width_override", "name"];
const WELL_KNOWN_TAGS: [&str; 2] = ["np", "ignore_empty"];

type Interner = StringInterner<StringBackend<NameSymbol>>;

lazy_static::lazy_static! {
    static ref GLOBAL_REGISTRY: NameRegistry = NameRegistry::new();
}

pub struct NameRegistry {
    id: u32,
    attributes: RwLock<Interner>,
    tags: RwLock<Interner>,
}

impl Default for NameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NameRegistry {
    pub fn new() -> Self {
        Self {
            id: NEXT_REGISTRY.fetch_add(1, Ordering::Relaxed),
            attributes: RwLock::new(preloaded(&WELL_KNOWN_ATTRIBUTES)),
            tags: RwLock::new(preloaded(&WELL_KNOWN_TAGS)),
        }
    }

    /// The process wide registry used by [`crate::parse_line`] and [`crate::write_line`].
    pub fn global() -> &'static NameRegistry {
        &GLOBAL_REGISTRY
    }

    pub fn intern(&self, category: NameCategory, name: &str) -> NameId {
        let lock = self.interner(category);
        if let Some(symbol) = lock.read().get(name) {
            return self.stamp(category, symbol);
        }
        // another thread may have interned the name between the two locks,
        // get_or_intern returns the existing symbol in that case
        let symbol = lock.write().get_or_intern(name);
        self.stamp(category, symbol)
    }

    /// Looks a name up without interning it.
    pub fn lookup(&self, category: NameCategory, name: &str) -> Option<NameId> {
        self.interner(category).read().get(name).map(|symbol| self.stamp(category, symbol))
    }

    /// Name of `id`, `None` if `id` was issued by another registry.
    pub fn resolve(&self, id: NameId) -> Option<String> {
        if !self.owns(id) {
            return None;
        }
        self.interner(id.category).read().resolve(id.symbol).map(str::to_string)
    }

    /// Whether `id` is a well known name or was issued by this registry.
    pub fn owns(&self, id: NameId) -> bool {
        (id.registry == ANY_REGISTRY && id.symbol.to_usize() < well_known(id.category).len()) || id.registry == self.id
    }

    pub fn attribute(&self, name: &str) -> AttributeName {
        let id = self.intern(NameCategory::Attribute, name);
        AttributeName {
            registry: id.registry,
            symbol: id.symbol,
        }
    }

    pub fn tag(&self, name: &str) -> TagName {
        let id = self.intern(NameCategory::Tag, name);
        TagName {
            registry: id.registry,
            symbol: id.symbol,
        }
    }

    pub fn attribute_name(&self, name: AttributeName) -> Option<String> {
        self.resolve(name.id())
    }

    pub fn tag_name(&self, name: TagName) -> Option<String> {
        self.resolve(name.id())
    }

    /// Number of names interned for `category`, well known names included.
    pub fn len(&self, category: NameCategory) -> usize {
        self.interner(category).read().len()
    }

    fn stamp(&self, category: NameCategory, symbol: NameSymbol) -> NameId {
        let registry = if symbol.to_usize() < well_known(category).len() { ANY_REGISTRY } else { self.id };
        NameId { category, registry, symbol }
    }

    fn interner(&self, category: NameCategory) -> &RwLock<Interner> {
        match category {
            NameCategory::Attribute => &self.attributes,
            NameCategory::Tag => &self.tags,
        }
    }
}

fn well_known(category: NameCategory) -> &'static [&'static str] {
    match category {
        NameCategory::Attribute => &WELL_KNOWN_ATTRIBUTES,
        NameCategory::Tag => &WELL_KNOWN_TAGS,
    }
}

fn preloaded(names: &[&str]) -> Interner {
    let mut interner = Interner::new();
    for name in names {
        interner.get_or_intern(name);
    }
    interner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_constants() {
        let registry = NameRegistry::new();
        assert_eq!(registry.attribute("blank_width"), AttributeName::BLANK_WIDTH);
        assert_eq!(registry.attribute("combining"), AttributeName::COMBINING);
        assert_eq!(registry.attribute("width_override"), AttributeName::WIDTH_OVERRIDE);
        assert_eq!(registry.attribute("name"), AttributeName::NAME);
        assert_eq!(registry.tag("np"), TagName::NON_PRINTING);
        assert_eq!(registry.tag("ignore_empty"), TagName::IGNORE_EMPTY);
    }

    #[test]
    fn test_categories_are_separate() {
        let registry = NameRegistry::new();
        let attr = registry.intern(NameCategory::Attribute, "foo");
        let tag = registry.intern(NameCategory::Tag, "foo");
        assert_ne!(attr, tag);
        assert_eq!(registry.resolve(attr).as_deref(), Some("foo"));
        assert_eq!(registry.resolve(tag).as_deref(), Some("foo"));
    }

    #[test]
    fn test_registries_do_not_share_ids() {
        let first = NameRegistry::new();
        let second = NameRegistry::new();
        let a = first.tag("wide");
        let b = second.tag("wide");
        assert_ne!(a, b);
        assert!(first.owns(a.id()));
        assert!(!second.owns(a.id()));
        assert_eq!(second.tag_name(a), None);
        assert!(second.owns(TagName::NON_PRINTING.id()));
    }
}
