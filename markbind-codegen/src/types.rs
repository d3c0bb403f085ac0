//! Type resolution table.
//!
//! Maps markup element tags to the concrete UI Toolkit types generated
//! fields are declared with. The built-in table is created once and shared;
//! projects extend a copy of it with their own custom elements.

use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Built-in container elements.
const CONTAINER_TAGS: &[&str] = &[
    "VisualElement",
    "ScrollView",
    "ListView",
    "IMGUIContainer",
    "GroupBox",
];

/// Built-in control elements.
const CONTROL_TAGS: &[&str] = &[
    "Label",
    "Button",
    "Toggle",
    "Scroller",
    "TextField",
    "Foldout",
    "Slider",
    "SliderInt",
    "MinMaxSlider",
    "ProgressBar",
    "DropdownField",
    "RadioButton",
    "RadioButtonGroup",
];

static BUILTIN: LazyLock<TypeTable> = LazyLock::new(|| {
    let mut table = TypeTable::new();
    for tag in CONTAINER_TAGS.iter().chain(CONTROL_TAGS) {
        table.insert(*tag, *tag);
    }
    table
});

/// Resolved type information for a markup tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeBinding {
    /// Tag as written in markup (without namespace prefix).
    pub tag: String,
    /// Target type name emitted in generated code.
    pub target_type_name: String,
}

impl TypeBinding {
    /// Creates a new type binding.
    #[must_use]
    pub fn new(tag: impl Into<String>, target_type_name: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            target_type_name: target_type_name.into(),
        }
    }
}

/// Immutable-by-convention mapping from tag to [`TypeBinding`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeTable {
    bindings: BTreeMap<String, TypeBinding>,
}

impl TypeTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }

    /// Returns the process-wide table of built-in UI Toolkit elements.
    #[must_use]
    pub fn builtin() -> &'static TypeTable {
        &BUILTIN
    }

    /// Adds or replaces the binding for a tag.
    pub fn insert(&mut self, tag: impl Into<String>, target_type_name: impl Into<String>) {
        let binding = TypeBinding::new(tag, target_type_name);
        self.bindings.insert(binding.tag.clone(), binding);
    }

    /// Returns a copy of this table extended with extra `(tag, type)` pairs.
    #[must_use]
    pub fn extended<I, K, V>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = self.clone();
        for (tag, target) in extra {
            table.insert(tag, target);
        }
        table
    }

    /// Resolves a tag. Lookup is exact and case-sensitive.
    #[must_use]
    pub fn resolve(&self, tag: &str) -> Option<&TypeBinding> {
        self.bindings.get(tag)
    }

    /// Returns the number of known tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_containers_and_controls() {
        let table = TypeTable::builtin();
        assert_eq!(table.len(), CONTAINER_TAGS.len() + CONTROL_TAGS.len());

        let button = table.resolve("Button").expect("Button is built in");
        assert_eq!(button.tag, "Button");
        assert_eq!(button.target_type_name, "Button");
        assert!(table.resolve("ScrollView").is_some());
        assert!(table.resolve("RadioButtonGroup").is_some());
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let table = TypeTable::builtin();
        assert!(table.resolve("button").is_none());
        assert!(table.resolve("BUTTON").is_none());
    }

    #[test]
    fn test_unknown_tag_is_absent() {
        assert!(TypeTable::builtin().resolve("widget-xyz").is_none());
    }

    #[test]
    fn test_extended_keeps_builtin_untouched() {
        let table = TypeTable::builtin().extended([("HealthBar", "Game.UI.HealthBar")]);

        assert_eq!(
            table.resolve("HealthBar").map(|b| b.target_type_name.as_str()),
            Some("Game.UI.HealthBar")
        );
        assert!(table.resolve("Label").is_some());
        assert!(TypeTable::builtin().resolve("HealthBar").is_none());
    }

    #[test]
    fn test_insert_replaces() {
        let mut table = TypeTable::new();
        assert!(table.is_empty());
        table.insert("Label", "Label");
        table.insert("Label", "Custom.Label");
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.resolve("Label").map(|b| b.target_type_name.as_str()),
            Some("Custom.Label")
        );
    }
}
