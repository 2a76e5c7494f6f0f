//! The rule table: selectors mapped to the attributes they should carry.

use crate::error::{ReadifyError, Result};
use crate::reconcile::policy;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Attribute name/value pairs of one rule, in declaration order.
pub type Attributes = Vec<(String, Value)>;

/// Key of the directive entry that carries table options.
pub const CONFIG_KEY: &str = "_CONFIG_";

/// Ordered selector -> attributes table. Order is significant: rules are
/// applied, and outcomes reported, in table order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleTable {
    entries: Vec<(String, Attributes)>,
}

/// Shorthand for site-specific landmark selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Defaults {
    /// Selector of the page header; receives `role="banner"`.
    pub header: Option<String>,
    /// Selector of the page footer; receives `role="contentinfo"`.
    pub footer: Option<String>,
    /// Selector of the main content; receives `role="main"`.
    pub main: Option<String>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The landmark and form rules applied when nothing overrides them.
    pub fn builtin() -> Self {
        let mut table = RuleTable::new();
        table.insert("article", vec![attr("role", json!("article"))]);
        table.insert("aside", vec![attr("role", json!("complementary"))]);
        table.insert("nav", vec![attr("role", json!("navigation"))]);
        table.insert("main", vec![attr("role", json!("main"))]);
        table.insert("section", vec![attr("role", json!("region"))]);
        table.insert("output", vec![attr("aria-live", json!("polite"))]);
        table.insert("[required]", vec![attr("aria-required", json!("true"))]);
        table
    }

    /// Sets the attributes of `key`. An existing key keeps its position and
    /// has its attribute object replaced wholesale; a new key is appended.
    pub fn insert(&mut self, key: impl Into<String>, attributes: Attributes) {
        let key = key.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = attributes,
            None => self.entries.push((key, attributes)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Attributes> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, attributes)| attributes)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attributes)> {
        self.entries
            .iter()
            .map(|(key, attributes)| (key.as_str(), attributes))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Keys that name selectors, i.e. everything except directives.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.keys().filter(|key| !policy::is_directive(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when `_CONFIG_.ignore_defaults` is `true`: the table replaces
    /// the defaults instead of being merged into them.
    pub fn ignores_defaults(&self) -> bool {
        self.get(CONFIG_KEY).is_some_and(|options| {
            options
                .iter()
                .any(|(name, value)| name == "ignore_defaults" && *value == Value::Bool(true))
        })
    }

    /// Reads a table from a JSON object of objects, keeping key order.
    pub fn from_json(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(ReadifyError::Config(
                "rule table must be a JSON object".to_string(),
            ));
        };
        let mut table = RuleTable::new();
        for (key, rule) in map {
            let Value::Object(attributes) = rule else {
                return Err(ReadifyError::Config(format!(
                    "rule `{}` must map to an object of attributes",
                    key
                )));
            };
            table.insert(key, attributes.into_iter().collect());
        }
        Ok(table)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::from_json(serde_json::from_str(text)?)
    }
}

fn attr(name: &str, value: Value) -> (String, Value) {
    (name.to_string(), value)
}

/// Builds the table a reconciliation pass runs with.
///
/// Landmark selectors from `defaults` are added to the builtin rules. When a
/// custom main selector is given, the generic `main` rule is emptied so the
/// role is not applied to both. Then `overrides` either replaces the whole
/// table (when it sets `_CONFIG_.ignore_defaults`) or is merged key by key.
pub fn build_table(defaults: &Defaults, overrides: Option<&RuleTable>) -> RuleTable {
    let mut table = RuleTable::builtin();

    if let Some(header) = &defaults.header {
        table.insert(header.as_str(), vec![attr("role", json!("banner"))]);
    }
    if let Some(footer) = &defaults.footer {
        table.insert(footer.as_str(), vec![attr("role", json!("contentinfo"))]);
    }
    if let Some(main) = &defaults.main {
        table.insert(main.as_str(), vec![attr("role", json!("main"))]);
        if main != "main" {
            table.insert("main", Vec::new());
        }
    }

    match overrides {
        Some(overrides) if overrides.ignores_defaults() => overrides.clone(),
        Some(overrides) => {
            for (key, attributes) in overrides.iter() {
                table.insert(key, attributes.clone());
            }
            table
        }
        None => table,
    }
}

struct AttributesMap<'a>(&'a Attributes);

impl Serialize for AttributesMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Serializes as a JSON object in table order.
impl Serialize for RuleTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, attributes) in &self.entries {
            map.serialize_entry(key, &AttributesMap(attributes))?;
        }
        map.end()
    }
}
