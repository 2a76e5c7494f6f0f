//! Loading reconciliation settings from JSON.
//!
//! A config file looks like
//!
//! ```json
//! {
//!   "defaults": { "header": "body > header", "main": "#content" },
//!   "rules": {
//!     "_CONFIG_": { "ignore_defaults": false },
//!     "a.more": { "aria-describedby": "#details" }
//!   }
//! }
//! ```
//!
//! Every field is optional. A bare rule table (the `rules` object alone) can
//! be loaded with [`load_rules`].

use crate::error::{ReadifyError, Result};
use crate::reconcile::{Defaults, Reconciler, RuleTable};
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadifyConfig {
    pub defaults: Defaults,
    pub overrides: Option<RuleTable>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    defaults: Defaults,
    #[serde(default)]
    rules: Option<Value>,
}

impl ReadifyConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(text)?;
        let overrides = raw.rules.map(RuleTable::from_json).transpose()?;
        Ok(ReadifyConfig {
            defaults: raw.defaults,
            overrides,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        debug!("loading config from {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|e| ReadifyError::file(path, e))?;
        Self::from_json_str(&text).map_err(|e| in_file(path, e))
    }

    /// A reconciler for one page.
    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new(&self.defaults, self.overrides.as_ref())
    }
}

/// Reads a bare rule table file.
pub fn load_rules(path: &Path) -> Result<RuleTable> {
    debug!("loading rules from {}", path.display());
    let text = std::fs::read_to_string(path).map_err(|e| ReadifyError::file(path, e))?;
    RuleTable::from_json_str(&text).map_err(|e| in_file(path, e))
}

/// Attaches the file path to errors raised while reading its contents.
fn in_file(path: &Path, err: ReadifyError) -> ReadifyError {
    match err {
        ReadifyError::Json { path: None, source } => ReadifyError::Json {
            path: Some(path.to_path_buf()),
            source,
        },
        ReadifyError::Config(message) => {
            ReadifyError::Config(format!("{}: {}", path.display(), message))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn empty_object_is_the_default_config() {
        assert_eq!(
            ReadifyConfig::from_json_str("{}").unwrap(),
            ReadifyConfig::default()
        );
    }

    #[test]
    fn reads_all_sections() {
        let config = ReadifyConfig::from_json_str(
            r##"{
                "defaults": { "footer": ".site-footer" },
                "rules": { "a.more": { "aria-describedby": "#details" } }
            }"##,
        )
        .unwrap();
        assert_eq!(config.defaults.footer.as_deref(), Some(".site-footer"));

        let reconciler = config.reconciler();
        assert_eq!(
            reconciler.table().get("a.more"),
            Some(&vec![("aria-describedby".to_string(), json!("#details"))])
        );
        assert!(reconciler.table().get(".site-footer").is_some());
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(ReadifyConfig::from_json_str(r#"{ "rulez": {} }"#).is_err());
        assert!(ReadifyConfig::from_json_str(r#"{ "defaults": { "nav": "x" } }"#).is_err());
        assert!(ReadifyConfig::from_json_str(r#"{ "counter_scope": "per-page" }"#).is_err());
    }

    #[test]
    fn loads_rule_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "output": {{ "aria-live": "assertive" }} }}"#).unwrap();
        let rules = load_rules(file.path()).unwrap();
        assert_eq!(rules.keys().collect::<Vec<_>>(), vec!["output"]);

        let missing = load_rules(Path::new("/nonexistent/rules.json")).unwrap_err();
        assert!(matches!(missing, ReadifyError::File { .. }));
    }

    #[test]
    fn malformed_files_keep_the_json_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "output": {{ "aria-live": "#).unwrap();

        let err = load_rules(file.path()).unwrap_err();
        match &err {
            ReadifyError::Json { path, .. } => assert_eq!(path.as_deref(), Some(file.path())),
            other => panic!("expected a JSON error, got {other:?}"),
        }
        assert!(err.to_string().contains(&file.path().display().to_string()));

        let err = ReadifyConfig::from_path(file.path()).unwrap_err();
        assert!(matches!(err, ReadifyError::Json { path: Some(_), .. }));
    }

    #[test]
    fn invalid_rule_tables_name_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "output": "not an object" }}"#).unwrap();

        match load_rules(file.path()).unwrap_err() {
            ReadifyError::Config(message) => {
                assert!(message.starts_with(&file.path().display().to_string()))
            }
            other => panic!("expected a config error, got {other:?}"),
        }
    }
}
