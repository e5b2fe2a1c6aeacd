//! Configuration lookup injected into [`Query`](crate::Query)

use std::collections::HashMap;

use serde::Deserialize;

use crate::Result;

/// Key holding the default table-name prefix
pub const TABLE_PREFIX_KEY: &str = "dbprefix";

/// Source of configuration values consulted at construction time
pub trait ConfigLookup {
    /// Look up a configuration value by key
    fn lookup(&self, key: &str) -> Option<String>;
}

/// No configuration at all
impl ConfigLookup for () {
    fn lookup(&self, _key: &str) -> Option<String> {
        None
    }
}

impl ConfigLookup for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<C: ConfigLookup + ?Sized> ConfigLookup for &C {
    fn lookup(&self, key: &str) -> Option<String> {
        (**self).lookup(key)
    }
}

/// Typed settings, usually deserialized from the application's config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dbprefix: String,
}

impl Settings {
    /// Parse settings from a JSON document; missing keys take defaults
    ///
    /// # Examples
    /// ```
    /// use tessera_core::Settings;
    ///
    /// let settings = Settings::from_json(r#"{"dbprefix": "w2p_"}"#).unwrap();
    /// assert_eq!(settings.dbprefix, "w2p_");
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl ConfigLookup for Settings {
    fn lookup(&self, key: &str) -> Option<String> {
        match key {
            TABLE_PREFIX_KEY => Some(self.dbprefix.clone()),
            _ => None,
        }
    }
}

/// Pick the table prefix: an explicit non-empty prefix wins, then the
/// configured one, then the empty string
pub fn resolve_table_prefix<C: ConfigLookup + ?Sized>(explicit: &str, config: &C) -> String {
    if !explicit.is_empty() {
        return explicit.to_string();
    }
    config.lookup(TABLE_PREFIX_KEY).unwrap_or_default()
}
