use crate::descriptor::ConnectionDescriptor;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

pub const REDACTED: &str = "***";

/// Template key → value for one dispatch.
///
/// Keys iterate in sorted order so expansion is deterministic. Values
/// inserted with [`insert_secret`](Self::insert_secret) are masked by
/// [`redact`](Self::redact) and never appear in `Debug` output.
#[derive(Clone, Default)]
pub struct SubstitutionMapping {
    values: BTreeMap<String, String>,
    secret_keys: BTreeSet<String>,
}

impl SubstitutionMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base keys every profile can use: `name`, `protocol`, `username`,
    /// `value`, `host`, `port`, `dbname`, plus `token_id` when present.
    pub fn from_descriptor(d: &ConnectionDescriptor) -> Self {
        let mut m = Self::new();
        m.insert("name", &d.display_name);
        m.insert("protocol", d.protocol.profile_key());
        m.insert("username", &d.username);
        m.insert_secret("value", d.secret.expose());
        m.insert("host", &d.host);
        m.insert("port", d.port.to_string());
        m.insert("dbname", d.database.as_deref().unwrap_or_default());
        if let Some(id) = &d.token_id {
            m.insert("token_id", id);
        }
        m
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.secret_keys.remove(&key);
        self.values.insert(key, value.into());
    }

    pub fn insert_secret(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.secret_keys.insert(key.clone());
        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Masks every non-empty secret value occurring in `text`.
    pub fn redact(&self, text: &str) -> String {
        let mut out = text.to_string();
        for key in &self.secret_keys {
            if let Some(secret) = self.values.get(key).filter(|s| !s.is_empty()) {
                out = out.replace(secret.as_str(), REDACTED);
            }
        }
        out
    }
}

impl fmt::Debug for SubstitutionMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in &self.values {
            if self.secret_keys.contains(k) {
                map.entry(k, &REDACTED);
            } else {
                map.entry(k, v);
            }
        }
        map.finish()
    }
}
