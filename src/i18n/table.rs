// SPDX-License-Identifier: PMPL-1.0-or-later

//! Runtime localization table.

use super::catalog::{builtin_catalog, Lang};
use crate::types::Entity;
use anyhow::{anyhow, Result};
use regex::{Captures, Regex};
use serde_yaml::Value as YamlValue;
use std::collections::HashMap;
use std::sync::OnceLock;

/// `(language, dotted key) → string`, written once at load and read-only
/// afterwards.
#[derive(Debug, Clone)]
pub struct LocalizationTable {
    default_lang: Lang,
    entries: HashMap<Lang, HashMap<String, String>>,
}

impl LocalizationTable {
    /// Table with no strings: every lookup returns the raw key path.
    pub fn empty(default_lang: Lang) -> Self {
        Self {
            default_lang,
            entries: HashMap::new(),
        }
    }

    /// Table seeded with the compiled-in catalog.
    pub fn builtin(default_lang: Lang) -> Self {
        let mut table = Self::empty(default_lang);
        for lang in Lang::all() {
            for (key, value) in builtin_catalog(*lang) {
                table.insert(*lang, key, value);
            }
        }
        table
    }

    /// Build a table from a YAML tree whose top-level keys are language codes
    /// and whose leaves are strings, e.g. `ja: { app: { title: ... } }`.
    pub fn from_yaml(default_lang: Lang, tree: &YamlValue) -> Result<Self> {
        let mut table = Self::empty(default_lang);
        table.merge_yaml(tree)?;
        Ok(table)
    }

    /// Overlay strings from a YAML tree; existing keys are replaced.
    pub fn merge_yaml(&mut self, tree: &YamlValue) -> Result<()> {
        let YamlValue::Mapping(languages) = tree else {
            return Err(anyhow!("localization must be a mapping of language codes"));
        };
        for (code, subtree) in languages {
            let code = code
                .as_str()
                .ok_or_else(|| anyhow!("localization language keys must be strings"))?;
            let lang = Lang::from_code(code)
                .ok_or_else(|| anyhow!("unsupported localization language '{}'", code))?;
            let mut flat = Vec::new();
            flatten(subtree, String::new(), &mut flat);
            for (key, value) in flat {
                self.insert(lang, &key, &value);
            }
        }
        Ok(())
    }

    pub fn insert(&mut self, lang: Lang, key: &str, value: &str) {
        self.entries
            .entry(lang)
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    pub fn default_lang(&self) -> Lang {
        self.default_lang
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(HashMap::is_empty)
    }

    pub fn len(&self, lang: Lang) -> usize {
        self.entries.get(&lang).map(HashMap::len).unwrap_or(0)
    }

    /// Exact lookup with no fallback.
    pub fn lookup(&self, lang: Lang, key: &str) -> Option<&str> {
        self.entries
            .get(&lang)
            .and_then(|strings| strings.get(key))
            .map(String::as_str)
    }

    /// Resolve `key` for `lang`, falling back to the default language and
    /// finally to the key path itself.
    pub fn resolve<'a>(&'a self, lang: Lang, key: &'a str) -> &'a str {
        self.lookup(lang, key)
            .or_else(|| self.lookup(self.default_lang, key))
            .unwrap_or(key)
    }

    /// Resolve `key` and expand `{field}` placeholders against `entity`.
    ///
    /// A placeholder prefers the language-suffixed field (`{status}` reads
    /// `statusJA` / `statusEN`) and falls back to the bare field; unknown
    /// fields expand to nothing.
    pub fn format(&self, lang: Lang, key: &str, entity: Option<&Entity<'_>>) -> String {
        expand(self.resolve(lang, key), |field| {
            entity.and_then(|e| e.localized(field, lang))
        })
    }

    /// Resolve `key` and substitute named values.
    pub fn format_with(&self, lang: Lang, key: &str, values: &[(&str, &str)]) -> String {
        expand(self.resolve(lang, key), |field| {
            values
                .iter()
                .find(|(name, _)| *name == field)
                .map(|(_, value)| value.to_string())
        })
    }
}

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{([A-Za-z0-9_.]+)\}").unwrap())
}

fn expand(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    placeholder()
        .replace_all(template, |caps: &Captures| lookup(&caps[1]).unwrap_or_default())
        .into_owned()
}

fn flatten(value: &YamlValue, prefix: String, out: &mut Vec<(String, String)>) {
    match value {
        YamlValue::Mapping(map) => {
            for (key, child) in map {
                let Some(key) = yaml_key(key) else { continue };
                let path = if prefix.is_empty() {
                    key
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(child, path, out);
            }
        }
        YamlValue::String(s) => out.push((prefix, s.clone())),
        YamlValue::Number(n) => out.push((prefix, n.to_string())),
        YamlValue::Bool(b) => out.push((prefix, b.to_string())),
        _ => {}
    }
}

fn yaml_key(key: &YamlValue) -> Option<String> {
    match key {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
