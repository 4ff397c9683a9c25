// SPDX-License-Identifier: PMPL-1.0-or-later

//! Core data model for dashbind
//!
//! A [`DataDocument`] is the fetched JSON root: section name to an ordered
//! array of entities or to aggregate values. Its shape is dashboard-specific
//! and never validated; the renderer reads it through [`Entity`] accessors
//! that treat every field as optional.

use crate::i18n::Lang;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Root of a fetched dashboard document. Immutable once constructed; a
/// reload replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataDocument {
    sections: Map<String, Value>,
}

impl DataDocument {
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw).context("parsing data document")?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(sections) => Ok(Self { sections }),
            other => Err(anyhow!(
                "data document root must be an object, found {}",
                json_kind(&other)
            )),
        }
    }

    /// Dotted lookup from the document root, e.g. `metrics.totalProjects`.
    pub fn value_at(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        let mut current = self.sections.get(first)?;
        for part in parts {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Object at `path` viewed as an entity; `None` for absent or non-object values.
    pub fn object_at(&self, path: &str) -> Option<Entity<'_>> {
        self.value_at(path).filter(|v| v.is_object()).map(Entity::new)
    }

    /// Ordered entities of a collection section. Non-object elements are
    /// skipped; a missing or non-array section yields nothing.
    pub fn entities(&self, collection: &str) -> Vec<Entity<'_>> {
        match self.value_at(collection) {
            Some(Value::Array(items)) => items
                .iter()
                .filter(|item| item.is_object())
                .map(Entity::new)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Ids of the entities in `collection`, in document order.
    pub fn ids(&self, collection: &str) -> Vec<String> {
        self.entities(collection)
            .iter()
            .filter_map(|entity| entity.id())
            .collect()
    }
}

/// Borrowed view of one JSON object in the document.
#[derive(Debug, Clone, Copy)]
pub struct Entity<'a> {
    value: &'a Value,
}

impl<'a> Entity<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    pub fn id(&self) -> Option<String> {
        self.text("id")
    }

    /// Field lookup; dotted names walk nested objects.
    pub fn get(&self, field: &str) -> Option<&'a Value> {
        let mut current = self.value;
        for part in field.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Display text of a scalar field. Null, empty strings and
    /// non-scalar values count as absent.
    pub fn text(&self, field: &str) -> Option<String> {
        self.get(field).and_then(value_text)
    }

    /// Bilingual label: `<field>JA` / `<field>EN`, falling back to the bare
    /// `<field>` for both languages.
    pub fn localized(&self, field: &str, lang: Lang) -> Option<String> {
        self.text(&format!("{}{}", field, lang.field_suffix()))
            .or_else(|| self.text(field))
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(value_number)
    }

    /// Object elements of a nested array field (layer sections, items).
    pub fn children(&self, field: &str) -> Vec<Entity<'a>> {
        match self.get(field) {
            Some(Value::Array(items)) => items
                .iter()
                .filter(|item| item.is_object())
                .map(Entity::new)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Tag associations declared by the entity. Arrays contribute each
    /// scalar element; a string contributes its whitespace/comma separated
    /// tokens (a single id string is the one-element case).
    pub fn tags(&self, field: &str) -> Vec<String> {
        match self.get(field) {
            Some(Value::Array(items)) => items.iter().filter_map(value_text).collect(),
            Some(Value::String(s)) => s
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect(),
            Some(other) => value_text(other).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Scalar list field (e.g. free-form chips); same parsing as arrays in [`Entity::tags`].
    pub fn list(&self, field: &str) -> Vec<String> {
        match self.get(field) {
            Some(Value::Array(items)) => items.iter().filter_map(value_text).collect(),
            Some(other) => value_text(other).into_iter().collect(),
            None => Vec::new(),
        }
    }
}

/// Display text of a scalar value. Null, empty strings and non-scalar
/// values count as absent.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(match n.as_f64() {
            Some(f) if n.is_f64() => format_number(f),
            _ => n.to_string(),
        }),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Numeric reading of a value; strings like `"45%"` are accepted.
pub fn value_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Integral values print without a fractional part.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Serialize a tag set into the `data-tags` attribute form: whitespace
/// separated, with `%` and whitespace inside an id percent-encoded as UTF-8
/// bytes (`%E3%80%80` for U+3000).
pub fn encode_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| {
            let mut out = String::with_capacity(tag.len());
            for ch in tag.chars() {
                if ch == '%' || ch.is_whitespace() {
                    let mut buf = [0u8; 4];
                    for byte in ch.encode_utf8(&mut buf).bytes() {
                        out.push_str(&format!("%{:02X}", byte));
                    }
                } else {
                    out.push(ch);
                }
            }
            out
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Inverse of [`encode_tags`].
pub fn decode_tags(attr: &str) -> Vec<String> {
    attr.split_whitespace().map(percent_decode).collect()
}

fn percent_decode(token: &str) -> String {
    let bytes = token.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        let escaped = (bytes[index] == b'%')
            .then(|| token.get(index + 1..index + 3))
            .flatten()
            .and_then(|hex| u8::from_str_radix(hex, 16).ok());
        match escaped {
            Some(byte) => {
                out.push(byte);
                index += 3;
            }
            None => {
                out.push(bytes[index]);
                index += 1;
            }
        }
    }
    String::from_utf8(out).unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_non_object_root() {
        assert!(DataDocument::from_json("[1, 2]").is_err());
        assert!(DataDocument::from_json("{\"projects\": []}").is_ok());
    }

    #[test]
    fn entities_skip_non_objects_and_keep_order() {
        let doc = DataDocument::from_value(json!({
            "projects": [{"id": "b"}, 3, {"id": "a"}]
        }))
        .unwrap();
        assert_eq!(doc.ids("projects"), vec!["b", "a"]);
        assert!(doc.entities("missing").is_empty());
    }

    #[test]
    fn localized_prefers_suffixed_field() {
        let value = json!({"nameJA": "売上", "nameEN": "Sales", "cost": 12});
        let entity = Entity::new(&value);
        assert_eq!(entity.localized("name", Lang::Ja).as_deref(), Some("売上"));
        assert_eq!(entity.localized("name", Lang::En).as_deref(), Some("Sales"));
        assert_eq!(entity.localized("cost", Lang::En).as_deref(), Some("12"));
    }

    #[test]
    fn empty_and_null_fields_are_absent() {
        let value = json!({"size": "", "records": null, "memory": 0});
        let entity = Entity::new(&value);
        assert_eq!(entity.text("size"), None);
        assert_eq!(entity.text("records"), None);
        assert_eq!(entity.text("memory").as_deref(), Some("0"));
    }

    #[test]
    fn tags_accept_arrays_and_strings() {
        let value = json!({"projects": ["p1", "p2"], "department": "sales", "joined": "p1,p3"});
        let entity = Entity::new(&value);
        assert_eq!(entity.tags("projects"), vec!["p1", "p2"]);
        assert_eq!(entity.tags("department"), vec!["sales"]);
        assert_eq!(entity.tags("joined"), vec!["p1", "p3"]);
        assert!(entity.tags("absent").is_empty());
    }

    #[test]
    fn tag_encoding_is_lossless() {
        let tags = vec!["p1".to_string(), "core system".to_string(), "50%".to_string()];
        let encoded = encode_tags(&tags);
        assert_eq!(encoded, "p1 core%20system 50%25");
        assert_eq!(decode_tags(&encoded), tags);
    }

    #[test]
    fn wide_whitespace_survives_tag_encoding() {
        let tags = vec!["営業\u{3000}部".to_string(), "a\u{2003}b".to_string(), "新規".to_string()];
        let encoded = encode_tags(&tags);
        assert_eq!(encoded, "営業%E3%80%80部 a%E2%80%83b 新規");
        assert_eq!(decode_tags(&encoded), tags);
        assert_eq!(decode_tags("100% done%2"), vec!["100%", "done%2"]);
    }

    #[test]
    fn children_are_nested_objects() {
        let value = json!({"sections": [{"items": []}, "skip", {"titleJA": "x"}]});
        let entity = Entity::new(&value);
        assert_eq!(entity.children("sections").len(), 2);
        assert!(entity.children("missing").is_empty());
    }

    #[test]
    fn numbers_format_without_trailing_zero() {
        assert_eq!(format_number(75.0), "75");
        assert_eq!(format_number(12.5), "12.5");
        let value = json!({"progress": 137, "ratio": "45%"});
        let entity = Entity::new(&value);
        assert_eq!(entity.number("progress"), Some(137.0));
        assert_eq!(entity.number("ratio"), Some(45.0));
    }
}
