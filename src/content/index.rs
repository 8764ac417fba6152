//! The loaded content index

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Immutable mapping from content group name (file stem) to parsed document
///
/// Groups iterate in name order, so two indexes built from the same
/// directory serialize to identical bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ContentIndex {
    groups: BTreeMap<String, Value>,
}

impl ContentIndex {
    pub(crate) fn from_groups(groups: BTreeMap<String, Value>) -> Self {
        Self { groups }
    }

    /// Look up a group by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.groups.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group names in sorted order
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Name of the JSON kind of `value`
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Short description of a document's shape, e.g. `array (3 items)`
pub fn describe(value: &Value) -> String {
    match value {
        Value::Array(items) => format!("array ({} items)", items.len()),
        Value::Object(map) => format!("object ({} keys)", map.len()),
        other => kind_of(other).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ContentIndex {
        let mut groups = BTreeMap::new();
        groups.insert("projects".to_string(), json!([{"slug": "a"}]));
        groups.insert("blogs".to_string(), json!({"posts": []}));
        ContentIndex::from_groups(groups)
    }

    #[test]
    fn test_groups_are_sorted() {
        let index = sample();
        assert_eq!(index.groups().collect::<Vec<_>>(), vec!["blogs", "projects"]);
        assert!(index.contains("blogs"));
        assert!(!index.contains("merge_data"));
    }

    #[test]
    fn test_serializes_as_object() {
        let text = serde_json::to_string(&sample()).unwrap();
        assert_eq!(text, r#"{"blogs":{"posts":[]},"projects":[{"slug":"a"}]}"#);
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(&json!([1, 2, 3])), "array (3 items)");
        assert_eq!(describe(&json!({"a": 1})), "object (1 keys)");
        assert_eq!(describe(&json!("x")), "string");
        assert_eq!(describe(&Value::Null), "null");
    }
}
