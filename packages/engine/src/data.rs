//! Data context for condition evaluation
//!
//! Conditions are resolved against a JSON document. Keys are looked up
//! directly on the root object; keys that are absent (or `null`) there are
//! looked up once more in the object stored under the top-level
//! [`SHARING_KEY`](crate::config::SHARING_KEY). There is no dotted-path access
//! and no recursion into nested objects.
//!
//! Resolution never fails. A key that cannot be found resolves to the empty
//! string, which is also what every condition treats as "absent".

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::config::SHARING_KEY;
use crate::error::{EngineError, Result};

/// JSON-backed lookup table for tag conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct DataContext {
    root: Value,
}

impl DataContext {
    /// Load a data context from a path to a JSON file or from literal JSON text.
    ///
    /// If a file exists at `input` it is read and parsed, otherwise `input`
    /// itself is parsed as JSON.
    ///
    /// # Errors
    /// Returns [`EngineError::DataLoad`] if the file cannot be read or neither
    /// the file contents nor the input text is valid JSON.
    pub fn new(input: &str) -> Result<Self> {
        let path = Path::new(input);
        if path.is_file() {
            return Self::from_file(path);
        }
        Self::from_json(input)
    }

    /// Load a data context from a JSON file.
    ///
    /// # Errors
    /// See [`DataContext::new`].
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| EngineError::data_load(format!("cannot read {}", path.display()), e))?;
        tracing::debug!(path = %path.display(), size = text.len(), "Loaded data context file");
        let root = serde_json::from_str(&text).map_err(|e| {
            EngineError::data_load(format!("{} is not valid JSON", path.display()), e)
        })?;
        Ok(Self { root })
    }

    /// Parse a data context from literal JSON text.
    ///
    /// # Errors
    /// Returns [`EngineError::DataLoad`] if `text` is not valid JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        let root = serde_json::from_str(text).map_err(|e| {
            EngineError::data_load("input is neither an existing file nor valid JSON", e)
        })?;
        Ok(Self { root })
    }

    /// Wrap an already parsed JSON value.
    #[must_use]
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Look up the raw value for `key` against the root context.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        self.lookup_in(key, &self.root)
    }

    /// Look up the raw value for `key` in `context`, falling back to the
    /// root's `Sharing` object.
    ///
    /// Returns `None` when `context` is not an object, or when the key is
    /// absent or `null` in both scopes.
    #[must_use]
    pub fn lookup_in<'a>(&'a self, key: &str, context: &'a Value) -> Option<&'a Value> {
        let object = context.as_object()?;

        object
            .get(key)
            .filter(|v| !v.is_null())
            .or_else(|| self.sharing().and_then(|s| s.get(key)))
            .filter(|v| !v.is_null())
    }

    /// Resolve `key` against the root context as a string.
    ///
    /// Missing keys resolve to `""`.
    #[must_use]
    pub fn resolve(&self, key: &str) -> String {
        self.resolve_in(key, &self.root)
    }

    /// Resolve `key` against `context` as a string.
    ///
    /// A `context` that is not an object (e.g. an array) resolves to `""`.
    #[must_use]
    pub fn resolve_in(&self, key: &str, context: &Value) -> String {
        self.lookup_in(key, context)
            .map(value_to_string)
            .unwrap_or_default()
    }

    fn sharing(&self) -> Option<&serde_json::Map<String, Value>> {
        self.root.get(SHARING_KEY).and_then(Value::as_object)
    }
}

/// String form of a data value used for equality conditions.
///
/// Strings are returned verbatim, `null` becomes `""`, everything else uses
/// its compact JSON text (`42`, `true`, `[1,2]`).
#[must_use]
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Truthiness of a data value for key-only conditions.
///
/// `null`, `""`, `false`, numeric zero, `[]` and `{}` are false. Every other
/// value is true, including non-empty strings such as `"0"` or `"false"`.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context(value: Value) -> DataContext {
        DataContext::from_value(value)
    }

    #[test]
    fn test_resolve_direct_key() {
        let data = context(json!({"vip": "yes", "Sharing": {"vip": "no"}}));
        assert_eq!(data.resolve("vip"), "yes");
    }

    #[test]
    fn test_resolve_sharing_fallback() {
        let data = context(json!({"Sharing": {"company": "Acme"}}));
        assert_eq!(data.resolve("company"), "Acme");
    }

    #[test]
    fn test_resolve_null_falls_back_to_sharing() {
        let data = context(json!({"company": null, "Sharing": {"company": "Acme"}}));
        assert_eq!(data.resolve("company"), "Acme");
    }

    #[test]
    fn test_resolve_missing_everywhere() {
        let data = context(json!({"Sharing": {"a": "1"}}));
        assert_eq!(data.resolve("b"), "");
    }

    #[test]
    fn test_resolve_without_sharing() {
        let data = context(json!({"a": "1"}));
        assert_eq!(data.resolve("b"), "");
    }

    #[test]
    fn test_resolve_sharing_not_an_object() {
        let data = context(json!({"Sharing": ["company"]}));
        assert_eq!(data.resolve("company"), "");
    }

    #[test]
    fn test_resolve_non_object_context() {
        let data = context(json!({"a": "1"}));
        assert_eq!(data.resolve_in("a", &json!(["a", "1"])), "");
        assert_eq!(context(json!(["a"])).resolve("a"), "");
    }

    #[test]
    fn test_resolve_in_explicit_context_uses_root_sharing() {
        let data = context(json!({"Sharing": {"lang": "nl"}}));
        let inner = json!({"name": "Jan"});
        assert_eq!(data.resolve_in("name", &inner), "Jan");
        assert_eq!(data.resolve_in("lang", &inner), "nl");
    }

    #[test]
    fn test_no_dotted_path_access() {
        let data = context(json!({"person": {"name": "Jan"}}));
        assert_eq!(data.resolve("person.name"), "");
        assert_eq!(data.resolve("name"), "");
    }

    #[test]
    fn test_value_to_string_coercion() {
        assert_eq!(value_to_string(&json!("x")), "x");
        assert_eq!(value_to_string(&json!(42)), "42");
        assert_eq!(value_to_string(&json!(1.5)), "1.5");
        assert_eq!(value_to_string(&json!(true)), "true");
        assert_eq!(value_to_string(&json!(null)), "");
        assert_eq!(value_to_string(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_truthiness_policy() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!({})));

        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!("false")));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(["x"])));
    }

    #[test]
    fn test_from_json_invalid() {
        let err = DataContext::from_json("not valid json").unwrap_err();
        assert!(matches!(err, EngineError::DataLoad { .. }));
    }

    #[test]
    fn test_new_prefers_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, r#"{"region": "EU"}"#).unwrap();

        let data = DataContext::new(path.to_str().unwrap()).unwrap();
        assert_eq!(data.resolve("region"), "EU");
    }

    #[test]
    fn test_new_falls_back_to_literal_json() {
        let data = DataContext::new(r#"{"lang": "fr"}"#).unwrap();
        assert_eq!(data.resolve("lang"), "fr");
    }

    #[test]
    fn test_large_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("large.json");
        let blob = "x".repeat(12 * 1024 * 1024);
        fs::write(&path, format!(r#"{{"blob": "{blob}", "region": "EU"}}"#)).unwrap();

        let data = DataContext::new(path.to_str().unwrap()).unwrap();
        assert_eq!(data.resolve("region"), "EU");
        assert_eq!(data.resolve("blob").len(), blob.len());
    }

    #[test]
    fn test_file_with_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ nope").unwrap();

        let err = DataContext::new(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, EngineError::DataLoad { .. }));
    }
}
