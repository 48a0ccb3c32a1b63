//! Per-language dictionaries addressed by dot-delimited key paths.

use serde_json::Value;

/// A loaded translation dictionary.
///
/// Immutable once built; a language switch replaces it wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct Dictionary {
    tree: Value,
}

impl Dictionary {
    /// An empty dictionary: every key path resolves to no value.
    pub fn empty() -> Self {
        Self {
            tree: Value::Object(Default::default()),
        }
    }

    pub fn from_value(tree: Value) -> Self {
        Self { tree }
    }

    /// Parse a dictionary document. No schema is enforced.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw).map(Self::from_value)
    }

    /// Walk `path` one `.` segment at a time.
    ///
    /// Each segment must exist and be non-null; numeric segments index arrays.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut node = &self.tree;
        for segment in path.split('.') {
            node = match node {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
            if node.is_null() {
                return None;
            }
        }
        Some(node)
    }

    /// Resolve `path` to display text.
    ///
    /// Falsy values (empty string, `false`, `0`) and containers count as no value,
    /// so the element keeps whatever text it had.
    pub fn text(&self, path: &str) -> Option<String> {
        match self.get(path)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            Value::Bool(true) => Some("true".to_string()),
            _ => None,
        }
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Dictionary {
        Dictionary::from_value(json!({
            "nav": { "home": "Home", "about": "About", "blank": "", "gone": null },
            "hero": { "title": "Social Review", "steps": ["One", "Two"] },
            "stats": { "clients": 120, "zero": 0, "flag": true, "off": false }
        }))
    }

    // ==================== get Tests ====================

    #[test]
    fn test_nested_lookup() {
        assert_eq!(sample().text("nav.home").as_deref(), Some("Home"));
        assert_eq!(sample().text("hero.title").as_deref(), Some("Social Review"));
    }

    #[test]
    fn test_missing_final_segment() {
        assert_eq!(sample().text("nav.contact"), None);
    }

    #[test]
    fn test_missing_intermediate_segment() {
        assert_eq!(sample().text("footer.legal.terms"), None);
    }

    #[test]
    fn test_traversal_through_null_stops() {
        assert_eq!(sample().get("nav.gone"), None);
        assert_eq!(sample().text("nav.gone.deeper"), None);
    }

    #[test]
    fn test_traversal_through_string_stops() {
        assert_eq!(sample().text("nav.home.length"), None);
    }

    #[test]
    fn test_array_index_segments() {
        assert_eq!(sample().text("hero.steps.1").as_deref(), Some("Two"));
        assert_eq!(sample().text("hero.steps.5"), None);
        assert_eq!(sample().text("hero.steps.first"), None);
    }

    // ==================== text Tests ====================

    #[test]
    fn test_falsy_values_are_no_value() {
        let dict = sample();
        assert_eq!(dict.text("nav.blank"), None);
        assert_eq!(dict.text("stats.zero"), None);
        assert_eq!(dict.text("stats.off"), None);
    }

    #[test]
    fn test_scalars_render_as_text() {
        let dict = sample();
        assert_eq!(dict.text("stats.clients").as_deref(), Some("120"));
        assert_eq!(dict.text("stats.flag").as_deref(), Some("true"));
    }

    #[test]
    fn test_containers_are_no_value() {
        assert_eq!(sample().text("nav"), None);
        assert!(sample().get("nav").is_some());
    }

    #[test]
    fn test_empty_dictionary() {
        assert_eq!(Dictionary::empty().text("nav.home"), None);
        assert_eq!(Dictionary::default(), Dictionary::empty());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Dictionary::from_json("{not json").is_err());
        let dict = Dictionary::from_json(r#"{"a":{"b":"c"}}"#).unwrap();
        assert_eq!(dict.text("a.b").as_deref(), Some("c"));
    }
}
