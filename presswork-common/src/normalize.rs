//! Input normalization for loosely-typed payloads
//!
//! Client payloads arrive both as JSON bodies and as multipart form fields,
//! and form fields serialize structured values as strings (JSON-encoded or
//! comma-separated). Every structured field therefore needs dual-mode
//! parsing. These functions are total for their degrade-path inputs:
//! malformed data falls back to best-effort extraction or defaults, never an
//! error, except where a caller explicitly opts into strict section parsing.

use crate::db::models::{Author, Section, Seo};
use crate::defaults;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

/// Classified shape of an incoming field value
#[derive(Debug)]
pub enum RawField<'a> {
    Absent,
    Text(&'a str),
    List(&'a [Value]),
    Object(&'a Map<String, Value>),
    Scalar(&'a Value),
}

pub fn classify(input: Option<&Value>) -> RawField<'_> {
    match input {
        None | Some(Value::Null) => RawField::Absent,
        Some(Value::String(s)) => RawField::Text(s),
        Some(Value::Array(items)) => RawField::List(items),
        Some(Value::Object(map)) => RawField::Object(map),
        Some(other) => RawField::Scalar(other),
    }
}

/// Render a JSON value as a bare string (no quotes around string values)
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Trim, drop empties, and deduplicate (first occurrence wins)
fn collect_strings<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .map(|v| stringify(v).trim().to_string())
        .filter(|s| !s.is_empty() && seen.insert(s.clone()))
        .collect()
}

/// Normalize any input shape into an ordered list of non-empty trimmed
/// strings. Never fails; malformed input degrades to best-effort extraction.
pub fn normalize_string_array(input: Option<&Value>) -> Vec<String> {
    match classify(input) {
        RawField::Absent => Vec::new(),
        RawField::Text(s) => {
            if s.trim().is_empty() {
                return Vec::new();
            }
            // JSON-encoded list first, CSV fallback second
            match serde_json::from_str::<Value>(s) {
                Ok(Value::Array(items)) => collect_strings(&items),
                _ => collect_strings(
                    &s.split(',')
                        .map(|part| Value::String(part.to_string()))
                        .collect::<Vec<_>>(),
                ),
            }
        }
        RawField::List(items) => collect_strings(items),
        RawField::Object(map) => collect_strings(map.values()),
        RawField::Scalar(v) => collect_strings(std::iter::once(v)),
    }
}

fn author_from_map(map: &Map<String, Value>) -> Author {
    let field = |key: &str, default: &str| {
        map.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(default)
            .to_string()
    };

    Author {
        name: field("name", defaults::DEFAULT_AUTHOR_NAME),
        email: field("email", defaults::DEFAULT_AUTHOR_EMAIL),
        image: field("image", defaults::DEFAULT_AUTHOR_IMAGE),
    }
}

pub fn default_author() -> Author {
    Author {
        name: defaults::DEFAULT_AUTHOR_NAME.to_string(),
        email: defaults::DEFAULT_AUTHOR_EMAIL.to_string(),
        image: defaults::DEFAULT_AUTHOR_IMAGE.to_string(),
    }
}

/// Normalize an author field: object passed through with defaults
/// backfilled; a string is JSON-parsed, and on failure the whole string
/// becomes the author name; absent input yields the full default object.
pub fn normalize_author(input: Option<&Value>) -> Author {
    match classify(input) {
        RawField::Object(map) => author_from_map(map),
        RawField::Text(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => author_from_map(&map),
            _ => {
                let name = s.trim();
                if name.is_empty() {
                    default_author()
                } else {
                    Author {
                        name: name.to_string(),
                        ..default_author()
                    }
                }
            }
        },
        _ => default_author(),
    }
}

fn seo_from_map(map: &Map<String, Value>) -> Seo {
    let field = |key: &str| {
        map.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or("")
            .to_string()
    };

    Seo {
        meta_title: field("metaTitle"),
        meta_description: field("metaDescription"),
        keywords: normalize_string_array(map.get("keywords")),
    }
}

/// Normalize an SEO field. Returns None when the field is absent or
/// unparseable (including the stringified-object marker a form serializer
/// produces); update paths drop the field, create paths default it.
pub fn normalize_seo(input: Option<&Value>) -> Option<Seo> {
    match classify(input) {
        RawField::Object(map) => Some(seo_from_map(map)),
        RawField::Text(s) => {
            if s.trim() == "[object Object]" {
                return None;
            }
            match serde_json::from_str::<Value>(s) {
                Ok(Value::Object(map)) => Some(seo_from_map(&map)),
                _ => None,
            }
        }
        _ => None,
    }
}

fn section_from_value(value: &Value) -> Option<Section> {
    let map = value.as_object()?;
    let field = |key: &str| {
        map.get(key)
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string()
    };

    Some(Section {
        heading: field("heading"),
        content: field("content"),
        image: map
            .get("image")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string),
    })
}

/// Parse a sections field into an ordered section list.
///
/// A JSON string that fails to parse is an error so the update path can
/// reject it; the create path degrades via `unwrap_or_default`. Non-object
/// list elements are skipped.
pub fn normalize_sections(input: Option<&Value>) -> Result<Vec<Section>> {
    match classify(input) {
        RawField::Absent => Ok(Vec::new()),
        RawField::List(items) => Ok(items.iter().filter_map(section_from_value).collect()),
        RawField::Text(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Array(items)) => Ok(items.iter().filter_map(section_from_value).collect()),
            _ => Err(Error::InvalidInput(
                "sections must be a JSON array".to_string(),
            )),
        },
        _ => Err(Error::InvalidInput(
            "sections must be a JSON array".to_string(),
        )),
    }
}

/// Coerce a flag that may arrive as a JSON bool or as the form strings
/// "true"/"false". Anything else is treated as absent.
pub fn normalize_bool(input: Option<&Value>) -> Option<bool> {
    match input {
        Some(Value::Bool(b)) => Some(*b),
        Some(Value::String(s)) => match s.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[A-Za-z]{2,}$").expect("email regex"));

/// Minimal `local@domain.tld` shape check
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_array_absent() {
        assert!(normalize_string_array(None).is_empty());
        assert!(normalize_string_array(Some(&Value::Null)).is_empty());
        assert!(normalize_string_array(Some(&json!(""))).is_empty());
    }

    #[test]
    fn test_string_array_json_encoded() {
        let input = json!("[\"rust\", \"web\"]");
        assert_eq!(normalize_string_array(Some(&input)), vec!["rust", "web"]);
    }

    #[test]
    fn test_string_array_csv_fallback() {
        let input = json!("a, b, ,c");
        assert_eq!(normalize_string_array(Some(&input)), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_string_array_malformed_json_degrades_to_csv() {
        let input = json!("[not json, at all");
        assert_eq!(
            normalize_string_array(Some(&input)),
            vec!["[not json", "at all"]
        );
    }

    #[test]
    fn test_string_array_list_input() {
        let input = json!(["  x  ", "", "y", 3]);
        assert_eq!(normalize_string_array(Some(&input)), vec!["x", "y", "3"]);
    }

    #[test]
    fn test_string_array_object_values() {
        let input = json!({"0": "a", "1": "b"});
        assert_eq!(normalize_string_array(Some(&input)), vec!["a", "b"]);
    }

    #[test]
    fn test_string_array_dedups_first_wins() {
        let input = json!(["rust", "web", "rust"]);
        assert_eq!(normalize_string_array(Some(&input)), vec!["rust", "web"]);
    }

    #[test]
    fn test_string_array_never_panics_on_scalars() {
        for v in [json!(42), json!(true), json!(1.5)] {
            let out = normalize_string_array(Some(&v));
            assert_eq!(out.len(), 1);
        }
    }

    #[test]
    fn test_author_object_backfills_defaults() {
        let input = json!({"name": "Jane Doe"});
        let author = normalize_author(Some(&input));
        assert_eq!(author.name, "Jane Doe");
        assert_eq!(author.email, crate::defaults::DEFAULT_AUTHOR_EMAIL);
        assert_eq!(author.image, crate::defaults::DEFAULT_AUTHOR_IMAGE);
    }

    #[test]
    fn test_author_json_string() {
        let input = json!("{\"name\": \"Jane\", \"email\": \"jane@example.com\"}");
        let author = normalize_author(Some(&input));
        assert_eq!(author.name, "Jane");
        assert_eq!(author.email, "jane@example.com");
    }

    #[test]
    fn test_author_plain_string_becomes_name() {
        let author = normalize_author(Some(&json!("Jane Doe")));
        assert_eq!(author.name, "Jane Doe");
        assert_eq!(author.email, crate::defaults::DEFAULT_AUTHOR_EMAIL);
    }

    #[test]
    fn test_author_absent_is_full_default() {
        let author = normalize_author(None);
        assert_eq!(author, default_author());
    }

    #[test]
    fn test_seo_keywords_normalized() {
        let input = json!({"metaTitle": "T", "keywords": "a, b"});
        let seo = normalize_seo(Some(&input)).unwrap();
        assert_eq!(seo.meta_title, "T");
        assert_eq!(seo.keywords, vec!["a", "b"]);
    }

    #[test]
    fn test_seo_object_object_marker_dropped() {
        assert!(normalize_seo(Some(&json!("[object Object]"))).is_none());
        assert!(normalize_seo(Some(&json!("{broken"))).is_none());
        assert!(normalize_seo(None).is_none());
    }

    #[test]
    fn test_sections_json_string() {
        let input = json!("[{\"heading\": \"Intro\", \"content\": \"Hello\"}]");
        let sections = normalize_sections(Some(&input)).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].heading, "Intro");
        assert!(sections[0].image.is_none());
    }

    #[test]
    fn test_sections_parse_failure_is_error_but_degradable() {
        let input = json!("{not a list");
        assert!(normalize_sections(Some(&input)).is_err());
        // create path behavior
        assert!(normalize_sections(Some(&input)).unwrap_or_default().is_empty());
    }

    #[test]
    fn test_bool_coercion() {
        assert_eq!(normalize_bool(Some(&json!(true))), Some(true));
        assert_eq!(normalize_bool(Some(&json!("true"))), Some(true));
        assert_eq!(normalize_bool(Some(&json!("false"))), Some(false));
        assert_eq!(normalize_bool(Some(&json!("yes"))), None);
        assert_eq!(normalize_bool(None), None);
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.domain.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@b"));
    }
}
