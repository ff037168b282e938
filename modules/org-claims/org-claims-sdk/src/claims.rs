//! The generic "map claim" convention used by every list-valued mapper.

use serde_json::{Map, Value};

use crate::models::{ClaimSet, MapperModel};

/// Splits a configured claim name into nested path segments.
///
/// Unescaped dots separate segments; `\.` stands for a literal dot.
///
/// ```
/// use org_claims_sdk::split_claim_path;
///
/// assert_eq!(split_claim_path("a.b"), vec!["a", "b"]);
/// assert_eq!(split_claim_path(r"a\.b"), vec!["a.b"]);
/// ```
#[must_use]
pub fn split_claim_path(claim_name: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = claim_name.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'.') => {
                current.push('.');
                chars.next();
            }
            '.' => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    segments.push(current);
    segments
}

/// Writes `values` into `claims` under the claim configured on `model`.
///
/// - Nothing is written when the model has no claim name.
/// - Multivalued (the default for lists) writes an array, even when empty.
/// - Single-valued writes the first value, or `null` when there is none.
/// - `jsonType.label` converts each value; values that don't convert stay strings.
/// - Intermediate path segments become objects, replacing any non-object value.
pub fn map_claim(claims: &mut ClaimSet, model: &MapperModel, values: &[String]) {
    let Some(claim_name) = model.claim_name() else {
        tracing::debug!(mapper = %model.name, "no claim name configured; skipping");
        return;
    };

    let json_type = model.json_type();
    let value = if model.multivalued().unwrap_or(true) {
        Value::Array(values.iter().map(|v| convert(json_type, v)).collect())
    } else {
        if values.len() > 1 {
            tracing::debug!(
                mapper = %model.name,
                count = values.len(),
                "multiple values for single-valued claim; using the first"
            );
        }
        values
            .first()
            .map_or(Value::Null, |v| convert(json_type, v))
    };

    let path = split_claim_path(claim_name);
    insert_at_path(claims.as_map_mut(), &path, value);
}

fn insert_at_path(root: &mut Map<String, Value>, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut current = root;
    for segment in parents {
        let entry = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(next) = entry else {
            return;
        };
        current = next;
    }
    current.insert(last.clone(), value);
}

fn convert(json_type: Option<&str>, raw: &str) -> Value {
    let converted = match json_type {
        Some("long" | "int") => raw.trim().parse::<i64>().ok().map(Value::from),
        Some("boolean") => raw.trim().parse::<bool>().ok().map(Value::Bool),
        Some("JSON") => serde_json::from_str(raw).ok(),
        _ => None,
    };
    converted.unwrap_or_else(|| Value::String(raw.to_owned()))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::properties::{JSON_TYPE, MULTIVALUED, TOKEN_CLAIM_NAME};
    use serde_json::json;

    fn model(claim: &str) -> MapperModel {
        MapperModel::new("orgs", "test").with_config(TOKEN_CLAIM_NAME, claim)
    }

    fn orgs(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    #[test]
    fn split_handles_escapes_and_empty_segments() {
        assert_eq!(split_claim_path("organizations"), vec!["organizations"]);
        assert_eq!(split_claim_path("a.b.c"), vec!["a", "b", "c"]);
        assert_eq!(split_claim_path(r"open\.dpp.orgs"), vec!["open.dpp", "orgs"]);
        assert_eq!(split_claim_path(r"a\b"), vec![r"a\b"]);
        assert_eq!(split_claim_path("a..b"), vec!["a", "", "b"]);
    }

    #[test]
    fn multivalued_by_default_and_present_when_empty() {
        let mut claims = ClaimSet::new();
        map_claim(&mut claims, &model("organizations"), &[]);
        assert_eq!(claims.get("organizations"), Some(&json!([])));

        map_claim(
            &mut claims,
            &model("organizations"),
            &orgs(&["org-a", "org-b"]),
        );
        assert_eq!(claims.get("organizations"), Some(&json!(["org-a", "org-b"])));
    }

    #[test]
    fn single_valued_takes_first_or_null() {
        let single = model("org").with_config(MULTIVALUED, "false");

        let mut claims = ClaimSet::new();
        map_claim(&mut claims, &single, &orgs(&["org-a", "org-b"]));
        assert_eq!(claims.get("org"), Some(&json!("org-a")));

        let mut claims = ClaimSet::new();
        map_claim(&mut claims, &single, &[]);
        assert_eq!(claims.get("org"), Some(&Value::Null));
    }

    #[test]
    fn dotted_name_creates_nested_objects() {
        let mut claims = ClaimSet::new();
        claims.insert("dpp", json!({"role": "admin"}));

        map_claim(&mut claims, &model("dpp.organizations"), &orgs(&["org-a"]));

        assert_eq!(
            claims.get("dpp"),
            Some(&json!({"role": "admin", "organizations": ["org-a"]}))
        );
    }

    #[test]
    fn non_object_parent_is_replaced() {
        let mut claims = ClaimSet::new();
        claims.insert("dpp", json!("scalar"));

        map_claim(&mut claims, &model("dpp.orgs"), &orgs(&["org-a"]));

        assert_eq!(claims.get("dpp"), Some(&json!({"orgs": ["org-a"]})));
    }

    #[test]
    fn escaped_dot_stays_flat() {
        let mut claims = ClaimSet::new();
        map_claim(&mut claims, &model(r"dpp\.orgs"), &orgs(&["org-a"]));
        assert_eq!(claims.get("dpp.orgs"), Some(&json!(["org-a"])));
    }

    #[test]
    fn missing_claim_name_writes_nothing() {
        let mut claims = ClaimSet::new();
        map_claim(
            &mut claims,
            &MapperModel::new("orgs", "test"),
            &orgs(&["org-a"]),
        );
        assert!(claims.is_empty());
    }

    #[test]
    fn json_type_converts_with_string_fallback() {
        let mut claims = ClaimSet::new();
        let ints = model("ids").with_config(JSON_TYPE, "long");
        map_claim(&mut claims, &ints, &orgs(&["42", "not-a-number"]));
        assert_eq!(claims.get("ids"), Some(&json!([42, "not-a-number"])));

        let flag = model("flag")
            .with_config(JSON_TYPE, "boolean")
            .with_config(MULTIVALUED, "false");
        map_claim(&mut claims, &flag, &orgs(&["true"]));
        assert_eq!(claims.get("flag"), Some(&json!(true)));
    }
}
