//! Event pattern breadth detection and narrowing suggestions.
//!
//! Patterns are kept as [`serde_json::Value`]. Anything that is not a JSON
//! object is treated as "no pattern": it is never broad, and the optimizer
//! replaces it wholesale.

use serde_json::{json, Map, Value};
use std::collections::BTreeSet;

/// Matcher value that accepts anything
pub const WILDCARD: &str = "*";

/// Suggested `source` when nothing concrete is known about the bus
pub const SOURCE_PLACEHOLDER: &str = "<event-source>";

/// Suggested `detail-type` for the caller to fill in
pub const DETAIL_TYPE_PLACEHOLDER: &str = "<detail-type>";

const SOURCE: &str = "source";
const DETAIL_TYPE: &str = "detail-type";
const ACCOUNT: &str = "account";
const REGION: &str = "region";

/// Facts the optimizer narrows a pattern with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptimizerContext {
    /// Concrete `source` values used by other rules on the same bus
    pub known_sources: Vec<String>,
    /// Audited account
    pub account_id: String,
    /// Audited region
    pub region: Option<String>,
}

impl OptimizerContext {
    fn source_matcher(&self) -> Value {
        if self.known_sources.is_empty() {
            json!([SOURCE_PLACEHOLDER])
        } else {
            json!(self.known_sources)
        }
    }
}

/// `["*"]`
fn is_wildcard(value: &Value) -> bool {
    matches!(value, Value::Array(items) if items.len() == 1 && items[0] == WILDCARD)
}

/// A non-empty, non-wildcard matcher array or a non-empty nested object
fn is_discriminating(value: &Value) -> bool {
    match value {
        Value::Array(items) => !items.is_empty() && !is_wildcard(value),
        Value::Object(map) => !map.is_empty(),
        _ => false,
    }
}

/// Why a pattern is too broad, or `None` if it is not
pub fn broad_pattern_reason(pattern: &Value) -> Option<String> {
    let map = pattern.as_object()?;

    if let Some((key, _)) = map.iter().find(|(_, v)| is_wildcard(v)) {
        return Some(format!("\"{key}\" matches [\"{WILDCARD}\"]"));
    }

    let discriminating = map.values().filter(|v| is_discriminating(v)).count();
    if discriminating < 2 {
        return Some(format!(
            "only {discriminating} discriminating top-level key(s), at least 2 expected"
        ));
    }
    None
}

/// True if the pattern would match most or all events on its bus
pub fn is_overly_broad_pattern(pattern: &Value) -> bool {
    broad_pattern_reason(pattern).is_some()
}

/// Suggest a narrower version of a pattern.
///
/// For every overly broad pattern the result differs from the input and
/// carries a `detail-type` matcher. The suggestion is advisory and is never
/// applied to the rule.
pub fn optimize_pattern(pattern: &Value, ctx: &OptimizerContext) -> Value {
    let mut map = pattern.as_object().cloned().unwrap_or_else(|| {
        let mut fresh = Map::new();
        fresh.insert(SOURCE.to_string(), ctx.source_matcher());
        fresh
    });

    let wildcard_keys: Vec<String> = map
        .iter()
        .filter(|(_, v)| is_wildcard(v))
        .map(|(k, _)| k.clone())
        .collect();

    for key in wildcard_keys {
        match key.as_str() {
            SOURCE => {
                map.insert(key, ctx.source_matcher());
            }
            DETAIL_TYPE => {
                map.insert(key, json!([DETAIL_TYPE_PLACEHOLDER]));
            }
            ACCOUNT => {
                map.insert(key, json!([ctx.account_id]));
            }
            REGION => match &ctx.region {
                Some(region) => {
                    map.insert(key, json!([region]));
                }
                None => {
                    map.remove(&key);
                }
            },
            // A wildcard constrains nothing
            _ => {
                map.remove(&key);
            }
        }
    }

    if !map.get(DETAIL_TYPE).is_some_and(is_discriminating) {
        map.insert(DETAIL_TYPE.to_string(), json!([DETAIL_TYPE_PLACEHOLDER]));
    }

    if Value::Object(map.clone()) == *pattern {
        map.insert(ACCOUNT.to_string(), json!([ctx.account_id]));
    }

    Value::Object(map)
}

/// Concrete string sources a pattern matches on
pub fn pattern_sources(pattern: &Value) -> Vec<String> {
    pattern
        .get(SOURCE)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| *s != WILDCARD)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Sorted, deduplicated sources across a set of patterns
pub fn known_sources<'a, I>(patterns: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Value>,
{
    patterns
        .into_iter()
        .flat_map(pattern_sources)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
