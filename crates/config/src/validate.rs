//! Recursive validation of relation configuration trees.
//!
//! Every level is described by a key table: the accepted keys, the value
//! type each one must have and an optional handler that descends into the
//! value. The first violation wins. Paths use dots for map keys and
//! brackets for list indexes, e.g. `filters.Main utca.ranges[0].start`.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Key tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    String,
    Int,
    Bool,
    Map,
    List,
}

impl ValueKind {
    fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Int => value.is_i64() || value.is_u64(),
            Self::Bool => value.is_boolean(),
            Self::Map => value.is_object(),
            Self::List => value.is_array(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Map => "map",
            Self::List => "list",
        }
    }
}

/// What a handler may need from the enclosing map.
#[derive(Clone, Copy, Default)]
struct Context<'a> {
    filter: Option<&'a Map<String, Value>>,
}

type Handler = for<'a> fn(&str, &'a Value, Context<'a>) -> Result<(), ValidationError>;

struct KeyRule {
    key: &'static str,
    kind: ValueKind,
    handler: Option<Handler>,
}

const fn rule(key: &'static str, kind: ValueKind) -> KeyRule {
    KeyRule {
        key,
        kind,
        handler: None,
    }
}

const fn nested(key: &'static str, kind: ValueKind, handler: Handler) -> KeyRule {
    KeyRule {
        key,
        kind,
        handler: Some(handler),
    }
}

const RELATION_KEYS: &[KeyRule] = &[
    rule("osmrelation", ValueKind::Int),
    rule("refmegye", ValueKind::String),
    rule("refcounty", ValueKind::String),
    rule("reftelepules", ValueKind::String),
    rule("refsettlement", ValueKind::String),
    rule("source", ValueKind::String),
    nested("filters", ValueKind::Map, validate_filters),
    nested("refstreets", ValueKind::Map, refstreets_handler),
    rule("suspicious-relations", ValueKind::Bool),
    nested("street-filters", ValueKind::List, street_filters_handler),
];

const FILTER_KEYS: &[KeyRule] = &[
    nested("ranges", ValueKind::List, validate_ranges),
    rule("reftelepules", ValueKind::String),
    rule("refsettlement", ValueKind::String),
    rule("interpolation", ValueKind::String),
];

const RANGE_KEYS: &[KeyRule] = &[
    rule("start", ValueKind::String),
    rule("end", ValueKind::String),
    rule("reftelepules", ValueKind::String),
    rule("refsettlement", ValueKind::String),
];

/// English spellings and the key they stand for. A map may use one
/// spelling or the other, not both.
const KEY_ALIASES: &[(&str, &str)] = &[
    ("refcounty", "refmegye"),
    ("refsettlement", "reftelepules"),
];

/// Keys a named relation entry must carry; each group is satisfied by any
/// one of its spellings.
const REQUIRED_RELATION_KEYS: &[&[&str]] = &[
    &["osmrelation"],
    &["refmegye", "refcounty"],
    &["reftelepules", "refsettlement"],
];

// ---------------------------------------------------------------------------
// Walking
// ---------------------------------------------------------------------------

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "."
    } else {
        path
    }
}

fn expect_map<'a>(path: &str, value: &'a Value) -> Result<&'a Map<String, Value>, ValidationError> {
    value
        .as_object()
        .ok_or_else(|| ValidationError::wrong_type(display_path(path), ValueKind::Map.name()))
}

fn validate_keys<'a>(
    parent: &str,
    map: &'a Map<String, Value>,
    rules: &[KeyRule],
    context: Context<'a>,
) -> Result<(), ValidationError> {
    for (key, value) in map {
        let path = join(parent, key);
        let Some(rule) = rules.iter().find(|r| r.key == key) else {
            return Err(ValidationError::unexpected_key(&path));
        };
        if !rule.kind.matches(value) {
            return Err(ValidationError::wrong_type(&path, rule.kind.name()));
        }
        let shadows = KEY_ALIASES
            .iter()
            .any(|(alias, canonical)| *alias == key && map.contains_key(*canonical));
        if shadows {
            return Err(ValidationError::unexpected_key(&path));
        }
        if let Some(handler) = rule.handler {
            handler(&path, value, context)?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn validate_filters<'a>(
    parent: &str,
    value: &'a Value,
    _context: Context<'a>,
) -> Result<(), ValidationError> {
    let filters = expect_map(parent, value)?;
    for (street, filter) in filters {
        validate_filter(&join(parent, street), filter)?;
    }
    Ok(())
}

/// Validate one street's filter: `ranges`, `reftelepules`, `interpolation`.
pub fn validate_filter(parent: &str, value: &Value) -> Result<(), ValidationError> {
    let filter = expect_map(parent, value)?;
    validate_keys(parent, filter, FILTER_KEYS, Context { filter: Some(filter) })
}

fn validate_ranges<'a>(
    parent: &str,
    value: &'a Value,
    context: Context<'a>,
) -> Result<(), ValidationError> {
    let Some(ranges) = value.as_array() else {
        return Err(ValidationError::wrong_type(parent, ValueKind::List.name()));
    };
    for (index, range) in ranges.iter().enumerate() {
        let path = format!("{parent}[{index}]");
        validate_range_in(&path, range, context.filter)?;
    }
    Ok(())
}

/// Validate a single range entry outside of any filter (parity is enforced).
pub fn validate_range(parent: &str, value: &Value) -> Result<(), ValidationError> {
    validate_range_in(parent, value, None)
}

fn validate_range_in(
    parent: &str,
    value: &Value,
    filter: Option<&Map<String, Value>>,
) -> Result<(), ValidationError> {
    let range = expect_map(parent, value)?;
    validate_keys(parent, range, RANGE_KEYS, Context { filter })?;
    validate_range_missing_keys(parent, range, filter)
}

/// Checks run once every present key has the right type: `start` and `end`
/// exist, are integers, `end >= start` and, unless the filter sets
/// `interpolation`, both have the same parity.
pub fn validate_range_missing_keys(
    parent: &str,
    range: &Map<String, Value>,
    filter: Option<&Map<String, Value>>,
) -> Result<(), ValidationError> {
    let Some(start) = range.get("start") else {
        return Err(ValidationError::missing_key("start", parent));
    };
    let Some(end) = range.get("end") else {
        return Err(ValidationError::missing_key("end", parent));
    };
    let start = parse_bound(&join(parent, "start"), start)?;
    let end = parse_bound(&join(parent, "end"), end)?;

    if end < start {
        return Err(ValidationError::invariant("expected end >= start", parent));
    }

    let interpolated = filter.is_some_and(|f| f.contains_key("interpolation"));
    if !interpolated && start % 2 != end % 2 {
        return Err(ValidationError::invariant("expected start % 2 == end % 2", parent));
    }

    Ok(())
}

fn parse_bound(path: &str, value: &Value) -> Result<u64, ValidationError> {
    value
        .as_str()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .ok_or_else(|| ValidationError::invariant("expected integer value", path))
}

fn refstreets_handler<'a>(
    parent: &str,
    value: &'a Value,
    _context: Context<'a>,
) -> Result<(), ValidationError> {
    validate_refstreets(parent, value)
}

fn street_filters_handler<'a>(
    parent: &str,
    value: &'a Value,
    _context: Context<'a>,
) -> Result<(), ValidationError> {
    validate_street_filters(parent, value)
}

/// Every refstreets value must be a string. Bijectivity is a separate check,
/// see [`check_refstreets_bijection`].
pub fn validate_refstreets(parent: &str, value: &Value) -> Result<(), ValidationError> {
    let refstreets = expect_map(parent, value)?;
    for (osm_name, ref_name) in refstreets {
        if !ref_name.is_string() {
            return Err(ValidationError::wrong_type(
                &join(parent, osm_name),
                ValueKind::String.name(),
            ));
        }
    }
    Ok(())
}

pub fn validate_street_filters(parent: &str, value: &Value) -> Result<(), ValidationError> {
    let Some(filters) = value.as_array() else {
        return Err(ValidationError::wrong_type(parent, ValueKind::List.name()));
    };
    for (index, street) in filters.iter().enumerate() {
        if !street.is_string() {
            return Err(ValidationError::wrong_type(
                &format!("{parent}[{index}]"),
                ValueKind::String.name(),
            ));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Validate a relation tree. `parent` is empty for a standalone relation
/// file and the relation name for an entry of the relations map.
pub fn validate_relation(parent: &str, value: &Value) -> Result<(), ValidationError> {
    let relation = expect_map(parent, value)?;
    validate_keys(parent, relation, RELATION_KEYS, Context::default())
}

/// Validate a named relation entry: like [`validate_relation`], and the
/// `osmrelation`, `refmegye` and `reftelepules` keys are required.
pub fn validate_named_relation(name: &str, value: &Value) -> Result<(), ValidationError> {
    validate_relation(name, value)?;
    let relation = expect_map(name, value)?;
    for group in REQUIRED_RELATION_KEYS {
        if !group.iter().any(|key| relation.contains_key(*key)) {
            return Err(ValidationError::missing_key(group[0], display_path(name)));
        }
    }
    Ok(())
}

/// Validate the map of all relations, keyed by relation name.
pub fn validate_relations(value: &Value) -> Result<(), ValidationError> {
    let relations = expect_map("", value)?;
    for (name, relation) in relations {
        validate_named_relation(name, relation)?;
    }
    Ok(())
}

/// `refstreets` must map observed names to reference names 1:1: no two
/// observed names may share a reference name. Absent or non-map
/// `refstreets` pass, the type check reports those.
pub fn check_refstreets_bijection(parent: &str, value: &Value) -> Result<(), ValidationError> {
    let Some(refstreets) = value.get("refstreets").and_then(Value::as_object) else {
        return Ok(());
    };
    let mut seen = HashSet::new();
    for ref_name in refstreets.values().filter_map(Value::as_str) {
        if !seen.insert(ref_name) {
            return Err(ValidationError::new(format!(
                "osm and ref streets are not a 1:1 mapping in '{}'",
                display_path(&join(parent, "refstreets"))
            )));
        }
    }
    Ok(())
}

/// Type checks followed by the refstreets bijection check.
pub fn validate_relation_strict(parent: &str, value: &Value) -> Result<(), ValidationError> {
    validate_relation(parent, value)?;
    check_refstreets_bijection(parent, value)
}
