//! `streetcheck-config` — relation configuration.
//!
//! Parses configuration text into a generic tree, validates it against the
//! relation schema and exposes a typed view that the reconciliation engine
//! reads per-street ranges, aliases and settlements from.

pub mod error;
pub mod parse;
pub mod relation;
pub mod validate;

pub use error::{ConfigError, ValidationError};
pub use parse::{parse_json, parse_toml, parse_yaml};
pub use relation::{FilterConfig, RangeConfig, RelationConfig, RelationsConfig};
pub use validate::{
    check_refstreets_bijection, validate_relation, validate_relation_strict, validate_relations,
};
