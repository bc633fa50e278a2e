use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use serde_json::{json, Value};
use streetcheck_core::{Interpolation, Range, Ranges};

use crate::error::ConfigError;
use crate::parse::{parse_json, parse_toml, parse_yaml};
use crate::validate::{check_refstreets_bijection, validate_relation_strict, validate_relations};

// ---------------------------------------------------------------------------
// Relation
// ---------------------------------------------------------------------------

/// Typed view over a validated relation tree.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelationConfig {
    #[serde(default)]
    pub osmrelation: Option<u64>,
    #[serde(default, alias = "refcounty")]
    pub refmegye: Option<String>,
    #[serde(default, alias = "refsettlement")]
    pub reftelepules: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub filters: BTreeMap<String, FilterConfig>,
    /// Observed street name -> reference street name.
    #[serde(default)]
    pub refstreets: BTreeMap<String, String>,
    #[serde(default, rename = "street-filters")]
    pub street_filters: Vec<String>,
    #[serde(default, rename = "suspicious-relations")]
    pub suspicious_relations: Option<bool>,
}

/// Per-street override.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub ranges: Option<Vec<RangeConfig>>,
    #[serde(default, alias = "refsettlement")]
    pub reftelepules: Option<String>,
    #[serde(default)]
    pub interpolation: Option<String>,
}

/// Range as written in configuration: bounds are strings.
#[derive(Debug, Clone, Deserialize)]
pub struct RangeConfig {
    pub start: String,
    pub end: String,
    #[serde(default, alias = "refsettlement")]
    pub reftelepules: Option<String>,
}

impl RelationConfig {
    /// Validate (types and refstreets bijection), then convert.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        validate_relation_strict("", value)?;
        serde_json::from_value(value.clone()).map_err(|e| ConfigError::Deserialize(e.to_string()))
    }

    pub fn from_yaml(input: &str) -> Result<Self, ConfigError> {
        Self::from_value(&parse_yaml(input)?)
    }

    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        Self::from_value(&parse_toml(input)?)
    }

    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        Self::from_value(&parse_json(input)?)
    }

    /// Layer `overlay` on top of `self`: scalar keys set in `overlay` win,
    /// maps are merged key by key, street filters are appended. The merged
    /// `refstreets` must still be 1:1.
    pub fn with_overrides(mut self, overlay: RelationConfig) -> Result<Self, ConfigError> {
        if overlay.osmrelation.is_some() {
            self.osmrelation = overlay.osmrelation;
        }
        if overlay.refmegye.is_some() {
            self.refmegye = overlay.refmegye;
        }
        if overlay.reftelepules.is_some() {
            self.reftelepules = overlay.reftelepules;
        }
        if overlay.source.is_some() {
            self.source = overlay.source;
        }
        if overlay.suspicious_relations.is_some() {
            self.suspicious_relations = overlay.suspicious_relations;
        }
        self.filters.extend(overlay.filters);
        self.refstreets.extend(overlay.refstreets);
        for street in overlay.street_filters {
            if !self.street_filters.contains(&street) {
                self.street_filters.push(street);
            }
        }
        check_refstreets_bijection("", &json!({ "refstreets": &self.refstreets }))?;
        Ok(self)
    }

    /// Reference-side name of an observed street; the name itself if there
    /// is no alias.
    pub fn ref_street_name<'a>(&'a self, osm_name: &'a str) -> &'a str {
        self.refstreets
            .get(osm_name)
            .map(String::as_str)
            .unwrap_or(osm_name)
    }

    /// Observed-side name of a reference street; the inverse of
    /// [`Self::ref_street_name`].
    pub fn osm_street_name<'a>(&'a self, ref_name: &'a str) -> &'a str {
        self.refstreets
            .iter()
            .find(|(_, r)| r.as_str() == ref_name)
            .map(|(osm, _)| osm.as_str())
            .unwrap_or(ref_name)
    }

    /// Range sets of every street whose filter has a `ranges` key.
    pub fn street_ranges(&self) -> HashMap<String, Ranges> {
        self.filters
            .iter()
            .filter_map(|(street, filter)| filter.to_ranges().map(|r| (street.clone(), r)))
            .collect()
    }

    /// Reference settlements to collect numbers from for `street`: the
    /// filter's settlement or the relation's, then every range-level one.
    pub fn ref_settlements(&self, street: &str) -> Vec<String> {
        let filter = self.filters.get(street);
        let mut out = Vec::new();
        let primary = filter
            .and_then(|f| f.reftelepules.clone())
            .or_else(|| self.reftelepules.clone());
        if let Some(primary) = primary {
            out.push(primary);
        }
        let range_settlements = filter
            .and_then(|f| f.ranges.as_ref())
            .into_iter()
            .flatten()
            .filter_map(|r| r.reftelepules.clone());
        for settlement in range_settlements {
            if !out.contains(&settlement) {
                out.push(settlement);
            }
        }
        out
    }

    pub fn is_street_filtered(&self, street: &str) -> bool {
        self.street_filters.iter().any(|s| s == street)
    }
}

impl FilterConfig {
    /// Unknown values fall back to [`Interpolation::None`].
    pub fn interpolation(&self) -> Interpolation {
        match self.interpolation.as_deref() {
            None => Interpolation::None,
            Some(value) => Interpolation::from_config_str(value).unwrap_or_else(|| {
                log::warn!("unknown interpolation '{value}', treating as none");
                Interpolation::None
            }),
        }
    }

    /// `None` without a `ranges` key; an empty list gives an empty set.
    pub fn to_ranges(&self) -> Option<Ranges> {
        let interpolation = self.interpolation();
        let ranges = self.ranges.as_ref()?;
        Some(ranges.iter().filter_map(|r| r.to_range(interpolation)).collect())
    }
}

impl RangeConfig {
    pub fn to_range(&self, interpolation: Interpolation) -> Option<Range> {
        match (self.start.trim().parse(), self.end.trim().parse()) {
            (Ok(start), Ok(end)) => Some(Range::with_interpolation(start, end, interpolation)),
            _ => {
                log::warn!("skipping range with non-integer bounds {}-{}", self.start, self.end);
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Relations
// ---------------------------------------------------------------------------

/// All relations, keyed by relation name.
#[derive(Debug, Clone, Default)]
pub struct RelationsConfig {
    pub relations: BTreeMap<String, RelationConfig>,
}

impl RelationsConfig {
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        validate_relations(value)?;
        if let Some(entries) = value.as_object() {
            for (name, entry) in entries {
                check_refstreets_bijection(name, entry)?;
            }
        }
        let relations = serde_json::from_value(value.clone())
            .map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        Ok(Self { relations })
    }

    pub fn from_yaml(input: &str) -> Result<Self, ConfigError> {
        Self::from_value(&parse_yaml(input)?)
    }

    pub fn get(&self, name: &str) -> Option<&RelationConfig> {
        self.relations.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.relations.keys().map(String::as_str)
    }
}
