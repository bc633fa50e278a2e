use std::fmt;

/// First problem found while validating a configuration tree.
///
/// `Display` yields the message verbatim, e.g.
/// `expected end >= start for 'filters.Main utca.ranges[0]'`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub(crate) fn wrong_type(path: &str, type_name: &str) -> Self {
        Self(format!("expected value type for '{path}' is {type_name}"))
    }

    pub(crate) fn unexpected_key(path: &str) -> Self {
        Self(format!("unexpected key '{path}'"))
    }

    pub(crate) fn missing_key(key: &str, path: &str) -> Self {
        Self(format!("unexpected missing key '{key}' for '{path}'"))
    }

    pub(crate) fn invariant(description: &str, path: &str) -> Self {
        Self(format!("{description} for '{path}'"))
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug)]
pub enum ConfigError {
    /// YAML / TOML / JSON text could not be parsed into a tree.
    Parse(String),
    /// The tree does not match the relation schema.
    Validation(ValidationError),
    /// A validated tree could not be converted into typed config.
    Deserialize(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::Validation(err) => write!(f, "config validation error: {err}"),
            Self::Deserialize(msg) => write!(f, "config deserialize error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ValidationError> for ConfigError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}
