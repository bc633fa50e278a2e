use std::fmt;

use streetcheck_config::ConfigError;

#[derive(Debug)]
pub enum ReconError {
    /// Relation configuration could not be parsed or validated.
    Config(ConfigError),
    /// A TSV source could not be read.
    Input {
        source: String,
        line: u64,
        message: String,
    },
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Input {
                source,
                line,
                message,
            } => write!(f, "{source} input, line {line}: {message}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}

impl From<ConfigError> for ReconError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<std::io::Error> for ReconError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
