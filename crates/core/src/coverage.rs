use std::fmt;

use serde::{Deserialize, Serialize};

/// Output language for numbers shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    En,
    Hu,
}

impl Locale {
    pub fn decimal_separator(&self) -> char {
        match self {
            Self::En => '.',
            Self::Hu => ',',
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::En => write!(f, "en"),
            Self::Hu => write!(f, "hu"),
        }
    }
}

/// House number counts for a coverage percentage: `done` are present on
/// both sides, `todo` only in the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Coverage {
    pub done: usize,
    pub todo: usize,
}

impl Coverage {
    pub fn new(done: usize, todo: usize) -> Self {
        Self { done, todo }
    }

    /// `None` when there is nothing to count.
    pub fn ratio(&self) -> Option<f64> {
        let total = self.done + self.todo;
        if total == 0 {
            return None;
        }
        Some(self.done as f64 / total as f64 * 100.0)
    }

    /// Percentage with two decimals, or `"N/A"`.
    pub fn percent(&self, locale: Locale) -> String {
        match self.ratio() {
            Some(ratio) => {
                let formatted = format!("{ratio:.2}");
                match locale.decimal_separator() {
                    '.' => formatted,
                    sep => formatted.replace('.', &sep.to_string()),
                }
            }
            None => "N/A".to_string(),
        }
    }
}
