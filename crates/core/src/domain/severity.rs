use serde::{Deserialize, Serialize};
use std::fmt;

/// Rank given to any severity outside `high`/`medium`/`low`. Sorts after `low`.
pub const UNRANKED: u8 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    High,
    Medium,
    Low,
    /// Anything the backend sends that is not one of the three ranked values, kept verbatim.
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityColor {
    Red,
    Yellow,
    Green,
    Blue,
}

impl Severity {
    pub fn rank(&self) -> u8 {
        match self {
            Severity::High => 0,
            Severity::Medium => 1,
            Severity::Low => 2,
            Severity::Other(_) => UNRANKED,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Other(raw) => raw,
        }
    }

    pub fn color(&self) -> SeverityColor {
        match self {
            Severity::High => SeverityColor::Red,
            Severity::Medium => SeverityColor::Yellow,
            Severity::Low => SeverityColor::Green,
            Severity::Other(_) => SeverityColor::Blue,
        }
    }

    /// Badge text: the raw value upper-cased.
    pub fn label(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Other(String::new())
    }
}

impl From<String> for Severity {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "high" => Severity::High,
            "medium" => Severity::Medium,
            "low" => Severity::Low,
            _ => Severity::Other(raw),
        }
    }
}

impl From<&str> for Severity {
    fn from(raw: &str) -> Self {
        Severity::from(raw.to_string())
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Other(raw) => raw,
            ranked => ranked.as_str().to_string(),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SeverityColor {
    pub fn as_str(self) -> &'static str {
        match self {
            SeverityColor::Red => "red",
            SeverityColor::Yellow => "yellow",
            SeverityColor::Green => "green",
            SeverityColor::Blue => "blue",
        }
    }
}
