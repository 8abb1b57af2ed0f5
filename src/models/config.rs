//! Suite configuration data model

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::time::Duration;

/// Top-level configuration document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Target servers as "address:port"
    #[serde(default)]
    pub hosts: Vec<String>,

    /// Tests to run against every host, in order
    #[serde(default)]
    pub tests: Vec<TestDefinition>,
}

/// Which exchange a test performs
///
/// Anything other than `download` or `upload` is kept verbatim so that
/// validation can report it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operation {
    Download,
    Upload,
    Other(String),
}

impl Operation {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Download => "download",
            Self::Upload => "upload",
            Self::Other(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl Default for Operation {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for Operation {
    fn from(name: String) -> Self {
        match name.as_str() {
            "download" => Self::Download,
            "upload" => Self::Upload,
            _ => Self::Other(name),
        }
    }
}

impl From<&str> for Operation {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<Operation> for String {
    fn from(operation: Operation) -> Self {
        match operation {
            Operation::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A test as written in the configuration file, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestDefinition {
    /// Free-form label used only for reporting
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub operation: Operation,

    /// Attempts per host; zero or negative means one
    #[serde(default)]
    pub repeat: i64,

    /// Size specification such as "512KB"; bare YAML integers count bytes
    #[serde(default, deserialize_with = "string_or_number")]
    pub size: String,

    /// Per-exchange deadline such as "500ms", "10s" or "2m"
    #[serde(
        default,
        deserialize_with = "optional_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<String>,
}

impl TestDefinition {
    pub fn new<N, O, S>(name: N, operation: O, repeat: i64, size: S) -> Self
    where
        N: Into<String>,
        O: Into<Operation>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            operation: operation.into(),
            repeat,
            size: size.into(),
            timeout: None,
        }
    }

    pub fn with_timeout<T: Into<String>>(mut self, timeout: T) -> Self {
        self.timeout = Some(timeout.into());
        self
    }
}

/// A test that passed validation, with every default applied
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedTest {
    pub name: String,
    pub operation: Operation,
    pub repeat: u32,
    /// Size as originally written, for reporting
    pub size_spec: String,
    /// Payload size in bytes
    pub size: u32,
    pub timeout: Duration,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Number(u64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::Text(text) => text,
            StringOrNumber::Number(number) => number.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<StringOrNumber>::deserialize(deserializer).map(|value| value.map(String::from))
}
