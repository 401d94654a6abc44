use serde::{Deserialize, Serialize};

/// How a table is bound to its stream.
///
/// Deserialises from YAML such as:
///
/// ```yaml
/// separator: ";"
/// auto_write: false
/// ```
///
/// Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Field separator for both parsing and write-back.
    pub separator: String,
    /// Whether mutations write the table back immediately.
    pub auto_write: bool,
    /// Whether the stream is parsed when the table is constructed.
    pub parse_on_open: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            separator: ",".into(),
            auto_write: true,
            parse_on_open: true,
        }
    }
}

impl TableOptions {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}
