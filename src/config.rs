use serde::{Deserialize, Deserializer};

use crate::error::Result;

/// Plugin options, as passed in the host's plugin config JSON:
///
/// ```json
/// { "include": ["**/*.css"], "exclude": "node_modules/**", "cwd": "/project" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    #[serde(deserialize_with = "one_or_many")]
    pub include: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub exclude: Vec<String>,
    /// Base directory for relative patterns.
    pub cwd: Option<String>,
}

impl Options {
    pub fn from_json(config: &str) -> Result<Self> {
        if config.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(config)?)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => vec![],
        Some(OneOrMany::One(p)) => vec![p],
        Some(OneOrMany::Many(ps)) => ps,
    })
}
