//! Plugin metadata and the closed set of accepted meta keys.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Every key `meta` may carry. Anything else is dropped with a warning.
pub const ACCEPTED_META_KEYS: &[&str] = &[
    "name",
    "author",
    "description",
    "version",
    "invite",
    "authorId",
    "authorLink",
    "donate",
    "patreon",
    "website",
    "source",
    "updateUrl",
];

pub const DEFAULT_AUTHOR: &str = "Unknown";
pub const DEFAULT_DESCRIPTION: &str = "Plugin bundled with BundleBD";
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Display metadata written into the plugin header.
///
/// Values may be any JSON value. Strings are taken as is, anything else keeps
/// its JSON text (`"authorId": 123` reads as `"123"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginMeta {
    #[serde(deserialize_with = "display_text")]
    pub name: String,
    #[serde(deserialize_with = "display_text")]
    pub author: String,
    #[serde(deserialize_with = "display_text")]
    pub description: String,
    #[serde(deserialize_with = "display_text")]
    pub version: String,
    #[serde(
        default,
        deserialize_with = "optional_display_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub invite: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_display_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub author_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_display_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub author_link: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_display_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub donate: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_display_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub patreon: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_display_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub website: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_display_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub source: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_display_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub update_url: Option<String>,
}

impl PluginMeta {
    /// Default metadata for a plugin called `name`.
    pub fn defaults_for(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            author: DEFAULT_AUTHOR.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            version: DEFAULT_VERSION.to_string(),
            invite: None,
            author_id: None,
            author_link: None,
            donate: None,
            patreon: None,
            website: None,
            source: None,
            update_url: None,
        }
    }

    /// Default metadata as a JSON object, the base user keys are merged onto.
    pub(crate) fn default_map(name: &str) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".into(), Value::String(name.to_string()));
        map.insert("author".into(), Value::String(DEFAULT_AUTHOR.into()));
        map.insert("description".into(), Value::String(DEFAULT_DESCRIPTION.into()));
        map.insert("version".into(), Value::String(DEFAULT_VERSION.into()));
        map
    }
}

fn text_of(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

fn display_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    text_of(Value::deserialize(deserializer)?)
        .ok_or_else(|| D::Error::custom("expected a value, found null"))
}

fn optional_display_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(text_of(Value::deserialize(deserializer)?))
}

/// Split `map` into the entries whose key is in `allow` and the names of the
/// keys that were not.
///
/// Dropped keys are reported in the map's iteration order. Filtering an
/// already filtered map returns it unchanged with nothing dropped.
pub fn filter_keys(map: &Map<String, Value>, allow: &[&str]) -> (Map<String, Value>, Vec<String>) {
    let mut kept = Map::new();
    let mut dropped = Vec::new();

    for (key, value) in map {
        if allow.contains(&key.as_str()) {
            kept.insert(key.clone(), value.clone());
        } else {
            dropped.push(key.clone());
        }
    }

    (kept, dropped)
}
