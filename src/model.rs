use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::parser::blocks::ContentBlock;

/// One portfolio entry as returned by the collection endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: Properties,
    #[serde(default, deserialize_with = "lenient_blocks")]
    pub content: Vec<ContentBlock>,
}

/// `null` reads as the field's default, like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body blocks that fail to decode are dropped instead of failing the item.
fn lenient_blocks<'de, D>(deserializer: D) -> Result<Vec<ContentBlock>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<Value> = null_as_default(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|block| serde_json::from_value(block).ok())
        .collect())
}

impl WorkItem {
    pub fn display_title(&self) -> &str {
        [self.production.as_deref(), self.title.as_deref()]
            .into_iter()
            .flatten()
            .find(|t| !t.is_empty())
            .unwrap_or("Untitled Work")
    }
}

/// Free-form property map of a work item. Values are kept as raw JSON and
/// read through typed accessors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(pub Map<String, Value>);

impl Properties {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Only a literal JSON `true` counts as published.
    pub fn published_to_portfolio(&self) -> bool {
        matches!(self.get("published_to_portfolio"), Some(Value::Bool(true)))
    }

    pub fn roles(&self) -> Vec<String> {
        self.string_list("roles")
    }

    pub fn genre(&self) -> Vec<String> {
        self.string_list("genre")
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles().iter().any(|r| r == role)
    }

    pub fn year_of_release(&self) -> Option<String> {
        self.display_value("year_of_release")
    }

    pub fn client(&self) -> Option<String> {
        self.display_value("client")
    }

    /// URL of a media property (`cover_image`, `video`, `blog`).
    pub fn media_url(&self, key: &str) -> Option<String> {
        let media: MediaRef = serde_json::from_value(self.get(key)?.clone()).ok()?;
        media.into_url()
    }

    fn string_list(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn display_value(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Array(items) => {
                let joined = items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                (!joined.is_empty()).then_some(joined)
            }
            _ => None,
        }
    }
}

/// A media property is either a bare URL or an object carrying `url`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MediaRef {
    Url(String),
    Object {
        #[serde(default)]
        url: Option<String>,
    },
}

impl MediaRef {
    pub fn into_url(self) -> Option<String> {
        let url = match self {
            MediaRef::Url(url) => url,
            MediaRef::Object { url } => url?,
        };
        (!url.is_empty()).then_some(url)
    }
}
