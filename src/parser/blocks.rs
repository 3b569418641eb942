use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One unit of a work item's document body, in reading order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        markdown: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        decorations: Option<Vec<String>>,
    },
    #[serde(rename = "image")]
    Image {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    #[serde(rename = "richUrl")]
    RichUrl {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    #[serde(rename = "table")]
    Table {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rows: Option<Vec<TableRow>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<Vec<TableRow>>,
    },
    #[serde(other)]
    Other,
}

#[cfg(test)]
impl ContentBlock {
    pub fn text(markdown: &str) -> Self {
        ContentBlock::Text {
            markdown: Some(markdown.to_string()),
            decorations: None,
        }
    }

    pub fn callout(markdown: &str) -> Self {
        ContentBlock::Text {
            markdown: Some(markdown.to_string()),
            decorations: Some(vec!["callout".to_string()]),
        }
    }

    pub fn image(url: &str) -> Self {
        ContentBlock::Image {
            url: Some(url.to_string()),
        }
    }
}

impl ContentBlock {
    /// Non-empty markdown of a `text` block.
    pub fn markdown(&self) -> Option<&str> {
        match self {
            ContentBlock::Text {
                markdown: Some(md), ..
            } if !md.is_empty() => Some(md),
            _ => None,
        }
    }

    pub fn is_callout(&self) -> bool {
        matches!(
            self,
            ContentBlock::Text { decorations: Some(tags), .. } if tags.iter().any(|t| t == "callout")
        )
    }

    /// Non-empty URL of an `image` block.
    pub fn image_url(&self) -> Option<&str> {
        match self {
            ContentBlock::Image { url: Some(url) } if !url.is_empty() => Some(url),
            _ => None,
        }
    }

    pub fn rich_url(&self) -> Option<&str> {
        match self {
            ContentBlock::RichUrl { url: Some(url) } if !url.is_empty() => Some(url),
            _ => None,
        }
    }

    /// Rows of a `table` block, read from `rows` and falling back to `content`.
    pub fn table_rows(&self) -> Option<&[TableRow]> {
        match self {
            ContentBlock::Table { rows, content } => Some(
                rows.as_deref()
                    .or(content.as_deref())
                    .unwrap_or_default(),
            ),
            _ => None,
        }
    }
}

/// A table row is either `{ "cells": [...] }` or the bare cell array. Any
/// other shape is kept as a row without cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableRow {
    Cells { cells: Vec<CellValue> },
    Bare(Vec<CellValue>),
    Other(Value),
}

impl TableRow {
    pub fn cells(&self) -> &[CellValue] {
        match self {
            TableRow::Cells { cells } | TableRow::Bare(cells) => cells,
            TableRow::Other(_) => &[],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    PlainText(String),
    Rich(RichCell),
    Other(Value),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RichCell {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl CellValue {
    /// Display text: the string itself, else `.text`, else `.value`, else
    /// `.markdown`, else empty.
    pub fn text(&self) -> String {
        match self {
            CellValue::PlainText(s) => s.clone(),
            CellValue::Rich(cell) => non_empty(cell.text.as_deref())
                .map(str::to_string)
                .or_else(|| cell.value.as_ref().and_then(value_text))
                .or_else(|| non_empty(cell.markdown.as_deref()).map(str::to_string))
                .unwrap_or_default(),
            CellValue::Other(_) => String::new(),
        }
    }

    /// Header label: the string itself, else `.text`, else `.value`. Unlike
    /// `text()`, markdown is not consulted.
    pub fn header_text(&self) -> String {
        match self {
            CellValue::PlainText(s) => s.clone(),
            CellValue::Rich(cell) => non_empty(cell.text.as_deref())
                .map(str::to_string)
                .or_else(|| cell.value.as_ref().and_then(value_text))
                .unwrap_or_default(),
            CellValue::Other(_) => String::new(),
        }
    }

    /// Explicit link field of a rich cell: `.url`, else `.link`.
    pub fn link(&self) -> Option<&str> {
        match self {
            CellValue::Rich(cell) => non_empty(cell.url.as_deref()).or(non_empty(cell.link.as_deref())),
            _ => None,
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

fn value_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
