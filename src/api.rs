use serde::Deserialize;
use tracing::{debug, info};

use crate::error::FetchError;
use crate::model::WorkItem;
use crate::settings::Settings;

#[derive(Debug, Deserialize)]
struct ItemsResponse {
    #[serde(default)]
    items: Option<Vec<WorkItem>>,
}

/// Fetch every work item of the portfolio collection. One attempt, no retry.
pub async fn fetch_works(settings: &Settings) -> Result<Vec<WorkItem>, FetchError> {
    let url = settings.items_url();
    let client = reqwest::Client::new();

    info!("Fetching works: {}", url);
    let response = client
        .get(&url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(|source| FetchError::Network { url: url.clone(), source })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status { status });
    }

    let body = response
        .text()
        .await
        .map_err(|source| FetchError::Network { url, source })?;
    let works = parse_items(&body)?;
    debug!("Collection returned {} items", works.len());
    Ok(works)
}

/// Decode a collection payload; a missing `items` array means no works.
pub fn parse_items(body: &str) -> Result<Vec<WorkItem>, FetchError> {
    let parsed: ItemsResponse = serde_json::from_str(body)?;
    Ok(parsed.items.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fixture_collection() {
        let body = std::fs::read_to_string("tests/fixtures/collection.json").unwrap();
        let works = parse_items(&body).unwrap();
        assert_eq!(works.len(), 7);
        assert_eq!(works[1].display_title(), "Beta");
    }

    #[test]
    fn missing_items_is_empty() {
        assert!(parse_items("{}").unwrap().is_empty());
        assert!(parse_items(r#"{"items": null}"#).unwrap().is_empty());
    }

    #[test]
    fn null_fields_keep_the_collection() {
        let body = r#"{"items": [
            {"id": "a", "properties": {"published_to_portfolio": true}, "content": []},
            {"id": "b", "properties": {"published_to_portfolio": true}, "content": null},
            {"id": "c", "properties": null, "content": [{"type": "text", "markdown": "hi"}]},
            {"id": "d", "content": [{"type": "table", "rows": [{"id": "r0"}]}]}
        ]}"#;
        let works = parse_items(body).unwrap();
        assert_eq!(works.len(), 4);
        assert!(works[1].content.is_empty());
        assert!(works[1].properties.published_to_portfolio());
        assert!(!works[2].properties.published_to_portfolio());
        assert_eq!(works[2].content[0].markdown(), Some("hi"));
        assert_eq!(works[3].content[0].table_rows().map(<[_]>::len), Some(1));
    }

    #[test]
    fn malformed_body_is_parse_error() {
        assert!(matches!(parse_items("<html>"), Err(FetchError::Parse(_))));
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let settings = Settings {
            api_base: "http://127.0.0.1:9".into(),
            collection_id: "none".into(),
            cache_path: ":memory:".into(),
            cache_ttl_hours: 24,
        };
        assert!(matches!(
            fetch_works(&settings).await,
            Err(FetchError::Network { .. })
        ));
    }
}
