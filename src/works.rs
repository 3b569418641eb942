use std::collections::BTreeSet;

use crate::model::WorkItem;

pub const DEFAULT_LATEST_LIMIT: usize = 4;

/// Works flagged `published_to_portfolio: true`, order preserved.
pub fn filter_published(works: &[WorkItem]) -> Vec<WorkItem> {
    works
        .iter()
        .filter(|w| w.properties.published_to_portfolio())
        .cloned()
        .collect()
}

/// Union of every work's roles, sorted.
pub fn unique_roles(works: &[WorkItem]) -> Vec<String> {
    works
        .iter()
        .flat_map(|w| w.properties.roles())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// `None` and `"all"` keep every work.
pub fn filter_by_role<'a>(works: &'a [WorkItem], role: Option<&str>) -> Vec<&'a WorkItem> {
    match role {
        None | Some("all") | Some("") => works.iter().collect(),
        Some(role) => works.iter().filter(|w| w.properties.has_role(role)).collect(),
    }
}

pub fn work_by_id<'a>(works: &'a [WorkItem], id: &str) -> Option<&'a WorkItem> {
    works.iter().find(|w| w.id == id)
}

pub fn latest_works(works: &[WorkItem], limit: usize) -> &[WorkItem] {
    &works[..limit.min(works.len())]
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn collection() -> Vec<WorkItem> {
        let json = std::fs::read_to_string("tests/fixtures/collection.json").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        serde_json::from_value(value["items"].clone()).unwrap()
    }

    fn ids(works: &[WorkItem]) -> Vec<&str> {
        works.iter().map(|w| w.id.as_str()).collect()
    }

    #[test]
    fn published_subset_keeps_order() {
        let published = filter_published(&collection());
        assert_eq!(ids(&published), vec!["a", "c", "e", "f"]);
        assert!(published.iter().all(|w| w.properties.published_to_portfolio()));
    }

    #[test]
    fn unique_roles_sorted_and_stable() {
        let all = collection();
        let roles = unique_roles(&all);
        assert_eq!(
            roles,
            vec!["Colorist", "Director", "Editor", "Gaffer", "Producer", "Sound"]
        );
        assert_eq!(unique_roles(&all), roles);
        assert!(unique_roles(&[]).is_empty());
    }

    #[test]
    fn role_filter() {
        let published = filter_published(&collection());
        let editors: Vec<&str> = filter_by_role(&published, Some("Editor"))
            .iter()
            .map(|w| w.id.as_str())
            .collect();
        assert_eq!(editors, vec!["a", "c"]);
        assert_eq!(filter_by_role(&published, Some("all")).len(), 4);
        assert_eq!(filter_by_role(&published, None).len(), 4);
        assert!(filter_by_role(&published, Some("Gaffer")).is_empty());
    }

    #[test]
    fn lookup_by_id() {
        let all = collection();
        assert_eq!(work_by_id(&all, "c").map(WorkItem::display_title), Some("Gamma"));
        assert!(work_by_id(&all, "zzz").is_none());
    }

    #[test]
    fn latest_is_bounded_prefix() {
        let all = collection();
        assert_eq!(ids(latest_works(&all, DEFAULT_LATEST_LIMIT)), vec!["a", "b", "c", "d"]);
        assert_eq!(latest_works(&all, 100).len(), all.len());
        assert!(latest_works(&all, 0).is_empty());
    }
}
