use std::sync::LazyLock;

use regex::Regex;

use crate::parser::blocks::ContentBlock;
use crate::parser::sections::{has_heading, locate_section, SectionRule, StopRule};

static ABOUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#+\s*About\s+this\s+Work").unwrap());
static CHALLENGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#\s*(The\s+)?Challenge").unwrap());
static RESULT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#\s*(The\s+)?Results?").unwrap());
static CALLOUT_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?callout>").unwrap());

/// Description callout under "About this Work". Documents without that
/// heading fall back to their first callout anywhere.
pub fn description(blocks: &[ContentBlock]) -> String {
    if !has_heading(blocks, &ABOUT_RE) {
        return first_callout(blocks.iter());
    }
    scoped_callout(blocks, &ABOUT_RE)
}

pub fn challenge(blocks: &[ContentBlock]) -> String {
    scoped_callout(blocks, &CHALLENGE_RE)
}

pub fn result(blocks: &[ContentBlock]) -> String {
    scoped_callout(blocks, &RESULT_RE)
}

fn scoped_callout(blocks: &[ContentBlock], heading: &Regex) -> String {
    let rule = SectionRule {
        start: heading,
        stop: StopRule::NextTopHeading,
    };
    first_callout(locate_section(blocks, &rule).into_iter())
}

fn first_callout<'a>(mut blocks: impl Iterator<Item = &'a ContentBlock>) -> String {
    blocks
        .find(|b| b.is_callout())
        .map(|b| strip_callout_tags(b.markdown().unwrap_or_default()))
        .unwrap_or_default()
}

fn strip_callout_tags(markdown: &str) -> String {
    CALLOUT_TAG_RE.replace_all(markdown, "").trim().to_string()
}

/// Truncated description for page metadata.
pub fn meta_description(description: &str) -> Option<String> {
    if description.is_empty() {
        return None;
    }
    let head: String = description.chars().take(160).collect();
    Some(format!("{}...", head))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_under_about_heading() {
        let blocks = vec![
            ContentBlock::callout("<callout>Intro elsewhere</callout>"),
            ContentBlock::text("# About this Work"),
            ContentBlock::text("plain paragraph"),
            ContentBlock::callout("<callout>Hello</callout>"),
        ];
        assert_eq!(description(&blocks), "Hello");
    }

    #[test]
    fn description_falls_back_to_first_callout() {
        let blocks = vec![
            ContentBlock::text("Some text"),
            ContentBlock::callout("<callout>  A short film about light.  </callout>"),
            ContentBlock::callout("<callout>second</callout>"),
        ];
        assert_eq!(description(&blocks), "A short film about light.");
    }

    #[test]
    fn description_heading_without_callout_is_empty() {
        let blocks = vec![
            ContentBlock::callout("<callout>before</callout>"),
            ContentBlock::text("# About this Work"),
            ContentBlock::text("no callout here"),
        ];
        assert_eq!(description(&blocks), "");
    }

    #[test]
    fn challenge_and_result_are_scoped() {
        let blocks = vec![
            ContentBlock::text("# About this Work"),
            ContentBlock::callout("<callout>About</callout>"),
            ContentBlock::text("# The Challenge"),
            ContentBlock::text("context"),
            ContentBlock::callout("<callout>Shoot in one night</callout>"),
            ContentBlock::text("# Result"),
            ContentBlock::callout("<callout>Festival selection</callout>"),
        ];
        assert_eq!(challenge(&blocks), "Shoot in one night");
        assert_eq!(result(&blocks), "Festival selection");
    }

    #[test]
    fn sub_headings_do_not_open_challenge_or_result() {
        let blocks = vec![
            ContentBlock::text("# About this Work"),
            ContentBlock::text("## Challenges on set"),
            ContentBlock::callout("<callout>About copy</callout>"),
            ContentBlock::text("### Results"),
            ContentBlock::callout("<callout>still about</callout>"),
        ];
        assert_eq!(challenge(&blocks), "");
        assert_eq!(result(&blocks), "");
        assert_eq!(description(&blocks), "About copy");
    }

    #[test]
    fn callout_outside_section_is_ignored() {
        let blocks = vec![
            ContentBlock::text("# Challenge"),
            ContentBlock::text("no callout"),
            ContentBlock::text("# Gallery"),
            ContentBlock::callout("<callout>not the challenge</callout>"),
        ];
        assert_eq!(challenge(&blocks), "");
        assert_eq!(result(&blocks), "");
    }

    #[test]
    fn meta_description_truncates() {
        let long = "x".repeat(200);
        let meta = meta_description(&long).unwrap();
        assert_eq!(meta.len(), 163);
        assert!(meta.ends_with("..."));
        assert_eq!(meta_description(""), None);
    }
}
