use std::sync::LazyLock;

use regex::Regex;

use crate::model::WorkItem;
use crate::parser::blocks::ContentBlock;

static YT_LIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"youtube\.com/live/([a-zA-Z0-9_-]+)").unwrap());
static YT_WATCH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"youtube\.com/watch\?v=([a-zA-Z0-9_-]+)").unwrap());
static YT_SHORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"youtu\.be/([a-zA-Z0-9_-]+)").unwrap());

const VIDEO_HOSTS: &[&str] = &["youtube.com", "vimeo.com"];

/// Every image URL in document order, duplicates kept.
pub fn images(blocks: &[ContentBlock]) -> Vec<String> {
    blocks
        .iter()
        .filter_map(ContentBlock::image_url)
        .map(str::to_string)
        .collect()
}

/// First embedded YouTube/Vimeo link in the body.
pub fn video(blocks: &[ContentBlock]) -> Option<String> {
    blocks
        .iter()
        .filter_map(ContentBlock::rich_url)
        .find(|url| VIDEO_HOSTS.iter().any(|host| url.contains(host)))
        .map(str::to_string)
}

pub fn cover_image(work: &WorkItem) -> Option<String> {
    work.properties
        .media_url("cover_image")
        .or_else(|| images(&work.content).into_iter().next())
}

pub fn video_url(work: &WorkItem) -> Option<String> {
    work.properties
        .media_url("video")
        .or_else(|| video(&work.content))
}

pub fn blog_url(work: &WorkItem) -> Option<String> {
    work.properties.media_url("blog")
}

/// Rewrites live, watch and short YouTube links (in that order) to the
/// embed form. Anything else yields `None`.
pub fn youtube_embed_url(url: &str) -> Option<String> {
    [&*YT_LIVE_RE, &*YT_WATCH_RE, &*YT_SHORT_RE]
        .into_iter()
        .find_map(|re| re.captures(url))
        .map(|caps| format!("https://www.youtube.com/embed/{}", &caps[1]))
}

/// What the detail page leads with.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", content = "url", rename_all = "snake_case")]
pub enum HeroMedia {
    Video(String),
    Image(String),
}

/// Embeddable video first, then the cover image, then the first image.
pub fn hero_media(work: &WorkItem) -> Option<HeroMedia> {
    if let Some(embed) = video_url(work).as_deref().and_then(youtube_embed_url) {
        return Some(HeroMedia::Video(embed));
    }
    cover_image(work)
        .or_else(|| images(&work.content).into_iter().next())
        .map(HeroMedia::Image)
}

/// Gallery images with the cover first. Every URL appears once.
pub fn gallery(work: &WorkItem) -> Vec<String> {
    let mut gallery: Vec<String> = Vec::new();
    for url in cover_image(work).into_iter().chain(images(&work.content)) {
        if !gallery.contains(&url) {
            gallery.push(url);
        }
    }
    gallery
}
